use sea_orm::DatabaseConnection;
use thiserror::Error;

use crate::{
    auth::{authorize_scope, Caller},
    entity::prelude::*,
    ids::UserId,
};

#[derive(Debug, Error)]
pub enum UsersServiceError {
    #[error("fatal database error")]
    DbError(#[from] DbErr),

    #[error("user not found")]
    UserNotFound,

    #[error("assigned admin not found")]
    AdminNotFound,

    #[error("email already registered")]
    EmailTaken,

    #[error("unauthorized")]
    Unauthorized,

    #[error("invalid {0}")]
    Invalid(&'static str),
}

/// Explicit fields-to-change structure for partial updates. Only set
/// fields are touched; `assigned_admin_id` distinguishes "leave alone"
/// (`None`) from "clear" (`Some(None)`).
#[derive(Debug, Default)]
pub struct UserUpdate {
    pub name: Option<String>,
    pub email: Option<String>,
    pub weekly_goal: Option<i32>,
    pub assigned_admin_id: Option<Option<UserId>>,
}

#[derive(Clone)]
pub struct UsersService {
    db: DatabaseConnection,
}

impl UsersService {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Self-service registration. Always creates an active trainee.
    pub async fn register(
        &self,
        name: String,
        email: String,
        password: String,
    ) -> Result<UserModel, UsersServiceError> {
        self.insert_user(name, email, password, Role::Trainee, None, None)
            .await
    }

    /// Create a trainee on behalf of an admin. A plain admin's trainees
    /// are assigned to them unless an explicit assignment is given.
    pub async fn create_trainee(
        &self,
        caller: &Caller,
        name: String,
        email: String,
        password: String,
        assigned_admin_id: Option<UserId>,
        weekly_goal: Option<i32>,
    ) -> Result<UserModel, UsersServiceError> {
        if !caller.is_admin_level() {
            return Err(UsersServiceError::Unauthorized);
        }

        let assigned = match assigned_admin_id {
            Some(admin_id) => {
                self.require_admin_level(admin_id).await?;
                Some(admin_id)
            }
            None if caller.role == Role::Admin => Some(caller.id),
            None => None,
        };

        if let Some(goal) = weekly_goal {
            if goal <= 0 {
                return Err(UsersServiceError::Invalid("weekly goal"));
            }
        }

        self.insert_user(name, email, password, Role::Trainee, assigned, weekly_goal)
            .await
    }

    /// Create an admin account. Super admin only.
    pub async fn create_admin(
        &self,
        caller: &Caller,
        name: String,
        email: String,
        password: String,
    ) -> Result<UserModel, UsersServiceError> {
        if !caller.is_super() {
            return Err(UsersServiceError::Unauthorized);
        }

        self.insert_user(name, email, password, Role::Admin, None, None)
            .await
    }

    /// Get a user the caller is allowed to see. Absence and out-of-scope
    /// both come back as `None`.
    pub async fn get_user(
        &self,
        caller: &Caller,
        user_id: UserId,
    ) -> Result<Option<UserModel>, UsersServiceError> {
        let user = User::find_by_id(user_id).one(&self.db).await?;

        Ok(user.filter(|u| self.may_manage(caller, u)))
    }

    /// Look a user up by email. Used by the identity layer upstream; not
    /// caller-scoped.
    pub async fn get_user_by_email(
        &self,
        email: &str,
    ) -> Result<Option<UserModel>, UsersServiceError> {
        let user = User::find()
            .filter(UserColumn::Email.eq(email))
            .one(&self.db)
            .await?;

        Ok(user)
    }

    /// Role-scoped listing: super admins see everyone, admins see their
    /// assigned trainees, trainees see themselves.
    pub async fn list_users(&self, caller: &Caller) -> Result<Vec<UserModel>, UsersServiceError> {
        let users = match caller.role {
            Role::SuperAdmin => User::find().all(&self.db).await?,
            Role::Admin => {
                User::find()
                    .filter(UserColumn::AssignedAdminId.eq(caller.id))
                    .all(&self.db)
                    .await?
            }
            Role::Trainee => User::find_by_id(caller.id)
                .one(&self.db)
                .await?
                .into_iter()
                .collect(),
        };

        Ok(users)
    }

    /// Trainees assigned to `admin_id`. Out-of-scope callers get an
    /// empty list, not an error.
    pub async fn list_trainees_for_admin(
        &self,
        caller: &Caller,
        admin_id: UserId,
    ) -> Result<Vec<UserModel>, UsersServiceError> {
        if !authorize_scope(caller, admin_id) {
            return Ok(Vec::new());
        }

        let trainees = User::find()
            .filter(UserColumn::AssignedAdminId.eq(admin_id))
            .filter(UserColumn::Role.eq(Role::Trainee))
            .all(&self.db)
            .await?;

        Ok(trainees)
    }

    /// Partial profile update. Only supplied fields change; `updated_at`
    /// is refreshed either way.
    pub async fn update_user(
        &self,
        caller: &Caller,
        user_id: UserId,
        update: UserUpdate,
    ) -> Result<UserModel, UsersServiceError> {
        let user = User::find_by_id(user_id)
            .one(&self.db)
            .await?
            .ok_or(UsersServiceError::UserNotFound)?;

        if !self.may_manage(caller, &user) {
            return Err(UsersServiceError::Unauthorized);
        }

        if let Some(email) = &update.email {
            if email.trim().is_empty() || !email.contains('@') {
                return Err(UsersServiceError::Invalid("email"));
            }
            let taken = User::find()
                .filter(UserColumn::Email.eq(email.clone()))
                .filter(UserColumn::Id.ne(user_id))
                .one(&self.db)
                .await?
                .is_some();
            if taken {
                return Err(UsersServiceError::EmailTaken);
            }
        }

        if let Some(goal) = update.weekly_goal {
            if goal <= 0 {
                return Err(UsersServiceError::Invalid("weekly goal"));
            }
        }

        if let Some(Some(admin_id)) = update.assigned_admin_id {
            self.require_admin_level(admin_id).await?;
        }

        let mut active: UserActiveModel = user.into();

        if let Some(name) = update.name {
            if name.trim().is_empty() {
                return Err(UsersServiceError::Invalid("name"));
            }
            active.name = Set(name);
        }
        if let Some(email) = update.email {
            active.email = Set(email);
        }
        if let Some(goal) = update.weekly_goal {
            active.weekly_goal = Set(Some(goal));
        }
        if let Some(assignment) = update.assigned_admin_id {
            active.assigned_admin_id = Set(assignment);
        }
        active.updated_at = Set(chrono::Utc::now().to_rfc3339());

        let updated = active.update(&self.db).await?;
        Ok(updated)
    }

    /// Activate or deactivate an account. Users are never hard-deleted;
    /// deactivation is the terminal flow.
    pub async fn set_status(
        &self,
        caller: &Caller,
        user_id: UserId,
        status: UserStatus,
    ) -> Result<UserModel, UsersServiceError> {
        if !caller.is_admin_level() {
            return Err(UsersServiceError::Unauthorized);
        }

        let user = User::find_by_id(user_id)
            .one(&self.db)
            .await?
            .ok_or(UsersServiceError::UserNotFound)?;

        if !self.may_manage(caller, &user) {
            return Err(UsersServiceError::Unauthorized);
        }

        let mut active: UserActiveModel = user.into();
        active.status = Set(status);
        active.updated_at = Set(chrono::Utc::now().to_rfc3339());

        let updated = active.update(&self.db).await?;
        Ok(updated)
    }

    fn may_manage(&self, caller: &Caller, target: &UserModel) -> bool {
        caller.is_super()
            || caller.id == target.id
            || (caller.role == Role::Admin && target.assigned_admin_id == Some(caller.id))
    }

    async fn require_admin_level(&self, admin_id: UserId) -> Result<(), UsersServiceError> {
        let admin = User::find_by_id(admin_id)
            .one(&self.db)
            .await?
            .ok_or(UsersServiceError::AdminNotFound)?;

        if !admin.role.is_admin_level() {
            return Err(UsersServiceError::AdminNotFound);
        }

        Ok(())
    }

    async fn insert_user(
        &self,
        name: String,
        email: String,
        password: String,
        role: Role,
        assigned_admin_id: Option<UserId>,
        weekly_goal: Option<i32>,
    ) -> Result<UserModel, UsersServiceError> {
        if name.trim().is_empty() {
            return Err(UsersServiceError::Invalid("name"));
        }
        if email.trim().is_empty() || !email.contains('@') {
            return Err(UsersServiceError::Invalid("email"));
        }

        let taken = User::find()
            .filter(UserColumn::Email.eq(email.clone()))
            .one(&self.db)
            .await?
            .is_some();
        if taken {
            return Err(UsersServiceError::EmailTaken);
        }

        let now = chrono::Utc::now().to_rfc3339();
        let user = UserActiveModel {
            id: Set(UserId::new()),
            name: Set(name),
            email: Set(email),
            password: Set(password),
            role: Set(role),
            status: Set(UserStatus::Active),
            assigned_admin_id: Set(assigned_admin_id),
            weekly_goal: Set(weekly_goal),
            created_at: Set(now.clone()),
            updated_at: Set(now),
        };

        let created = User::insert(user).exec_with_returning(&self.db).await?;
        Ok(created)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils;

    async fn setup_test_service() -> UsersService {
        let db = test_utils::setup_test_db().await;
        UsersService::new(db)
    }

    fn caller_for(user: &UserModel) -> Caller {
        Caller::new(user.id, user.role)
    }

    #[tokio::test]
    async fn test_register_creates_active_trainee() {
        let service = setup_test_service().await;

        let user = service
            .register(
                "Ada".to_string(),
                "ada@example.test".to_string(),
                "pw".to_string(),
            )
            .await
            .expect("registration should succeed");

        assert_eq!(user.role, Role::Trainee);
        assert_eq!(user.status, UserStatus::Active);
        assert!(user.assigned_admin_id.is_none());
    }

    #[tokio::test]
    async fn test_register_duplicate_email_fails() {
        let service = setup_test_service().await;

        service
            .register(
                "Ada".to_string(),
                "ada@example.test".to_string(),
                "pw".to_string(),
            )
            .await
            .unwrap();

        let result = service
            .register(
                "Other Ada".to_string(),
                "ada@example.test".to_string(),
                "pw".to_string(),
            )
            .await;

        assert!(matches!(result, Err(UsersServiceError::EmailTaken)));
    }

    #[tokio::test]
    async fn test_admin_created_trainee_defaults_to_creator() {
        let service = setup_test_service().await;
        let admin = test_utils::seed_user(&service.db, Role::Admin, None).await;

        let trainee = service
            .create_trainee(
                &caller_for(&admin),
                "Tess".to_string(),
                "tess@example.test".to_string(),
                "pw".to_string(),
                None,
                Some(3),
            )
            .await
            .unwrap();

        assert_eq!(trainee.assigned_admin_id, Some(admin.id));
        assert_eq!(trainee.weekly_goal, Some(3));
    }

    #[tokio::test]
    async fn test_trainee_cannot_create_trainees() {
        let service = setup_test_service().await;
        let trainee = test_utils::seed_user(&service.db, Role::Trainee, None).await;

        let result = service
            .create_trainee(
                &caller_for(&trainee),
                "Tess".to_string(),
                "tess@example.test".to_string(),
                "pw".to_string(),
                None,
                None,
            )
            .await;

        assert!(matches!(result, Err(UsersServiceError::Unauthorized)));
    }

    #[tokio::test]
    async fn test_only_super_admin_creates_admins() {
        let service = setup_test_service().await;
        let admin = test_utils::seed_user(&service.db, Role::Admin, None).await;
        let superuser = test_utils::seed_user(&service.db, Role::SuperAdmin, None).await;

        let denied = service
            .create_admin(
                &caller_for(&admin),
                "Coach".to_string(),
                "coach@example.test".to_string(),
                "pw".to_string(),
            )
            .await;
        assert!(matches!(denied, Err(UsersServiceError::Unauthorized)));

        let created = service
            .create_admin(
                &caller_for(&superuser),
                "Coach".to_string(),
                "coach@example.test".to_string(),
                "pw".to_string(),
            )
            .await
            .unwrap();
        assert_eq!(created.role, Role::Admin);
    }

    #[tokio::test]
    async fn test_invalid_weekly_goal_rejected() {
        let service = setup_test_service().await;
        let admin = test_utils::seed_user(&service.db, Role::Admin, None).await;

        let result = service
            .create_trainee(
                &caller_for(&admin),
                "Tess".to_string(),
                "tess@example.test".to_string(),
                "pw".to_string(),
                None,
                Some(0),
            )
            .await;

        assert!(matches!(result, Err(UsersServiceError::Invalid(_))));
    }

    #[tokio::test]
    async fn test_partial_update_preserves_other_fields() {
        let service = setup_test_service().await;
        let trainee = test_utils::seed_user(&service.db, Role::Trainee, None).await;
        let original_email = trainee.email.clone();

        let updated = service
            .update_user(
                &caller_for(&trainee),
                trainee.id,
                UserUpdate {
                    name: Some("New Name".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.name, "New Name");
        assert_eq!(updated.email, original_email);
        assert!(updated.updated_at >= trainee.updated_at);
    }

    #[tokio::test]
    async fn test_admin_cannot_update_unassigned_trainee() {
        let service = setup_test_service().await;
        let admin_a = test_utils::seed_user(&service.db, Role::Admin, None).await;
        let admin_b = test_utils::seed_user(&service.db, Role::Admin, None).await;
        let trainee = test_utils::seed_user(&service.db, Role::Trainee, Some(admin_a.id)).await;

        let result = service
            .update_user(
                &caller_for(&admin_b),
                trainee.id,
                UserUpdate {
                    name: Some("Hijacked".to_string()),
                    ..Default::default()
                },
            )
            .await;

        assert!(matches!(result, Err(UsersServiceError::Unauthorized)));
    }

    #[tokio::test]
    async fn test_roster_is_scoped_to_owning_admin() {
        let service = setup_test_service().await;
        let admin_a = test_utils::seed_user(&service.db, Role::Admin, None).await;
        let admin_b = test_utils::seed_user(&service.db, Role::Admin, None).await;
        test_utils::seed_user(&service.db, Role::Trainee, Some(admin_a.id)).await;
        test_utils::seed_user(&service.db, Role::Trainee, Some(admin_a.id)).await;

        let own = service
            .list_trainees_for_admin(&caller_for(&admin_a), admin_a.id)
            .await
            .unwrap();
        assert_eq!(own.len(), 2);

        // Another admin's roster quietly comes back empty
        let foreign = service
            .list_trainees_for_admin(&caller_for(&admin_b), admin_a.id)
            .await
            .unwrap();
        assert!(foreign.is_empty());

        let as_super = test_utils::seed_user(&service.db, Role::SuperAdmin, None).await;
        let all = service
            .list_trainees_for_admin(&caller_for(&as_super), admin_a.id)
            .await
            .unwrap();
        assert_eq!(all.len(), 2);
    }

    #[tokio::test]
    async fn test_deactivation_keeps_the_row() {
        let service = setup_test_service().await;
        let superuser = test_utils::seed_user(&service.db, Role::SuperAdmin, None).await;
        let trainee = test_utils::seed_user(&service.db, Role::Trainee, None).await;

        let updated = service
            .set_status(&caller_for(&superuser), trainee.id, UserStatus::Inactive)
            .await
            .unwrap();
        assert_eq!(updated.status, UserStatus::Inactive);

        let found = User::find_by_id(trainee.id).one(&service.db).await.unwrap();
        assert!(found.is_some());
    }
}
