use sea_orm::DatabaseConnection;
use thiserror::Error;

use crate::{
    auth::{authorize_scope, Caller},
    entity::prelude::*,
    ids::{ClassId, UserId},
};

#[derive(Debug, Error)]
pub enum ClassesServiceError {
    #[error("fatal database error")]
    DbError(#[from] DbErr),

    #[error("class not found")]
    ClassNotFound,

    #[error("instructor not found")]
    InstructorNotFound,

    #[error("unauthorized")]
    Unauthorized,

    #[error("invalid {0}")]
    Invalid(&'static str),
}

#[derive(Debug, Default)]
pub struct ClassUpdate {
    pub name: Option<String>,
    pub class_type: Option<String>,
    pub description: Option<Option<String>>,
    pub level: Option<String>,
    pub capacity: Option<i32>,
    pub duration_minutes: Option<i32>,
    pub location: Option<Option<String>>,
}

#[derive(Clone)]
pub struct ClassesService {
    db: DatabaseConnection,
}

impl ClassesService {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Create a class. A plain admin always instructs their own classes;
    /// a super admin may put any admin on the schedule.
    pub async fn create_class(
        &self,
        caller: &Caller,
        name: String,
        class_type: String,
        description: Option<String>,
        level: String,
        capacity: i32,
        duration_minutes: i32,
        location: Option<String>,
        instructor_id: Option<UserId>,
    ) -> Result<ClassModel, ClassesServiceError> {
        if !caller.is_admin_level() {
            return Err(ClassesServiceError::Unauthorized);
        }
        if name.trim().is_empty() {
            return Err(ClassesServiceError::Invalid("name"));
        }
        if capacity <= 0 {
            return Err(ClassesServiceError::Invalid("capacity"));
        }
        if duration_minutes <= 0 {
            return Err(ClassesServiceError::Invalid("duration"));
        }

        let instructor_id = match instructor_id {
            Some(id) if id != caller.id => {
                if !caller.is_super() {
                    return Err(ClassesServiceError::Unauthorized);
                }
                let instructor = User::find_by_id(id)
                    .one(&self.db)
                    .await?
                    .ok_or(ClassesServiceError::InstructorNotFound)?;
                if !instructor.role.is_admin_level() {
                    return Err(ClassesServiceError::InstructorNotFound);
                }
                id
            }
            _ => caller.id,
        };

        let now = chrono::Utc::now().to_rfc3339();
        let class = ClassActiveModel {
            id: Set(ClassId::new()),
            name: Set(name),
            class_type: Set(class_type),
            description: Set(description),
            level: Set(level),
            capacity: Set(capacity),
            duration_minutes: Set(duration_minutes),
            instructor_id: Set(instructor_id),
            location: Set(location),
            status: Set(ClassStatus::Active),
            created_at: Set(now.clone()),
            updated_at: Set(now),
        };

        let created = Class::insert(class).exec_with_returning(&self.db).await?;
        Ok(created)
    }

    pub async fn get_class(
        &self,
        class_id: ClassId,
    ) -> Result<Option<ClassModel>, ClassesServiceError> {
        let class = Class::find_by_id(class_id).one(&self.db).await?;
        Ok(class)
    }

    /// Role-scoped listing: super admins see everything, admins see the
    /// classes they instruct, trainees see active classes to browse.
    pub async fn list_classes(&self, caller: &Caller) -> Result<Vec<ClassModel>, ClassesServiceError> {
        let classes = match caller.role {
            Role::SuperAdmin => Class::find().all(&self.db).await?,
            Role::Admin => {
                Class::find()
                    .filter(ClassColumn::InstructorId.eq(caller.id))
                    .all(&self.db)
                    .await?
            }
            Role::Trainee => {
                Class::find()
                    .filter(ClassColumn::Status.eq(ClassStatus::Active))
                    .all(&self.db)
                    .await?
            }
        };

        Ok(classes)
    }

    /// Classes instructed by `instructor_id`. Out-of-scope callers get
    /// an empty list, not an error.
    pub async fn list_for_instructor(
        &self,
        caller: &Caller,
        instructor_id: UserId,
    ) -> Result<Vec<ClassModel>, ClassesServiceError> {
        if !authorize_scope(caller, instructor_id) {
            return Ok(Vec::new());
        }

        let classes = Class::find()
            .filter(ClassColumn::InstructorId.eq(instructor_id))
            .all(&self.db)
            .await?;

        Ok(classes)
    }

    /// Partial update; only the instructor or a super admin.
    pub async fn update_class(
        &self,
        caller: &Caller,
        class_id: ClassId,
        update: ClassUpdate,
    ) -> Result<ClassModel, ClassesServiceError> {
        let class = Class::find_by_id(class_id)
            .one(&self.db)
            .await?
            .ok_or(ClassesServiceError::ClassNotFound)?;

        if !authorize_scope(caller, class.instructor_id) {
            return Err(ClassesServiceError::Unauthorized);
        }

        if let Some(capacity) = update.capacity {
            if capacity <= 0 {
                return Err(ClassesServiceError::Invalid("capacity"));
            }
        }
        if let Some(duration) = update.duration_minutes {
            if duration <= 0 {
                return Err(ClassesServiceError::Invalid("duration"));
            }
        }

        let mut active: ClassActiveModel = class.into();

        if let Some(name) = update.name {
            if name.trim().is_empty() {
                return Err(ClassesServiceError::Invalid("name"));
            }
            active.name = Set(name);
        }
        if let Some(class_type) = update.class_type {
            active.class_type = Set(class_type);
        }
        if let Some(description) = update.description {
            active.description = Set(description);
        }
        if let Some(level) = update.level {
            active.level = Set(level);
        }
        if let Some(capacity) = update.capacity {
            active.capacity = Set(capacity);
        }
        if let Some(duration) = update.duration_minutes {
            active.duration_minutes = Set(duration);
        }
        if let Some(location) = update.location {
            active.location = Set(location);
        }
        active.updated_at = Set(chrono::Utc::now().to_rfc3339());

        let updated = active.update(&self.db).await?;
        Ok(updated)
    }

    /// Deactivate instead of delete: enrollments and history survive.
    pub async fn set_status(
        &self,
        caller: &Caller,
        class_id: ClassId,
        status: ClassStatus,
    ) -> Result<ClassModel, ClassesServiceError> {
        let class = Class::find_by_id(class_id)
            .one(&self.db)
            .await?
            .ok_or(ClassesServiceError::ClassNotFound)?;

        if !authorize_scope(caller, class.instructor_id) {
            return Err(ClassesServiceError::Unauthorized);
        }

        let mut active: ClassActiveModel = class.into();
        active.status = Set(status);
        active.updated_at = Set(chrono::Utc::now().to_rfc3339());

        let updated = active.update(&self.db).await?;
        Ok(updated)
    }

    /// Hard delete. Sessions, enrollments and attendance cascade with
    /// the class in one statement.
    pub async fn delete_class(
        &self,
        caller: &Caller,
        class_id: ClassId,
    ) -> Result<(), ClassesServiceError> {
        let class = Class::find_by_id(class_id)
            .one(&self.db)
            .await?
            .ok_or(ClassesServiceError::ClassNotFound)?;

        if !authorize_scope(caller, class.instructor_id) {
            return Err(ClassesServiceError::Unauthorized);
        }

        Class::delete_by_id(class_id).exec(&self.db).await?;

        Ok(())
    }
}
