use chrono::{DateTime, Utc};
use sea_orm::DatabaseConnection;
use thiserror::Error;

use crate::{
    auth::{authorize_scope, Caller},
    entity::prelude::*,
    ids::{ClassId, SessionId},
};

#[derive(Debug, Error)]
pub enum SessionsServiceError {
    #[error("fatal database error")]
    DbError(#[from] DbErr),

    #[error("class not found")]
    ClassNotFound,

    #[error("session not found")]
    SessionNotFound,

    #[error("unauthorized")]
    Unauthorized,

    #[error("invalid {0}")]
    Invalid(&'static str),
}

#[derive(Debug, Default)]
pub struct SessionUpdate {
    pub status: Option<SessionStatus>,
    pub location_override: Option<Option<String>>,
    pub capacity_override: Option<Option<i32>>,
    pub notes: Option<Option<String>>,
}

#[derive(Clone)]
pub struct SessionsService {
    db: DatabaseConnection,
}

impl SessionsService {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Schedule a concrete occurrence of a class. Only the instructor or
    /// a super admin.
    pub async fn schedule_session(
        &self,
        caller: &Caller,
        class_id: ClassId,
        starts_at: DateTime<Utc>,
        ends_at: DateTime<Utc>,
        location_override: Option<String>,
        capacity_override: Option<i32>,
        notes: Option<String>,
    ) -> Result<ClassSessionModel, SessionsServiceError> {
        if ends_at <= starts_at {
            return Err(SessionsServiceError::Invalid("end time"));
        }
        if let Some(capacity) = capacity_override {
            if capacity <= 0 {
                return Err(SessionsServiceError::Invalid("capacity"));
            }
        }

        let class = Class::find_by_id(class_id)
            .one(&self.db)
            .await?
            .ok_or(SessionsServiceError::ClassNotFound)?;

        if !authorize_scope(caller, class.instructor_id) {
            return Err(SessionsServiceError::Unauthorized);
        }

        let now = chrono::Utc::now().to_rfc3339();
        let session = ClassSessionActiveModel {
            id: Set(SessionId::new()),
            class_id: Set(class_id),
            starts_at: Set(starts_at.to_rfc3339()),
            ends_at: Set(ends_at.to_rfc3339()),
            session_date: Set(starts_at.date_naive()),
            status: Set(SessionStatus::Scheduled),
            location_override: Set(location_override),
            capacity_override: Set(capacity_override),
            notes: Set(notes),
            created_at: Set(now.clone()),
            updated_at: Set(now),
        };

        let created = ClassSession::insert(session)
            .exec_with_returning(&self.db)
            .await?;

        Ok(created)
    }

    pub async fn get_session(
        &self,
        session_id: SessionId,
    ) -> Result<Option<ClassSessionModel>, SessionsServiceError> {
        let session = ClassSession::find_by_id(session_id).one(&self.db).await?;
        Ok(session)
    }

    /// Sessions for a class in calendar order. Visible to anyone who can
    /// see the class.
    pub async fn list_for_class(
        &self,
        class_id: ClassId,
    ) -> Result<Vec<ClassSessionModel>, SessionsServiceError> {
        let sessions = ClassSession::find()
            .filter(ClassSessionColumn::ClassId.eq(class_id))
            .order_by_asc(ClassSessionColumn::StartsAt)
            .all(&self.db)
            .await?;

        Ok(sessions)
    }

    /// Scheduled sessions starting at or after `after`, calendar order.
    pub async fn upcoming_for_class(
        &self,
        class_id: ClassId,
        after: DateTime<Utc>,
    ) -> Result<Vec<ClassSessionModel>, SessionsServiceError> {
        let sessions = ClassSession::find()
            .filter(ClassSessionColumn::ClassId.eq(class_id))
            .filter(ClassSessionColumn::Status.eq(SessionStatus::Scheduled))
            .filter(ClassSessionColumn::StartsAt.gte(after.to_rfc3339()))
            .order_by_asc(ClassSessionColumn::StartsAt)
            .all(&self.db)
            .await?;

        Ok(sessions)
    }

    /// Partial update; ownership goes through the parent class.
    pub async fn update_session(
        &self,
        caller: &Caller,
        session_id: SessionId,
        update: SessionUpdate,
    ) -> Result<ClassSessionModel, SessionsServiceError> {
        let session = ClassSession::find_by_id(session_id)
            .one(&self.db)
            .await?
            .ok_or(SessionsServiceError::SessionNotFound)?;

        self.require_instructor(caller, session.class_id).await?;

        if let Some(Some(capacity)) = update.capacity_override {
            if capacity <= 0 {
                return Err(SessionsServiceError::Invalid("capacity"));
            }
        }

        let mut active: ClassSessionActiveModel = session.into();

        if let Some(status) = update.status {
            active.status = Set(status);
        }
        if let Some(location) = update.location_override {
            active.location_override = Set(location);
        }
        if let Some(capacity) = update.capacity_override {
            active.capacity_override = Set(capacity);
        }
        if let Some(notes) = update.notes {
            active.notes = Set(notes);
        }
        active.updated_at = Set(chrono::Utc::now().to_rfc3339());

        let updated = active.update(&self.db).await?;
        Ok(updated)
    }

    /// Cancel a session, keeping the row for the calendar history.
    pub async fn cancel_session(
        &self,
        caller: &Caller,
        session_id: SessionId,
    ) -> Result<ClassSessionModel, SessionsServiceError> {
        self.update_session(
            caller,
            session_id,
            SessionUpdate {
                status: Some(SessionStatus::Cancelled),
                ..Default::default()
            },
        )
        .await
    }

    pub async fn delete_session(
        &self,
        caller: &Caller,
        session_id: SessionId,
    ) -> Result<(), SessionsServiceError> {
        let session = ClassSession::find_by_id(session_id)
            .one(&self.db)
            .await?
            .ok_or(SessionsServiceError::SessionNotFound)?;

        self.require_instructor(caller, session.class_id).await?;

        ClassSession::delete_by_id(session_id).exec(&self.db).await?;

        Ok(())
    }

    async fn require_instructor(
        &self,
        caller: &Caller,
        class_id: ClassId,
    ) -> Result<(), SessionsServiceError> {
        let class = Class::find_by_id(class_id)
            .one(&self.db)
            .await?
            .ok_or(SessionsServiceError::ClassNotFound)?;

        if !authorize_scope(caller, class.instructor_id) {
            return Err(SessionsServiceError::Unauthorized);
        }

        Ok(())
    }
}
