//! Caller context and the scope predicate shared by every service.

use serde::{Deserialize, Serialize};

use crate::{entity::user::Role, ids::UserId};

/// Who is making the call. Resolved upstream of this crate and passed
/// explicitly to every scoped operation; there is no ambient identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Caller {
    pub id: UserId,
    pub role: Role,
}

impl Caller {
    pub fn new(id: UserId, role: Role) -> Self {
        Self { id, role }
    }

    pub fn is_super(&self) -> bool {
        self.role == Role::SuperAdmin
    }

    pub fn is_admin_level(&self) -> bool {
        self.role.is_admin_level()
    }
}

/// Whether `caller` may touch a record owned by `owner_id`.
///
/// Super admins pass unconditionally; everyone else only reaches records
/// they own. For trainee-scoped resources the owner is the trainee's
/// assigned admin, not the trainee itself - callers pass that in.
///
/// Mutations that fail this check reject with the owning service's
/// `Unauthorized` variant; scoped list queries quietly return an empty
/// collection instead.
pub fn authorize_scope(caller: &Caller, owner_id: UserId) -> bool {
    match caller.role {
        Role::SuperAdmin => true,
        Role::Admin | Role::Trainee => caller.id == owner_id,
    }
}
