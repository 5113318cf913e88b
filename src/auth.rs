use std::sync::Arc;

use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use uuid::Uuid;

use crate::error::AppError;
use crate::models::user::{UserRole, UserStatus};
use crate::state::AppState;

// Token verification happens upstream; the id in this header is trusted.
pub const ACTOR_HEADER: &str = "x-actor-id";

#[derive(Debug, Clone, Copy)]
pub struct Actor {
    pub id: Uuid,
    pub role: UserRole,
}

impl Actor {
    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin
    }

    pub fn require(&self, allowed: &[UserRole]) -> Result<(), AppError> {
        if allowed.contains(&self.role) {
            Ok(())
        } else {
            Err(AppError::Forbidden(
                "you are not permitted to perform this operation".to_string(),
            ))
        }
    }
}

#[async_trait]
impl FromRequestParts<Arc<AppState>> for Actor {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let raw = parts
            .headers
            .get(ACTOR_HEADER)
            .and_then(|value| value.to_str().ok())
            .ok_or_else(|| AppError::Unauthorized(format!("missing {ACTOR_HEADER} header")))?;

        let id = Uuid::parse_str(raw)
            .map_err(|_| AppError::Unauthorized(format!("invalid {ACTOR_HEADER} header")))?;

        let user = state
            .users
            .get(id)
            .ok_or_else(|| AppError::Unauthorized("unknown actor".to_string()))?;

        if user.status == UserStatus::Blocked {
            return Err(AppError::Forbidden("this account is blocked".to_string()));
        }

        Ok(Actor {
            id: user.id,
            role: user.role,
        })
    }
}

#[cfg(test)]
mod tests {
    use uuid::Uuid;

    use super::Actor;
    use crate::models::user::UserRole;

    #[test]
    fn require_accepts_listed_roles_only() {
        let actor = Actor {
            id: Uuid::new_v4(),
            role: UserRole::Sender,
        };

        assert!(actor.require(&[UserRole::Sender]).is_ok());
        assert!(actor.require(&[UserRole::Admin, UserRole::Sender]).is_ok());
        assert!(actor.require(&[UserRole::Admin]).is_err());
        assert!(!actor.is_admin());
    }
}
