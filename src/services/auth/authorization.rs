//! Role + ownership access decision.
//!
//! Rules, first match wins:
//! 1. role required, no principal            -> `Unauthenticated`
//! 2. role required, principal lacks it      -> `ForbiddenRole`
//! 3. owner given, principal is someone else -> `NotOwner`
//! 4. otherwise                              -> `Ok`
//!
//! A target without an owner always passes rule 3 (seed data, legacy rows).
//! Pure: no I/O, no state, same inputs give the same decision.

use serde::Serialize;

use crate::services::auth::{context::AuthCtx, principal::Role};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DecisionReason {
    Ok,
    Unauthenticated,
    ForbiddenRole,
    NotOwner,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AuthorizationDecision {
    pub allowed: bool,
    pub reason: DecisionReason,
}

impl AuthorizationDecision {
    fn from_reason(reason: DecisionReason) -> Self {
        Self {
            allowed: reason == DecisionReason::Ok,
            reason,
        }
    }

    /// `Err(reason)` for any denial, so handlers can `?` it into an `AppError`.
    pub fn into_result(self) -> Result<(), DecisionReason> {
        if self.allowed { Ok(()) } else { Err(self.reason) }
    }
}

pub fn authorize(
    ctx: &AuthCtx,
    required_role: Option<Role>,
    owner_of_target: Option<&str>,
) -> AuthorizationDecision {
    let principal = ctx.principal();

    if let Some(role) = required_role {
        match principal {
            None => return AuthorizationDecision::from_reason(DecisionReason::Unauthenticated),
            Some(p) if !p.has_role(role) => {
                return AuthorizationDecision::from_reason(DecisionReason::ForbiddenRole);
            }
            Some(_) => {}
        }
    }

    if let (Some(owner), Some(p)) = (owner_of_target, principal)
        && p.identity != owner
    {
        return AuthorizationDecision::from_reason(DecisionReason::NotOwner);
    }

    AuthorizationDecision::from_reason(DecisionReason::Ok)
}
