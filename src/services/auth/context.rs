//! Per-request authentication context.
//!
//! The middleware builds exactly one of these per request and puts it into the
//! request extensions. Handlers read it through `AuthCtxExtractor`.

use super::principal::Principal;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuthCtx {
    principal: Option<Principal>,
}

impl AuthCtx {
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn authenticated(principal: Principal) -> Self {
        Self {
            principal: Some(principal),
        }
    }

    pub fn principal(&self) -> Option<&Principal> {
        self.principal.as_ref()
    }

    pub fn identity(&self) -> Option<&str> {
        self.principal.as_ref().map(|p| p.identity.as_str())
    }

    pub fn is_authenticated(&self) -> bool {
        self.principal.is_some()
    }
}
