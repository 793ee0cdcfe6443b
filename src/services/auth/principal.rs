//! Principal = authenticated identity + granted roles.

use std::{collections::BTreeSet, fmt, str::FromStr};

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Role {
    User,
    Admin,
}

impl Role {
    /// Spelling used in the `roles` column (`ROLE_USER,ROLE_ADMIN`).
    pub fn authority(&self) -> &'static str {
        match self {
            Self::User => "ROLE_USER",
            Self::Admin => "ROLE_ADMIN",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.authority())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown role: {0}")]
pub struct UnknownRole(pub String);

impl FromStr for Role {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let bare = trimmed.strip_prefix("ROLE_").unwrap_or(trimmed);
        match bare.to_ascii_uppercase().as_str() {
            "USER" => Ok(Self::User),
            "ADMIN" => Ok(Self::Admin),
            _ => Err(UnknownRole(trimmed.to_string())),
        }
    }
}

/// Parse a comma-separated authority list. Unknown entries are skipped.
pub fn parse_roles(raw: &str) -> BTreeSet<Role> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .filter_map(|s| match s.parse::<Role>() {
            Ok(role) => Some(role),
            Err(err) => {
                tracing::warn!(error = %err, "ignoring unknown role");
                None
            }
        })
        .collect()
}

/// Immutable per-request snapshot of who is calling.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    pub identity: String,
    pub roles: BTreeSet<Role>,
}

impl Principal {
    pub fn new(identity: impl Into<String>, roles: impl IntoIterator<Item = Role>) -> Self {
        Self {
            identity: identity.into(),
            roles: roles.into_iter().collect(),
        }
    }

    pub fn has_role(&self, role: Role) -> bool {
        self.roles.contains(&role)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_prefixed_and_bare_roles() {
        assert_eq!("ROLE_USER".parse::<Role>(), Ok(Role::User));
        assert_eq!("admin".parse::<Role>(), Ok(Role::Admin));
        assert!("ROLE_ROOT".parse::<Role>().is_err());
    }

    #[test]
    fn role_list_skips_unknown_and_blank_entries() {
        let roles = parse_roles("ROLE_USER, ,ROLE_ROOT,ROLE_ADMIN");
        assert_eq!(roles, BTreeSet::from([Role::User, Role::Admin]));
    }
}
