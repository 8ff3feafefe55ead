use serde::{Deserialize, Serialize};
use std::str::FromStr;
use uuid::Uuid;

/// Roles permitted to publish. Absence of a role is modeled as `None` at
/// lookup time, not as a variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Admin,
    Superuser,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Superuser => "superuser",
        }
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "admin" => Ok(Role::Admin),
            "superuser" => Ok(Role::Superuser),
            other => Err(format!("Unknown role: {}", other)),
        }
    }
}

/// A resolved identity with its current role.
///
/// Resolved once per privileged operation and never cached across
/// operations; role is mutable external state and stale role assumptions
/// are a correctness bug.
#[derive(Debug, Clone, Copy)]
pub struct Principal {
    pub user_id: Uuid,
    pub role: Role,
}

/// Identity returned by the bearer-token exchange, before the role lookup.
#[derive(Debug, Clone, Deserialize)]
pub struct UserIdentity {
    pub id: Uuid,
    pub email: Option<String>,
    pub full_name: Option<String>,
}

/// Password-grant credentials for sign-in.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

/// Session tokens returned by the identity provider. The refresh token is
/// kept so a fresh client context can be rehydrated across a process or
/// page-reload boundary.
#[derive(Debug, Clone, Deserialize)]
pub struct Session {
    pub access_token: String,
    pub refresh_token: String,
    pub user: UserIdentity,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_parse_is_case_insensitive() {
        assert_eq!("Admin".parse::<Role>().unwrap(), Role::Admin);
        assert_eq!("SUPERUSER".parse::<Role>().unwrap(), Role::Superuser);
        assert!("editor".parse::<Role>().is_err());
    }
}
