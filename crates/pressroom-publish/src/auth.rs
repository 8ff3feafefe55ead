//! Principal resolution against a GoTrue-style identity provider.
//!
//! Identity and authorization are separate lookups: the resolver turns a
//! bearer token into a `UserIdentity`, then the role comes from the
//! profile store on every privileged call. Roles are mutable external
//! state, so they are never cached across operations.

use crate::error::{AuthError, PublishError};
use async_trait::async_trait;
use pressroom_core::config::AuthConfig;
use pressroom_core::models::{Credentials, Principal, Session, UserIdentity};
use pressroom_db::ProfileStore;
use serde::Deserialize;
use uuid::Uuid;

#[async_trait]
pub trait PrincipalResolver: Send + Sync {
    /// Exchange a bearer token for the identity it belongs to.
    async fn resolve(&self, bearer: &str) -> Result<UserIdentity, AuthError>;
}

/// Wire shape of the provider's user object. `full_name` lives in the
/// free-form metadata blob, not a top-level column.
#[derive(Debug, Deserialize)]
struct WireUser {
    id: Uuid,
    email: Option<String>,
    #[serde(default)]
    user_metadata: serde_json::Value,
}

#[derive(Debug, Deserialize)]
struct WireSession {
    access_token: String,
    refresh_token: String,
    user: WireUser,
}

impl From<WireUser> for UserIdentity {
    fn from(user: WireUser) -> Self {
        let full_name = user
            .user_metadata
            .get("full_name")
            .and_then(|v| v.as_str())
            .map(|s| s.to_string());
        UserIdentity {
            id: user.id,
            email: user.email,
            full_name,
        }
    }
}

/// Resolver backed by the hosted auth endpoint.
pub struct GoTrueResolver {
    http: reqwest::Client,
    auth_url: String,
    anon_key: String,
}

impl GoTrueResolver {
    pub fn new(config: &AuthConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            auth_url: config.auth_url.trim_end_matches('/').to_string(),
            anon_key: config.anon_key.clone(),
        }
    }

    /// Password-grant sign-in. Returns the full session so callers can
    /// rehydrate client contexts later from the refresh token.
    pub async fn sign_in(&self, credentials: &Credentials) -> Result<Session, AuthError> {
        let response = self
            .http
            .post(format!("{}/token?grant_type=password", self.auth_url))
            .header("apikey", &self.anon_key)
            .json(&serde_json::json!({
                "email": credentials.email,
                "password": credentials.password,
            }))
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AuthError::SignInFailed(format!("{}: {}", status, body)));
        }

        let session: WireSession = response
            .json()
            .await
            .map_err(|e| AuthError::MalformedResponse(e.to_string()))?;

        Ok(Session {
            access_token: session.access_token,
            refresh_token: session.refresh_token,
            user: session.user.into(),
        })
    }
}

#[async_trait]
impl PrincipalResolver for GoTrueResolver {
    async fn resolve(&self, bearer: &str) -> Result<UserIdentity, AuthError> {
        let response = self
            .http
            .get(format!("{}/user", self.auth_url))
            .header("apikey", &self.anon_key)
            .header("Authorization", format!("Bearer {}", bearer))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(AuthError::InvalidToken(response.status().to_string()));
        }

        let user: WireUser = response
            .json()
            .await
            .map_err(|e| AuthError::MalformedResponse(e.to_string()))?;

        Ok(user.into())
    }
}

/// Resolve a bearer token to a publish-capable principal.
///
/// This is the role gate: a token that maps to no profile, or to a profile
/// without an elevated role, is `Forbidden` before any write happens. The
/// lookup runs fresh on every call.
pub async fn resolve_principal(
    resolver: &dyn PrincipalResolver,
    profiles: &dyn ProfileStore,
    bearer: &str,
) -> Result<Principal, PublishError> {
    let identity = resolver.resolve(bearer).await?;

    let role = profiles
        .role_of(identity.id)
        .await
        .map_err(|e| PublishError::Internal(format!("Role lookup failed: {}", e)))?;

    match role {
        Some(role) => Ok(Principal {
            user_id: identity.id,
            role,
        }),
        None => {
            tracing::warn!(user_id = %identity.id, "Publish attempt without elevated role");
            Err(PublishError::Forbidden(format!(
                "User {} has no publish role",
                identity.id
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pressroom_core::models::Role;
    use pressroom_db::test_helpers::MockProfileStore;

    struct StaticResolver {
        identity: UserIdentity,
    }

    #[async_trait]
    impl PrincipalResolver for StaticResolver {
        async fn resolve(&self, bearer: &str) -> Result<UserIdentity, AuthError> {
            if bearer == "good-token" {
                Ok(self.identity.clone())
            } else {
                Err(AuthError::InvalidToken("401 Unauthorized".to_string()))
            }
        }
    }

    fn resolver(user_id: Uuid) -> StaticResolver {
        StaticResolver {
            identity: UserIdentity {
                id: user_id,
                email: Some("editor@example.com".to_string()),
                full_name: None,
            },
        }
    }

    #[tokio::test]
    async fn test_resolves_principal_with_role() {
        let user_id = Uuid::new_v4();
        let profiles = MockProfileStore::new();
        profiles.set_role(user_id, Role::Superuser);

        let principal = resolve_principal(&resolver(user_id), &profiles, "good-token")
            .await
            .unwrap();
        assert_eq!(principal.user_id, user_id);
        assert_eq!(principal.role, Role::Superuser);
    }

    #[tokio::test]
    async fn test_missing_profile_is_forbidden_not_auth_error() {
        let user_id = Uuid::new_v4();
        let profiles = MockProfileStore::new();

        let err = resolve_principal(&resolver(user_id), &profiles, "good-token")
            .await
            .unwrap_err();
        assert!(matches!(err, PublishError::Forbidden(_)));
    }

    #[tokio::test]
    async fn test_bad_token_is_auth_error() {
        let user_id = Uuid::new_v4();
        let profiles = MockProfileStore::new();
        profiles.set_role(user_id, Role::Admin);

        let err = resolve_principal(&resolver(user_id), &profiles, "stale-token")
            .await
            .unwrap_err();
        assert!(matches!(err, PublishError::Auth(AuthError::InvalidToken(_))));
    }

    #[test]
    fn test_wire_user_maps_metadata_full_name() {
        let wire: WireUser = serde_json::from_value(serde_json::json!({
            "id": "7f0e8f7e-3a54-4fbb-9d12-30ab7f2f3d10",
            "email": "editor@example.com",
            "user_metadata": { "full_name": "News Editor" },
        }))
        .unwrap();
        let identity: UserIdentity = wire.into();
        assert_eq!(identity.full_name.as_deref(), Some("News Editor"));
    }
}
