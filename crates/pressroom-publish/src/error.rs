//! Publish-layer error types.
//!
//! `AuthError` means the caller never established an identity; it is kept
//! apart from `PublishError::Forbidden`, which means a valid identity with
//! an insufficient role. `VerifyError` pins a harness failure to the phase
//! and attempt that produced it.

use pressroom_core::AppError;
use pressroom_storage::StorageError;
use std::fmt;

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("Sign-in failed: {0}")]
    SignInFailed(String),

    #[error("Token rejected: {0}")]
    InvalidToken(String),

    #[error("Identity provider request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Unexpected identity provider response: {0}")]
    MalformedResponse(String),
}

#[derive(Debug, thiserror::Error)]
pub enum PublishError {
    #[error("Authentication failed: {0}")]
    Auth(#[from] AuthError),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Invalid draft: {0}")]
    InvalidDraft(String),

    #[error("Featured image upload failed: {0}")]
    ImageUploadFailed(#[source] StorageError),

    #[error("Article write failed: {0}")]
    StoreWriteFailed(#[source] AppError),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Harness phase in which a terminal failure occurred.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerifyPhase {
    SignIn,
    EnsureProfile,
    Upload,
    ArticleInsert,
}

impl VerifyPhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            VerifyPhase::SignIn => "sign-in",
            VerifyPhase::EnsureProfile => "ensure-profile",
            VerifyPhase::Upload => "upload",
            VerifyPhase::ArticleInsert => "article-insert",
        }
    }
}

impl fmt::Display for VerifyPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Terminal verification failure. `attempt` is the attempt label
/// ("initial" or "after-refresh") when the failure happened inside an
/// attempt, empty otherwise.
#[derive(Debug, thiserror::Error)]
#[error("Verification failed in {phase} phase{}: {source}", attempt_suffix(.attempt))]
pub struct VerifyError {
    pub phase: VerifyPhase,
    pub attempt: String,
    #[source]
    pub source: anyhow::Error,
}

impl VerifyError {
    pub fn new(phase: VerifyPhase, attempt: impl Into<String>, source: anyhow::Error) -> Self {
        Self {
            phase,
            attempt: attempt.into(),
            source,
        }
    }
}

fn attempt_suffix(attempt: &str) -> String {
    if attempt.is_empty() {
        String::new()
    } else {
        format!(" ({} attempt)", attempt)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verify_error_names_phase_and_attempt() {
        let err = VerifyError::new(
            VerifyPhase::Upload,
            "after-refresh",
            anyhow::anyhow!("bucket unreachable"),
        );
        let message = err.to_string();
        assert!(message.contains("upload"));
        assert!(message.contains("after-refresh"));
        assert!(message.contains("bucket unreachable"));
    }

    #[test]
    fn test_verify_error_without_attempt_label() {
        let err = VerifyError::new(VerifyPhase::SignIn, "", anyhow::anyhow!("bad password"));
        assert_eq!(
            err.to_string(),
            "Verification failed in sign-in phase: bad password"
        );
    }
}
