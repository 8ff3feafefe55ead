//! Pressroom Publish Layer
//!
//! Principal resolution, the article publish pipeline, and the
//! verification harness. The pipeline is the single write path for
//! articles: it gates on role, uploads the featured image, builds the
//! record, upserts through a primary store with an optional elevated
//! fallback, and audit-logs privileged writes best-effort. The harness
//! drives the same path end to end for a given identity and cleans up
//! after itself.

pub mod auth;
pub mod error;
pub mod pipeline;
pub mod verify;

pub use auth::{resolve_principal, GoTrueResolver, PrincipalResolver};
pub use error::{AuthError, PublishError, VerifyError, VerifyPhase};
pub use pipeline::PublishPipeline;
pub use verify::{
    AttemptReport, ClientContext, VerificationHarness, VerifyEnvironment, VerifyReport,
};
