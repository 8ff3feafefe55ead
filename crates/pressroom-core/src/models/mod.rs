//! Domain models shared across Pressroom components.

pub mod article;
pub mod audit;
pub mod principal;

pub use article::{ArticleDraft, ArticleRecord, Category, FeaturedImage};
pub use audit::{AuditEvent, AuditEventType};
pub use principal::{Credentials, Principal, Role, Session, UserIdentity};
