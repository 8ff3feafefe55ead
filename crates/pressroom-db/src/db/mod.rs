pub mod articles;
pub mod audit;
pub mod profiles;

pub use articles::ArticleRepository;
pub use audit::AuditLogRepository;
pub use profiles::ProfileRepository;
