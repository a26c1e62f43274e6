pub mod audit_service;
pub mod auth_service;
pub mod game_service;

pub use audit_service::AuditLogService;
pub use auth_service::{AuthOutcome, AuthService};
pub use game_service::GameService;
