//! `tillpoint-auth` — authentication/authorization engine for the back office.
//!
//! This crate is intentionally decoupled from transport and storage: it holds
//! user credentials and live sessions in memory, resolves role→permission
//! grants (with wildcard matching), and exposes the enforcement contract every
//! other service calls before a sensitive operation.

pub mod enforce;
pub mod error;
pub mod password;
pub mod permissions;
pub mod registry;
pub mod roles;
pub mod service;
pub mod session;
pub mod store;
pub mod user;

pub use enforce::Enforcer;
pub use error::AuthError;
pub use password::PasswordHash;
pub use permissions::Permission;
pub use registry::RoleRegistry;
pub use roles::Role;
pub use service::{AuthService, AuthSession};
pub use session::{Session, SessionPolicy, SessionToken};
pub use user::{UserProfile, Username};
