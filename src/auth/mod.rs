//! Authentication and Company Scoping
//!
//! Session tokens, the user store, and the company-scope oracle. Every proxy
//! route authenticates through [`middleware::AuthUser`] and resolves its
//! tenant key through [`company::resolve_company_scope`].

/// Session token creation and verification
pub mod sessions;

/// User model and database operations
pub mod users;

/// Request authentication extractor
pub mod middleware;

/// Company scope resolution
pub mod company;

/// Signup/login/me handlers
pub mod handlers;

pub use company::{resolve_company_scope, CompanyDirectory, PgCompanyDirectory};
pub use handlers::{get_me, login, signup};
pub use middleware::AuthUser;
