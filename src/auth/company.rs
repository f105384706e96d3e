/**
 * Company Scope Resolution
 *
 * Maps an authenticated identity to its company-scoping number, the tenant
 * key forced onto every upstream request. Resolution fails closed: a user
 * without a company number gets 403, never a default scope.
 *
 * The lookup sits behind a trait so tests can substitute an in-memory
 * directory and handlers receive the dependency explicitly through state
 * instead of a lazily initialized global.
 */

use futures_util::future::BoxFuture;
use sqlx::PgPool;

use crate::auth::middleware::AuthUser;
use crate::auth::users::get_user_by_email;
use crate::error::ApiError;
use crate::server::state::AppState;

/// Oracle mapping a user email to its company number
pub trait CompanyDirectory: Send + Sync {
    /// Resolve the company number for an email, `None` when the user exists
    /// without a tenant scope or does not exist at all
    fn company_for_email<'a>(
        &'a self,
        email: &'a str,
    ) -> BoxFuture<'a, Result<Option<String>, ApiError>>;
}

/// Postgres-backed directory reading the users table
pub struct PgCompanyDirectory {
    pool: Option<PgPool>,
}

impl PgCompanyDirectory {
    pub fn new(pool: Option<PgPool>) -> Self {
        Self { pool }
    }
}

impl CompanyDirectory for PgCompanyDirectory {
    fn company_for_email<'a>(
        &'a self,
        email: &'a str,
    ) -> BoxFuture<'a, Result<Option<String>, ApiError>> {
        Box::pin(async move {
            let pool = self.pool.as_ref().ok_or(ApiError::DatabaseNotConfigured)?;
            let user = get_user_by_email(pool, email).await?;
            Ok(user.and_then(|u| u.company_number))
        })
    }
}

/// Resolve the caller's company scope, failing closed
///
/// # Errors
///
/// * 403 `FORBIDDEN_COMPANY_NUMBER` when the user has no company number
/// * 503 `DATABASE_NOT_CONFIGURED` when the user store is unavailable
pub async fn resolve_company_scope(state: &AppState, user: &AuthUser) -> Result<String, ApiError> {
    match state.directory.company_for_email(&user.email).await? {
        Some(number) => Ok(number),
        None => {
            tracing::warn!("No company number for {}", user.email);
            Err(ApiError::ForbiddenCompanyNumber)
        }
    }
}
