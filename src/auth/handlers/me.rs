/**
 * Current User Handler
 *
 * GET /api/auth/me
 */

use axum::extract::State;
use axum::Json;
use sqlx::PgPool;

use crate::auth::handlers::types::UserResponse;
use crate::auth::middleware::AuthUser;
use crate::auth::users::get_user_by_email;
use crate::envelope::Envelope;
use crate::error::ApiError;

/// Return the authenticated user's profile
pub async fn get_me(
    State(pool): State<Option<PgPool>>,
    user: AuthUser,
) -> Result<Json<Envelope<UserResponse>>, ApiError> {
    let pool = pool.ok_or(ApiError::DatabaseNotConfigured)?;

    let record = get_user_by_email(&pool, &user.email)
        .await?
        .ok_or(ApiError::Unauthorized)?;

    Ok(Json(Envelope::data(UserResponse {
        id: record.id.to_string(),
        email: record.email,
        company_number: record.company_number,
    })))
}
