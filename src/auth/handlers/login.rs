/**
 * Login Handler
 *
 * POST /api/auth/login
 *
 * # Security
 *
 * - Passwords are verified using bcrypt
 * - Unknown user and wrong password return the same 401 (no enumeration)
 * - Passwords are never logged or returned in responses
 */

use axum::extract::State;
use axum::Json;
use bcrypt::verify;
use sqlx::PgPool;

use crate::auth::handlers::types::{AuthResponse, LoginRequest, UserResponse};
use crate::auth::sessions::create_token;
use crate::auth::users::get_user_by_email;
use crate::envelope::Envelope;
use crate::error::ApiError;

/// Verify credentials and issue a session token
///
/// # Errors
///
/// * 401 `UNAUTHORIZED` - unknown email or wrong password
/// * 503 `DATABASE_NOT_CONFIGURED` - user store unavailable
pub async fn login(
    State(pool): State<Option<PgPool>>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<Envelope<AuthResponse>>, ApiError> {
    let pool = pool.ok_or(ApiError::DatabaseNotConfigured)?;
    tracing::info!("Login request for: {}", request.email);

    let user = get_user_by_email(&pool, &request.email)
        .await?
        .ok_or_else(|| {
            tracing::warn!("User not found: {}", request.email);
            ApiError::Unauthorized
        })?;

    let valid = verify(&request.password, &user.password_hash)?;
    if !valid {
        tracing::warn!("Invalid password for user: {}", request.email);
        return Err(ApiError::Unauthorized);
    }

    let token = create_token(user.id, user.email.clone())?;

    tracing::info!("User logged in: {}", user.email);

    Ok(Json(Envelope::data(AuthResponse {
        token,
        user: UserResponse {
            id: user.id.to_string(),
            email: user.email,
            company_number: user.company_number,
        },
    })))
}
