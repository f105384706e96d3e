/**
 * Signup Handler
 *
 * POST /api/auth/signup
 */

use axum::extract::State;
use axum::Json;
use sqlx::PgPool;

use crate::auth::handlers::types::{AuthResponse, SignupRequest, UserResponse};
use crate::auth::sessions::create_token;
use crate::auth::users::{create_user, get_user_by_email};
use crate::envelope::Envelope;
use crate::error::ApiError;

/// Create a user and issue a session token
///
/// # Errors
///
/// * 400 `INVALID_EMAIL` / `INVALID_PASSWORD` / `EMAIL_TAKEN`
/// * 503 `DATABASE_NOT_CONFIGURED` - user store unavailable
pub async fn signup(
    State(pool): State<Option<PgPool>>,
    Json(request): Json<SignupRequest>,
) -> Result<Json<Envelope<AuthResponse>>, ApiError> {
    let pool = pool.ok_or(ApiError::DatabaseNotConfigured)?;

    if !request.email.contains('@') {
        return Err(ApiError::bad_request("INVALID_EMAIL"));
    }
    if request.password.len() < 8 {
        return Err(ApiError::bad_request("INVALID_PASSWORD"));
    }
    if get_user_by_email(&pool, &request.email).await?.is_some() {
        return Err(ApiError::bad_request("EMAIL_TAKEN"));
    }

    let password_hash = bcrypt::hash(&request.password, bcrypt::DEFAULT_COST)?;
    let user = create_user(&pool, request.email, password_hash, request.company_number).await?;
    let token = create_token(user.id, user.email.clone())?;

    tracing::info!("User created: {}", user.email);

    Ok(Json(Envelope::data(AuthResponse {
        token,
        user: UserResponse {
            id: user.id.to_string(),
            email: user.email,
            company_number: user.company_number,
        },
    })))
}
