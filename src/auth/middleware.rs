/**
 * Authentication Extractor
 *
 * Extracts and verifies the bearer token from the Authorization header and
 * hands the authenticated identity to handlers. Absence or failure rejects
 * the request with 401 before any upstream call is made.
 */

use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use uuid::Uuid;

use crate::auth::sessions::verify_token;
use crate::error::ApiError;

/// Authenticated user data extracted from the session token
#[derive(Clone, Debug)]
pub struct AuthUser {
    pub user_id: Uuid,
    pub email: String,
}

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|h| h.to_str().ok())
            .ok_or(ApiError::Unauthorized)?;

        // Format: "Bearer <token>"
        let token = header
            .strip_prefix("Bearer ")
            .ok_or(ApiError::Unauthorized)?;

        let claims = verify_token(token).map_err(|e| {
            tracing::warn!("Invalid session token: {:?}", e);
            ApiError::Unauthorized
        })?;

        let user_id = Uuid::parse_str(&claims.sub).map_err(|e| {
            tracing::warn!("Invalid user ID in token: {:?}", e);
            ApiError::Unauthorized
        })?;

        Ok(AuthUser {
            user_id,
            email: claims.email,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    async fn extract(header: Option<&str>) -> Result<AuthUser, ApiError> {
        let mut builder = Request::builder().uri("/api/flow/nodes");
        if let Some(value) = header {
            builder = builder.header(AUTHORIZATION, value);
        }
        let (mut parts, _) = builder.body(()).unwrap().into_parts();
        AuthUser::from_request_parts(&mut parts, &()).await
    }

    #[tokio::test]
    async fn missing_header_is_unauthorized() {
        let result = extract(None).await;
        assert!(matches!(result, Err(ApiError::Unauthorized)));
    }

    #[tokio::test]
    async fn malformed_header_is_unauthorized() {
        let result = extract(Some("Token abc")).await;
        assert!(matches!(result, Err(ApiError::Unauthorized)));
    }

    #[tokio::test]
    async fn valid_token_yields_identity() {
        let user_id = Uuid::new_v4();
        let token =
            crate::auth::sessions::create_token(user_id, "agent@example.com".to_string()).unwrap();
        let user = extract(Some(&format!("Bearer {}", token))).await.unwrap();
        assert_eq!(user.user_id, user_id);
        assert_eq!(user.email, "agent@example.com");
    }
}
