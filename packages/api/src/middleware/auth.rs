use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};

use crate::{error::ApiError, state::AppState};
use shared::models::user::CurrentUser;
use shared::services::auth_service::AuthServiceTrait;
use shared::services::errors::auth_service_errors::AuthServiceError;

/// Header an anonymous client sends to say which guest name it RSVP'd under.
pub const GUEST_NAME_HEADER: &str = "x-guest-name";

/// A caller with a valid bearer token.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser(pub CurrentUser);

/// The caller when a token is present, `None` for anonymous guests. A token
/// that is present but invalid is still rejected.
#[derive(Debug, Clone)]
pub struct OptionalUser(pub Option<CurrentUser>);

/// An authenticated organizer.
#[derive(Debug, Clone)]
pub struct AdminUser(pub CurrentUser);

#[derive(Debug, Clone)]
pub struct GuestHint(pub Option<String>);

fn bearer_token(parts: &Parts) -> Result<Option<&str>, ApiError> {
    let Some(header) = parts.headers.get(AUTHORIZATION) else {
        return Ok(None);
    };
    let header = header.to_str().map_err(|_| {
        ApiError::AuthService(AuthServiceError::ValidationError(
            "Invalid header format".to_string(),
        ))
    })?;
    header
        .strip_prefix("Bearer ")
        .map(Some)
        .ok_or(ApiError::Unauthorized)
}

impl FromRequestParts<AppState> for OptionalUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        match bearer_token(parts)? {
            Some(token) => {
                let user = state.auth_service.current_user_from_token(token)?;
                Ok(OptionalUser(Some(user)))
            }
            None => Ok(OptionalUser(None)),
        }
    }
}

impl FromRequestParts<AppState> for AuthenticatedUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        match OptionalUser::from_request_parts(parts, state).await? {
            OptionalUser(Some(user)) => Ok(AuthenticatedUser(user)),
            OptionalUser(None) => Err(ApiError::Unauthorized),
        }
    }
}

impl FromRequestParts<AppState> for AdminUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let AuthenticatedUser(user) = AuthenticatedUser::from_request_parts(parts, state).await?;
        if !user.is_admin {
            return Err(ApiError::Forbidden);
        }
        Ok(AdminUser(user))
    }
}

impl<S: Send + Sync> FromRequestParts<S> for GuestHint {
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let hint = parts
            .headers
            .get(GUEST_NAME_HEADER)
            .and_then(|value| value.to_str().ok())
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(str::to_string);
        Ok(GuestHint(hint))
    }
}
