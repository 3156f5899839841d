use axum::{
    body::Body,
    extract::State,
    http::{header, HeaderValue, Request},
    middleware::Next,
    response::Response,
};
use jsonwebtoken::{decode, DecodingKey, Validation};
use serde::{Deserialize, Serialize};

use crate::{
    error::{ApiError, ApiResult},
    state::AppState,
};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: i64,
    pub username: String,
    pub role: String,
    pub exp: i64,
}

pub async fn jwt_auth(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, ApiError> {
    let header_value = req
        .headers()
        .get(header::AUTHORIZATION)
        .ok_or_else(|| ApiError::Unauthorized("No token provided".to_string()))?;

    let token = parse_bearer(header_value)?;

    let decoded = decode::<Claims>(
        token,
        &DecodingKey::from_secret(state.settings.jwt_secret.as_bytes()),
        &Validation::default(),
    )
    .map_err(|err| match err.kind() {
        jsonwebtoken::errors::ErrorKind::ExpiredSignature => {
            ApiError::Unauthorized("Token expired".to_string())
        }
        _ => ApiError::Unauthorized("Invalid token".to_string()),
    })?;

    req.extensions_mut().insert(decoded.claims);

    Ok(next.run(req).await)
}

fn parse_bearer(value: &HeaderValue) -> ApiResult<&str> {
    let value = value
        .to_str()
        .map_err(|_| ApiError::Unauthorized("Invalid authorization header".to_string()))?;
    let mut parts = value.splitn(2, ' ');
    let scheme = parts.next().unwrap_or_default();
    let token = parts.next().unwrap_or_default();
    if scheme != "Bearer" || token.is_empty() {
        return Err(ApiError::Unauthorized(
            "Invalid authorization header".to_string(),
        ));
    }
    Ok(token)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_bearer_valid() {
        let value = HeaderValue::from_static("Bearer abc.def.ghi");
        assert_eq!(parse_bearer(&value).unwrap(), "abc.def.ghi");
    }

    #[test]
    fn test_parse_bearer_wrong_scheme() {
        let value = HeaderValue::from_static("Basic abc");
        assert!(parse_bearer(&value).is_err());
    }

    #[test]
    fn test_parse_bearer_empty_token() {
        let value = HeaderValue::from_static("Bearer ");
        assert!(parse_bearer(&value).is_err());
    }
}
