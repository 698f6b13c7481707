use axum::{
    body::Body,
    http::{HeaderMap, Request},
    middleware::Next,
    response::Response,
};
use uuid::Uuid;

use crate::{
    error::{AppError, Result},
    models::principal::{Principal, Role},
};

/// Header carrying the authenticated user ID, set by the upstream identity
/// provider.
pub const USER_ID_HEADER: &str = "x-user-id";
/// Header carrying the asserted role, set by the upstream identity provider.
pub const USER_ROLE_HEADER: &str = "x-user-role";

/// Builds the principal from the identity headers.
///
/// Credential verification happened upstream; this only parses what the
/// gateway forwarded.
fn extract_principal(headers: &HeaderMap) -> Result<Principal> {
    let user_id = headers
        .get(USER_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| Uuid::parse_str(v).ok())
        .ok_or_else(|| AppError::Authentication("Missing or invalid user id".to_string()))?;

    let role: Role = headers
        .get(USER_ROLE_HEADER)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse().ok())
        .ok_or_else(|| AppError::Authentication("Missing or invalid role".to_string()))?;

    Ok(Principal { user_id, role })
}

/// A middleware that requires an authenticated principal on the request.
pub async fn require_auth(mut request: Request<Body>, next: Next) -> Result<Response> {
    let principal = match extract_principal(request.headers()) {
        Ok(p) => p,
        Err(e) => {
            tracing::warn!("❌ Rejected unauthenticated request: {}", e);
            return Err(e);
        }
    };

    tracing::debug!(user_id = %principal.user_id, role = ?principal.role, "✅ Principal extracted");

    request.extensions_mut().insert(principal);

    Ok(next.run(request).await)
}

/// Checks that the principal holds one of the allowed roles.
pub fn require_role(principal: &Principal, allowed: &[Role]) -> Result<()> {
    if allowed.contains(&principal.role) {
        Ok(())
    } else {
        tracing::warn!(
            user_id = %principal.user_id,
            role = ?principal.role,
            "❌ Role not permitted for this operation"
        );
        Err(AppError::Forbidden)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn principal_extraction_requires_both_headers() {
        let mut headers = HeaderMap::new();
        assert!(extract_principal(&headers).is_err());

        headers.insert(
            USER_ID_HEADER,
            HeaderValue::from_str(&Uuid::new_v4().to_string()).unwrap(),
        );
        assert!(extract_principal(&headers).is_err());

        headers.insert(USER_ROLE_HEADER, HeaderValue::from_static("LEARNER"));
        let principal = extract_principal(&headers).unwrap();
        assert_eq!(principal.role, Role::Learner);
    }

    #[test]
    fn garbage_role_is_rejected() {
        let mut headers = HeaderMap::new();
        headers.insert(
            USER_ID_HEADER,
            HeaderValue::from_str(&Uuid::new_v4().to_string()).unwrap(),
        );
        headers.insert(USER_ROLE_HEADER, HeaderValue::from_static("SUPERUSER"));
        assert!(extract_principal(&headers).is_err());
    }

    #[test]
    fn role_gate_allows_listed_roles_only() {
        let principal = Principal { user_id: Uuid::new_v4(), role: Role::Learner };
        assert!(require_role(&principal, &[Role::Learner, Role::Admin]).is_ok());
        assert!(require_role(&principal, &[Role::Teacher]).is_err());
    }
}
