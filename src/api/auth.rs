use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{request::Parts, HeaderMap, StatusCode},
};

/// Identity of the caller, forwarded by the authenticating collaborator that
/// fronts this service.
///
/// Authentication itself happens upstream; requests that reach these handlers
/// have already been gated, and the core consumes the forwarded identity for
/// audit logging only.
#[derive(Debug, Clone, PartialEq)]
pub struct UserContext {
    pub user_id: String,
    pub user_name: Option<String>,
}

impl UserContext {
    pub fn new(user_id: String) -> Self {
        Self {
            user_id,
            user_name: None,
        }
    }

    pub fn with_details(user_id: String, user_name: Option<String>) -> Self {
        Self { user_id, user_name }
    }

    /// Default identity for development, when no auth proxy is in front.
    pub fn default_user() -> Self {
        Self {
            user_id: "dev-user".to_string(),
            user_name: Some("Development User".to_string()),
        }
    }
}

impl Default for UserContext {
    fn default() -> Self {
        Self::default_user()
    }
}

/// Extractor reading the identity headers set by the auth collaborator:
///
/// - X-User-Id: user identifier
/// - X-User-Name: optional display name
#[async_trait]
impl<S> FromRequestParts<S> for UserContext
where
    S: Send + Sync,
{
    type Rejection = StatusCode;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let headers = &parts.headers;
        if let Some(user_id) = extract_header_value(headers, "x-user-id") {
            let user_name = extract_header_value(headers, "x-user-name");
            Ok(UserContext::with_details(user_id, user_name))
        } else {
            Ok(UserContext::default_user())
        }
    }
}

fn extract_header_value(headers: &HeaderMap, header_name: &str) -> Option<String> {
    headers
        .get(header_name)
        .and_then(|value| value.to_str().ok())
        .map(|s| s.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{HeaderName, HeaderValue};

    #[test]
    fn reads_forwarded_identity_headers() {
        let mut headers = HeaderMap::new();
        headers.insert(
            HeaderName::from_static("x-user-id"),
            HeaderValue::from_static("planner-7"),
        );

        assert_eq!(
            extract_header_value(&headers, "x-user-id"),
            Some("planner-7".to_string())
        );
        assert_eq!(extract_header_value(&headers, "x-user-name"), None);
    }

    #[tokio::test]
    async fn falls_back_to_development_identity() {
        let request = axum::http::Request::builder().body(()).unwrap();
        let (mut parts, _) = request.into_parts();
        let user = UserContext::from_request_parts(&mut parts, &())
            .await
            .unwrap();
        assert_eq!(user, UserContext::default_user());
    }
}
