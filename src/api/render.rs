use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header, request::Parts, StatusCode},
    Json,
};

use crate::api::handlers::ErrorResponse;
use crate::logic::represent::RenderContext;

/// Build the codec's [`RenderContext`] from the in-flight request.
///
/// Hyperlink serialization needs the request's base URL; a request with no
/// resolvable host is a configuration problem on the deployment, not a client
/// error, and fails fast here before any handler logic runs.
#[async_trait]
impl<S> FromRequestParts<S> for RenderContext
where
    S: Send + Sync,
{
    type Rejection = (StatusCode, Json<ErrorResponse>);

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let headers = &parts.headers;
        let scheme = headers
            .get("x-forwarded-proto")
            .and_then(|value| value.to_str().ok())
            .unwrap_or("http");
        match headers.get(header::HOST).and_then(|value| value.to_str().ok()) {
            Some(host) if !host.is_empty() => {
                Ok(RenderContext::new(format!("{}://{}", scheme, host)))
            }
            _ => Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::new(
                    "No request host available for building resource links",
                )),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn extract(request: axum::http::Request<()>) -> Result<RenderContext, StatusCode> {
        let (mut parts, _) = request.into_parts();
        RenderContext::from_request_parts(&mut parts, &())
            .await
            .map_err(|(status, _)| status)
    }

    #[tokio::test]
    async fn builds_base_url_from_host_header() {
        let request = axum::http::Request::builder()
            .header("host", "factory.example.com:8080")
            .body(())
            .unwrap();
        let ctx = extract(request).await.unwrap();
        assert_eq!(ctx.base_url(), "http://factory.example.com:8080");
    }

    #[tokio::test]
    async fn honours_forwarded_proto() {
        let request = axum::http::Request::builder()
            .header("host", "factory.example.com")
            .header("x-forwarded-proto", "https")
            .body(())
            .unwrap();
        let ctx = extract(request).await.unwrap();
        assert_eq!(ctx.base_url(), "https://factory.example.com");
    }

    #[tokio::test]
    async fn missing_host_is_a_configuration_error() {
        let request = axum::http::Request::builder().body(()).unwrap();
        let status = extract(request).await.unwrap_err();
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    }
}
