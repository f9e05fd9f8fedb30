//! Request ID middleware.

use axum::{
    extract::Request,
    http::{header::HeaderName, HeaderValue},
    middleware::Next,
    response::Response,
};
use std::future::Future;
use std::pin::Pin;
use tracing::Instrument;
use uuid::Uuid;

/// Header name for request ID.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Type alias for the middleware future.
type MiddlewareFuture = Pin<Box<dyn Future<Output = Response> + Send>>;

/// Type alias for middleware function pointer.
type MiddlewareFn = fn(Request, Next) -> MiddlewareFuture;

/// Type alias for the middleware layer.
pub type MiddlewareLayer = axum::middleware::FromFnLayer<MiddlewareFn, (), (Request,)>;

/// Create the request ID layer.
///
/// An incoming `x-request-id` is kept; otherwise a UUID is generated. The ID
/// is echoed on the response and attached to the request span.
pub fn request_id_layer() -> MiddlewareLayer {
    axum::middleware::from_fn(request_id_middleware_fn)
}

fn request_id_middleware_fn(request: Request, next: Next) -> MiddlewareFuture {
    Box::pin(async move {
        let request_id = request
            .headers()
            .get(REQUEST_ID_HEADER)
            .and_then(|v| v.to_str().ok())
            .filter(|v| !v.is_empty())
            .map(String::from)
            .unwrap_or_else(|| Uuid::new_v4().to_string());

        let span = tracing::info_span!(
            "request",
            request_id = %request_id,
            method = %request.method(),
            uri = %request.uri(),
        );

        let mut response = next.run(request).instrument(span).await;

        if let Ok(header_value) = HeaderValue::from_str(&request_id) {
            response
                .headers_mut()
                .insert(HeaderName::from_static(REQUEST_ID_HEADER), header_value);
        }

        response
    })
}
