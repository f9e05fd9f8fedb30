//! # Observability Module
//!
//! - **Structured Logging**: pretty or JSON logs, filtered by level or `RUST_LOG`
//! - **Request Tracing**: request IDs propagated into spans and response headers
//!
//! ## Usage
//!
//! ```rust,ignore
//! use axum::Router;
//! use userbase_node::observability::{init_logging, request_id_layer, LogFormat};
//!
//! init_logging("info", LogFormat::Pretty);
//!
//! let app: Router<()> = Router::new()
//!     .layer(request_id_layer());
//! ```

mod logging;
pub mod middleware;

pub use logging::{init_logging, LogFormat};
pub use middleware::{request_id_layer, REQUEST_ID_HEADER};
