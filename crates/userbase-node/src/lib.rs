//! # Userbase Node
//!
//! HTTP user registry: register, list, get, update and delete user records,
//! and exchange an email + password for a signed bearer token.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │                 HTTP API Layer               │
//! │  • request id, tracing, timeout, body limit  │
//! │  • /api/register, /api/users, /api/login     │
//! └──────────────────────────────────────────────┘
//!                        │
//! ┌──────────────────────────────────────────────┐
//! │                  UserService                 │
//! │  • validation, Argon2id hashing, JWT issue   │
//! └──────────────────────────────────────────────┘
//!                        │
//! ┌──────────────────────────────────────────────┐
//! │                  UserStore                   │
//! │  • memory:// or rocksdb://<path>             │
//! └──────────────────────────────────────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```bash
//! JWT_SECRET=$(openssl rand -hex 32) cargo run --bin userbase-node -- --port 3000
//! ```
//!
//! ## Modules
//!
//! - [`api`] - Router, handlers and shared state
//! - [`config`] - Layered configuration (defaults, YAML file, environment)
//! - [`error`] - Mapping of service errors to HTTP responses
//! - [`observability`] - Logging and request ID propagation

pub mod api;
pub mod config;
pub mod error;
pub mod observability;
