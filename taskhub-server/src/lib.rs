//! `TaskHub` backend service library.
//!
//! Exposes the stores, services, and HTTP surface for use in tests and
//! embedding. The server keeps task, grant, and user records in
//! in-memory stores, routes every operation through the authorization
//! engine in `taskhub-core`, and serves a JSON API over axum with HTTP
//! Basic authentication.

pub mod accounts;
pub mod auth;
pub mod config;
pub mod http;
pub mod ops;
pub mod store;
