//! HTTP surface for the classification service (`http` feature).
//!
//! Exposes a liveness route and `POST /detect-voice`. The handler validates
//! the request envelope (language whitelist, Base64), then runs the
//! CPU-bound pipeline on tokio's blocking pool under a concurrency limit
//! and an overall timeout.

mod routes;

pub use routes::{build_router, run_http_server, DetectRequest, HttpError, HttpState};
