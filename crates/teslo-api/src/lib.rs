//! # teslo-api
//!
//! HTTP layer for the Teslo realtime gateway built on Axum.
//!
//! Provides the WebSocket upgrade route, presence and health endpoints,
//! middleware (CORS, request logging), and error mapping.

pub mod app;
pub mod dto;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod state;

pub use app::{build_app, build_state, run_server, serve};
pub use state::AppState;
