//! HTTP front-end for the rate lookup core.
//!
//! Exposes `GET /api/rates` and `GET /health`. Each lookup runs on tokio's
//! blocking pool because the core performs a synchronous upstream call.

pub mod app;
pub mod config;
pub mod controller;
