//! AI Image Enhancement Gateway
//!
//! This library provides the core functionality for the enhance-gateway
//! service: it accepts base64-encoded images over HTTP, forwards them to a
//! hosted inference provider (HuggingFace or a Replicate-style prediction
//! API), awaits job completion, and returns the enhanced image as a data URI.

pub mod app_state;
pub mod config;
pub mod error;
pub mod models;
pub mod routes;
pub mod services;
