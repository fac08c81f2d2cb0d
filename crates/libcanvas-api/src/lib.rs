//! REST wire types and client for the canvas project store
//!
//! This crate provides:
//! - Request/response body types shared by the server and its clients
//!   (CreateProjectRequest, UpdateProjectRequest, ErrorBody, HealthBody)
//! - HTTP status mapping for the error taxonomy
//! - An async ApiClient for talking to a running canvas-server

pub mod client;
pub mod error;
pub mod messages;

pub use client::{ApiClient, DEFAULT_TIMEOUT_MS};
pub use error::ApiError;
pub use messages::{
    CreateProjectRequest, DeleteBody, ErrorBody, HealthBody, ListQuery, UpdateProjectRequest,
};
