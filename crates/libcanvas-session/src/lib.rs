//! Client-side session library for canvas
//!
//! This crate provides:
//! - The in-memory Session (file mapping + active-file pointer)
//! - The local per-user project cache
//! - The debounced Autosaver timer
//! - SessionService, which wires session, cache, autosave and the optional
//!   remote store together
//! - The share-link codec and directory export

pub mod autosave;
pub mod cache;
pub mod export;
pub mod service;
pub mod session;
pub mod share;

pub use autosave::{Autosaver, SaveTick};
pub use cache::LocalCache;
pub use export::{export_to_dir, ExportStats};
pub use service::SessionService;
pub use session::Session;
pub use share::{decode_share_link, encode_share_link, SharePayload};
