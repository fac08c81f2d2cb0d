//! Canvas server library: router, handlers and shared state
//!
//! The `canvas-server` binary wires this to a TCP listener; embedding the
//! router directly also works (the integration tests drive it in-process).

pub mod routes;
pub mod state;

pub use routes::router;
pub use state::AppState;
