//! Share-node HTTP service: `POST /scan_share`, `GET /health` (§4.D).
//!
//! Exposed as a library, not just a binary, so the coordinator's test
//! suite can spin up real in-process nodes over loopback HTTP rather than
//! stubbing the network boundary out.

pub mod app;
pub mod error;
pub mod handlers;

pub use error::NodeError;
pub use handlers::AppState;
