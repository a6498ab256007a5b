//! # cw-api
//!
//! Reference approval service for the webhook approval strategy.
//!
//! Supervisors (or an approval UI) resolve pending containment requests
//! through a callback endpoint; the containment side polls the status
//! endpoint until the request is approved, denied or its deadline passes.

pub mod error;
pub mod journal;
pub mod routes;
pub mod server;
pub mod state;
pub mod store;

pub use error::{ApiError, ErrorResponse};
pub use journal::ApprovalJournal;
pub use server::{ApprovalServer, ApprovalServerConfig};
pub use state::AppState;
pub use store::{ApprovalRecord, InMemoryApprovalStore, StoreError};
