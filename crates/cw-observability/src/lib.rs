//! # cw-observability
//!
//! Logging and audit infrastructure for Containment Warden.
//!
//! The audit trail is an append-only JSON-lines file with size-based
//! rotation, optional HMAC-SHA256 signing and optional forwarding of each
//! record to a remote collector.

pub mod audit;
pub mod forward;
pub mod logging;
pub mod rotation;
pub mod signing;

pub use audit::{
    read_records, AuditConfig, AuditError, AuditLogger, AuditRecorder, MemoryAuditRecorder,
};
pub use forward::{AuditForwarder, HttpAuditForwarder};
pub use logging::{init_logging, init_logging_with_config, LoggingConfig, LoggingSettings};
pub use rotation::RotatingFile;
pub use signing::{
    sign_payload, verify_record, verify_signature, SIGNATURE_FIELD, SIGNATURE_HEADER,
};
