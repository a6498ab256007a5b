//! # cw-connectors
//!
//! Connectors to the systems containment actions run against.
//!
//! The orchestrator reaches identity providers, network block lists and
//! mail gateways only through the traits defined here. Concrete provider
//! wire protocols live outside this workspace; the simulated connector is
//! the explicit stand-in when none is configured.

pub mod mock;
pub mod simulated;
pub mod traits;

pub use mock::MockConnector;
pub use simulated::SimulatedConnector;
pub use traits::{
    Connector, ConnectorError, ConnectorResult, EmailGatewayConnector, IdentityConnector,
    NetworkSecurityConnector,
};
