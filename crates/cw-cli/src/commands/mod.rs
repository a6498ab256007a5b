//! Long-running and workflow subcommands.

mod approval_server;
mod contain;

pub use approval_server::run_approval_server;
pub use contain::{run_contain, ContainArgs};
