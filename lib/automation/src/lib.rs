//! Automation backend contract for flowdesk.
//!
//! The automation engine that actually runs workflows is an external
//! service. This crate defines what the editor consumes from it:
//!
//! - [`AutomationBackend`]: workflow, template and execution operations
//! - [`AutomationConnection`]: the connection state shown to the user
//! - [`HttpAutomationBackend`]: a JSON-over-HTTP implementation

pub mod backend;
pub mod connection;
pub mod error;
pub mod http;

pub use backend::AutomationBackend;
pub use connection::AutomationConnection;
pub use error::BackendError;
pub use http::{HttpAutomationBackend, HttpBackendConfig};
