//! Backend implementations and registry.

mod actuator;
mod http;
mod registry;

pub use actuator::ActuatorBackend;
pub use http::HttpBackend;
pub use registry::BackendRegistry;
