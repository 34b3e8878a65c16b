//! API endpoint modules.

mod service;
mod unbound;

pub use service::ServiceApi;
pub use unbound::UnboundApi;
