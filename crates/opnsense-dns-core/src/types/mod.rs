mod endpoint;
mod labels;
mod service;
mod unbound;

pub use endpoint::*;
pub use labels::*;
pub use service::*;
pub use unbound::*;
