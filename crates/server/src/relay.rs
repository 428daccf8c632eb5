mod error;
mod headers;
mod layer;
mod resolve;

pub use error::RelayError;
pub use layer::{TokenRelayLayer, TokenRelayService};
