//! Client side of the relay: the chat surface and its transport seam.

pub mod surface;
pub mod transport;
