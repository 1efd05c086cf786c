//! Fpush library
//!
//! Single-file push client: a blocking stop-and-wait wire protocol, a
//! path-confinement guard, and narrow adapters over TCP and local files.

pub mod confine;
pub mod engine;
pub mod logger;
pub mod net;
pub mod protocol;
pub mod reader;
