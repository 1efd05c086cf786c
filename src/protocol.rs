//! Wire constants for the fpush stop-and-wait transfer protocol
//!
//! Every field on the wire is a single byte or a raw byte run; there is no
//! header, no magic, no version. The client sends a length-prefixed
//! destination path, then length-prefixed data chunks, and reads one status
//! byte after each send. A zero-length chunk marks end of stream.

use anyhow::{bail, Result};

/// Path and chunk length fields are one byte on the wire.
pub const MAX_PATH_LEN: usize = 255;
pub const MAX_CHUNK: usize = 255;

// Status byte values the server replies with after every framed send.
// Any other value is a server-defined error, passed through unchanged.
pub mod status {
    pub const OK: u8 = 0;
    pub const INVALID_PATH: u8 = 1;
    pub const ALREADY_EXISTS: u8 = 2;
    pub const ABORTED: u8 = 3;
}

// Outcome codes surfaced to the caller. Remote status bytes pass through
// verbatim; every local or transport failure collapses to LOCAL_FAILURE.
pub mod outcome {
    pub const SUCCESS: u8 = 0;
    pub const LOCAL_FAILURE: u8 = 4;
}

/// Boundary gate: a path must fit the one-byte length field before any
/// filesystem or network work starts. Input sizes are never truncated.
pub fn check_path_len(path: &str) -> Result<()> {
    if path.len() > MAX_PATH_LEN {
        bail!(
            "path too long: {} bytes (max: {})",
            path.len(),
            MAX_PATH_LEN
        );
    }
    Ok(())
}
