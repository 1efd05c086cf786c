//! Protocol engine: the blocking state machine that drives one transfer
//!
//! One instance per transfer attempt, no concurrency, no retries, no
//! timeouts. The engine talks to the world only through the [`Transport`] and
//! [`ChunkSource`] traits so it can be exercised against in-memory fakes.
//!
//! Sequence: send the length-prefixed destination path, read one status byte,
//! then loop sending length-prefixed chunks (each answered by one status
//! byte) until a zero-length chunk is acknowledged with status 0. Any
//! non-zero status ends the session immediately; nothing further is sent.

use std::io;

use crate::logger::Logger;
use crate::protocol::{outcome, status, MAX_CHUNK, MAX_PATH_LEN};

/// Byte sink/source for the connected channel. `send_all` succeeds only if
/// every byte was accepted; looping over short writes is the adapter's job,
/// the engine never retries.
pub trait Transport {
    fn send_all(&mut self, buf: &[u8]) -> io::Result<()>;
    /// Exactly one byte; an error covers both transport failure and graceful
    /// close by the peer.
    fn recv_byte(&mut self) -> io::Result<u8>;
}

/// Sequential reader over the source file. At most [`MAX_CHUNK`] bytes per
/// call, carried by the buffer type; `Ok(0)` means the source is exhausted.
pub trait ChunkSource {
    fn read_chunk(&mut self, buf: &mut [u8; MAX_CHUNK]) -> io::Result<usize>;
}

/// Final result of one transfer attempt.
#[derive(Debug)]
pub enum TransferOutcome {
    Success,
    /// Non-zero status byte from the peer, preserved verbatim.
    Remote(u8),
    /// Send or receive failed at the channel level.
    Transport(io::Error),
    /// The source reader failed mid-transfer.
    SourceRead(io::Error),
}

impl TransferOutcome {
    /// Numeric code reported to the caller: 0 success, remote bytes as-is,
    /// 4 for any local or transport failure.
    pub fn code(&self) -> u8 {
        match self {
            TransferOutcome::Success => outcome::SUCCESS,
            TransferOutcome::Remote(b) => *b,
            TransferOutcome::Transport(_) | TransferOutcome::SourceRead(_) => {
                outcome::LOCAL_FAILURE
            }
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, TransferOutcome::Success)
    }
}

/// Ephemeral transfer session: one channel, one source, one destination path.
/// Created per attempt and consumed by [`Transfer::run`].
pub struct Transfer<'a, T: Transport, S: ChunkSource> {
    transport: T,
    source: S,
    dest: &'a [u8],
    log: &'a dyn Logger,
}

impl<'a, T: Transport, S: ChunkSource> Transfer<'a, T, S> {
    /// Caller must have gated `dest` at [`MAX_PATH_LEN`] already; a longer
    /// path here is a programming error, not a protocol failure.
    pub fn new(transport: T, source: S, dest: &'a [u8], log: &'a dyn Logger) -> Self {
        debug_assert!(dest.len() <= MAX_PATH_LEN);
        Self {
            transport,
            source,
            dest,
            log,
        }
    }

    /// One length byte, then the body if non-empty.
    fn send_framed(&mut self, body: &[u8]) -> io::Result<()> {
        self.transport.send_all(&[body.len() as u8])?;
        if !body.is_empty() {
            self.transport.send_all(body)?;
        }
        Ok(())
    }

    fn await_status(&mut self) -> io::Result<u8> {
        let b = self.transport.recv_byte()?;
        self.log.status(b);
        Ok(b)
    }

    /// Drive the whole exchange to a final outcome. The session is consumed;
    /// handles held by the transport and source drop with it on every path.
    pub fn run(mut self) -> TransferOutcome {
        let dest = self.dest;
        self.log.handshake(dest);
        if let Err(e) = self.send_framed(dest) {
            self.log.error("handshake", &e.to_string());
            return TransferOutcome::Transport(e);
        }
        match self.await_status() {
            Ok(status::OK) => {}
            Ok(b) => return TransferOutcome::Remote(b),
            Err(e) => {
                self.log.error("handshake", &e.to_string());
                return TransferOutcome::Transport(e);
            }
        }

        let mut buf = [0u8; MAX_CHUNK];
        loop {
            let n = match self.source.read_chunk(&mut buf) {
                Ok(n) => n,
                Err(e) => {
                    self.log.error("read", &e.to_string());
                    return TransferOutcome::SourceRead(e);
                }
            };
            self.log.chunk(n);
            if let Err(e) = self.send_framed(&buf[..n]) {
                self.log.error("chunk", &e.to_string());
                return TransferOutcome::Transport(e);
            }
            match self.await_status() {
                Ok(status::OK) if n == 0 => return TransferOutcome::Success,
                Ok(status::OK) => {}
                Ok(b) => return TransferOutcome::Remote(b),
                Err(e) => {
                    self.log.error("chunk", &e.to_string());
                    return TransferOutcome::Transport(e);
                }
            }
        }
    }
}
