//! Transport session adapter over a blocking TCP stream

use anyhow::{Context, Result};
use std::io::{self, Read, Write};
use std::net::TcpStream;

use crate::engine::Transport;

pub const DEFAULT_HOST: &str = "localhost";
pub const DEFAULT_PORT: u16 = 25565;

/// Connect to the peer. No timeout; the protocol is blocking end to end.
pub fn connect(host: &str, port: u16) -> Result<TcpStream> {
    let addr = format!("{}:{}", host, port);
    let stream = TcpStream::connect(&addr).with_context(|| format!("connect {}", addr))?;
    // Frames here are tiny; Nagle would only add latency to the stop-and-wait
    let _ = stream.set_nodelay(true);
    Ok(stream)
}

impl Transport for TcpStream {
    fn send_all(&mut self, buf: &[u8]) -> io::Result<()> {
        // write_all loops over short writes, satisfying the exactly-N contract
        self.write_all(buf)
    }

    fn recv_byte(&mut self) -> io::Result<u8> {
        let mut b = [0u8; 1];
        self.read_exact(&mut b)?;
        Ok(b[0])
    }
}
