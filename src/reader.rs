//! Source reader adapter: sequential reads bounded to one wire chunk
//!
//! The wire carries chunk lengths in a single byte, so a read can never hand
//! back more than 255 bytes. The bound lives in the buffer type rather than
//! in a numeric truncation.

use std::fs::File;
use std::io::{self, Read};

use crate::engine::ChunkSource;
use crate::protocol::MAX_CHUNK;

pub struct FileChunkReader {
    file: File,
}

impl FileChunkReader {
    pub fn new(file: File) -> Self {
        Self { file }
    }
}

impl ChunkSource for FileChunkReader {
    fn read_chunk(&mut self, buf: &mut [u8; MAX_CHUNK]) -> io::Result<usize> {
        // A short read mid-file is fine; only 0 means end of stream for a
        // regular file
        self.file.read(&mut buf[..])
    }
}
