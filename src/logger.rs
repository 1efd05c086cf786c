use anyhow::Result;
use chrono::Utc;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::Path;
use std::sync::Mutex;

/// Transfer event log, injected into the engine and the console driver so
/// tests can run without capturing stdout.
pub trait Logger: Send + Sync {
    fn connect(&self, _addr: &str) {}
    fn handshake(&self, _dest: &[u8]) {}
    fn chunk(&self, _len: usize) {}
    fn status(&self, _byte: u8) {}
    fn outcome(&self, _code: u8) {}
    fn error(&self, _context: &str, _msg: &str) {}
}

pub struct NoopLogger;
impl Logger for NoopLogger {}

pub struct TextLogger {
    file: Mutex<File>,
}

impl TextLogger {
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self> {
        if let Some(parent) = path.as_ref().parent() {
            std::fs::create_dir_all(parent).ok();
        }
        let f = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self {
            file: Mutex::new(f),
        })
    }

    fn line(&self, s: &str) {
        if let Ok(mut f) = self.file.lock() {
            let _ = writeln!(f, "[{}] {}", Utc::now().to_rfc3339(), s);
        }
    }
}

impl Logger for TextLogger {
    fn connect(&self, addr: &str) {
        self.line(&format!("CONNECT addr={}", addr));
    }
    fn handshake(&self, dest: &[u8]) {
        self.line(&format!(
            "HANDSHAKE len={} dest={}",
            dest.len(),
            String::from_utf8_lossy(dest)
        ));
    }
    fn chunk(&self, len: usize) {
        self.line(&format!("CHUNK len={}", len));
    }
    fn status(&self, byte: u8) {
        // Raw value preserved, unknown codes included
        self.line(&format!("STATUS byte={}", byte));
    }
    fn outcome(&self, code: u8) {
        self.line(&format!("OUTCOME code={}", code));
    }
    fn error(&self, context: &str, msg: &str) {
        self.line(&format!("ERROR ctx={} msg={}", context, msg));
    }
}
