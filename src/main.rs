//! Fpush - push one local file to a peer over a byte-framed TCP protocol
//!
//! Interactive console in front of the transfer engine: `send` prompts for a
//! source and destination path, `exit` quits. The source must resolve inside
//! the current working directory (symlinks included) before anything touches
//! the network.

use anyhow::{Context, Result};
use clap::Parser;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

use fpush::confine::{confine, ConfineError};
use fpush::engine::Transfer;
use fpush::logger::{Logger, NoopLogger, TextLogger};
use fpush::net;
use fpush::protocol::{check_path_len, outcome, status};
use fpush::reader::FileChunkReader;

/// Command-line arguments
#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Fpush - interactive single-file push client"
)]
struct Args {
    /// Server host
    #[arg(long, default_value = net::DEFAULT_HOST)]
    host: String,

    /// Server port
    #[arg(long, default_value_t = net::DEFAULT_PORT)]
    port: u16,

    /// Write transfer log entries to file
    #[arg(long = "log-file")]
    log_file: Option<PathBuf>,
}

fn main() -> Result<()> {
    let args = Args::parse();
    let log: Box<dyn Logger> = match &args.log_file {
        Some(path) => Box::new(TextLogger::new(path).context("open log file")?),
        None => Box::new(NoopLogger),
    };
    let stdin = io::stdin();
    run_console(&mut stdin.lock(), &args, log.as_ref())
}

/// Next whitespace-delimited token, skipping blank lines. `None` on EOF.
fn read_token(input: &mut impl BufRead) -> io::Result<Option<String>> {
    let mut line = String::new();
    loop {
        line.clear();
        if input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        if let Some(tok) = line.split_whitespace().next() {
            return Ok(Some(tok.to_string()));
        }
    }
}

fn run_console(input: &mut impl BufRead, args: &Args, log: &dyn Logger) -> Result<()> {
    println!("Client started");
    loop {
        println!("Enter 'send' to send file or 'exit' to exit");
        print!(">>");
        let _ = io::stdout().flush();
        let Some(command) = read_token(input)? else {
            break;
        };
        match command.as_str() {
            "send" => send_one(input, args, log),
            "exit" => break,
            _ => println!("Unrecognized command"),
        }
    }
    println!("Client stopped");
    Ok(())
}

/// Reason line printed after "File transfer failed"; outcome codes from the
/// peer map to their protocol meaning, everything else (local failures and
/// unclassified remote codes) reads as unknown.
fn failure_reason(code: u8) -> &'static str {
    match code {
        status::INVALID_PATH => "Invalid path",
        status::ALREADY_EXISTS => "File already exists",
        status::ABORTED => "Operation aborted",
        _ => "Unknown reason",
    }
}

fn report(code: u8) {
    if code == outcome::SUCCESS {
        println!("File transfer succeeded");
    } else {
        println!("File transfer failed");
        println!("{}", failure_reason(code));
    }
}

/// One `send` interaction: prompt for both paths, gate their lengths, prove
/// source confinement, then run the transfer.
fn send_one(input: &mut impl BufRead, args: &Args, log: &dyn Logger) {
    print!("Enter source path:");
    let _ = io::stdout().flush();
    let src = match read_token(input) {
        Ok(Some(tok)) if check_path_len(&tok).is_ok() => tok,
        _ => {
            println!("Path is invalid");
            return;
        }
    };

    print!("Enter destination path:");
    let _ = io::stdout().flush();
    let dest = match read_token(input) {
        Ok(Some(tok)) if check_path_len(&tok).is_ok() => tok,
        _ => {
            println!("Path is invalid");
            return;
        }
    };

    let cwd = match std::env::current_dir() {
        Ok(d) => d,
        Err(e) => {
            log.error("cwd", &e.to_string());
            println!("Internal error");
            return;
        }
    };

    let src_file = match confine(Path::new(&src), &cwd) {
        Ok((file, _canonical)) => file,
        Err(ConfineError::NotFound(_)) => {
            println!("Couldn't open specified file");
            return;
        }
        Err(ConfineError::PathEscape) => {
            println!("You can't use this file");
            return;
        }
        Err(ConfineError::Io(e)) => {
            log.error("confine", &e.to_string());
            println!("Internal error");
            return;
        }
    };

    let addr = format!("{}:{}", args.host, args.port);
    log.connect(&addr);
    let code = match net::connect(&args.host, args.port) {
        Ok(stream) => {
            let transfer = Transfer::new(
                stream,
                FileChunkReader::new(src_file),
                dest.as_bytes(),
                log,
            );
            transfer.run().code()
        }
        Err(e) => {
            log.error("connect", &e.to_string());
            outcome::LOCAL_FAILURE
        }
    };
    log.outcome(code);
    report(code);
}
