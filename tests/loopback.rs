//! End-to-end transfer tests against a scripted server on a real socket

use fpush::confine::confine;
use fpush::engine::Transfer;
use fpush::logger::NoopLogger;
use fpush::net;
use fpush::reader::FileChunkReader;
use std::fs;
use std::io::{Read, Write};
use std::net::TcpListener;
use std::thread;

/// Accept one connection and play the server side of the protocol: read the
/// path frame and then chunks, answering each with the next scripted status.
/// Returns every byte the client sent.
fn scripted_server(listener: TcpListener, statuses: Vec<u8>) -> thread::JoinHandle<Vec<u8>> {
    thread::spawn(move || {
        let (mut sock, _) = listener.accept().unwrap();
        let mut seen = Vec::new();
        let mut statuses = statuses.into_iter();

        let mut len = [0u8; 1];
        sock.read_exact(&mut len).unwrap();
        seen.push(len[0]);
        let mut body = vec![0u8; len[0] as usize];
        sock.read_exact(&mut body).unwrap();
        seen.extend_from_slice(&body);
        let st = statuses.next().unwrap();
        sock.write_all(&[st]).unwrap();
        if st != 0 {
            return seen;
        }

        loop {
            sock.read_exact(&mut len).unwrap();
            seen.push(len[0]);
            let m = len[0] as usize;
            if m > 0 {
                let mut body = vec![0u8; m];
                sock.read_exact(&mut body).unwrap();
                seen.extend_from_slice(&body);
            }
            let st = statuses.next().unwrap();
            sock.write_all(&[st]).unwrap();
            if st != 0 || m == 0 {
                return seen;
            }
        }
    })
}

fn listen_local() -> (TcpListener, u16) {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    (listener, port)
}

#[test]
fn happy_path_transfers_exact_bytes() {
    let dir = tempfile::tempdir().unwrap();
    let src = dir.path().join("hello.txt");
    fs::write(&src, b"hi").unwrap();

    let (listener, port) = listen_local();
    let server = scripted_server(listener, vec![0, 0, 0]);

    let (file, _) = confine(&src, dir.path()).unwrap();
    let stream = net::connect("127.0.0.1", port).unwrap();
    let outcome = Transfer::new(stream, FileChunkReader::new(file), b"out.txt", &NoopLogger).run();
    assert!(outcome.is_success());

    let seen = server.join().unwrap();
    assert_eq!(
        seen,
        vec![0x07, b'o', b'u', b't', b'.', b't', b'x', b't', 0x02, b'h', b'i', 0x00]
    );
}

#[test]
fn large_file_round_trips_through_chunking() {
    let dir = tempfile::tempdir().unwrap();
    let src = dir.path().join("big.bin");
    let data: Vec<u8> = (0..5000u32).map(|i| (i % 241) as u8).collect();
    fs::write(&src, &data).unwrap();

    let (listener, port) = listen_local();
    // 5000 bytes = 19 full chunks + 155, + path and terminator statuses
    let server = scripted_server(listener, vec![0; 22]);

    let (file, _) = confine(&src, dir.path()).unwrap();
    let stream = net::connect("127.0.0.1", port).unwrap();
    let outcome = Transfer::new(stream, FileChunkReader::new(file), b"big.bin", &NoopLogger).run();
    assert!(outcome.is_success());

    // Reassemble what the server saw: skip the path frame, then concatenate
    // chunk bodies until the zero terminator
    let seen = server.join().unwrap();
    let mut rest = &seen[1 + 7..];
    let mut rebuilt = Vec::new();
    loop {
        let m = rest[0] as usize;
        rest = &rest[1..];
        if m == 0 {
            break;
        }
        rebuilt.extend_from_slice(&rest[..m]);
        rest = &rest[m..];
    }
    assert!(rest.is_empty());
    assert_eq!(rebuilt, data);
}

#[test]
fn handshake_rejection_stops_before_any_chunk() {
    let dir = tempfile::tempdir().unwrap();
    let src = dir.path().join("f");
    fs::write(&src, b"content").unwrap();

    let (listener, port) = listen_local();
    let server = scripted_server(listener, vec![2]);

    let (file, _) = confine(&src, dir.path()).unwrap();
    let stream = net::connect("127.0.0.1", port).unwrap();
    let outcome = Transfer::new(stream, FileChunkReader::new(file), b"dup.txt", &NoopLogger).run();
    assert_eq!(outcome.code(), 2);

    let seen = server.join().unwrap();
    assert_eq!(seen, vec![0x07, b'd', b'u', b'p', b'.', b't', b'x', b't']);
}

#[test]
fn mid_transfer_abort_stops_after_first_chunk() {
    let dir = tempfile::tempdir().unwrap();
    let src = dir.path().join("f");
    fs::write(&src, vec![0xAB; 600]).unwrap();

    let (listener, port) = listen_local();
    let server = scripted_server(listener, vec![0, 3]);

    let (file, _) = confine(&src, dir.path()).unwrap();
    let stream = net::connect("127.0.0.1", port).unwrap();
    let outcome = Transfer::new(stream, FileChunkReader::new(file), b"f", &NoopLogger).run();
    assert_eq!(outcome.code(), 3);

    // path frame (2) + one chunk frame (1 + 255), nothing after the abort
    let seen = server.join().unwrap();
    assert_eq!(seen.len(), 2 + 1 + 255);
}

#[test]
fn empty_file_sends_terminator_only() {
    let dir = tempfile::tempdir().unwrap();
    let src = dir.path().join("empty");
    fs::write(&src, b"").unwrap();

    let (listener, port) = listen_local();
    let server = scripted_server(listener, vec![0, 0]);

    let (file, _) = confine(&src, dir.path()).unwrap();
    let stream = net::connect("127.0.0.1", port).unwrap();
    let outcome = Transfer::new(stream, FileChunkReader::new(file), b"e", &NoopLogger).run();
    assert!(outcome.is_success());

    let seen = server.join().unwrap();
    assert_eq!(seen, vec![0x01, b'e', 0x00]);
}
