use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio::time::timeout;

use terminus::adapter::protocol::{IAC, NEGOTIATION, OPT_NAWS, SB, SE};
use terminus::adapter::runtime::{build_world, spawn_world_ticker};
use terminus::adapter::server::{run_server, ServerConfig};

const WAIT: Duration = Duration::from_secs(5);

async fn start_server(max_players: usize) -> (SocketAddr, JoinHandle<()>, JoinHandle<()>) {
    let config = ServerConfig {
        port: 0,
        max_players,
        seed: Some(3),
        ..ServerConfig::default()
    };
    let world = build_world(&config).unwrap();
    let ticker = spawn_world_ticker(Arc::clone(&world), config.tick_hz);

    let (ready_tx, ready_rx) = oneshot::channel();
    let server = tokio::spawn(async move {
        let _ = run_server(config, world, Some(ready_tx)).await;
    });

    let addr = timeout(WAIT, ready_rx)
        .await
        .expect("server did not signal ready")
        .expect("ready channel dropped");
    (addr, server, ticker)
}

/// Read until `needle` shows up in the accumulated output.
async fn read_until(stream: &mut TcpStream, seen: &mut Vec<u8>, needle: &[u8]) {
    let mut buf = [0u8; 4096];
    timeout(WAIT, async {
        while !seen.windows(needle.len()).any(|w| w == needle) {
            let n = stream.read(&mut buf).await.expect("read failed");
            assert!(n > 0, "connection closed before {:?}", String::from_utf8_lossy(needle));
            seen.extend_from_slice(&buf[..n]);
        }
    })
    .await
    .expect("timed out waiting for output");
}

fn naws(width: u16, height: u16) -> [u8; 9] {
    let [w_hi, w_lo] = width.to_be_bytes();
    let [h_hi, h_lo] = height.to_be_bytes();
    [IAC, SB, OPT_NAWS, w_hi, w_lo, h_hi, h_lo, IAC, SE]
}

/// Rows and text of the most recent full redraw in `seen`, if any.
fn last_full_frame(seen: &[u8]) -> Option<(usize, String)> {
    const CLEAR: &[u8] = b"\x1b[2J";
    let start = seen.windows(CLEAR.len()).rposition(|w| w == CLEAR)?;
    let frame = &seen[start..];
    let rows = frame.windows(2).filter(|w| *w == b"\r\n").count() + 1;
    Some((rows, String::from_utf8_lossy(frame).into_owned()))
}

async fn read_to_close(stream: &mut TcpStream) -> Vec<u8> {
    let mut out = Vec::new();
    timeout(WAIT, stream.read_to_end(&mut out))
        .await
        .expect("connection was not closed")
        .expect("read failed");
    out
}

#[tokio::test]
async fn client_sees_hud_and_quits() {
    let (addr, server, ticker) = start_server(4).await;
    let mut stream = TcpStream::connect(addr).await.expect("connect failed");

    let mut negotiation = [0u8; NEGOTIATION.len()];
    timeout(WAIT, stream.read_exact(&mut negotiation))
        .await
        .expect("no negotiation")
        .unwrap();
    assert_eq!(negotiation, NEGOTIATION);

    stream
        .write_all(&[IAC, SB, OPT_NAWS, 0, 100, 0, 30, IAC, SE])
        .await
        .unwrap();

    let mut seen = Vec::new();
    read_until(&mut stream, &mut seen, b"Players: 1/4").await;

    stream.write_all(b"q").await.unwrap();
    read_to_close(&mut stream).await;

    server.abort();
    ticker.abort();
}

#[tokio::test]
async fn resize_redraws_on_same_connection() {
    let (addr, server, ticker) = start_server(4).await;
    let mut stream = TcpStream::connect(addr).await.expect("connect failed");
    stream.write_all(&naws(40, 12)).await.unwrap();

    let mut seen = Vec::new();
    read_until(&mut stream, &mut seen, b"Players: 1/4").await;

    stream.write_all(&naws(120, 40)).await.unwrap();
    let mut buf = [0u8; 4096];
    timeout(WAIT, async {
        loop {
            if let Some((rows, text)) = last_full_frame(&seen) {
                if rows == 40 && text.contains("Players: 1/4") {
                    break;
                }
            }
            let n = stream.read(&mut buf).await.expect("read failed");
            assert!(n > 0, "connection dropped on resize");
            seen.extend_from_slice(&buf[..n]);
        }
    })
    .await
    .expect("no full redraw at the new size");

    // Still connected: quitting closes cleanly.
    stream.write_all(b"q").await.unwrap();
    read_to_close(&mut stream).await;

    server.abort();
    ticker.abort();
}

#[tokio::test]
async fn full_server_rejects_with_message() {
    let (addr, server, ticker) = start_server(1).await;

    let mut first = TcpStream::connect(addr).await.expect("connect failed");
    let mut seen = Vec::new();
    read_until(&mut first, &mut seen, b"Players: 1/1").await;

    let mut second = TcpStream::connect(addr).await.expect("connect failed");
    let out = read_to_close(&mut second).await;
    assert!(out.starts_with(&NEGOTIATION));
    let text = String::from_utf8_lossy(&out[NEGOTIATION.len()..]).into_owned();
    assert_eq!(text, "server full: max 1 players\r\n");

    // The first client is unaffected and can still leave cleanly.
    first.write_all(b"q").await.unwrap();
    read_to_close(&mut first).await;

    server.abort();
    ticker.abort();
}

#[tokio::test]
async fn slot_is_freed_after_disconnect() {
    let (addr, server, ticker) = start_server(1).await;

    let mut first = TcpStream::connect(addr).await.expect("connect failed");
    let mut seen = Vec::new();
    read_until(&mut first, &mut seen, b"Players: 1/1").await;
    drop(first);

    // The slot frees once the session notices the closed input queue.
    let mut joined = false;
    for _ in 0..50 {
        let mut next = TcpStream::connect(addr).await.expect("connect failed");
        let mut out = Vec::new();
        let mut buf = [0u8; 4096];
        let _ = timeout(Duration::from_millis(500), async {
            loop {
                match next.read(&mut buf).await {
                    Ok(0) | Err(_) => break,
                    Ok(n) => out.extend_from_slice(&buf[..n]),
                }
                if out.windows(12).any(|w| w == b"Players: 1/1") {
                    break;
                }
            }
        })
        .await;
        if out.windows(12).any(|w| w == b"Players: 1/1") {
            joined = true;
            break;
        }
        tokio::time::sleep(Duration::from_millis(50)).await;
    }
    assert!(joined, "slot was never released");

    server.abort();
    ticker.abort();
}
