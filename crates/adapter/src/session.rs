//! Per-connection session loop.
//!
//! Each connection gets two tasks: a reader that decodes telnet framing and
//! feeds a bounded byte queue, and the session loop itself, which at a fixed
//! rate drains input, moves its player, renders from that player's viewpoint
//! and writes the encoded frame back.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use arrayvec::ArrayVec;
use crossterm::event::KeyEvent;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::TcpStream;
use tokio::sync::mpsc::error::TryRecvError;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, info, warn};

use crate::core::{Session, SessionId, SessionState, World, WorldSnapshot};
use crate::engine::{Actor, Raycaster, SpriteKind, SpriteTuning};
use crate::input::{handle_key_event, KeyDecoder};
use crate::protocol::{TelnetEvent, TelnetParser, NEGOTIATION};
use crate::server::ServerConfig;
use crate::term::{FrameBuffer, FrameEncoder, HudStatus, HudView, Viewport};
use crate::types::PlayerAction;

/// Keys applied per frame at most; the rest wait for the next frame.
pub const MAX_KEYS_PER_FRAME: usize = 64;

const READ_CHUNK: usize = 1024;

/// Settings every session shares.
#[derive(Debug, Clone)]
pub struct SessionOptions {
    pub tick_hz: u32,
    pub input_queue: usize,
    pub sprites: SpriteTuning,
}

impl From<&ServerConfig> for SessionOptions {
    fn from(config: &ServerConfig) -> Self {
        Self {
            tick_hz: config.tick_hz,
            input_queue: config.input_queue,
            sprites: config.sprites,
        }
    }
}

/// Drive one client connection from negotiation to disconnect.
///
/// A rejected join is reported to the client as one line and is not an
/// error. Transport failures end only this session.
pub async fn handle_connection(
    stream: TcpStream,
    peer: SocketAddr,
    id: SessionId,
    world: Arc<World>,
    options: Arc<SessionOptions>,
) -> Result<()> {
    let mut state = SessionState::Connecting;
    let (reader, mut writer) = stream.into_split();
    writer.write_all(&NEGOTIATION).await?;

    let session = match world.join(id) {
        Ok(session) => session,
        Err(e) => {
            info!(session = %id, %peer, reason = %e, "session rejected");
            writer.write_all(format!("{e}\r\n").as_bytes()).await?;
            writer.shutdown().await?;
            return Ok(());
        }
    };
    debug!(session = %id, from = ?state, to = ?session.state(), "state change");
    state = session.state();

    let (input_tx, input_rx) = mpsc::channel::<u8>(options.input_queue.max(1));
    let (size_tx, size_rx) = watch::channel(Viewport::default());
    let reader_task = spawn_reader(reader, input_tx, size_tx);

    let result = run_session(&session, &mut writer, input_rx, size_rx, &options).await;

    reader_task.abort();
    let _ = writer.shutdown().await;
    let connected_for = session.connected_since().elapsed();
    drop(session);
    debug!(session = %id, from = ?state, to = ?SessionState::Disconnected, "state change");
    info!(session = %id, %peer, secs = connected_for.as_secs(), "session ended");
    result
}

/// Reader half: telnet bytes in, data bytes and window sizes out.
///
/// A full input queue drops the newest byte.
fn spawn_reader(
    mut reader: OwnedReadHalf,
    input_tx: mpsc::Sender<u8>,
    size_tx: watch::Sender<Viewport>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut parser = TelnetParser::new();
        let mut buf = [0u8; READ_CHUNK];
        loop {
            let n = match reader.read(&mut buf).await {
                Ok(0) | Err(_) => break,
                Ok(n) => n,
            };
            for &byte in &buf[..n] {
                match parser.push(byte) {
                    Some(TelnetEvent::Data(b)) => {
                        let _ = input_tx.try_send(b);
                    }
                    Some(TelnetEvent::WindowSize { width, height }) => {
                        size_tx.send_replace(Viewport::from_client(width, height));
                    }
                    None => {}
                }
            }
        }
    })
}

/// Reusable per-session frame state.
struct FrameState {
    fb: FrameBuffer,
    encoder: FrameEncoder,
    raycaster: Raycaster,
    hud: HudView,
    snapshot: WorldSnapshot,
    actors: Vec<Actor>,
    decoder: KeyDecoder,
}

impl FrameState {
    fn new(viewport: Viewport, sprites: SpriteTuning) -> Self {
        Self {
            fb: FrameBuffer::new(viewport.width, viewport.height),
            encoder: FrameEncoder::new(),
            raycaster: Raycaster::new(sprites),
            hud: HudView::new(),
            snapshot: WorldSnapshot::default(),
            actors: Vec::new(),
            decoder: KeyDecoder::new(),
        }
    }
}

enum Drain {
    Open,
    Closed,
}

/// Pull pending bytes into key events, at most one frame's worth.
///
/// A lone ESC is only resolved after a frame passes with no new bytes, so an
/// escape sequence split across reads still decodes as one key.
fn drain_keys(
    rx: &mut mpsc::Receiver<u8>,
    decoder: &mut KeyDecoder,
    keys: &mut ArrayVec<KeyEvent, MAX_KEYS_PER_FRAME>,
) -> Drain {
    let mut received = false;
    while !keys.is_full() {
        match rx.try_recv() {
            Ok(byte) => {
                received = true;
                if let Some(key) = decoder.push(byte) {
                    keys.push(key);
                }
            }
            Err(TryRecvError::Empty) => break,
            Err(TryRecvError::Disconnected) => return Drain::Closed,
        }
    }
    if !received && !keys.is_full() {
        if let Some(key) = decoder.flush() {
            keys.push(key);
        }
    }
    Drain::Open
}

async fn run_session(
    session: &Session,
    writer: &mut OwnedWriteHalf,
    mut input_rx: mpsc::Receiver<u8>,
    mut size_rx: watch::Receiver<Viewport>,
    options: &SessionOptions,
) -> Result<()> {
    let world = session.world();
    let dt = 1.0 / options.tick_hz.max(1) as f64;
    let mut frame = FrameState::new(*size_rx.borrow_and_update(), options.sprites);
    let mut keys: ArrayVec<KeyEvent, MAX_KEYS_PER_FRAME> = ArrayVec::new();

    writer.write_all(frame.encoder.enter()?).await?;

    let mut ticker = interval(Duration::from_secs_f64(dt));
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        ticker.tick().await;

        if size_rx.has_changed().unwrap_or(false) {
            let viewport = *size_rx.borrow_and_update();
            frame.fb.resize(viewport.width, viewport.height);
            frame.encoder.invalidate();
            debug!(session = %session.id(), width = viewport.width, height = viewport.height, "viewport resized");
        }

        keys.clear();
        if let Drain::Closed = drain_keys(&mut input_rx, &mut frame.decoder, &mut keys) {
            debug!(session = %session.id(), "client closed input");
            break;
        }

        let mut quit = false;
        for key in keys.iter().copied() {
            match handle_key_event(key) {
                Some(PlayerAction::Quit) => {
                    quit = true;
                    break;
                }
                Some(action) => session.apply(action, dt),
                None => {}
            }
        }
        if quit {
            break;
        }

        render_frame(session, world, &mut frame);
        let bytes = frame.encoder.encode_swap(&mut frame.fb)?;
        if !bytes.is_empty() {
            writer.write_all(bytes).await?;
        }
    }

    if let Err(e) = write_exit(writer, &mut frame.encoder).await {
        warn!(session = %session.id(), error = %e, "failed to restore client terminal");
    }
    Ok(())
}

async fn write_exit(writer: &mut OwnedWriteHalf, encoder: &mut FrameEncoder) -> Result<()> {
    writer.write_all(encoder.exit()?).await?;
    writer.flush().await?;
    Ok(())
}

fn render_frame(session: &Session, world: &World, frame: &mut FrameState) {
    let player = session.player();
    world.snapshot_into(session.id(), &mut frame.snapshot);

    let snap = &frame.snapshot;
    frame.actors.clear();
    frame.actors.extend(
        snap.players
            .iter()
            .map(|&p| Actor::new(p, SpriteKind::Player)),
    );
    frame.actors.extend(
        snap.agents
            .iter()
            .map(|a| Actor::new(a.position, SpriteKind::Agent)),
    );

    frame.raycaster.render(
        &player,
        world.grid(),
        &snap.lights,
        &snap.projectiles,
        &frame.actors,
        &mut frame.fb,
    );

    let status = HudStatus {
        players: snap.player_count,
        max_players: world.max_players(),
        projectiles: snap.projectiles.len(),
        agents: snap.agents.len(),
        position: player.position,
    };
    frame.hud.render_into(&status, &mut frame.fb);
}
