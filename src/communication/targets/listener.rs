//! Background target listener
//!
//! One background thread per vehicle owns a TCP listening socket and feeds a
//! bounded channel consumed by the control loop.
//!
//! # Thread discipline
//!
//! - The listener polls for pending connections on a short fixed interval
//!   instead of blocking in accept, so a stop request is honored within one
//!   interval.
//! - One connection is served at a time: a single read of up to
//!   [`MAX_MESSAGE_LEN`] bytes, decoded as UTF-8 (lossily) and pushed into
//!   the channel as a raw string.
//! - The control thread drains the whole inbox once per tick via
//!   [`TargetInbox::drain`]; directives are applied in exact arrival order.
//!
//! # Failure semantics
//!
//! Socket errors while listening are logged and terminate the listener
//! thread; the vehicle keeps flying on whatever targets it already has.
//! There is no automatic restart and no redelivery; the sender resends if
//! it cares. A full queue drops the message with a warning.
//!
//! # Shutdown
//!
//! [`TargetListener::shutdown`] flips an atomic flag and returns immediately;
//! the thread notices within one poll interval and drops the listening
//! socket on its way out. Dropping the handle additionally joins the thread,
//! bounded by the poll interval plus the per-connection read timeout.

use std::io::{self, Read};
use std::net::{SocketAddr, TcpListener, TcpStream};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, SyncSender, TrySendError};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

/// Largest accepted message [bytes]
pub const MAX_MESSAGE_LEN: usize = 1024;

/// Bounded queue depth between listener and control thread
pub const QUEUE_CAPACITY: usize = 32;

/// Listener configuration
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ListenerConfig {
    /// Address to listen on
    pub bind_addr: String,
    /// Accept-poll interval
    pub poll_interval: Duration,
    /// Per-connection read timeout; bounds shutdown latency against stalled
    /// senders
    pub read_timeout: Duration,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_addr: String::from("0.0.0.0:11000"),
            poll_interval: Duration::from_millis(10),
            read_timeout: Duration::from_millis(250),
        }
    }
}

/// Consumer end of the target queue
pub struct TargetInbox {
    receiver: Receiver<String>,
}

impl TargetInbox {
    /// Drain every queued message, in FIFO order
    ///
    /// Never blocks: yields only messages already queued at call time, so the
    /// critical section per message is the channel's own.
    pub fn drain(&self) -> impl Iterator<Item = String> + '_ {
        self.receiver.try_iter()
    }
}

/// Handle to the background listener thread
pub struct TargetListener {
    stop: Arc<AtomicBool>,
    local_addr: SocketAddr,
    handle: Option<JoinHandle<()>>,
}

impl TargetListener {
    /// Bind the socket and spawn the listener thread
    ///
    /// Fails only on bind/spawn; once running, the listener never propagates
    /// errors to the control loop.
    pub fn spawn(config: ListenerConfig) -> io::Result<(TargetListener, TargetInbox)> {
        let listener = TcpListener::bind(&config.bind_addr)?;
        listener.set_nonblocking(true)?;
        let local_addr = listener.local_addr()?;

        let stop = Arc::new(AtomicBool::new(false));
        let (sender, receiver) = mpsc::sync_channel(QUEUE_CAPACITY);

        let thread_stop = stop.clone();
        let handle = thread::Builder::new()
            .name("target-listener".into())
            .spawn(move || listen_loop(listener, sender, thread_stop, config))?;

        log::info!("listening for target messages on {}", local_addr);
        Ok((
            TargetListener {
                stop,
                local_addr,
                handle: Some(handle),
            },
            TargetInbox { receiver },
        ))
    }

    /// Actual bound address (useful with an ephemeral port)
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Signal the listener to stop; returns immediately
    pub fn shutdown(&self) {
        self.stop.store(true, Ordering::Release);
    }
}

impl Drop for TargetListener {
    fn drop(&mut self) {
        self.shutdown();
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

fn listen_loop(
    listener: TcpListener,
    sender: SyncSender<String>,
    stop: Arc<AtomicBool>,
    config: ListenerConfig,
) {
    while !stop.load(Ordering::Acquire) {
        match listener.accept() {
            Ok((stream, peer)) => match read_message(stream, &config) {
                Ok(Some(message)) => {
                    log::debug!("received {:?} from {}", message, peer);
                    match sender.try_send(message) {
                        Ok(()) => {}
                        Err(TrySendError::Full(_)) => {
                            log::warn!("target queue full; dropping message from {}", peer);
                        }
                        // Consumer gone: the vehicle is shutting down.
                        Err(TrySendError::Disconnected(_)) => return,
                    }
                }
                Ok(None) => {}
                Err(e) => {
                    log::error!("target listener: connection error: {}", e);
                    return;
                }
            },
            Err(e) if e.kind() == io::ErrorKind::WouldBlock => {
                thread::sleep(config.poll_interval);
            }
            Err(e) => {
                log::error!("target listener: socket error: {}", e);
                return;
            }
        }
    }
    // Listening socket is dropped here, on every exit path.
}

/// Single bounded read from an accepted connection
fn read_message(mut stream: TcpStream, config: &ListenerConfig) -> io::Result<Option<String>> {
    // The accepted stream inherits non-blocking mode on some platforms.
    stream.set_nonblocking(false)?;
    stream.set_read_timeout(Some(config.read_timeout))?;

    let mut buffer = [0u8; MAX_MESSAGE_LEN];
    let read = stream.read(&mut buffer)?;
    if read == 0 {
        return Ok(None);
    }
    Ok(Some(String::from_utf8_lossy(&buffer[..read]).into_owned()))
}
