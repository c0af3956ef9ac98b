//
// Copyright 2017-2026 Hans W. Uhlig. All Rights Reserved.
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//      http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//

//! Session driver
//!
//! The SessionDriver owns one stream and one [`TelnetSession`] and moves bytes
//! between them:
//! - Socket reads are fed to the session as they arrive
//! - Queued output is written in FIFO order, one chunk at a time
//! - Control messages from [`ConnectionHandle`]s are applied between I/O steps
//! - Reads pause while output is pending if the session drains before reading

use crate::{ConnectionConfig, ConnectionHandle, ConnectionId, ConnectionState, Result, TelnetError};
use bytes::Bytes;
use metrics::{counter, gauge};
use std::fmt;
use std::io;
use std::sync::Arc;
use std::sync::atomic::{AtomicU8, Ordering};
use telwire_protocol::{Session, TelnetCommand, TelnetSession};
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt, ReadHalf, WriteHalf};
use tokio::select;
use tokio::sync::mpsc;
use tokio::time::timeout;
use tracing::{debug, error, info, instrument, trace};

/// Control messages for the driver
pub enum ControlMessage {
    /// Queue application data
    Write(Bytes),
    /// Queue a simple command such as `IAC AYT`
    Command(TelnetCommand),
    /// Run a closure against the session between I/O steps
    WithSession(Box<dyn FnOnce(&mut Session) + Send>),
    /// Flush pending output and close the connection
    Close,
}

impl fmt::Debug for ControlMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ControlMessage::Write(data) => f.debug_tuple("Write").field(&data.len()).finish(),
            ControlMessage::Command(command) => f.debug_tuple("Command").field(command).finish(),
            ControlMessage::WithSession(_) => f.write_str("WithSession(..)"),
            ControlMessage::Close => f.write_str("Close"),
        }
    }
}

/// Drives one TELNET session over a byte stream
pub struct SessionDriver<S> {
    /// Session ID
    id: ConnectionId,
    /// Read side of the stream
    reader: ReadHalf<S>,
    /// Write side of the stream
    writer: WriteHalf<S>,
    /// Protocol state
    telnet: TelnetSession,
    /// Configuration
    config: ConnectionConfig,
    /// Current state (atomic for lock-free access)
    state: Arc<AtomicU8>,
    /// Control message receiver
    control_rx: mpsc::Receiver<ControlMessage>,
}

impl<S> SessionDriver<S>
where
    S: AsyncRead + AsyncWrite + Send + 'static,
{
    /// Create a driver and the handle that controls it
    pub fn new(
        stream: S,
        telnet: TelnetSession,
        config: ConnectionConfig,
    ) -> (Self, ConnectionHandle) {
        let id = ConnectionId::next();
        let (control_tx, control_rx) = mpsc::channel(config.control_buffer_size.max(1));
        let state = Arc::new(AtomicU8::new(ConnectionState::Connecting.as_u8()));
        let (reader, writer) = tokio::io::split(stream);

        let driver = Self {
            id,
            reader,
            writer,
            telnet,
            config,
            state: state.clone(),
            control_rx,
        };

        (driver, ConnectionHandle::new(id, control_tx, state))
    }

    /// Get the session ID
    pub fn id(&self) -> ConnectionId {
        self.id
    }

    /// Get the current state
    pub fn state(&self) -> ConnectionState {
        ConnectionState::from_u8(self.state.load(Ordering::Acquire))
    }

    fn set_state(&self, new_state: ConnectionState) {
        self.state.store(new_state.as_u8(), Ordering::Release);
    }

    /// Run the session until the peer closes it, a handle closes it, or an error occurs.
    ///
    /// I/O errors are reported to the session listener and returned unchanged.
    #[instrument(skip(self), fields(session_id = %self.id))]
    pub async fn run(mut self) -> Result<()> {
        gauge!("telwire.sessions.active").increment(1.0);
        self.set_state(ConnectionState::Active);
        self.telnet.connected();

        let result = self.event_loop().await;

        match &result {
            Ok(()) => {}
            Err(TelnetError::Io(e)) => {
                error!(error = %e, "Session failed");
                self.telnet.connection_failed(e);
            }
            Err(TelnetError::Timeout) => {
                error!("Write timed out");
                let e = io::Error::new(io::ErrorKind::TimedOut, "write timed out");
                self.telnet.connection_failed(&e);
            }
            Err(e) => error!(error = %e, "Session ended"),
        }

        self.cleanup().await;
        result
    }

    /// Main event processing loop
    async fn event_loop(&mut self) -> Result<()> {
        let mut buffer = vec![0u8; self.telnet.config().input_buffer_size.max(1)];
        let mut control_open = true;

        loop {
            // Cheap clone; the chunk stays queued until the write completes.
            let chunk = self.telnet.front_output().cloned().unwrap_or_default();
            let may_read = self.telnet.may_read();

            select! {
                biased;

                msg = self.control_rx.recv(), if control_open => {
                    match msg {
                        Some(ControlMessage::Close) => {
                            debug!("Close requested");
                            self.flush().await?;
                            self.telnet.connection_closed();
                            return Ok(());
                        }
                        Some(msg) => self.apply(msg),
                        None => {
                            // Every handle is gone; keep serving the peer.
                            debug!("Control channel closed");
                            control_open = false;
                        }
                    }
                }

                written = timeout(self.config.write_timeout, self.writer.write(&chunk)), if !chunk.is_empty() => {
                    match written {
                        Ok(Ok(0)) => return Err(io::Error::from(io::ErrorKind::WriteZero).into()),
                        Ok(Ok(n)) => {
                            trace!(bytes = n, "Wrote output");
                            counter!("telwire.bytes.sent").increment(n as u64);
                            self.telnet.advance_output(n);
                        }
                        Ok(Err(e)) => return Err(e.into()),
                        Err(_) => return Err(TelnetError::Timeout),
                    }
                }

                read = self.reader.read(&mut buffer), if may_read => {
                    match read {
                        Ok(0) => {
                            info!("Peer closed the connection");
                            self.telnet.connection_closed();
                            return Ok(());
                        }
                        Ok(n) => {
                            trace!(bytes = n, "Read input");
                            counter!("telwire.bytes.received").increment(n as u64);
                            self.telnet.receive(&buffer[..n]);
                        }
                        Err(e) => return Err(e.into()),
                    }
                }

                else => return Ok(()),
            }
        }
    }

    fn apply(&mut self, msg: ControlMessage) {
        trace!(message = ?msg, "Control message");
        let session = self.telnet.session_mut();
        match msg {
            ControlMessage::Write(data) => session.write(&data),
            ControlMessage::Command(command) => session.send_command(command),
            ControlMessage::WithSession(f) => f(session),
            ControlMessage::Close => {}
        }
    }

    /// Write everything queued so far
    async fn flush(&mut self) -> Result<()> {
        self.set_state(ConnectionState::Closing);
        while let Some(chunk) = self.telnet.front_output().cloned() {
            match timeout(self.config.write_timeout, self.writer.write_all(&chunk)).await {
                Ok(Ok(())) => {
                    counter!("telwire.bytes.sent").increment(chunk.len() as u64);
                    self.telnet.advance_output(chunk.len());
                }
                Ok(Err(e)) => return Err(e.into()),
                Err(_) => return Err(TelnetError::Timeout),
            }
        }
        Ok(())
    }

    /// Cleanup resources
    async fn cleanup(&mut self) {
        self.set_state(ConnectionState::Closing);
        if let Err(e) = self.writer.shutdown().await {
            debug!(error = %e, "Shutdown failed");
        }
        while self.control_rx.try_recv().is_ok() {}
        self.control_rx.close();
        gauge!("telwire.sessions.active").decrement(1.0);
        self.set_state(ConnectionState::Closed);
    }
}

impl<S> fmt::Debug for SessionDriver<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionDriver")
            .field("id", &self.id)
            .field("state", &ConnectionState::from_u8(self.state.load(Ordering::Acquire)))
            .field("telnet", &self.telnet)
            .finish_non_exhaustive()
    }
}
