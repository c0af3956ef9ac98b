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

use crate::{ConnectionId, ConnectionState, ControlMessage, Result, TelnetError};
use bytes::Bytes;
use std::sync::Arc;
use std::sync::atomic::{AtomicU8, Ordering};
use telwire_protocol::{Session, TelnetCommand};
use tokio::sync::{mpsc, oneshot};

/// Cloneable handle to a running [`SessionDriver`](crate::SessionDriver).
///
/// Dropping every handle does not stop the session; it keeps serving the peer
/// until either side closes the connection.
#[derive(Debug, Clone)]
pub struct ConnectionHandle {
    id: ConnectionId,
    control_tx: mpsc::Sender<ControlMessage>,
    state: Arc<AtomicU8>,
}

impl ConnectionHandle {
    pub(crate) fn new(
        id: ConnectionId,
        control_tx: mpsc::Sender<ControlMessage>,
        state: Arc<AtomicU8>,
    ) -> Self {
        Self {
            id,
            control_tx,
            state,
        }
    }

    /// Get the session ID
    pub fn id(&self) -> ConnectionId {
        self.id
    }

    /// Get the driver's current state
    pub fn state(&self) -> ConnectionState {
        ConnectionState::from_u8(self.state.load(Ordering::Acquire))
    }

    /// True once the driver has stopped accepting control messages
    pub fn is_closed(&self) -> bool {
        self.control_tx.is_closed()
    }

    /// Send a raw control message
    pub async fn send(&self, msg: ControlMessage) -> Result<()> {
        self.control_tx
            .send(msg)
            .await
            .map_err(|_| TelnetError::ControlChannelClosed)
    }

    /// Queue application data; `IAC` bytes are escaped by the session
    pub async fn write(&self, data: impl Into<Bytes>) -> Result<()> {
        self.send(ControlMessage::Write(data.into())).await
    }

    /// Queue a simple command
    pub async fn send_command(&self, command: TelnetCommand) -> Result<()> {
        self.send(ControlMessage::Command(command)).await
    }

    /// Run `f` against the session on the driver task
    pub async fn with_session<F>(&self, f: F) -> Result<()>
    where
        F: FnOnce(&mut Session) + Send + 'static,
    {
        self.send(ControlMessage::WithSession(Box::new(f))).await
    }

    /// Run `f` against the session and wait for its result
    pub async fn query<F, R>(&self, f: F) -> Result<R>
    where
        F: FnOnce(&mut Session) -> R + Send + 'static,
        R: Send + 'static,
    {
        let (tx, rx) = oneshot::channel();
        self.with_session(move |session| {
            // The receiver only disappears if the caller stopped waiting.
            let _ = tx.send(f(session));
        })
        .await?;
        rx.await.map_err(|_| TelnetError::ConnectionClosed)
    }

    /// Flush pending output and close the connection
    pub async fn close(&self) -> Result<()> {
        self.send(ControlMessage::Close).await
    }
}
