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

//! Session starters
//!
//! A [`SessionStarter`] turns a stream (or an address to connect to) into a
//! running [`SessionDriver`] on the current tokio runtime.

use crate::{ConnectionConfig, ConnectionHandle, Result, SessionDriver, TelnetError};
use std::io;
use telwire_protocol::{Session, SessionListener, TelnetSession};
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::net::{TcpStream, ToSocketAddrs};
use tokio::task::JoinHandle;
use tokio::time::timeout;
use tracing::{info, warn};

/// Handle to a spawned session and the task driving it
pub type StartedSession = (ConnectionHandle, JoinHandle<Result<()>>);

/// Spawns session drivers with a shared configuration
#[derive(Debug, Clone, Default)]
pub struct SessionStarter {
    config: ConnectionConfig,
}

impl SessionStarter {
    /// Starter for the connecting side (reads and writes concurrently)
    pub fn client() -> Self {
        Self::with_config(ConnectionConfig::client())
    }

    /// Starter for the accepting side (drains output before reading)
    pub fn server() -> Self {
        Self::with_config(ConnectionConfig::server())
    }

    /// Starter with explicit settings
    pub fn with_config(config: ConnectionConfig) -> Self {
        Self { config }
    }

    /// Get the configuration
    pub fn config(&self) -> &ConnectionConfig {
        &self.config
    }

    /// Run a fresh session over `stream`
    pub fn start<S, L>(&self, stream: S, listener: L) -> StartedSession
    where
        S: AsyncRead + AsyncWrite + Send + 'static,
        L: SessionListener + 'static,
    {
        self.start_session(stream, Session::new(), listener)
    }

    /// Run a pre-configured session over `stream`
    ///
    /// Options allowed or requested on `session` beforehand are in effect
    /// from the first byte read, and any requests it queued are sent first.
    pub fn start_session<S, L>(&self, stream: S, session: Session, listener: L) -> StartedSession
    where
        S: AsyncRead + AsyncWrite + Send + 'static,
        L: SessionListener + 'static,
    {
        let telnet = TelnetSession::with_session(self.config.session.clone(), session, listener);
        self.spawn(stream, telnet)
    }

    /// Connect to `addr` and run a fresh session over the connection
    pub async fn connect<A, L>(&self, addr: A, listener: L) -> Result<StartedSession>
    where
        A: ToSocketAddrs,
        L: SessionListener + 'static,
    {
        self.connect_session(addr, Session::new(), listener).await
    }

    /// Connect to `addr` and run a pre-configured session over the connection
    ///
    /// Connection failures, including timeouts, are reported to the listener
    /// before they are returned.
    pub async fn connect_session<A, L>(
        &self,
        addr: A,
        session: Session,
        listener: L,
    ) -> Result<StartedSession>
    where
        A: ToSocketAddrs,
        L: SessionListener + 'static,
    {
        let mut telnet =
            TelnetSession::with_session(self.config.session.clone(), session, listener);
        telnet.connecting();

        match timeout(self.config.connect_timeout, TcpStream::connect(addr)).await {
            Ok(Ok(stream)) => {
                if let Err(e) = stream.set_nodelay(true) {
                    warn!(error = %e, "Failed to set TCP_NODELAY");
                }
                if let Ok(peer_addr) = stream.peer_addr() {
                    info!(peer_addr = %peer_addr, "Connected");
                }
                Ok(self.spawn(stream, telnet))
            }
            Ok(Err(e)) => {
                telnet.connection_failed(&e);
                Err(e.into())
            }
            Err(_) => {
                let e = io::Error::new(io::ErrorKind::TimedOut, "connect timed out");
                telnet.connection_failed(&e);
                Err(TelnetError::Timeout)
            }
        }
    }

    fn spawn<S>(&self, stream: S, telnet: TelnetSession) -> StartedSession
    where
        S: AsyncRead + AsyncWrite + Send + 'static,
    {
        let (driver, handle) = SessionDriver::new(stream, telnet, self.config.clone());
        let task = tokio::spawn(driver.run());
        (handle, task)
    }
}
