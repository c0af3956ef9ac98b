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

//! Telwire Session Transport
//!
//! This crate runs [`telwire_protocol::TelnetSession`]s over tokio streams:
//!
//! - Socket reads are fed to the protocol engine as they arrive
//! - Replies and application output are written in the order they were queued
//! - Servers stop reading while replies are unsent; clients read and write concurrently
//! - Sessions are controlled from other tasks through cloneable handles
//!
//! # Architecture
//!
//! ```text
//! SessionStarter
//!     ↓
//! SessionDriver ← ConnectionHandle
//!     ↓
//! TelnetSession → SessionListener
//! ```
//!
//! # Example
//!
//! ```no_run
//! use telwire_protocol::{Session, SessionListener};
//! use telwire_service::SessionStarter;
//! use tokio::net::TcpListener;
//!
//! struct Echo;
//!
//! impl SessionListener for Echo {
//!     fn incoming_data(&mut self, data: &[u8], session: &mut Session) {
//!         session.write(data);
//!     }
//! }
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let listener = TcpListener::bind("127.0.0.1:2323").await?;
//!     let starter = SessionStarter::server();
//!     loop {
//!         let (stream, _) = listener.accept().await?;
//!         starter.start(stream, Echo);
//!     }
//! }
//! ```

mod config;
mod driver;
mod error;
mod handle;
mod starter;
mod types;

pub use config::ConnectionConfig;
pub use driver::{ControlMessage, SessionDriver};
pub use error::{Result, TelnetError};
pub use handle::ConnectionHandle;
pub use starter::{SessionStarter, StartedSession};
pub use types::{ConnectionId, ConnectionState};
