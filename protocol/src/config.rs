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

//! Session configuration
//!
//! ```
//! use telwire_protocol::{SessionConfig, SessionMode};
//!
//! let config = SessionConfig::client().with_input_buffer_size(4096);
//! assert_eq!(config.mode, SessionMode::Client);
//! assert!(!config.drain_before_read);
//! ```

use std::fmt;

/// Default size of the transport read buffer.
pub const DEFAULT_INPUT_BUFFER_SIZE: usize = 2048;

/// Which side of the connection a session runs on.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum SessionMode {
    /// We initiated the connection.
    Client,
    /// The peer initiated the connection.
    Server,
}

impl fmt::Display for SessionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionMode::Client => f.write_str("client"),
            SessionMode::Server => f.write_str("server"),
        }
    }
}

/// Per-session settings shared by the protocol engine and its transport.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SessionConfig {
    /// Client or server.
    pub mode: SessionMode,

    /// Bytes requested from the transport per read.
    pub input_buffer_size: usize,

    /// Stop reading while replies from earlier input are still unsent.
    ///
    /// Servers keep this on so a peer cannot grow the output queue without
    /// bound by sending requests faster than it reads the replies.
    pub drain_before_read: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        SessionConfig::server()
    }
}

impl SessionConfig {
    /// Client defaults: read and write concurrently.
    #[must_use]
    pub fn client() -> SessionConfig {
        SessionConfig {
            mode: SessionMode::Client,
            input_buffer_size: DEFAULT_INPUT_BUFFER_SIZE,
            drain_before_read: false,
        }
    }

    /// Server defaults: drain output before reading more input.
    #[must_use]
    pub fn server() -> SessionConfig {
        SessionConfig {
            mode: SessionMode::Server,
            input_buffer_size: DEFAULT_INPUT_BUFFER_SIZE,
            drain_before_read: true,
        }
    }

    /// Set the read buffer size. Zero is raised to one byte.
    #[must_use]
    pub fn with_input_buffer_size(mut self, size: usize) -> Self {
        self.input_buffer_size = size.max(1);
        self
    }

    /// Enable or disable drain-before-read.
    #[must_use]
    pub fn with_drain_before_read(mut self, enabled: bool) -> Self {
        self.drain_before_read = enabled;
        self
    }
}
