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

//! Connection configuration
//!
//! # Examples
//!
//! ```
//! use telwire_service::ConnectionConfig;
//! use std::time::Duration;
//!
//! let config = ConnectionConfig::client()
//!     .with_connect_timeout(Duration::from_secs(5))
//!     .with_write_timeout(Duration::from_secs(10));
//! assert!(!config.session.drain_before_read);
//! ```

use std::time::Duration;
use telwire_protocol::SessionConfig;

/// Transport settings for one session.
#[derive(Debug, Clone)]
pub struct ConnectionConfig {
    /// Protocol settings handed to the session
    pub session: SessionConfig,

    /// Maximum time to establish an outgoing connection
    pub connect_timeout: Duration,

    /// Maximum time a single write may block
    pub write_timeout: Duration,

    /// Control channel buffer size
    pub control_buffer_size: usize,
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            session: SessionConfig::default(),
            connect_timeout: Duration::from_secs(10),
            write_timeout: Duration::from_secs(30),
            control_buffer_size: 100,
        }
    }
}

impl ConnectionConfig {
    /// Defaults for the connecting side.
    pub fn client() -> Self {
        Self::default().with_session(SessionConfig::client())
    }

    /// Defaults for the accepting side.
    pub fn server() -> Self {
        Self::default().with_session(SessionConfig::server())
    }

    /// Set the protocol settings
    pub fn with_session(mut self, session: SessionConfig) -> Self {
        self.session = session;
        self
    }

    /// Set the connection timeout
    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Set the write timeout
    pub fn with_write_timeout(mut self, timeout: Duration) -> Self {
        self.write_timeout = timeout;
        self
    }

    /// Set the control channel buffer size (at least 1)
    pub fn with_control_buffer_size(mut self, size: usize) -> Self {
        self.control_buffer_size = size.max(1);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use telwire_protocol::SessionMode;

    #[test]
    fn test_default_is_server() {
        let config = ConnectionConfig::default();
        assert_eq!(config.session.mode, SessionMode::Server);
        assert!(config.session.drain_before_read);
        assert_eq!(config.control_buffer_size, 100);
    }

    #[test]
    fn test_client_and_server() {
        assert_eq!(ConnectionConfig::client().session.mode, SessionMode::Client);
        assert_eq!(ConnectionConfig::server().session.mode, SessionMode::Server);
    }

    #[test]
    fn test_builders() {
        let config = ConnectionConfig::server()
            .with_connect_timeout(Duration::from_millis(250))
            .with_write_timeout(Duration::from_secs(1))
            .with_control_buffer_size(0)
            .with_session(SessionConfig::server().with_input_buffer_size(512));
        assert_eq!(config.connect_timeout, Duration::from_millis(250));
        assert_eq!(config.write_timeout, Duration::from_secs(1));
        assert_eq!(config.control_buffer_size, 1);
        assert_eq!(config.session.input_buffer_size, 512);
    }
}
