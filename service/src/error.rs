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

//! Error types for the session transport

use thiserror::Error;

/// Result type for transport operations
pub type Result<T> = std::result::Result<T, TelnetError>;

/// Transport error types
#[derive(Debug, Error)]
pub enum TelnetError {
    /// I/O error from the underlying stream
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The session has already shut down
    #[error("Connection closed")]
    ConnectionClosed,

    /// Connecting or writing took longer than configured
    #[error("Operation timed out")]
    Timeout,

    /// The driver is no longer accepting control messages
    #[error("Control channel closed")]
    ControlChannelClosed,
}

impl TelnetError {
    /// Check if the error is recoverable
    ///
    /// Recoverable errors leave the caller free to open a new connection and
    /// try again.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            TelnetError::Timeout | TelnetError::ConnectionClosed | TelnetError::Io(_)
        )
    }

    /// Check if the error came from the transport itself
    pub fn is_connection_error(&self) -> bool {
        matches!(self, TelnetError::ConnectionClosed | TelnetError::Io(_))
    }
}
