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

//! Core types shared by the driver and its handles

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// Identifier of one driven session (monotonically increasing, never reused)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ConnectionId(u64);

impl ConnectionId {
    /// Create a connection ID
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    /// Allocate the next process-wide ID
    pub fn next() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(1);
        Self(NEXT.fetch_add(1, Ordering::Relaxed))
    }

    /// Get the underlying u64 value
    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "session-{}", self.0)
    }
}

/// Driver state (stored as atomic u8 so handles can read it without locking)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ConnectionState {
    /// Driver created, not yet running
    Connecting = 0,
    /// Reading and writing
    Active = 1,
    /// Flushing output before shutdown
    Closing = 2,
    /// Driver has returned
    Closed = 3,
}

impl ConnectionState {
    /// Convert from u8 (for atomic operations)
    pub fn from_u8(value: u8) -> Self {
        match value {
            0 => Self::Connecting,
            1 => Self::Active,
            2 => Self::Closing,
            _ => Self::Closed,
        }
    }

    /// Convert to u8 (for atomic operations)
    pub fn as_u8(self) -> u8 {
        self as u8
    }

    /// Check if the session is shutting down or gone
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Closing | Self::Closed)
    }
}

impl fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Connecting => write!(f, "connecting"),
            Self::Active => write!(f, "active"),
            Self::Closing => write!(f, "closing"),
            Self::Closed => write!(f, "closed"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_connection_id() {
        let first = ConnectionId::next();
        let second = ConnectionId::next();
        assert!(first < second);
        assert_eq!(ConnectionId::new(7).to_string(), "session-7");
    }

    #[test]
    fn test_connection_state_conversion() {
        for state in [
            ConnectionState::Connecting,
            ConnectionState::Active,
            ConnectionState::Closing,
            ConnectionState::Closed,
        ] {
            assert_eq!(ConnectionState::from_u8(state.as_u8()), state);
        }
        assert_eq!(ConnectionState::from_u8(200), ConnectionState::Closed);
    }

    #[test]
    fn test_connection_state_terminal() {
        assert!(!ConnectionState::Connecting.is_terminal());
        assert!(!ConnectionState::Active.is_terminal());
        assert!(ConnectionState::Closing.is_terminal());
        assert!(ConnectionState::Closed.is_terminal());
    }
}
