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

//! Error types for option payload decoding.
//!
//! The decode loop itself never fails: malformed command sequences are logged
//! and skipped. These errors only describe payloads an option handler could not
//! interpret.

use thiserror::Error;

/// Result type for protocol operations
pub type ProtocolResult<T> = Result<T, ProtocolError>;

/// Protocol error types
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProtocolError {
    /// A sub-negotiation payload could not be decoded.
    #[error("Subnegotiation error for option {option}: {reason}")]
    Subnegotiation {
        /// The option being sub-negotiated
        option: u8,
        /// Specific reason for the failure
        reason: SubnegotiationErrorKind,
    },
}

impl ProtocolError {
    /// Shorthand for a payload that is shorter than its fixed format.
    #[must_use]
    pub fn insufficient_data(option: u8, required: usize, available: usize) -> ProtocolError {
        ProtocolError::Subnegotiation {
            option,
            reason: SubnegotiationErrorKind::InsufficientData {
                required,
                available,
            },
        }
    }

    /// Option the error refers to.
    #[must_use]
    pub fn option(&self) -> u8 {
        match self {
            ProtocolError::Subnegotiation { option, .. } => *option,
        }
    }
}

/// Specific kinds of sub-negotiation errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubnegotiationErrorKind {
    /// Fewer bytes than the format requires.
    #[error("insufficient data (required: {required}, available: {available})")]
    InsufficientData {
        /// Number of bytes required
        required: usize,
        /// Number of bytes available
        available: usize,
    },

    /// Bytes present where the format allows none.
    #[error("unexpected data: {reason}")]
    UnexpectedData {
        /// Why the data is unexpected
        reason: String,
    },

    /// An unrecognized verb byte.
    #[error("invalid command: {command:#04X}")]
    InvalidCommand {
        /// The offending byte
        command: u8,
    },

    /// Anything else.
    #[error("{description}")]
    Other {
        /// Description of the error
        description: String,
    },
}
