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

use crate::consts::option::TTYPE;
use crate::consts::ttype;
use crate::listener::{OptionStateListener, SubNegotiationHandler};
use crate::result::{ProtocolError, SubnegotiationErrorKind};
use crate::session::Session;
use std::fmt;
use tracing::{debug, warn};

/// Longest terminal name sent or accepted.
pub const MAX_NAME_LEN: usize = 40;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum Parse {
    Initial,
    Is,
    SentNext,
    Error,
}

/// Exchanges terminal type names.
///
/// Locally, answers each `SEND` with the next name from a configured list. When
/// the list is exhausted the last name is sent a second time, which tells the
/// peer it has seen every name, and the next `SEND` starts over. Remotely,
/// requests names with [`TerminalType::request_next`] and reports every `IS`.
pub struct TerminalType {
    names: Vec<Vec<u8>>,
    position: usize,
    parse: Parse,
    incoming: Vec<u8>,
    remote: Option<String>,
    reported: Option<Box<dyn FnMut(&str) + Send>>,
}

impl fmt::Debug for TerminalType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TerminalType")
            .field("names", &self.names.len())
            .field("position", &self.position)
            .field("remote", &self.remote)
            .finish_non_exhaustive()
    }
}

impl Default for TerminalType {
    fn default() -> Self {
        TerminalType::new()
    }
}

impl TerminalType {
    /// Create a handler that reports itself as `dumb`.
    #[must_use]
    pub fn new() -> TerminalType {
        TerminalType {
            names: vec![b"dumb".to_vec()],
            position: 0,
            parse: Parse::Initial,
            incoming: Vec::with_capacity(MAX_NAME_LEN),
            remote: None,
            reported: None,
        }
    }

    /// Names to offer, most preferred first. Each is cut to 40 bytes.
    ///
    /// An empty list keeps the current names.
    #[must_use]
    pub fn with_names<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let names: Vec<Vec<u8>> = names
            .into_iter()
            .map(|name| {
                let bytes = name.as_ref().as_bytes();
                bytes[..bytes.len().min(MAX_NAME_LEN)].to_vec()
            })
            .collect();
        if !names.is_empty() {
            self.names = names;
            self.position = 0;
        }
        self
    }

    /// Callback for names reported by the peer.
    #[must_use]
    pub fn on_reported<F>(mut self, callback: F) -> Self
    where
        F: FnMut(&str) + Send + 'static,
    {
        self.reported = Some(Box::new(callback));
        self
    }

    /// Install into `session` as the handler for option 24.
    pub fn attach(self, session: &mut Session) {
        session.option(TTYPE).install(self);
    }

    /// Last name the peer reported.
    #[must_use]
    pub fn remote_terminal_type(&self) -> Option<&str> {
        self.remote.as_deref()
    }

    /// Let the peer ask for our terminal type.
    pub fn allow_local(session: &mut Session) {
        session.option(TTYPE).allow_local();
    }

    /// Ask the peer to send its terminal type.
    pub fn request_remote_enable(session: &mut Session) {
        session.option(TTYPE).request_remote_enable();
    }

    /// Ask the peer for its next terminal type, if it agreed to send them.
    ///
    /// Returns whether a request was sent.
    pub fn request_next(session: &mut Session) -> bool {
        if !session.is_enabled_remotely(TTYPE) {
            return false;
        }
        session.send_subnegotiation(TTYPE, &[ttype::SEND]);
        true
    }

    fn send_next(&mut self, session: &mut Session) {
        let index = if self.position < self.names.len() {
            self.position += 1;
            self.position - 1
        } else {
            self.position = 0;
            self.names.len() - 1
        };
        let name = &self.names[index];
        debug!("Sending terminal type {}", String::from_utf8_lossy(name));
        let mut payload = Vec::with_capacity(name.len() + 1);
        payload.push(ttype::IS);
        payload.extend_from_slice(name);
        session.send_subnegotiation(TTYPE, &payload);
    }

    fn reject(&mut self, error: &ProtocolError) {
        warn!("Ignoring terminal type subnegotiation: {}", error);
        self.parse = Parse::Error;
    }
}

impl OptionStateListener for TerminalType {}

impl SubNegotiationHandler for TerminalType {
    fn start_subnegotiation(&mut self, _session: &mut Session) {
        self.parse = Parse::Initial;
        self.incoming.clear();
    }

    fn subnegotiation_data(&mut self, data: &[u8], session: &mut Session) {
        let mut data = data;
        if self.parse == Parse::Initial {
            let Some((&verb, rest)) = data.split_first() else {
                return;
            };
            data = rest;
            match verb {
                ttype::IS => self.parse = Parse::Is,
                ttype::SEND if session.is_enabled_locally(TTYPE) => {
                    self.parse = Parse::SentNext;
                    self.send_next(session);
                }
                ttype::SEND => {
                    debug!("Ignoring terminal type SEND while the option is disabled locally");
                    self.parse = Parse::Error;
                }
                command => {
                    self.reject(&ProtocolError::Subnegotiation {
                        option: TTYPE,
                        reason: SubnegotiationErrorKind::InvalidCommand { command },
                    });
                }
            }
        }
        match self.parse {
            Parse::Is => {
                let room = MAX_NAME_LEN - self.incoming.len();
                self.incoming.extend_from_slice(&data[..data.len().min(room)]);
            }
            Parse::SentNext if !data.is_empty() => {
                self.reject(&ProtocolError::Subnegotiation {
                    option: TTYPE,
                    reason: SubnegotiationErrorKind::UnexpectedData {
                        reason: format!("{} bytes after SEND", data.len()),
                    },
                });
            }
            _ => {}
        }
    }

    fn end_subnegotiation(&mut self, _session: &mut Session) {
        if self.parse == Parse::Is {
            // Some clients terminate the name with a NUL.
            let raw = self.incoming.strip_suffix(b"\0").unwrap_or(&self.incoming[..]);
            let name = String::from_utf8_lossy(raw).into_owned();
            debug!("Peer reported terminal type {}", name);
            if let Some(reported) = self.reported.as_mut() {
                reported(&name);
            }
            self.remote = Some(name);
        }
        self.parse = Parse::Initial;
        self.incoming.clear();
    }
}
