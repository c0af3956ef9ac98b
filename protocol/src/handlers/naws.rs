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

use crate::consts::option::NAWS;
use crate::listener::{OptionStateListener, SubNegotiationHandler};
use crate::result::{ProtocolError, ProtocolResult, SubnegotiationErrorKind};
use crate::session::Session;
use byteorder::{BigEndian, ByteOrder};
use std::fmt;
use tracing::{debug, warn};

/// Terminal window dimensions carried by NAWS.
///
/// # Format
/// Four bytes: columns then rows, each a big-endian `u16`. Either value may be
/// zero when the dimension is unknown.
///
/// ```
/// use telwire_protocol::handlers::WindowSize;
///
/// let size = WindowSize::new(80, 24);
/// assert_eq!(size.to_bytes(), [0, 80, 0, 24]);
/// assert_eq!(WindowSize::decode(&[0, 80, 0, 24]), Ok(size));
/// ```
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub struct WindowSize {
    /// Width in characters
    pub cols: u16,
    /// Height in lines
    pub rows: u16,
}

impl WindowSize {
    /// Encoded length in bytes.
    pub const LEN: usize = 4;

    /// Create a window size.
    #[must_use]
    pub const fn new(cols: u16, rows: u16) -> WindowSize {
        WindowSize { cols, rows }
    }

    /// Encode as the 4-byte sub-negotiation payload.
    #[must_use]
    pub fn to_bytes(self) -> [u8; 4] {
        let mut payload = [0; WindowSize::LEN];
        BigEndian::write_u16(&mut payload[..2], self.cols);
        BigEndian::write_u16(&mut payload[2..], self.rows);
        payload
    }

    /// Decode a sub-negotiation payload, which must be exactly four bytes.
    pub fn decode(payload: &[u8]) -> ProtocolResult<WindowSize> {
        if payload.len() < WindowSize::LEN {
            return Err(ProtocolError::insufficient_data(
                NAWS,
                WindowSize::LEN,
                payload.len(),
            ));
        }
        if payload.len() > WindowSize::LEN {
            return Err(ProtocolError::Subnegotiation {
                option: NAWS,
                reason: SubnegotiationErrorKind::UnexpectedData {
                    reason: format!("{} trailing bytes", payload.len() - WindowSize::LEN),
                },
            });
        }
        Ok(WindowSize {
            cols: BigEndian::read_u16(&payload[..2]),
            rows: BigEndian::read_u16(&payload[2..]),
        })
    }
}

impl fmt::Display for WindowSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.cols, self.rows)
    }
}

/// Sends our window size when the peer wants it, and receives the peer's.
pub struct NegotiateAboutWindowSize {
    local: Option<WindowSize>,
    remote: Option<WindowSize>,
    incoming: Vec<u8>,
    reported: Option<Box<dyn FnMut(WindowSize) + Send>>,
}

impl fmt::Debug for NegotiateAboutWindowSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NegotiateAboutWindowSize")
            .field("local", &self.local)
            .field("remote", &self.remote)
            .finish_non_exhaustive()
    }
}

impl Default for NegotiateAboutWindowSize {
    fn default() -> Self {
        NegotiateAboutWindowSize::new()
    }
}

impl NegotiateAboutWindowSize {
    /// Create a handler with no local size and no report callback.
    #[must_use]
    pub fn new() -> NegotiateAboutWindowSize {
        NegotiateAboutWindowSize {
            local: None,
            remote: None,
            incoming: Vec::with_capacity(WindowSize::LEN + 1),
            reported: None,
        }
    }

    /// Size to send once the option is enabled locally.
    #[must_use]
    pub fn with_window_size(mut self, size: WindowSize) -> Self {
        self.local = Some(size);
        self
    }

    /// Callback for sizes reported by the peer.
    #[must_use]
    pub fn on_reported<F>(mut self, callback: F) -> Self
    where
        F: FnMut(WindowSize) + Send + 'static,
    {
        self.reported = Some(Box::new(callback));
        self
    }

    /// Install into `session` as the handler for option 31.
    pub fn attach(self, session: &mut Session) {
        session.option(NAWS).install(self);
    }

    /// Our current window size.
    #[must_use]
    pub fn window_size(&self) -> Option<WindowSize> {
        self.local
    }

    /// Last size the peer reported.
    #[must_use]
    pub fn remote_window_size(&self) -> Option<WindowSize> {
        self.remote
    }

    /// Offer to send our size, sending `size` as soon as the peer agrees.
    ///
    /// Returns false if no handler is installed.
    pub fn start_offering(session: &mut Session, size: WindowSize) -> bool {
        let installed = session
            .with_handler(NAWS, |naws: &mut NegotiateAboutWindowSize, _| {
                naws.local = Some(size);
            })
            .is_some();
        if installed {
            session.option(NAWS).request_local_enable();
        }
        installed
    }

    /// Let the peer ask for our size without offering it.
    ///
    /// Returns false if no handler is installed.
    pub fn allow_offering(session: &mut Session, size: WindowSize) -> bool {
        let installed = session
            .with_handler(NAWS, |naws: &mut NegotiateAboutWindowSize, _| {
                naws.local = Some(size);
            })
            .is_some();
        if installed {
            session.option(NAWS).allow_local();
        }
        installed
    }

    /// Stop sending our size.
    pub fn stop_offering(session: &mut Session) {
        session.option(NAWS).request_local_disable();
    }

    /// Ask the peer to report its size.
    pub fn enable_remote(session: &mut Session) {
        session.option(NAWS).request_remote_enable();
    }

    /// Ask the peer to stop reporting its size.
    pub fn disable_remote(session: &mut Session) {
        session.option(NAWS).request_remote_disable();
    }

    /// Change our size, sending it if the option is enabled locally.
    ///
    /// Returns false if no handler is installed.
    pub fn set_window_size(session: &mut Session, size: WindowSize) -> bool {
        session
            .with_handler(NAWS, |naws: &mut NegotiateAboutWindowSize, session| {
                naws.local = Some(size);
                naws.send_update(session);
            })
            .is_some()
    }

    fn send_update(&self, session: &mut Session) {
        if let Some(size) = self.local {
            if session.is_enabled_locally(NAWS) {
                debug!("Sending window size {}", size);
                session.send_subnegotiation(NAWS, &size.to_bytes());
            }
        }
    }
}

impl OptionStateListener for NegotiateAboutWindowSize {
    fn enabled_locally(&mut self, session: &mut Session) {
        self.send_update(session);
    }
}

impl SubNegotiationHandler for NegotiateAboutWindowSize {
    fn start_subnegotiation(&mut self, _session: &mut Session) {
        self.incoming.clear();
    }

    fn subnegotiation_data(&mut self, data: &[u8], _session: &mut Session) {
        // One byte past the fixed length is enough to reject the report.
        let room = (WindowSize::LEN + 1).saturating_sub(self.incoming.len());
        self.incoming.extend_from_slice(&data[..data.len().min(room)]);
    }

    fn end_subnegotiation(&mut self, _session: &mut Session) {
        match WindowSize::decode(&self.incoming) {
            Ok(size) => {
                debug!("Peer reported window size {}", size);
                self.remote = Some(size);
                if let Some(reported) = self.reported.as_mut() {
                    reported(size);
                }
            }
            Err(error) => warn!("Ignoring window size report: {}", error),
        }
        self.incoming.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts;
    use crate::decoder::OptionCommand;
    use crate::session::SubnegotiationEvent;
    use std::sync::{Arc, Mutex};

    #[test]
    fn decode_rejects_wrong_lengths() {
        assert_eq!(
            WindowSize::decode(&[0, 80, 0]),
            Err(ProtocolError::insufficient_data(NAWS, 4, 3))
        );
        assert!(WindowSize::decode(&[0, 80, 0, 24, 0]).is_err());
        assert_eq!(
            WindowSize::decode(&[0x01, 0x00, 0xFF, 0xFF]),
            Ok(WindowSize::new(256, 65535))
        );
    }

    #[test]
    fn size_sent_when_peer_agrees() {
        let mut session = Session::new();
        NegotiateAboutWindowSize::new().attach(&mut session);
        assert!(NegotiateAboutWindowSize::start_offering(
            &mut session,
            WindowSize::new(80, 24)
        ));
        assert_eq!(&session.take_output()[..], &[consts::IAC, consts::WILL, NAWS]);

        session.receive_negotiation(OptionCommand::Do, NAWS);
        assert_eq!(
            &session.take_output()[..],
            &[consts::IAC, consts::SB, NAWS, 0, 80, 0, 24, consts::IAC, consts::SE]
        );

        NegotiateAboutWindowSize::set_window_size(&mut session, WindowSize::new(255, 1));
        assert_eq!(
            &session.take_output()[..],
            &[consts::IAC, consts::SB, NAWS, 0, 255, 255, 0, 1, consts::IAC, consts::SE]
        );
    }

    #[test]
    fn size_not_sent_while_disabled() {
        let mut session = Session::new();
        NegotiateAboutWindowSize::new().attach(&mut session);
        assert!(NegotiateAboutWindowSize::set_window_size(
            &mut session,
            WindowSize::new(80, 24)
        ));
        assert!(!session.has_pending_output());
    }

    #[test]
    fn missing_handler_is_reported() {
        let mut session = Session::new();
        assert!(!NegotiateAboutWindowSize::set_window_size(
            &mut session,
            WindowSize::new(1, 1)
        ));
    }

    #[test]
    fn peer_reports_reach_callback() {
        let sizes = Arc::new(Mutex::new(Vec::new()));
        let sink = sizes.clone();
        let mut session = Session::new();
        NegotiateAboutWindowSize::new()
            .on_reported(move |size| sink.lock().unwrap().push(size))
            .attach(&mut session);

        session.dispatch_subnegotiation(NAWS, SubnegotiationEvent::Start);
        session.dispatch_subnegotiation(NAWS, SubnegotiationEvent::Data(&[0, 100]));
        session.dispatch_subnegotiation(NAWS, SubnegotiationEvent::Data(&[0, 40]));
        session.dispatch_subnegotiation(NAWS, SubnegotiationEvent::End);

        // A short report is dropped.
        session.dispatch_subnegotiation(NAWS, SubnegotiationEvent::Start);
        session.dispatch_subnegotiation(NAWS, SubnegotiationEvent::Data(&[0, 1]));
        session.dispatch_subnegotiation(NAWS, SubnegotiationEvent::End);

        assert_eq!(*sizes.lock().unwrap(), vec![WindowSize::new(100, 40)]);
        assert_eq!(
            session.with_handler(NAWS, |naws: &mut NegotiateAboutWindowSize, _| {
                naws.remote_window_size()
            }),
            Some(Some(WindowSize::new(100, 40)))
        );
    }
}
