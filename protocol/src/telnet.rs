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

//! Transport-facing session.
//!
//! [`TelnetSession`] is the object a transport drives: it hands every chunk it
//! reads to [`TelnetSession::receive`], transmits whatever the session queues,
//! and reports connection lifecycle events. Everything in between (decoding,
//! negotiation, sub-negotiation routing, replies) happens synchronously inside
//! those calls.

use crate::config::SessionConfig;
use crate::decoder::{CommandSink, OptionCommand, StreamDecoder, TelnetCommand};
use crate::listener::SessionListener;
use crate::router::SubNegotiationRouter;
use crate::session::Session;
use bytes::{Bytes, BytesMut};
use std::fmt;
use std::io;
use tracing::{debug, info, trace, warn};

/// Receives decoder events and routes them to the session and application.
struct Dispatcher {
    router: SubNegotiationRouter,
    session: Session,
    listener: Box<dyn SessionListener>,
}

impl CommandSink for Dispatcher {
    fn data(&mut self, data: &[u8]) {
        self.router
            .data(data, &mut self.session, self.listener.as_mut());
    }

    fn command(&mut self, command: TelnetCommand) {
        if command == TelnetCommand::EndSubnegotiation {
            self.router.end(&mut self.session);
            return;
        }
        debug!("Received IAC {}", command);
        let listener = self.listener.as_mut();
        self.session.deferring(|session| match command {
            TelnetCommand::Break => listener.do_break(session),
            TelnetCommand::InterruptProcess => listener.do_interrupt(session),
            TelnetCommand::AbortOutput => listener.do_abort_output(session),
            TelnetCommand::AreYouThere => listener.do_are_you_there(session),
            TelnetCommand::EraseCharacter => listener.do_erase_character(session),
            TelnetCommand::EraseLine => listener.do_erase_line(session),
            TelnetCommand::GoAhead => listener.do_go_ahead(session),
            TelnetCommand::EndSubnegotiation => {}
        });
    }

    fn option_command(&mut self, command: OptionCommand, option: u8) {
        match command {
            OptionCommand::Subnegotiate => self.router.start(option, &mut self.session),
            _ => self.session.receive_negotiation(command, option),
        }
    }
}

/// One TELNET session: decoder, router, negotiation state and application listener.
///
/// ```
/// use telwire_protocol::{consts, NullListener, SessionConfig, TelnetSession};
///
/// let mut telnet = TelnetSession::new(SessionConfig::server(), NullListener);
/// telnet.receive(&[consts::IAC, consts::DO, consts::option::TTYPE]);
/// assert!(!telnet.may_read());
/// assert_eq!(
///     &telnet.take_output()[..],
///     &[consts::IAC, consts::WONT, consts::option::TTYPE]
/// );
/// assert!(telnet.may_read());
/// ```
pub struct TelnetSession {
    config: SessionConfig,
    decoder: StreamDecoder,
    inner: Dispatcher,
}

impl fmt::Debug for TelnetSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TelnetSession")
            .field("config", &self.config)
            .field("decoder", &self.decoder)
            .field("router", &self.inner.router)
            .field("session", &self.inner.session)
            .finish_non_exhaustive()
    }
}

impl TelnetSession {
    /// Create a session that reports application events to `listener`.
    pub fn new<L: SessionListener + 'static>(config: SessionConfig, listener: L) -> TelnetSession {
        TelnetSession::with_session(config, Session::new(), listener)
    }

    /// Create a session around a pre-configured [`Session`].
    pub fn with_session<L: SessionListener + 'static>(
        config: SessionConfig,
        session: Session,
        listener: L,
    ) -> TelnetSession {
        TelnetSession {
            config,
            decoder: StreamDecoder::new(),
            inner: Dispatcher {
                router: SubNegotiationRouter::new(),
                session,
                listener: Box::new(listener),
            },
        }
    }

    /// Session configuration.
    #[must_use]
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Negotiation state and output queue.
    #[must_use]
    pub fn session(&self) -> &Session {
        &self.inner.session
    }

    /// Mutable access for negotiating, installing handlers and writing data.
    pub fn session_mut(&mut self) -> &mut Session {
        &mut self.inner.session
    }

    /// Feed bytes read from the transport.
    pub fn receive(&mut self, bytes: &[u8]) {
        trace!("Decoding {} bytes", bytes.len());
        self.decoder.accept(bytes, &mut self.inner);
    }

    /// The transport is being established.
    pub fn connecting(&mut self) {
        debug!("Connecting ({})", self.config.mode);
        self.inner.listener.connecting();
    }

    /// The transport is established.
    pub fn connected(&mut self) {
        info!("Session connected ({})", self.config.mode);
        let listener = self.inner.listener.as_mut();
        self.inner
            .session
            .deferring(|session| listener.connected(session));
    }

    /// The peer closed the transport.
    pub fn connection_closed(&mut self) {
        info!("Session closed");
        self.inner.listener.connection_closed();
    }

    /// The transport failed.
    pub fn connection_failed(&mut self, error: &io::Error) {
        warn!("Session failed: {}", error);
        self.inner.listener.connection_failed(error);
    }

    /// Whether the transport may read more input now.
    ///
    /// False while drain-before-read is on and earlier replies are unsent.
    #[must_use]
    pub fn may_read(&self) -> bool {
        !(self.config.drain_before_read && self.inner.session.has_pending_output())
    }

    /// True when output is waiting to be transmitted.
    #[must_use]
    pub fn has_pending_output(&self) -> bool {
        self.inner.session.has_pending_output()
    }

    /// Oldest queued output chunk.
    #[must_use]
    pub fn front_output(&self) -> Option<&Bytes> {
        self.inner.session.front_output()
    }

    /// Mark `count` queued bytes as transmitted.
    pub fn advance_output(&mut self, count: usize) {
        self.inner.session.advance_output(count);
    }

    /// Drain all queued output.
    pub fn take_output(&mut self) -> BytesMut {
        self.inner.session.take_output()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts;
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Default)]
    struct Events(Arc<Mutex<Vec<String>>>);

    impl SessionListener for Events {
        fn incoming_data(&mut self, data: &[u8], _session: &mut Session) {
            self.0.lock().unwrap().push(format!("data {data:?}"));
        }
        fn connected(&mut self, session: &mut Session) {
            self.0.lock().unwrap().push("connected".to_string());
            session.option(consts::option::SGA).request_local_enable();
        }
        fn do_are_you_there(&mut self, session: &mut Session) {
            self.0.lock().unwrap().push("ayt".to_string());
            session.write(b"yes");
        }
        fn do_break(&mut self, _session: &mut Session) {
            self.0.lock().unwrap().push("break".to_string());
        }
    }

    #[test]
    fn connected_may_negotiate() {
        let events = Events::default();
        let mut telnet = TelnetSession::new(SessionConfig::client(), events.clone());
        telnet.connected();
        assert_eq!(*events.0.lock().unwrap(), vec!["connected"]);
        assert_eq!(
            &telnet.take_output()[..],
            &[consts::IAC, consts::WILL, consts::option::SGA]
        );
    }

    #[test]
    fn simple_commands_reach_listener() {
        let events = Events::default();
        let mut telnet = TelnetSession::new(SessionConfig::client(), events.clone());
        telnet.receive(&[consts::IAC, consts::AYT, consts::IAC, consts::BRK]);
        assert_eq!(*events.0.lock().unwrap(), vec!["ayt", "break"]);
        assert_eq!(&telnet.take_output()[..], b"yes");
    }

    #[test]
    fn drain_before_read_only_when_configured() {
        let mut server = TelnetSession::new(SessionConfig::server(), Events::default());
        let mut client = TelnetSession::new(SessionConfig::client(), Events::default());
        for telnet in [&mut server, &mut client] {
            telnet.receive(&[consts::IAC, consts::WILL, 5]);
            assert!(telnet.has_pending_output());
        }
        assert!(!server.may_read());
        assert!(client.may_read());
        server.advance_output(3);
        assert!(server.may_read());
    }
}
