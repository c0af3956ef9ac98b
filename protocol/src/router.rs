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

//! Sub-negotiation demultiplexing.
//!
//! Outside of `IAC SB ... IAC SE` every data span belongs to the application.
//! Inside, it belongs to the handler installed for the option named after `SB`,
//! or is dropped when the option has no handler.

use crate::listener::SessionListener;
use crate::registry::TelnetOption;
use crate::session::{Session, SubnegotiationEvent};
use tracing::{debug, trace, warn};

/// Where data spans are currently delivered.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum Routing {
    /// Ordinary application data.
    #[default]
    Application,
    /// Payload of a sub-negotiation with an installed handler.
    Handler(u8),
    /// Payload of a sub-negotiation nobody handles.
    Discard(u8),
}

/// Tracks the active sub-negotiation and routes data accordingly.
///
/// The decoder reports `IAC SB <option>`, data spans and `IAC SE` as separate
/// events. Between a [`start`](Self::start) and the matching
/// [`end`](Self::end) every span goes to the handler installed for the
/// option, or is dropped when there is none. All other spans reach
/// [`SessionListener::incoming_data`].
///
/// A second `start` before `end` closes the open sub-negotiation first, so a
/// handler always sees balanced start and end events.
///
/// # Example
/// ```
/// use telwire_protocol::{NullListener, Routing, Session, SubNegotiationRouter};
///
/// let mut session = Session::new();
/// let mut router = SubNegotiationRouter::new();
/// assert_eq!(router.routing(), Routing::Application);
///
/// // Nothing handles option 99, so its payload is dropped.
/// router.start(99, &mut session);
/// assert_eq!(router.routing(), Routing::Discard(99));
/// router.data(b"ignored", &mut session, &mut NullListener);
///
/// router.end(&mut session);
/// assert_eq!(router.routing(), Routing::Application);
/// ```
#[derive(Clone, Debug, Default)]
pub struct SubNegotiationRouter {
    routing: Routing,
}

impl SubNegotiationRouter {
    /// Create a router delivering to the application.
    #[must_use]
    pub fn new() -> SubNegotiationRouter {
        SubNegotiationRouter::default()
    }

    /// Current routing target.
    #[must_use]
    pub fn routing(&self) -> Routing {
        self.routing
    }

    /// `IAC SB <option>` was received.
    pub fn start(&mut self, option: u8, session: &mut Session) {
        if self.routing != Routing::Application {
            warn!(
                "Subnegotiation for {} started before the previous one ended",
                TelnetOption::from_u8(option)
            );
            self.end(session);
        }
        if session.has_handler(option) {
            debug!("Subnegotiation started: {}", TelnetOption::from_u8(option));
            self.routing = Routing::Handler(option);
            session.dispatch_subnegotiation(option, SubnegotiationEvent::Start);
        } else {
            debug!(
                "Discarding subnegotiation for unhandled option {}",
                TelnetOption::from_u8(option)
            );
            self.routing = Routing::Discard(option);
        }
    }

    /// A data span from the decoder.
    pub fn data(&mut self, data: &[u8], session: &mut Session, listener: &mut dyn SessionListener) {
        match self.routing {
            Routing::Application => {
                trace!("Received {} bytes of data", data.len());
                session.deferring(|session| listener.incoming_data(data, session));
            }
            Routing::Handler(option) => {
                session.dispatch_subnegotiation(option, SubnegotiationEvent::Data(data));
            }
            Routing::Discard(option) => {
                trace!("Dropped {} subnegotiation bytes for option {}", data.len(), option);
            }
        }
    }

    /// `IAC SE` was received.
    pub fn end(&mut self, session: &mut Session) {
        match std::mem::take(&mut self.routing) {
            Routing::Handler(option) => {
                debug!("Subnegotiation ended: {}", TelnetOption::from_u8(option));
                session.dispatch_subnegotiation(option, SubnegotiationEvent::End);
            }
            Routing::Discard(_) => {}
            Routing::Application => {
                debug!("Ignoring IAC SE outside of a subnegotiation");
            }
        }
    }
}
