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

use crate::listener::{OptionHandler, OptionStateListener};
use crate::negotiation::Side;
use crate::registry::TelnetOption;
use crate::session::Session;

/// Capability bound to one option of one [`Session`].
///
/// Obtained from [`Session::option`]. State is read from and changed through
/// the session's negotiation engine; the handle itself holds nothing but the
/// option code. Mutating methods return `&mut Self` so calls can be chained:
///
/// ```
/// use telwire_protocol::{consts, Session};
///
/// let mut session = Session::new();
/// session
///     .option(consts::option::SGA)
///     .allow_local()
///     .request_remote_enable();
/// assert!(!session.is_enabled_remotely(consts::option::SGA));
/// assert_eq!(
///     &session.take_output()[..],
///     &[consts::IAC, consts::DO, consts::option::SGA]
/// );
/// ```
pub struct OptionHandle<'a> {
    session: &'a mut Session,
    option: u8,
}

impl<'a> OptionHandle<'a> {
    pub(crate) fn new(session: &'a mut Session, option: u8) -> OptionHandle<'a> {
        OptionHandle { session, option }
    }

    /// Option code this handle addresses.
    #[must_use]
    pub fn code(&self) -> u8 {
        self.option
    }

    /// Registry entry for the option code.
    #[must_use]
    pub fn option(&self) -> TelnetOption {
        TelnetOption::from_u8(self.option)
    }

    /// We perform the option.
    #[must_use]
    pub fn is_enabled_locally(&self) -> bool {
        self.session.is_enabled_locally(self.option)
    }

    /// The peer performs the option.
    #[must_use]
    pub fn is_enabled_remotely(&self) -> bool {
        self.session.is_enabled_remotely(self.option)
    }

    /// Offer to perform the option (`WILL`).
    pub fn request_local_enable(&mut self) -> &mut Self {
        self.session.negotiate(Side::Local, true, self.option);
        self
    }

    /// Stop performing the option (`WONT`).
    pub fn request_local_disable(&mut self) -> &mut Self {
        self.session.negotiate(Side::Local, false, self.option);
        self
    }

    /// Ask the peer to perform the option (`DO`).
    pub fn request_remote_enable(&mut self) -> &mut Self {
        self.session.negotiate(Side::Remote, true, self.option);
        self
    }

    /// Ask the peer to stop performing the option (`DONT`).
    pub fn request_remote_disable(&mut self) -> &mut Self {
        self.session.negotiate(Side::Remote, false, self.option);
        self
    }

    /// Agree to perform the option if the peer asks.
    pub fn allow_local(&mut self) -> &mut Self {
        self.session.allow(Side::Local, self.option);
        self
    }

    /// Agree to let the peer perform the option if it offers.
    pub fn allow_remote(&mut self) -> &mut Self {
        self.session.allow(Side::Remote, self.option);
        self
    }

    /// Install the option's handler, replacing any previous one.
    pub fn install<H: OptionHandler + 'static>(&mut self, handler: H) -> &mut Self {
        self.session.install(self.option, Box::new(handler));
        self
    }

    /// Register an additional state-change listener.
    pub fn add_state_listener<L: OptionStateListener + 'static>(&mut self, listener: L) -> &mut Self {
        self.session.add_listener(self.option, Box::new(listener));
        self
    }

    /// Drop every listener registered through [`OptionHandle::add_state_listener`].
    pub fn remove_state_listeners(&mut self) -> &mut Self {
        self.session.clear_listeners(self.option);
        self
    }

    /// Send `IAC SB <option> <payload> IAC SE`.
    pub fn send_subnegotiation(&mut self, payload: &[u8]) -> &mut Self {
        self.session.send_subnegotiation(self.option, payload);
        self
    }
}
