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

//! Callback capabilities implemented by applications and option handlers.
//!
//! Every method has a no-op default, so an implementation only provides the
//! callbacks it cares about. Callbacks that may need to answer the peer receive
//! the [`Session`] and can negotiate or send through it; anything they trigger
//! is delivered after the current callback returns.

use crate::session::Session;
use std::any::Any;
use std::io;

/// Application-level events of one TELNET session.
pub trait SessionListener: Send {
    /// Data bytes from the peer, already de-escaped. Only valid for the duration of the call.
    fn incoming_data(&mut self, data: &[u8], session: &mut Session) {
        let _ = (data, session);
    }

    /// The transport is being established.
    fn connecting(&mut self) {}

    /// The transport is established and the session may negotiate.
    fn connected(&mut self, session: &mut Session) {
        let _ = session;
    }

    /// The peer closed the connection.
    fn connection_closed(&mut self) {}

    /// The transport failed.
    fn connection_failed(&mut self, error: &io::Error) {
        let _ = error;
    }

    /// `IAC BRK`
    fn do_break(&mut self, session: &mut Session) {
        let _ = session;
    }

    /// `IAC IP`
    fn do_interrupt(&mut self, session: &mut Session) {
        let _ = session;
    }

    /// `IAC AO`
    fn do_abort_output(&mut self, session: &mut Session) {
        let _ = session;
    }

    /// `IAC AYT`
    fn do_are_you_there(&mut self, session: &mut Session) {
        let _ = session;
    }

    /// `IAC EC`
    fn do_erase_character(&mut self, session: &mut Session) {
        let _ = session;
    }

    /// `IAC EL`
    fn do_erase_line(&mut self, session: &mut Session) {
        let _ = session;
    }

    /// `IAC GA`
    fn do_go_ahead(&mut self, session: &mut Session) {
        let _ = session;
    }
}

/// Completed transitions of one option.
pub trait OptionStateListener: Send {
    /// We now perform the option.
    fn enabled_locally(&mut self, session: &mut Session) {
        let _ = session;
    }

    /// We no longer perform the option.
    fn disabled_locally(&mut self, session: &mut Session) {
        let _ = session;
    }

    /// The peer now performs the option.
    fn enabled_remotely(&mut self, session: &mut Session) {
        let _ = session;
    }

    /// The peer no longer performs the option.
    fn disabled_remotely(&mut self, session: &mut Session) {
        let _ = session;
    }
}

/// Receiver of one option's `IAC SB <option> ... IAC SE` payload.
pub trait SubNegotiationHandler: Send {
    /// `IAC SB <option>` was received.
    fn start_subnegotiation(&mut self, session: &mut Session) {
        let _ = session;
    }

    /// Part of the payload, already de-escaped. Copy it to keep it past the call.
    fn subnegotiation_data(&mut self, data: &[u8], session: &mut Session) {
        let _ = (data, session);
    }

    /// `IAC SE` was received.
    fn end_subnegotiation(&mut self, session: &mut Session) {
        let _ = session;
    }
}

/// The handler installed for an option: state changes plus sub-negotiation.
///
/// Implemented for every `'static` type that implements both capabilities.
pub trait OptionHandler: OptionStateListener + SubNegotiationHandler {
    /// Downcasting support for [`Session::with_handler`].
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<T> OptionHandler for T
where
    T: OptionStateListener + SubNegotiationHandler + Any,
{
    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// A [`SessionListener`] that ignores every event.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullListener;

impl SessionListener for NullListener {}
