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

//! Session facade.
//!
//! [`Session`] ties the negotiation engine to the output encoder and to the
//! callbacks registered per option. It is what applications and option handlers
//! talk to: every negotiation request, sub-negotiation and data write goes
//! through it, so all output for a session is serialized through one FIFO.
//!
//! # Callback delivery
//!
//! State-change notifications are queued and delivered once the call that
//! produced them has finished. While a callback runs, the callbacks registered
//! for the same option are moved out of the session; anything they cause is
//! queued and delivered after they have been put back. This lets a callback
//! negotiate or send through the `&mut Session` it receives.

use crate::decoder::{OptionCommand, TelnetCommand};
use crate::encoder::OutputEncoder;
use crate::handle::OptionHandle;
use crate::listener::{OptionHandler, OptionStateListener};
use crate::negotiation::{NegotiationAction, NegotiationEngine, NegotiationResponse, Side};
use crate::registry::TelnetOption;
use bytes::{Bytes, BytesMut};
use std::collections::VecDeque;
use std::fmt;
use tracing::{debug, trace};

/// Callbacks registered for one option code.
#[derive(Default)]
struct OptionSlot {
    handler: Option<Box<dyn OptionHandler>>,
    listeners: Vec<Box<dyn OptionStateListener>>,
    listeners_cleared: bool,
}

impl OptionSlot {
    fn notify(&mut self, action: NegotiationAction, session: &mut Session) {
        if let Some(handler) = self.handler.as_mut() {
            deliver(handler.as_mut(), action, session);
        }
        for listener in &mut self.listeners {
            deliver(listener.as_mut(), action, session);
        }
    }

    /// Fold in registrations made while this slot was checked out.
    fn restore(&mut self, added: OptionSlot) {
        if added.listeners_cleared {
            self.listeners.clear();
        }
        self.listeners.extend(added.listeners);
        if added.handler.is_some() {
            self.handler = added.handler;
        }
        self.listeners_cleared = false;
    }
}

fn deliver<L>(listener: &mut L, action: NegotiationAction, session: &mut Session)
where
    L: OptionStateListener + ?Sized,
{
    match action {
        NegotiationAction::NotifyEnabledLocally => listener.enabled_locally(session),
        NegotiationAction::NotifyDisabledLocally => listener.disabled_locally(session),
        NegotiationAction::NotifyEnabledRemotely => listener.enabled_remotely(session),
        NegotiationAction::NotifyDisabledRemotely => listener.disabled_remotely(session),
        NegotiationAction::SendWill
        | NegotiationAction::SendWont
        | NegotiationAction::SendDo
        | NegotiationAction::SendDont => {}
    }
}

/// Sub-negotiation events routed to an option's handler.
#[derive(Clone, Copy, Debug)]
pub(crate) enum SubnegotiationEvent<'a> {
    Start,
    Data(&'a [u8]),
    End,
}

/// Negotiation state, output queue and per-option callbacks of one TELNET session.
pub struct Session {
    engine: NegotiationEngine,
    output: OutputEncoder,
    slots: Vec<OptionSlot>,
    notifications: VecDeque<(u8, NegotiationAction)>,
    dispatching: bool,
}

impl Default for Session {
    fn default() -> Self {
        Session {
            engine: NegotiationEngine::new(),
            output: OutputEncoder::new(),
            slots: (0..=u8::MAX).map(|_| OptionSlot::default()).collect(),
            notifications: VecDeque::new(),
            dispatching: false,
        }
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("pending_output", &self.output.pending_len())
            .field("pending_notifications", &self.notifications.len())
            .finish_non_exhaustive()
    }
}

impl Session {
    /// Create a session in which no option is supported.
    #[must_use]
    pub fn new() -> Session {
        Session::default()
    }

    /// Handle for negotiating and observing one option.
    pub fn option(&mut self, option: u8) -> OptionHandle<'_> {
        OptionHandle::new(self, option)
    }

    /// Read-only view of the negotiation table.
    #[must_use]
    pub fn engine(&self) -> &NegotiationEngine {
        &self.engine
    }

    /// We perform `option`.
    #[must_use]
    pub fn is_enabled_locally(&self, option: u8) -> bool {
        self.engine.is_enabled_locally(option)
    }

    /// The peer performs `option`.
    #[must_use]
    pub fn is_enabled_remotely(&self, option: u8) -> bool {
        self.engine.is_enabled_remotely(option)
    }

    /// Queue application data, escaping `IAC`.
    pub fn write(&mut self, data: &[u8]) {
        self.output.write(data);
    }

    /// Queue a simple command such as `IAC AYT`.
    pub fn send_command(&mut self, command: TelnetCommand) {
        debug!("Sending IAC {}", command);
        self.output.send_command(command);
    }

    /// Queue a complete `IAC SB <option> ... IAC SE` envelope.
    pub fn send_subnegotiation(&mut self, option: u8, payload: &[u8]) {
        debug!(
            "Sending subnegotiation for {} ({} bytes)",
            TelnetOption::from_u8(option),
            payload.len()
        );
        self.output.send_subnegotiation(option, payload);
    }

    /// True when output is waiting to be transmitted.
    #[must_use]
    pub fn has_pending_output(&self) -> bool {
        self.output.has_pending()
    }

    /// Number of bytes waiting to be transmitted.
    #[must_use]
    pub fn pending_output_len(&self) -> usize {
        self.output.pending_len()
    }

    /// Oldest queued chunk.
    #[must_use]
    pub fn front_output(&self) -> Option<&Bytes> {
        self.output.front()
    }

    /// Remove the oldest queued chunk.
    pub fn pop_output(&mut self) -> Option<Bytes> {
        self.output.pop_chunk()
    }

    /// Mark `count` queued bytes as transmitted.
    pub fn advance_output(&mut self, count: usize) {
        self.output.advance(count);
    }

    /// Drain all queued output into one buffer.
    pub fn take_output(&mut self) -> BytesMut {
        self.output.take_all()
    }

    /// True if a handler is installed for `option` and not currently running.
    #[must_use]
    pub fn has_handler(&self, option: u8) -> bool {
        self.slots[usize::from(option)].handler.is_some()
    }

    /// Run `f` against the handler installed for `option`, if it has type `H`.
    ///
    /// Returns `None` when no handler of that type is installed, or when the
    /// handler is the one currently executing a callback.
    ///
    /// The handler is checked out of its slot for the duration of `f`, so `f`
    /// may use the session freely, including negotiating the same option.
    /// Listener notifications raised inside `f` are delivered after it
    /// returns.
    ///
    /// # Example
    /// ```
    /// use telwire_protocol::Session;
    /// use telwire_protocol::consts::option;
    /// use telwire_protocol::handlers::{NegotiateAboutWindowSize, TerminalType, WindowSize};
    ///
    /// let mut session = Session::new();
    /// NegotiateAboutWindowSize::new()
    ///     .with_window_size(WindowSize::new(80, 24))
    ///     .attach(&mut session);
    ///
    /// let size = session.with_handler(option::NAWS, |naws: &mut NegotiateAboutWindowSize, _| {
    ///     naws.window_size()
    /// });
    /// assert_eq!(size, Some(Some(WindowSize::new(80, 24))));
    ///
    /// // Wrong handler type.
    /// let name = session.with_handler(option::NAWS, |tt: &mut TerminalType, _| {
    ///     tt.remote_terminal_type().map(str::to_string)
    /// });
    /// assert_eq!(name, None);
    /// ```
    pub fn with_handler<H, R, F>(&mut self, option: u8, f: F) -> Option<R>
    where
        H: OptionHandler + 'static,
        F: FnOnce(&mut H, &mut Session) -> R,
    {
        self.deferring(|session| {
            let mut result = None;
            session.with_slot(option, |slot, session| {
                if let Some(handler) = slot
                    .handler
                    .as_mut()
                    .and_then(|handler| handler.as_any_mut().downcast_mut::<H>())
                {
                    result = Some(f(handler, session));
                }
            });
            result
        })
    }

    pub(crate) fn receive_negotiation(&mut self, command: OptionCommand, option: u8) {
        let response = self.engine.receive(command, option);
        self.apply(option, response);
    }

    pub(crate) fn negotiate(&mut self, side: Side, enable: bool, option: u8) {
        debug!(
            "Requesting {} {}: {}",
            side,
            if enable { "enable" } else { "disable" },
            TelnetOption::from_u8(option)
        );
        let response = self.engine.request(side, enable, option);
        self.apply(option, response);
    }

    pub(crate) fn allow(&mut self, side: Side, option: u8) {
        self.engine.allow(side, option);
    }

    pub(crate) fn install(&mut self, option: u8, handler: Box<dyn OptionHandler>) {
        self.slots[usize::from(option)].handler = Some(handler);
    }

    pub(crate) fn add_listener(&mut self, option: u8, listener: Box<dyn OptionStateListener>) {
        self.slots[usize::from(option)].listeners.push(listener);
    }

    pub(crate) fn clear_listeners(&mut self, option: u8) {
        let slot = &mut self.slots[usize::from(option)];
        slot.listeners.clear();
        slot.listeners_cleared = true;
    }

    pub(crate) fn dispatch_subnegotiation(&mut self, option: u8, event: SubnegotiationEvent<'_>) {
        self.deferring(|session| {
            session.with_slot(option, |slot, session| {
                let Some(handler) = slot.handler.as_mut() else {
                    return;
                };
                match event {
                    SubnegotiationEvent::Start => handler.start_subnegotiation(session),
                    SubnegotiationEvent::Data(data) => handler.subnegotiation_data(data, session),
                    SubnegotiationEvent::End => handler.end_subnegotiation(session),
                }
            });
        });
    }

    /// Run `f`, holding back notifications until it returns.
    pub(crate) fn deferring<R>(&mut self, f: impl FnOnce(&mut Session) -> R) -> R {
        let was_dispatching = std::mem::replace(&mut self.dispatching, true);
        let result = f(self);
        self.dispatching = was_dispatching;
        self.flush_notifications();
        result
    }

    fn apply(&mut self, option: u8, response: NegotiationResponse) {
        for action in response.actions() {
            match action.wire_command() {
                Some(command) => {
                    debug!("Sending {}: {}", command, TelnetOption::from_u8(option));
                    self.output.send_option_command(command, option);
                }
                None => self.notifications.push_back((option, action)),
            }
        }
        self.flush_notifications();
    }

    fn flush_notifications(&mut self) {
        if self.dispatching {
            return;
        }
        self.dispatching = true;
        while let Some((option, action)) = self.notifications.pop_front() {
            trace!("Delivering {:?} for option {}", action, option);
            self.with_slot(option, |slot, session| slot.notify(action, session));
        }
        self.dispatching = false;
    }

    fn with_slot(&mut self, option: u8, f: impl FnOnce(&mut OptionSlot, &mut Session)) {
        let index = usize::from(option);
        let mut slot = std::mem::take(&mut self.slots[index]);
        f(&mut slot, self);
        let added = std::mem::replace(&mut self.slots[index], slot);
        self.slots[index].restore(added);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts;
    use crate::listener::SubNegotiationHandler;
    use std::sync::{Arc, Mutex};

    type Log = Arc<Mutex<Vec<String>>>;

    struct Recording(Log, &'static str);

    impl OptionStateListener for Recording {
        fn enabled_locally(&mut self, _session: &mut Session) {
            self.0.lock().unwrap().push(format!("{} enabled locally", self.1));
        }
        fn disabled_locally(&mut self, _session: &mut Session) {
            self.0.lock().unwrap().push(format!("{} disabled locally", self.1));
        }
        fn enabled_remotely(&mut self, _session: &mut Session) {
            self.0.lock().unwrap().push(format!("{} enabled remotely", self.1));
        }
        fn disabled_remotely(&mut self, _session: &mut Session) {
            self.0.lock().unwrap().push(format!("{} disabled remotely", self.1));
        }
    }

    /// Asks the peer for ECHO as soon as it agrees to SGA.
    struct Chain;

    impl OptionStateListener for Chain {
        fn enabled_remotely(&mut self, session: &mut Session) {
            session.option(consts::option::ECHO).request_remote_enable();
        }
    }

    #[derive(Default)]
    struct Counter(usize);

    impl OptionStateListener for Counter {}
    impl SubNegotiationHandler for Counter {
        fn subnegotiation_data(&mut self, data: &[u8], _session: &mut Session) {
            self.0 += data.len();
        }
    }

    #[test]
    fn refusal_is_queued_as_three_bytes() {
        let mut session = Session::new();
        session.receive_negotiation(OptionCommand::Do, 24);
        assert_eq!(&session.take_output()[..], &[consts::IAC, consts::WONT, 24]);
        assert!(!session.is_enabled_locally(24));
    }

    #[test]
    fn notifications_reach_handler_and_listeners() {
        let log = Log::default();
        let mut session = Session::new();
        session
            .option(consts::option::SGA)
            .allow_local()
            .add_state_listener(Recording(log.clone(), "first"))
            .add_state_listener(Recording(log.clone(), "second"));
        session.receive_negotiation(OptionCommand::Do, consts::option::SGA);
        assert_eq!(
            *log.lock().unwrap(),
            vec!["first enabled locally", "second enabled locally"]
        );
        assert_eq!(
            &session.take_output()[..],
            &[consts::IAC, consts::WILL, consts::option::SGA]
        );
    }

    #[test]
    fn callbacks_may_negotiate() {
        let mut session = Session::new();
        session
            .option(consts::option::SGA)
            .add_state_listener(Chain)
            .request_remote_enable();
        session.take_output();
        session.receive_negotiation(OptionCommand::Will, consts::option::SGA);
        assert!(session.is_enabled_remotely(consts::option::SGA));
        assert_eq!(
            &session.take_output()[..],
            &[consts::IAC, consts::DO, consts::option::ECHO]
        );
    }

    #[test]
    fn listeners_added_during_callback_are_kept() {
        struct Adder(Log);
        impl OptionStateListener for Adder {
            fn enabled_locally(&mut self, session: &mut Session) {
                session
                    .option(consts::option::ECHO)
                    .add_state_listener(Recording(self.0.clone(), "late"));
            }
        }

        let log = Log::default();
        let mut session = Session::new();
        session
            .option(consts::option::ECHO)
            .allow_local()
            .add_state_listener(Adder(log.clone()));
        session.receive_negotiation(OptionCommand::Do, consts::option::ECHO);
        assert!(log.lock().unwrap().is_empty());
        session.receive_negotiation(OptionCommand::Dont, consts::option::ECHO);
        assert_eq!(*log.lock().unwrap(), vec!["late disabled locally"]);
    }

    #[test]
    fn with_handler_downcasts() {
        let mut session = Session::new();
        session.option(200).install(Counter::default());
        session.dispatch_subnegotiation(200, SubnegotiationEvent::Data(b"abc"));
        assert_eq!(session.with_handler(200, |counter: &mut Counter, _| counter.0), Some(3));
        assert_eq!(session.with_handler(201, |counter: &mut Counter, _| counter.0), None);
        assert!(session.has_handler(200));
    }

    #[test]
    fn removed_listeners_stop_receiving() {
        let log = Log::default();
        let mut session = Session::new();
        session
            .option(1)
            .add_state_listener(Recording(log.clone(), "gone"))
            .remove_state_listeners()
            .request_local_disable();
        assert!(log.lock().unwrap().is_empty());
    }
}
