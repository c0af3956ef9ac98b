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

//! Option negotiation state machine ([RFC855](https://tools.ietf.org/html/rfc855)).
//!
//! Every option has two independent ends. The *local* end answers "do we
//! perform this option" and is driven by `DO`/`DONT` from the peer and by our
//! own `WILL`/`WONT`. The *remote* end answers "does the peer perform this
//! option" and is driven by `WILL`/`WONT` from the peer and by our own
//! `DO`/`DONT`. Both ends run the same transition rules; a [`Role`] supplies the
//! commands and notifications that differ between them.
//!
//! All transitions are pure functions over [`EndState`] returning a
//! [`NegotiationResponse`]. Nothing here writes to the wire; the caller turns
//! the response into output and listener notifications.

use crate::decoder::OptionCommand;
use crate::registry::TelnetOption;
use std::fmt;
use tracing::debug;

/// One effect of feeding an event into the state machine.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum NegotiationAction {
    /// Transmit `IAC WILL <option>`.
    SendWill,
    /// Transmit `IAC WONT <option>`.
    SendWont,
    /// Transmit `IAC DO <option>`.
    SendDo,
    /// Transmit `IAC DONT <option>`.
    SendDont,
    /// We now perform the option.
    NotifyEnabledLocally,
    /// We no longer perform the option.
    NotifyDisabledLocally,
    /// The peer now performs the option.
    NotifyEnabledRemotely,
    /// The peer no longer performs the option.
    NotifyDisabledRemotely,
}

impl NegotiationAction {
    /// The option command to transmit, if this action writes to the wire.
    #[must_use]
    pub const fn wire_command(self) -> Option<OptionCommand> {
        match self {
            NegotiationAction::SendWill => Some(OptionCommand::Will),
            NegotiationAction::SendWont => Some(OptionCommand::Wont),
            NegotiationAction::SendDo => Some(OptionCommand::Do),
            NegotiationAction::SendDont => Some(OptionCommand::Dont),
            _ => None,
        }
    }
}

/// Result of one negotiation event: nothing, one action, or two actions in order.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub enum NegotiationResponse {
    /// No wire traffic and no notification.
    #[default]
    NoResponse,
    /// A single action.
    Single(NegotiationAction),
    /// Two actions, applied first to second.
    Pair(NegotiationAction, NegotiationAction),
}

impl NegotiationResponse {
    /// The actions in the order they must be applied.
    pub fn actions(self) -> impl Iterator<Item = NegotiationAction> {
        let (first, second) = match self {
            NegotiationResponse::NoResponse => (None, None),
            NegotiationResponse::Single(action) => (Some(action), None),
            NegotiationResponse::Pair(first, second) => (Some(first), Some(second)),
        };
        first.into_iter().chain(second)
    }

    /// True for [`NegotiationResponse::NoResponse`].
    #[must_use]
    pub fn is_none(self) -> bool {
        self == NegotiationResponse::NoResponse
    }
}

/// Which end of an option an operation addresses.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Side {
    /// We perform the option.
    Local,
    /// The peer performs the option.
    Remote,
}

impl Side {
    /// Transition table parameters for this end.
    #[must_use]
    pub const fn role(self) -> &'static Role {
        match self {
            Side::Local => &LOCAL,
            Side::Remote => &REMOTE,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Local => f.write_str("local"),
            Side::Remote => f.write_str("remote"),
        }
    }
}

/// The actions that distinguish the local end from the remote end.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Role {
    /// Offer or accept the option.
    pub request_enable: NegotiationAction,
    /// Refuse or withdraw the option.
    pub request_disable: NegotiationAction,
    /// Notification when the option becomes active on this end.
    pub enabled: NegotiationAction,
    /// Notification when the option becomes inactive on this end.
    pub disabled: NegotiationAction,
}

/// Local end: we answer `DO`/`DONT` with `WILL`/`WONT`.
pub const LOCAL: Role = Role {
    request_enable: NegotiationAction::SendWill,
    request_disable: NegotiationAction::SendWont,
    enabled: NegotiationAction::NotifyEnabledLocally,
    disabled: NegotiationAction::NotifyDisabledLocally,
};

/// Remote end: we answer `WILL`/`WONT` with `DO`/`DONT`.
pub const REMOTE: Role = Role {
    request_enable: NegotiationAction::SendDo,
    request_disable: NegotiationAction::SendDont,
    enabled: NegotiationAction::NotifyEnabledRemotely,
    disabled: NegotiationAction::NotifyDisabledRemotely,
};

/// Negotiation state of one end of one option.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub struct EndState {
    /// The peer's most recent command asked for the option.
    pub peer_wants: bool,
    /// We have asked for, or agreed to, the option.
    pub we_want: bool,
    /// Both sides agree; only set by a completed handshake.
    pub enabled: bool,
    /// We grant the option when the peer asks for it.
    pub supported: bool,
}

impl EndState {
    /// The peer asks for the option (`DO` on the local end, `WILL` on the remote end).
    pub fn peer_requests_enable(&mut self, role: &Role) -> NegotiationResponse {
        if !self.supported {
            return NegotiationResponse::Single(role.request_disable);
        }
        self.peer_wants = true;
        if self.we_want {
            if self.enabled {
                NegotiationResponse::NoResponse
            } else {
                // Acknowledges our own outstanding request.
                self.enabled = true;
                NegotiationResponse::Single(role.enabled)
            }
        } else {
            self.we_want = true;
            self.enabled = true;
            NegotiationResponse::Pair(role.request_enable, role.enabled)
        }
    }

    /// The peer refuses or withdraws the option (`DONT` on the local end, `WONT` on the remote end).
    pub fn peer_requests_disable(&mut self, role: &Role) -> NegotiationResponse {
        self.peer_wants = false;
        let we_wanted = std::mem::replace(&mut self.we_want, false);
        if !self.enabled {
            return NegotiationResponse::NoResponse;
        }
        self.enabled = false;
        if we_wanted {
            NegotiationResponse::Pair(role.request_disable, role.disabled)
        } else {
            // Acknowledges our own earlier withdrawal.
            NegotiationResponse::Single(role.disabled)
        }
    }

    /// We ask for the option.
    pub fn request_enable(&mut self, role: &Role) -> NegotiationResponse {
        self.supported = true;
        self.we_want = true;
        if self.peer_wants {
            if self.enabled {
                NegotiationResponse::NoResponse
            } else {
                self.enabled = true;
                NegotiationResponse::Single(role.enabled)
            }
        } else {
            NegotiationResponse::Single(role.request_enable)
        }
    }

    /// We withdraw the option.
    pub fn request_disable(&mut self, role: &Role) -> NegotiationResponse {
        self.we_want = false;
        if self.peer_wants {
            NegotiationResponse::Single(role.request_disable)
        } else {
            self.enabled = false;
            NegotiationResponse::Single(role.disabled)
        }
    }

    /// Grant the option if the peer asks, without sending anything.
    pub fn allow(&mut self) {
        self.supported = true;
    }
}

/// Both ends of one option.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub struct OptionState {
    /// Whether we perform the option.
    pub local: EndState,
    /// Whether the peer performs the option.
    pub remote: EndState,
}

impl OptionState {
    /// The end addressed by `side`.
    #[must_use]
    pub fn end(&self, side: Side) -> &EndState {
        match side {
            Side::Local => &self.local,
            Side::Remote => &self.remote,
        }
    }

    fn end_mut(&mut self, side: Side) -> &mut EndState {
        match side {
            Side::Local => &mut self.local,
            Side::Remote => &mut self.remote,
        }
    }

    /// Peer sent `DO`.
    pub fn received_do(&mut self) -> NegotiationResponse {
        self.local.peer_requests_enable(&LOCAL)
    }

    /// Peer sent `DONT`.
    pub fn received_dont(&mut self) -> NegotiationResponse {
        self.local.peer_requests_disable(&LOCAL)
    }

    /// Peer sent `WILL`.
    pub fn received_will(&mut self) -> NegotiationResponse {
        self.remote.peer_requests_enable(&REMOTE)
    }

    /// Peer sent `WONT`.
    pub fn received_wont(&mut self) -> NegotiationResponse {
        self.remote.peer_requests_disable(&REMOTE)
    }

    /// Offer to perform the option.
    pub fn enable_local(&mut self) -> NegotiationResponse {
        self.local.request_enable(&LOCAL)
    }

    /// Stop performing the option.
    pub fn disable_local(&mut self) -> NegotiationResponse {
        self.local.request_disable(&LOCAL)
    }

    /// Ask the peer to perform the option.
    pub fn enable_remote(&mut self) -> NegotiationResponse {
        self.remote.request_enable(&REMOTE)
    }

    /// Ask the peer to stop performing the option.
    pub fn disable_remote(&mut self) -> NegotiationResponse {
        self.remote.request_disable(&REMOTE)
    }

    /// Permit the peer to ask us to perform the option.
    pub fn allow_local(&mut self) {
        self.local.allow();
    }

    /// Permit the peer to offer to perform the option.
    pub fn allow_remote(&mut self) {
        self.remote.allow();
    }

    /// We perform the option.
    #[must_use]
    pub fn is_enabled_locally(&self) -> bool {
        self.local.enabled
    }

    /// The peer performs the option.
    #[must_use]
    pub fn is_enabled_remotely(&self) -> bool {
        self.remote.enabled
    }
}

impl fmt::Display for OptionState {
    /// Summarizes the last command each side sent for each end, e.g. `{DO->WILL,WONT->DONT}`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let pick = |flag: bool, yes: &'static str, no: &'static str| if flag { yes } else { no };
        write!(
            f,
            "{{{}->{},{}->{}}}",
            pick(self.local.peer_wants, "DO", "DONT"),
            pick(self.local.we_want, "WILL", "WONT"),
            pick(self.remote.peer_wants, "WILL", "WONT"),
            pick(self.remote.we_want, "DO", "DONT"),
        )
    }
}

/// Per-session negotiation state for all 256 option codes.
///
/// Slots are created on first reference; an untouched option is neither
/// supported nor enabled, so the peer's requests for it are refused.
#[derive(Clone, Debug)]
pub struct NegotiationEngine {
    states: [Option<OptionState>; 256],
}

impl Default for NegotiationEngine {
    fn default() -> Self {
        NegotiationEngine {
            states: [None; 256],
        }
    }
}

impl NegotiationEngine {
    /// Create an engine in which no option is supported.
    #[must_use]
    pub fn new() -> NegotiationEngine {
        NegotiationEngine::default()
    }

    /// State of `option`, if it has ever been referenced.
    #[must_use]
    pub fn state(&self, option: u8) -> Option<&OptionState> {
        self.states[usize::from(option)].as_ref()
    }

    fn state_mut(&mut self, option: u8) -> &mut OptionState {
        self.states[usize::from(option)].get_or_insert_with(OptionState::default)
    }

    /// Apply a negotiation command received from the peer.
    ///
    /// `Subnegotiate` is not a negotiation command and yields `NoResponse`.
    pub fn receive(&mut self, command: OptionCommand, option: u8) -> NegotiationResponse {
        debug!(
            "Received {}: {}",
            command,
            TelnetOption::from_u8(option)
        );
        let state = self.state_mut(option);
        let response = match command {
            OptionCommand::Do => state.received_do(),
            OptionCommand::Dont => state.received_dont(),
            OptionCommand::Will => state.received_will(),
            OptionCommand::Wont => state.received_wont(),
            OptionCommand::Subnegotiate => NegotiationResponse::NoResponse,
        };
        debug!("Option {} now {} after {:?}", option, state, response);
        response
    }

    /// Ask for (`enable == true`) or withdraw an option on one end.
    pub fn request(&mut self, side: Side, enable: bool, option: u8) -> NegotiationResponse {
        let role = side.role();
        let end = self.state_mut(option).end_mut(side);
        if enable {
            end.request_enable(role)
        } else {
            end.request_disable(role)
        }
    }

    /// Grant the option on one end without any wire traffic.
    pub fn allow(&mut self, side: Side, option: u8) {
        self.state_mut(option).end_mut(side).allow();
    }

    /// We perform `option`.
    #[must_use]
    pub fn is_enabled_locally(&self, option: u8) -> bool {
        self.state(option).is_some_and(OptionState::is_enabled_locally)
    }

    /// The peer performs `option`.
    #[must_use]
    pub fn is_enabled_remotely(&self, option: u8) -> bool {
        self.state(option).is_some_and(OptionState::is_enabled_remotely)
    }
}
