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

use crate::consts::option::BINARY;
use crate::listener::{OptionStateListener, SubNegotiationHandler};
use crate::session::Session;
use std::fmt;
use tracing::debug;

/// Transmission mode changes reported by [`BinaryTransmission`].
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum BinaryEvent {
    /// Both sides agreed that we send binary.
    LocalBinary,
    /// We were sending binary and returned to NVT ASCII.
    LocalNvtAscii,
    /// Both sides agreed that the peer sends binary.
    RemoteBinary,
    /// The peer was sending binary and returned to NVT ASCII.
    RemoteNvtAscii,
}

/// Tracks the binary transmission mode of both directions.
///
/// Other options that define the data "mode" interact with this one; the
/// callback is where an application switches its own interpretation of the
/// data stream.
pub struct BinaryTransmission {
    callback: Box<dyn FnMut(BinaryEvent) + Send>,
    local_binary: bool,
    remote_binary: bool,
}

impl fmt::Debug for BinaryTransmission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BinaryTransmission")
            .field("local_binary", &self.local_binary)
            .field("remote_binary", &self.remote_binary)
            .finish_non_exhaustive()
    }
}

impl BinaryTransmission {
    /// Create a handler reporting mode changes to `callback`.
    pub fn new<F>(callback: F) -> BinaryTransmission
    where
        F: FnMut(BinaryEvent) + Send + 'static,
    {
        BinaryTransmission {
            callback: Box::new(callback),
            local_binary: false,
            remote_binary: false,
        }
    }

    /// Install into `session` as the handler for option 0.
    pub fn attach(self, session: &mut Session) {
        session.option(BINARY).install(self);
    }

    /// We currently send binary.
    #[must_use]
    pub fn is_local_binary(&self) -> bool {
        self.local_binary
    }

    /// The peer currently sends binary.
    #[must_use]
    pub fn is_remote_binary(&self) -> bool {
        self.remote_binary
    }

    /// Ask the peer to send binary.
    pub fn request_remote_binary(session: &mut Session) {
        session.option(BINARY).request_remote_enable();
    }

    /// Ask the peer to return to NVT ASCII.
    pub fn request_remote_nvt_ascii(session: &mut Session) {
        session.option(BINARY).request_remote_disable();
    }

    /// Offer to send binary.
    pub fn suggest_local_binary(session: &mut Session) {
        session.option(BINARY).request_local_enable();
    }

    /// Stop sending binary.
    pub fn stop_local_binary(session: &mut Session) {
        session.option(BINARY).request_local_disable();
    }

    fn report(&mut self, event: BinaryEvent) {
        debug!("Binary transmission: {:?}", event);
        (self.callback)(event);
    }
}

impl OptionStateListener for BinaryTransmission {
    fn enabled_locally(&mut self, _session: &mut Session) {
        self.local_binary = true;
        self.report(BinaryEvent::LocalBinary);
    }

    fn disabled_locally(&mut self, _session: &mut Session) {
        if std::mem::replace(&mut self.local_binary, false) {
            self.report(BinaryEvent::LocalNvtAscii);
        }
    }

    fn enabled_remotely(&mut self, _session: &mut Session) {
        self.remote_binary = true;
        self.report(BinaryEvent::RemoteBinary);
    }

    fn disabled_remotely(&mut self, _session: &mut Session) {
        if std::mem::replace(&mut self.remote_binary, false) {
            self.report(BinaryEvent::RemoteNvtAscii);
        }
    }
}

impl SubNegotiationHandler for BinaryTransmission {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts;
    use crate::decoder::OptionCommand;
    use std::sync::{Arc, Mutex};

    fn attached() -> (Session, Arc<Mutex<Vec<BinaryEvent>>>) {
        let events = Arc::new(Mutex::new(Vec::new()));
        let sink = events.clone();
        let mut session = Session::new();
        BinaryTransmission::new(move |event| sink.lock().unwrap().push(event)).attach(&mut session);
        (session, events)
    }

    #[test]
    fn remote_binary_round_trip() {
        let (mut session, events) = attached();
        BinaryTransmission::request_remote_binary(&mut session);
        assert_eq!(&session.take_output()[..], &[consts::IAC, consts::DO, BINARY]);
        session.receive_negotiation(OptionCommand::Will, BINARY);
        session.receive_negotiation(OptionCommand::Wont, BINARY);
        assert_eq!(
            *events.lock().unwrap(),
            vec![BinaryEvent::RemoteBinary, BinaryEvent::RemoteNvtAscii]
        );
    }

    #[test]
    fn nvt_ascii_only_reported_after_binary() {
        let (mut session, events) = attached();
        BinaryTransmission::stop_local_binary(&mut session);
        assert!(events.lock().unwrap().is_empty());

        BinaryTransmission::suggest_local_binary(&mut session);
        session.receive_negotiation(OptionCommand::Do, BINARY);
        assert_eq!(
            session.with_handler(BINARY, |binary: &mut BinaryTransmission, _| binary.is_local_binary()),
            Some(true)
        );
        BinaryTransmission::stop_local_binary(&mut session);
        session.receive_negotiation(OptionCommand::Dont, BINARY);
        assert_eq!(
            *events.lock().unwrap(),
            vec![BinaryEvent::LocalBinary, BinaryEvent::LocalNvtAscii]
        );
    }
}
