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

//! Integration tests for the protocol engine
//!
//! These drive whole sessions through the public API, including two sessions
//! wired back to back.

use std::sync::{Arc, Mutex};
use telwire_protocol::consts::{self, option};
use telwire_protocol::handlers::{
    BinaryEvent, BinaryTransmission, NegotiateAboutWindowSize, TerminalType, WindowSize,
};
use telwire_protocol::{
    NullListener, OptionStateListener, Session, SessionConfig, SessionListener, TelnetSession,
};

// ============================================================================
// Helper Functions
// ============================================================================

#[derive(Clone, Debug, Eq, PartialEq)]
enum Event {
    Data(Vec<u8>),
    Connected,
    AreYouThere,
    EraseLine,
}

#[derive(Clone, Default)]
struct Recorder(Arc<Mutex<Vec<Event>>>);

impl Recorder {
    fn events(&self) -> Vec<Event> {
        self.0.lock().unwrap().clone()
    }
}

impl SessionListener for Recorder {
    fn incoming_data(&mut self, data: &[u8], _session: &mut Session) {
        self.0.lock().unwrap().push(Event::Data(data.to_vec()));
    }

    fn connected(&mut self, _session: &mut Session) {
        self.0.lock().unwrap().push(Event::Connected);
    }

    fn do_are_you_there(&mut self, _session: &mut Session) {
        self.0.lock().unwrap().push(Event::AreYouThere);
    }

    fn do_erase_line(&mut self, _session: &mut Session) {
        self.0.lock().unwrap().push(Event::EraseLine);
    }
}

/// Move output between two sessions until neither has anything to send.
fn pump(a: &mut TelnetSession, b: &mut TelnetSession) {
    for _ in 0..32 {
        let from_a = a.take_output();
        let from_b = b.take_output();
        if from_a.is_empty() && from_b.is_empty() {
            return;
        }
        b.receive(&from_a);
        a.receive(&from_b);
    }
    panic!("sessions kept negotiating");
}

// ============================================================================
// Stream Handling Tests
// ============================================================================

#[test]
fn refusal_between_data_spans() {
    let recorder = Recorder::default();
    let mut telnet = TelnetSession::new(SessionConfig::server(), recorder.clone());
    telnet.receive(&[65, consts::IAC, consts::DO, option::TTYPE, 66]);

    assert_eq!(
        recorder.events(),
        vec![Event::Data(vec![65]), Event::Data(vec![66])]
    );
    assert_eq!(
        &telnet.take_output()[..],
        &[consts::IAC, consts::WONT, option::TTYPE]
    );
}

#[test]
fn escaped_iac_is_one_data_byte() {
    let recorder = Recorder::default();
    let mut telnet = TelnetSession::new(SessionConfig::client(), recorder.clone());
    telnet.receive(&[consts::IAC, consts::IAC]);
    assert_eq!(recorder.events(), vec![Event::Data(vec![255])]);
    assert!(!telnet.has_pending_output());
}

#[test]
fn commands_split_across_reads() {
    let recorder = Recorder::default();
    let mut telnet = TelnetSession::new(SessionConfig::client(), recorder.clone());
    telnet.receive(&[b'a', consts::IAC]);
    telnet.receive(&[consts::AYT, b'b', consts::IAC, consts::WILL]);
    telnet.receive(&[option::ECHO, consts::IAC]);
    telnet.receive(&[consts::EL]);

    assert_eq!(
        recorder.events(),
        vec![
            Event::Data(b"a".to_vec()),
            Event::AreYouThere,
            Event::Data(b"b".to_vec()),
            Event::EraseLine,
        ]
    );
    assert_eq!(
        &telnet.take_output()[..],
        &[consts::IAC, consts::DONT, option::ECHO]
    );
}

#[test]
fn unhandled_subnegotiation_is_discarded() {
    let recorder = Recorder::default();
    let mut telnet = TelnetSession::new(SessionConfig::client(), recorder.clone());
    telnet.receive(&[b'x', consts::IAC, consts::SB, 99, 1, 2, 3, consts::IAC, consts::SE, b'y']);
    assert_eq!(
        recorder.events(),
        vec![Event::Data(b"x".to_vec()), Event::Data(b"y".to_vec())]
    );
}

#[test]
fn stray_se_is_ignored() {
    let recorder = Recorder::default();
    let mut telnet = TelnetSession::new(SessionConfig::client(), recorder.clone());
    telnet.receive(&[b'x', consts::IAC, consts::SE, b'y']);
    assert_eq!(
        recorder.events(),
        vec![Event::Data(b"x".to_vec()), Event::Data(b"y".to_vec())]
    );
}

// ============================================================================
// Output Framing Tests
// ============================================================================

#[test]
fn subnegotiation_framing() {
    let mut session = Session::new();
    session.send_subnegotiation(option::TTYPE, &[1, 2, 3]);
    assert_eq!(
        &session.take_output()[..],
        &[consts::IAC, consts::SB, 24, 1, 2, 3, consts::IAC, consts::SE]
    );

    session.send_subnegotiation(option::TTYPE, &[1, 255, 3]);
    assert_eq!(
        &session.take_output()[..],
        &[consts::IAC, consts::SB, 24, 1, 255, 255, 3, consts::IAC, consts::SE]
    );
}

#[test]
fn data_and_replies_keep_order() {
    struct Echo;
    impl SessionListener for Echo {
        fn incoming_data(&mut self, data: &[u8], session: &mut Session) {
            session.write(data);
        }
    }

    let mut telnet = TelnetSession::new(SessionConfig::server(), Echo);
    telnet.receive(&[b'a', consts::IAC, consts::WILL, 77, 0xFF, 0xFF, b'b']);
    // The echoed IAC is re-escaped on the way out.
    assert_eq!(
        &telnet.take_output()[..],
        &[b'a', consts::IAC, consts::DONT, 77, consts::IAC, consts::IAC, b'b']
    );
}

// ============================================================================
// Negotiation Tests
// ============================================================================

#[test]
fn repeated_requests_are_answered_once() {
    let mut telnet = TelnetSession::new(SessionConfig::server(), NullListener);
    telnet.session_mut().option(option::ECHO).allow_local();
    telnet.receive(&[consts::IAC, consts::DO, option::ECHO]);
    telnet.receive(&[consts::IAC, consts::DO, option::ECHO]);
    assert_eq!(
        &telnet.take_output()[..],
        &[consts::IAC, consts::WILL, option::ECHO]
    );
    assert!(telnet.session().is_enabled_locally(option::ECHO));

    telnet.session_mut().option(option::ECHO).request_local_enable();
    assert!(!telnet.has_pending_output());
}

#[test]
fn unsupported_options_are_refused() {
    let mut telnet = TelnetSession::new(SessionConfig::server(), NullListener);
    telnet.receive(&[consts::IAC, consts::WILL, option::NAWS]);
    telnet.receive(&[consts::IAC, consts::DO, 200]);
    assert_eq!(
        &telnet.take_output()[..],
        &[consts::IAC, consts::DONT, option::NAWS, consts::IAC, consts::WONT, 200]
    );
    assert!(!telnet.session().is_enabled_remotely(option::NAWS));
    assert!(!telnet.session().is_enabled_locally(200));
}

#[test]
fn refusals_are_not_acknowledged() {
    let mut telnet = TelnetSession::new(SessionConfig::server(), NullListener);
    telnet.receive(&[consts::IAC, consts::WONT, option::SGA]);
    telnet.receive(&[consts::IAC, consts::DONT, option::SGA]);
    assert!(!telnet.has_pending_output());
}

#[test]
fn peer_withdrawal_is_acknowledged() {
    let mut telnet = TelnetSession::new(SessionConfig::server(), NullListener);
    telnet.session_mut().option(option::SGA).allow_remote();
    telnet.receive(&[consts::IAC, consts::WILL, option::SGA]);
    telnet.take_output();
    telnet.receive(&[consts::IAC, consts::WONT, option::SGA]);
    assert_eq!(
        &telnet.take_output()[..],
        &[consts::IAC, consts::DONT, option::SGA]
    );
    assert!(!telnet.session().is_enabled_remotely(option::SGA));
}

// ============================================================================
// Client-Server Tests
// ============================================================================

/// Asks for terminal names once the peer agrees to send them.
struct RequestNames;

impl OptionStateListener for RequestNames {
    fn enabled_remotely(&mut self, session: &mut Session) {
        TerminalType::request_next(session);
    }
}

#[test]
fn client_server_handshake() {
    let sizes = Arc::new(Mutex::new(Vec::new()));
    let names = Arc::new(Mutex::new(Vec::new()));

    let server_events = Recorder::default();
    let mut server = TelnetSession::new(SessionConfig::server(), server_events.clone());
    {
        let session = server.session_mut();
        let sink = sizes.clone();
        NegotiateAboutWindowSize::new()
            .on_reported(move |size| sink.lock().unwrap().push(size))
            .attach(session);
        let sink = names.clone();
        TerminalType::new()
            .on_reported(move |name| sink.lock().unwrap().push(name.to_string()))
            .attach(session);
        session.option(option::TTYPE).add_state_listener(RequestNames);
    }

    let mut client = TelnetSession::new(SessionConfig::client(), NullListener);
    {
        let session = client.session_mut();
        NegotiateAboutWindowSize::new().attach(session);
        assert!(NegotiateAboutWindowSize::allow_offering(
            session,
            WindowSize::new(120, 40)
        ));
        TerminalType::new()
            .with_names(["xterm-256color", "vt100"])
            .attach(session);
        TerminalType::allow_local(session);
    }

    server.connected();
    client.connected();
    NegotiateAboutWindowSize::enable_remote(server.session_mut());
    TerminalType::request_remote_enable(server.session_mut());
    pump(&mut server, &mut client);

    assert_eq!(server_events.events(), vec![Event::Connected]);
    assert!(server.session().is_enabled_remotely(option::NAWS));
    assert!(client.session().is_enabled_locally(option::TTYPE));
    assert_eq!(*sizes.lock().unwrap(), vec![WindowSize::new(120, 40)]);
    assert_eq!(*names.lock().unwrap(), vec!["xterm-256color".to_string()]);

    // A resize is pushed without any further negotiation.
    NegotiateAboutWindowSize::set_window_size(client.session_mut(), WindowSize::new(132, 50));
    TerminalType::request_next(server.session_mut());
    pump(&mut server, &mut client);
    assert_eq!(
        *sizes.lock().unwrap(),
        vec![WindowSize::new(120, 40), WindowSize::new(132, 50)]
    );
    assert_eq!(
        *names.lock().unwrap(),
        vec!["xterm-256color".to_string(), "vt100".to_string()]
    );
}

#[test]
fn binary_mode_in_both_directions() {
    let events = Arc::new(Mutex::new(Vec::new()));
    let sink = events.clone();

    let mut server = TelnetSession::new(SessionConfig::server(), NullListener);
    BinaryTransmission::new(move |event| sink.lock().unwrap().push(event))
        .attach(server.session_mut());
    let mut client = TelnetSession::new(SessionConfig::client(), NullListener);
    client.session_mut().option(option::BINARY).allow_local().allow_remote();

    BinaryTransmission::suggest_local_binary(server.session_mut());
    BinaryTransmission::request_remote_binary(server.session_mut());
    pump(&mut server, &mut client);
    assert_eq!(
        *events.lock().unwrap(),
        vec![BinaryEvent::LocalBinary, BinaryEvent::RemoteBinary]
    );

    BinaryTransmission::request_remote_nvt_ascii(server.session_mut());
    pump(&mut server, &mut client);
    assert!(!client.session().is_enabled_locally(option::BINARY));
    assert_eq!(
        events.lock().unwrap().last(),
        Some(&BinaryEvent::RemoteNvtAscii)
    );
}
