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

//! # Telwire TELNET Protocol Engine
//!
//! This crate implements the TELNET protocol ([RFC854](https://tools.ietf.org/html/rfc854),
//! [RFC855](https://tools.ietf.org/html/rfc855)) as an embeddable session layer over a
//! byte stream. It performs no I/O: a transport feeds it the bytes it reads and
//! transmits the bytes it queues.
//!
//! ## Overview
//!
//! - **Decoding**: [`StreamDecoder`] splits an arbitrarily fragmented stream into data
//!   spans, simple commands and option commands, resuming across reads.
//! - **Negotiation**: [`NegotiationEngine`] runs the DO/DONT/WILL/WONT state machine
//!   for both ends of all 256 options, refusing anything not explicitly allowed.
//! - **Sub-negotiation**: [`SubNegotiationRouter`] hands `IAC SB ... IAC SE` payloads
//!   to the handler installed for the option.
//! - **Encoding**: [`OutputEncoder`] escapes outgoing data and frames commands and
//!   sub-negotiations as indivisible chunks in one FIFO.
//!
//! ## Core Components
//!
//! ### [`TelnetSession`]
//!
//! The object a transport drives. It owns the decoder, the router, the
//! [`Session`] and the application's [`SessionListener`].
//!
//! ### [`Session`] and [`OptionHandle`]
//!
//! The surface applications and option handlers use to negotiate, install
//! handlers and send data.
//!
//! ### [`handlers`]
//!
//! Terminal type, window size and binary transmission built on the handler
//! interface.
//!
//! ## Usage Example
//!
//! ```rust
//! use telwire_protocol::{consts, Session, SessionConfig, SessionListener, TelnetSession};
//!
//! struct Echo;
//!
//! impl SessionListener for Echo {
//!     fn incoming_data(&mut self, data: &[u8], session: &mut Session) {
//!         session.write(data);
//!     }
//! }
//!
//! let mut telnet = TelnetSession::new(SessionConfig::server(), Echo);
//! telnet.session_mut().option(consts::option::ECHO).allow_local();
//!
//! telnet.receive(&[b'h', consts::IAC, consts::DO, consts::option::ECHO, b'i']);
//! assert_eq!(
//!     &telnet.take_output()[..],
//!     &[b'h', consts::IAC, consts::WILL, consts::option::ECHO, b'i']
//! );
//! assert!(telnet.session().is_enabled_locally(consts::option::ECHO));
//! ```

#![warn(
    clippy::cargo,
    missing_docs,
    clippy::pedantic,
    future_incompatible,
    rust_2018_idioms
)]
#![allow(
    clippy::option_if_let_else,
    clippy::module_name_repetitions,
    clippy::missing_errors_doc
)]

pub mod consts;
mod config;
mod decoder;
mod encoder;
mod handle;
pub mod handlers;
mod listener;
mod negotiation;
pub mod registry;
mod result;
mod router;
mod session;
mod telnet;

pub use self::config::{DEFAULT_INPUT_BUFFER_SIZE, SessionConfig, SessionMode};
pub use self::decoder::{CommandSink, DecoderState, OptionCommand, StreamDecoder, TelnetCommand};
pub use self::encoder::{OutputEncoder, escape_into, escaped_len};
pub use self::handle::OptionHandle;
pub use self::listener::{
    NullListener, OptionHandler, OptionStateListener, SessionListener, SubNegotiationHandler,
};
pub use self::negotiation::{
    EndState, LOCAL, NegotiationAction, NegotiationEngine, NegotiationResponse, OptionState,
    REMOTE, Role, Side,
};
pub use self::registry::{TelnetOption, option_name};
pub use self::result::{ProtocolError, ProtocolResult, SubnegotiationErrorKind};
pub use self::router::{Routing, SubNegotiationRouter};
pub use self::session::Session;
pub use self::telnet::TelnetSession;
