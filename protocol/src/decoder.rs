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

//! Incremental TELNET stream decoder.
//!
//! [`StreamDecoder`] splits an arbitrarily fragmented byte stream into data
//! spans, simple commands and option commands. It never buffers input: every
//! call to [`StreamDecoder::accept`] consumes the whole slice and the only thing
//! carried into the next call is the [`DecoderState`], so a command split across
//! two reads resumes exactly where it stopped.

use crate::consts;
use std::fmt;
use tracing::warn;

/// One-byte TELNET commands a peer may send after `IAC`.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum TelnetCommand {
    /// `IAC BRK`
    Break,
    /// `IAC IP`
    InterruptProcess,
    /// `IAC AO`
    AbortOutput,
    /// `IAC AYT`
    AreYouThere,
    /// `IAC EC`
    EraseCharacter,
    /// `IAC EL`
    EraseLine,
    /// `IAC GA`
    GoAhead,
    /// `IAC SE`
    EndSubnegotiation,
}

impl TelnetCommand {
    /// Command byte following `IAC`.
    #[must_use]
    pub const fn to_u8(self) -> u8 {
        match self {
            TelnetCommand::Break => consts::BRK,
            TelnetCommand::InterruptProcess => consts::IP,
            TelnetCommand::AbortOutput => consts::AO,
            TelnetCommand::AreYouThere => consts::AYT,
            TelnetCommand::EraseCharacter => consts::EC,
            TelnetCommand::EraseLine => consts::EL,
            TelnetCommand::GoAhead => consts::GA,
            TelnetCommand::EndSubnegotiation => consts::SE,
        }
    }

    /// Parse a command byte, returning `None` for anything that is not a simple command.
    #[must_use]
    pub const fn from_u8(byte: u8) -> Option<TelnetCommand> {
        match byte {
            consts::BRK => Some(TelnetCommand::Break),
            consts::IP => Some(TelnetCommand::InterruptProcess),
            consts::AO => Some(TelnetCommand::AbortOutput),
            consts::AYT => Some(TelnetCommand::AreYouThere),
            consts::EC => Some(TelnetCommand::EraseCharacter),
            consts::EL => Some(TelnetCommand::EraseLine),
            consts::GA => Some(TelnetCommand::GoAhead),
            consts::SE => Some(TelnetCommand::EndSubnegotiation),
            _ => None,
        }
    }
}

impl fmt::Display for TelnetCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TelnetCommand::Break => "BRK",
            TelnetCommand::InterruptProcess => "IP",
            TelnetCommand::AbortOutput => "AO",
            TelnetCommand::AreYouThere => "AYT",
            TelnetCommand::EraseCharacter => "EC",
            TelnetCommand::EraseLine => "EL",
            TelnetCommand::GoAhead => "GA",
            TelnetCommand::EndSubnegotiation => "SE",
        };
        f.write_str(name)
    }
}

/// Commands that take an option code as their argument.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum OptionCommand {
    /// `IAC DO <option>`
    Do,
    /// `IAC DONT <option>`
    Dont,
    /// `IAC WILL <option>`
    Will,
    /// `IAC WONT <option>`
    Wont,
    /// `IAC SB <option>`
    Subnegotiate,
}

impl OptionCommand {
    /// Command byte following `IAC`.
    #[must_use]
    pub const fn to_u8(self) -> u8 {
        match self {
            OptionCommand::Do => consts::DO,
            OptionCommand::Dont => consts::DONT,
            OptionCommand::Will => consts::WILL,
            OptionCommand::Wont => consts::WONT,
            OptionCommand::Subnegotiate => consts::SB,
        }
    }

    /// Parse a command byte, returning `None` for anything that does not take an option.
    #[must_use]
    pub const fn from_u8(byte: u8) -> Option<OptionCommand> {
        match byte {
            consts::DO => Some(OptionCommand::Do),
            consts::DONT => Some(OptionCommand::Dont),
            consts::WILL => Some(OptionCommand::Will),
            consts::WONT => Some(OptionCommand::Wont),
            consts::SB => Some(OptionCommand::Subnegotiate),
            _ => None,
        }
    }
}

impl fmt::Display for OptionCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            OptionCommand::Do => "DO",
            OptionCommand::Dont => "DONT",
            OptionCommand::Will => "WILL",
            OptionCommand::Wont => "WONT",
            OptionCommand::Subnegotiate => "SB",
        };
        f.write_str(name)
    }
}

/// Receiver of decoded stream events.
///
/// Slices handed to [`CommandSink::data`] borrow the decoder's input and are
/// only valid for the duration of the call.
pub trait CommandSink {
    /// A non-empty run of data bytes.
    fn data(&mut self, data: &[u8]);
    /// A simple command, including `SE`.
    fn command(&mut self, command: TelnetCommand);
    /// An option command and its option code.
    fn option_command(&mut self, command: OptionCommand, option: u8);
}

/// Position of the decoder within the TELNET byte stream.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum DecoderState {
    /// Plain data.
    #[default]
    Normal,
    /// An `IAC` was seen; the next byte is a command.
    InterpretAsCommand,
    /// An option command was seen; the next byte is the option code.
    WaitingForOption(OptionCommand),
}

/// Resumable byte-stream lexer.
#[derive(Clone, Debug, Default)]
pub struct StreamDecoder {
    state: DecoderState,
}

impl StreamDecoder {
    /// Create a decoder positioned at plain data.
    #[must_use]
    pub fn new() -> StreamDecoder {
        StreamDecoder::default()
    }

    /// Current lexer state.
    #[must_use]
    pub fn state(&self) -> DecoderState {
        self.state
    }

    /// Discard any partially read command.
    pub fn reset(&mut self) {
        self.state = DecoderState::Normal;
    }

    /// Consume all of `bytes`, reporting events to `sink` in stream order.
    pub fn accept<S: CommandSink + ?Sized>(&mut self, mut bytes: &[u8], sink: &mut S) {
        while !bytes.is_empty() {
            match self.state {
                DecoderState::Normal => {
                    match bytes.iter().position(|&byte| byte == consts::IAC) {
                        Some(index) => {
                            if index > 0 {
                                sink.data(&bytes[..index]);
                            }
                            self.state = DecoderState::InterpretAsCommand;
                            bytes = &bytes[index + 1..];
                        }
                        None => {
                            sink.data(bytes);
                            bytes = &[];
                        }
                    }
                }
                DecoderState::InterpretAsCommand => {
                    if let Some((&byte, rest)) = bytes.split_first() {
                        self.interpret(byte, sink);
                        bytes = rest;
                    }
                }
                DecoderState::WaitingForOption(command) => {
                    if let Some((&option, rest)) = bytes.split_first() {
                        self.state = DecoderState::Normal;
                        sink.option_command(command, option);
                        bytes = rest;
                    }
                }
            }
        }
    }

    fn interpret<S: CommandSink + ?Sized>(&mut self, byte: u8, sink: &mut S) {
        self.state = DecoderState::Normal;
        match byte {
            // An escaped IAC is data, after which it is handled exactly like NOP.
            // Keep the two arms merged: splitting them changes what `IAC IAC`
            // produces.
            consts::IAC | consts::NOP | consts::DM => {
                if byte == consts::IAC {
                    sink.data(&[consts::IAC]);
                }
            }
            _ => {
                if let Some(command) = OptionCommand::from_u8(byte) {
                    self.state = DecoderState::WaitingForOption(command);
                } else if let Some(command) = TelnetCommand::from_u8(byte) {
                    sink.command(command);
                } else {
                    warn!("Received unknown command IAC {:#04X}, resynchronizing", byte);
                }
            }
        }
    }
}
