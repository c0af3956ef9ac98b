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

//! Well-known option registry.
//!
//! Maps option codes to the names assigned in the
//! [IANA TELNET options registry](https://www.iana.org/assignments/telnet-options/telnet-options.xhtml).
//! The names are used for diagnostics only; nothing in the negotiation engine
//! depends on whether an option is registered.

use std::fmt;

macro_rules! telnet_options {
    ($( $(#[$meta:meta])* $variant:ident = $code:literal => $name:literal, )*) => {
        ///
        /// [Telnet Options](https://www.iana.org/assignments/telnet-options/telnet-options.xhtml)
        ///
        #[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
        pub enum TelnetOption {
            $( $(#[$meta])* $variant, )*
            /// Any code without an IANA assignment.
            Unknown(u8),
        }

        impl TelnetOption {
            /// Look up the option for a code byte.
            #[must_use]
            pub const fn from_u8(code: u8) -> TelnetOption {
                match code {
                    $( $code => TelnetOption::$variant, )*
                    other => TelnetOption::Unknown(other),
                }
            }

            /// The code byte transmitted on the wire for this option.
            #[must_use]
            pub const fn to_u8(self) -> u8 {
                match self {
                    $( TelnetOption::$variant => $code, )*
                    TelnetOption::Unknown(code) => code,
                }
            }

            /// The registered name, or `None` for unassigned codes.
            #[must_use]
            pub const fn name(self) -> Option<&'static str> {
                match self {
                    $( TelnetOption::$variant => Some($name), )*
                    TelnetOption::Unknown(_) => None,
                }
            }
        }
    };
}

telnet_options! {
    /// [RFC856](https://tools.ietf.org/html/rfc856)
    BinaryTransmission = 0 => "Binary Transmission",
    /// [RFC857](https://tools.ietf.org/html/rfc857)
    Echo = 1 => "Echo",
    /// NIC 50005
    Reconnection = 2 => "Reconnection",
    /// [RFC858](https://tools.ietf.org/html/rfc858)
    SuppressGoAhead = 3 => "Suppress Go Ahead",
    /// NIC 50005
    ApproxMessageSizeNegotiation = 4 => "Approx Message Size Negotiation",
    /// [RFC859](https://tools.ietf.org/html/rfc859)
    Status = 5 => "Status",
    /// [RFC860](https://tools.ietf.org/html/rfc860)
    TimingMark = 6 => "Timing Mark",
    /// [RFC726](https://tools.ietf.org/html/rfc726)
    RemoteControlledTransAndEcho = 7 => "Remote Controlled Trans and Echo",
    /// NIC 50005
    OutputLineWidth = 8 => "Output Line Width",
    /// NIC 50005
    OutputPageSize = 9 => "Output Page Size",
    /// [RFC652](https://tools.ietf.org/html/rfc652)
    OutputCarriageReturnDisposition = 10 => "Output Carriage-Return Disposition",
    /// [RFC653](https://tools.ietf.org/html/rfc653)
    OutputHorizontalTabStops = 11 => "Output Horizontal Tab Stops",
    /// [RFC654](https://tools.ietf.org/html/rfc654)
    OutputHorizontalTabDisposition = 12 => "Output Horizontal Tab Disposition",
    /// [RFC655](https://tools.ietf.org/html/rfc655)
    OutputFormfeedDisposition = 13 => "Output Formfeed Disposition",
    /// [RFC656](https://tools.ietf.org/html/rfc656)
    OutputVerticalTabstops = 14 => "Output Vertical Tabstops",
    /// [RFC657](https://tools.ietf.org/html/rfc657)
    OutputVerticalTabDisposition = 15 => "Output Vertical Tab Disposition",
    /// [RFC658](https://tools.ietf.org/html/rfc658)
    OutputLinefeedDisposition = 16 => "Output Linefeed Disposition",
    /// [RFC698](https://tools.ietf.org/html/rfc698)
    ExtendedAscii = 17 => "Extended ASCII",
    /// [RFC727](https://tools.ietf.org/html/rfc727)
    Logout = 18 => "Logout",
    /// [RFC735](https://tools.ietf.org/html/rfc735)
    ByteMacro = 19 => "Byte Macro",
    /// [RFC1043](https://tools.ietf.org/html/rfc1043)
    DataEntryTerminal = 20 => "Data Entry Terminal",
    /// [RFC736](https://tools.ietf.org/html/rfc736)
    Supdup = 21 => "SUPDUP",
    /// [RFC749](https://tools.ietf.org/html/rfc749)
    SupdupOutput = 22 => "SUPDUP Output",
    /// [RFC779](https://tools.ietf.org/html/rfc779)
    SendLocation = 23 => "Send Location",
    /// [RFC1091](https://tools.ietf.org/html/rfc1091)
    TerminalType = 24 => "Terminal Type",
    /// [RFC885](https://tools.ietf.org/html/rfc885)
    EndOfRecord = 25 => "End of Record",
    /// [RFC927](https://tools.ietf.org/html/rfc927)
    TacacsUserIdentification = 26 => "TACACS User Identification",
    /// [RFC933](https://tools.ietf.org/html/rfc933)
    OutputMarking = 27 => "Output Marking",
    /// [RFC946](https://tools.ietf.org/html/rfc946)
    TerminalLocationNumber = 28 => "Terminal Location Number",
    /// [RFC1041](https://tools.ietf.org/html/rfc1041)
    Telnet3270Regime = 29 => "Telnet 3270 Regime",
    /// [RFC1053](https://tools.ietf.org/html/rfc1053)
    X3Pad = 30 => "X.3 PAD",
    /// [RFC1073](https://tools.ietf.org/html/rfc1073)
    NegotiateAboutWindowSize = 31 => "Negotiate About Window Size",
    /// [RFC1079](https://tools.ietf.org/html/rfc1079)
    TerminalSpeed = 32 => "Terminal Speed",
    /// [RFC1372](https://tools.ietf.org/html/rfc1372)
    RemoteFlowControl = 33 => "Remote Flow Control",
    /// [RFC1184](https://tools.ietf.org/html/rfc1184)
    Linemode = 34 => "Linemode",
    /// [RFC1096](https://tools.ietf.org/html/rfc1096)
    XDisplayLocation = 35 => "X Display Location",
    /// [RFC1408](https://tools.ietf.org/html/rfc1408)
    EnvironmentOption = 36 => "Environment Option",
    /// [RFC2941](https://tools.ietf.org/html/rfc2941)
    AuthenticationOption = 37 => "Authentication Option",
    /// [RFC2946](https://tools.ietf.org/html/rfc2946)
    EncryptionOption = 38 => "Encryption Option",
    /// [RFC1572](https://tools.ietf.org/html/rfc1572)
    NewEnvironmentOption = 39 => "New Environment Option",
    /// [RFC2355](https://tools.ietf.org/html/rfc2355)
    Tn3270E = 40 => "TN3270E",
    /// Rob Earhart
    XAuth = 41 => "XAUTH",
    /// [RFC2066](https://tools.ietf.org/html/rfc2066)
    Charset = 42 => "CHARSET",
    /// Robert Barnes
    TelnetRemoteSerialPort = 43 => "Telnet Remote Serial Port (RSP)",
    /// [RFC2217](https://tools.ietf.org/html/rfc2217)
    ComPortControlOption = 44 => "Com Port Control Option",
    /// Wirt Atmar
    TelnetSuppressLocalEcho = 45 => "Telnet Suppress Local Echo",
    /// Michael Boe
    TelnetStartTls = 46 => "Telnet Start TLS",
    /// [RFC2840](https://tools.ietf.org/html/rfc2840)
    Kermit = 47 => "KERMIT",
    /// David Croft
    SendUrl = 48 => "SEND-URL",
    /// Jeffrey Altman
    ForwardX = 49 => "FORWARD_X",
    /// Steve McGregory
    PragmaLogon = 138 => "TELOPT PRAGMA LOGON",
    /// Steve McGregory
    SspiLogon = 139 => "TELOPT SSPI LOGON",
    /// Steve McGregory
    PragmaHeartbeat = 140 => "TELOPT PRAGMA HEARTBEAT",
    /// [RFC861](https://tools.ietf.org/html/rfc861)
    ExtendedOptionsList = 255 => "Extended-Options-List",
}

/// Registered name of an option code, if any.
///
/// ```
/// use telwire_protocol::registry::option_name;
///
/// assert_eq!(option_name(24), Some("Terminal Type"));
/// assert_eq!(option_name(200), None);
/// ```
#[must_use]
pub const fn option_name(code: u8) -> Option<&'static str> {
    TelnetOption::from_u8(code).name()
}

impl fmt::Display for TelnetOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.name() {
            Some(name) => write!(f, "{name} ({})", self.to_u8()),
            None => write!(f, "Unknown Option ({})", self.to_u8()),
        }
    }
}

impl From<u8> for TelnetOption {
    fn from(code: u8) -> Self {
        TelnetOption::from_u8(code)
    }
}

impl From<TelnetOption> for u8 {
    fn from(option: TelnetOption) -> Self {
        option.to_u8()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts;

    #[test]
    fn every_code_maps_back_to_itself() {
        for code in 0..=u8::MAX {
            assert_eq!(TelnetOption::from_u8(code).to_u8(), code);
        }
    }

    #[test]
    fn well_known_codes() {
        assert_eq!(
            TelnetOption::from(consts::option::BINARY),
            TelnetOption::BinaryTransmission
        );
        assert_eq!(TelnetOption::from(consts::option::TTYPE), TelnetOption::TerminalType);
        assert_eq!(
            TelnetOption::from(consts::option::NAWS),
            TelnetOption::NegotiateAboutWindowSize
        );
        assert_eq!(
            TelnetOption::from(consts::option::EXOPL),
            TelnetOption::ExtendedOptionsList
        );
        assert_eq!(u8::from(TelnetOption::Linemode), consts::option::LINEMODE);
    }

    #[test]
    fn unassigned_codes_are_unknown() {
        assert_eq!(TelnetOption::from_u8(50), TelnetOption::Unknown(50));
        assert_eq!(TelnetOption::from_u8(137), TelnetOption::Unknown(137));
        assert_eq!(TelnetOption::from_u8(141), TelnetOption::Unknown(141));
        assert_eq!(option_name(254), None);
    }

    #[test]
    fn display() {
        assert_eq!(TelnetOption::Echo.to_string(), "Echo (1)");
        assert_eq!(TelnetOption::Unknown(99).to_string(), "Unknown Option (99)");
    }
}
