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

//! Option implementations built on the handler interface.
//!
//! Each type is an [`OptionHandler`](crate::OptionHandler) that is installed
//! into a [`Session`](crate::Session) with its `attach` method. Operations that
//! need the session (negotiating, sending an update) are associated functions
//! taking `&mut Session`, because the installed handler is owned by the session.

/// Binary Transmission ([RFC856](https://tools.ietf.org/html/rfc856))
pub mod binary;
/// Negotiate About Window Size ([RFC1073](https://tools.ietf.org/html/rfc1073))
pub mod naws;
/// Terminal Type ([RFC1091](https://tools.ietf.org/html/rfc1091))
pub mod terminal_type;

pub use self::binary::{BinaryEvent, BinaryTransmission};
pub use self::naws::{NegotiateAboutWindowSize, WindowSize};
pub use self::terminal_type::TerminalType;
