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

//! Outbound framing.
//!
//! [`OutputEncoder`] is the single ordered sink for everything a session
//! transmits. Each call appends exactly one chunk, so a negotiation reply or a
//! complete `IAC SB ... IAC SE` envelope can never be interleaved with other
//! output.

use crate::consts;
use crate::decoder::{OptionCommand, TelnetCommand};
use bytes::{Buf, BufMut, Bytes, BytesMut};
use std::collections::VecDeque;
use tracing::trace;

/// Append `data` to `dst`, doubling every `IAC` byte.
pub fn escape_into(dst: &mut BytesMut, data: &[u8]) {
    let mut rest = data;
    while let Some(index) = rest.iter().position(|&byte| byte == consts::IAC) {
        dst.put_slice(&rest[..=index]);
        dst.put_u8(consts::IAC);
        rest = &rest[index + 1..];
    }
    dst.put_slice(rest);
}

/// Number of bytes `data` occupies once escaped.
#[must_use]
pub fn escaped_len(data: &[u8]) -> usize {
    data.len() + data.iter().filter(|&&byte| byte == consts::IAC).count()
}

/// FIFO of framed chunks awaiting transmission.
///
/// Every queueing call appends one complete chunk: escaped application data,
/// a two or three byte command, or a whole `IAC SB ... IAC SE` envelope. The
/// transport either drains the queue in one go with [`take_all`](Self::take_all)
/// or writes the [`front`](Self::front) chunk and reports progress through
/// [`advance`](Self::advance), so a partial write never splits the ordering.
///
/// # Example
/// ```
/// use telwire_protocol::consts::{self, option};
/// use telwire_protocol::{OptionCommand, OutputEncoder};
///
/// let mut encoder = OutputEncoder::new();
/// encoder.write(&[b'a', consts::IAC]);
/// encoder.send_option_command(OptionCommand::Will, option::ECHO);
/// assert_eq!(encoder.pending_len(), 6);
///
/// let wire = encoder.take_all();
/// assert_eq!(
///     &wire[..],
///     &[b'a', consts::IAC, consts::IAC, consts::IAC, consts::WILL, option::ECHO]
/// );
/// assert!(!encoder.has_pending());
/// ```
#[derive(Clone, Debug, Default)]
pub struct OutputEncoder {
    queue: VecDeque<Bytes>,
    pending: usize,
}

impl OutputEncoder {
    /// Create an empty encoder.
    #[must_use]
    pub fn new() -> OutputEncoder {
        OutputEncoder::default()
    }

    fn push(&mut self, chunk: Bytes) {
        trace!("Queued {} bytes for transmission", chunk.len());
        self.pending += chunk.len();
        self.queue.push_back(chunk);
    }

    /// Queue application data, escaping any literal `IAC` bytes.
    pub fn write(&mut self, data: &[u8]) {
        if data.is_empty() {
            return;
        }
        let mut chunk = BytesMut::with_capacity(escaped_len(data));
        escape_into(&mut chunk, data);
        self.push(chunk.freeze());
    }

    /// Queue `IAC <command> <option>`.
    pub fn send_option_command(&mut self, command: OptionCommand, option: u8) {
        self.push(Bytes::copy_from_slice(&[consts::IAC, command.to_u8(), option]));
    }

    /// Queue `IAC <command>`.
    pub fn send_command(&mut self, command: TelnetCommand) {
        self.push(Bytes::copy_from_slice(&[consts::IAC, command.to_u8()]));
    }

    /// Queue `IAC SB <option> <escaped payload> IAC SE` as one chunk.
    pub fn send_subnegotiation(&mut self, option: u8, payload: &[u8]) {
        let mut chunk = BytesMut::with_capacity(escaped_len(payload) + 5);
        chunk.put_slice(&[consts::IAC, consts::SB, option]);
        escape_into(&mut chunk, payload);
        chunk.put_slice(&[consts::IAC, consts::SE]);
        self.push(chunk.freeze());
    }

    /// True when at least one byte is waiting.
    #[must_use]
    pub fn has_pending(&self) -> bool {
        self.pending > 0
    }

    /// Number of bytes waiting.
    #[must_use]
    pub fn pending_len(&self) -> usize {
        self.pending
    }

    /// Oldest chunk, without removing it.
    #[must_use]
    pub fn front(&self) -> Option<&Bytes> {
        self.queue.front()
    }

    /// Remove and return the oldest chunk.
    pub fn pop_chunk(&mut self) -> Option<Bytes> {
        let chunk = self.queue.pop_front()?;
        self.pending -= chunk.len();
        Some(chunk)
    }

    /// Mark `count` bytes from the front of the queue as transmitted.
    pub fn advance(&mut self, mut count: usize) {
        while count > 0 {
            let Some(front) = self.queue.front_mut() else {
                break;
            };
            let step = count.min(front.len());
            front.advance(step);
            self.pending -= step;
            count -= step;
            if front.is_empty() {
                self.queue.pop_front();
            }
        }
    }

    /// Drain every queued chunk into one contiguous buffer.
    pub fn take_all(&mut self) -> BytesMut {
        let mut out = BytesMut::with_capacity(self.pending);
        for chunk in self.queue.drain(..) {
            out.put(chunk);
        }
        self.pending = 0;
        out
    }
}
