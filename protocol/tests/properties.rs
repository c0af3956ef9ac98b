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

//! Property tests for the stream decoder and output encoder

use bytes::BytesMut;
use proptest::prelude::*;
use telwire_protocol::{
    CommandSink, DecoderState, OptionCommand, StreamDecoder, TelnetCommand, escape_into,
    escaped_len,
};

#[derive(Clone, Debug, Eq, PartialEq)]
enum Event {
    Data(Vec<u8>),
    Command(TelnetCommand),
    Option(OptionCommand, u8),
}

/// Records events, merging adjacent data spans.
#[derive(Default)]
struct Merged(Vec<Event>);

impl CommandSink for Merged {
    fn data(&mut self, data: &[u8]) {
        assert!(!data.is_empty(), "empty data span");
        if let Some(Event::Data(last)) = self.0.last_mut() {
            last.extend_from_slice(data);
        } else {
            self.0.push(Event::Data(data.to_vec()));
        }
    }

    fn command(&mut self, command: TelnetCommand) {
        self.0.push(Event::Command(command));
    }

    fn option_command(&mut self, command: OptionCommand, option: u8) {
        self.0.push(Event::Option(command, option));
    }
}

fn decode_in_pieces(input: &[u8], cuts: &[usize]) -> (Vec<Event>, DecoderState) {
    let mut decoder = StreamDecoder::new();
    let mut sink = Merged::default();
    let mut start = 0;
    let mut cuts: Vec<usize> = cuts.iter().map(|cut| cut % (input.len() + 1)).collect();
    cuts.sort_unstable();
    for cut in cuts {
        decoder.accept(&input[start..cut.max(start)], &mut sink);
        start = cut.max(start);
    }
    decoder.accept(&input[start..], &mut sink);
    (sink.0, decoder.state())
}

/// Streams biased towards command bytes so that every decoder state is visited.
fn telnet_stream() -> impl Strategy<Value = Vec<u8>> {
    prop::collection::vec(
        prop_oneof![
            3 => any::<u8>(),
            2 => Just(255u8),
            1 => 240u8..=254,
        ],
        0..512,
    )
}

proptest! {
    #[test]
    fn fragmentation_does_not_change_events(
        input in telnet_stream(),
        cuts in prop::collection::vec(any::<usize>(), 0..16),
    ) {
        let whole = decode_in_pieces(&input, &[]);
        let pieces = decode_in_pieces(&input, &cuts);
        prop_assert_eq!(whole, pieces);
    }

    #[test]
    fn escaped_data_decodes_to_itself(data in prop::collection::vec(any::<u8>(), 0..1024)) {
        let mut wire = BytesMut::new();
        escape_into(&mut wire, &data);
        prop_assert_eq!(wire.len(), escaped_len(&data));

        let mut decoder = StreamDecoder::new();
        let mut sink = Merged::default();
        decoder.accept(&wire, &mut sink);
        prop_assert_eq!(decoder.state(), DecoderState::Normal);
        if data.is_empty() {
            prop_assert!(sink.0.is_empty());
        } else {
            prop_assert_eq!(sink.0, vec![Event::Data(data)]);
        }
    }
}
