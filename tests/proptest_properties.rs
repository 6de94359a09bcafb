use proptest::prelude::*;

use romdiff::accum::RunAccumulator;
use romdiff::dialect::Dialect;

/// Feed a sequence of (is_diff, byte) events at consecutive addresses,
/// flushing at the end, and return the emitted text.
fn feed(dialect: Dialect, events: &[(bool, u8)]) -> String {
    let mut acc = RunAccumulator::new(dialect, Vec::new());
    let mut address = 0x1000u32;
    for &(is_diff, byte) in events {
        if is_diff {
            acc.on_diff(address, byte).unwrap();
        } else {
            acc.on_same(byte).unwrap();
        }
        address += 1;
    }
    acc.flush().unwrap();
    String::from_utf8(acc.into_inner()).unwrap()
}

/// Parse stroop lines into (start, byte_count) spans.
fn stroop_spans(output: &str) -> Vec<(u32, u32)> {
    output
        .lines()
        .map(|line| {
            let (prefix, hex) = line.split_once(": ").expect("malformed line");
            assert!(prefix.starts_with("80"), "bad tag: {line}");
            let start = u32::from_str_radix(&prefix[2..], 16).expect("bad address");
            assert!(hex.len() % 2 == 0 && !hex.is_empty(), "bad data: {line}");
            (start, (hex.len() / 2) as u32)
        })
        .collect()
}

fn events_strategy() -> impl Strategy<Value = Vec<(bool, u8)>> {
    proptest::collection::vec((any::<bool>(), any::<u8>()), 0..512)
}

proptest! {
    #[test]
    fn prop_spans_are_disjoint_and_increasing(events in events_strategy()) {
        let output = feed(Dialect::stroop(), &events);
        let spans = stroop_spans(&output);
        for pair in spans.windows(2) {
            let (prev_start, prev_len) = pair[0];
            let (next_start, _) = pair[1];
            prop_assert!(
                next_start >= prev_start + prev_len,
                "overlapping spans: {pair:?}"
            );
        }
    }

    #[test]
    fn prop_formatting_is_idempotent(events in events_strategy()) {
        let first = feed(Dialect::stroop(), &events);
        let second = feed(Dialect::stroop(), &events);
        prop_assert_eq!(first, second);
    }

    #[test]
    fn prop_gameshark_records_hold_one_or_two_bytes(events in events_strategy()) {
        let output = feed(Dialect::gameshark(), &events);
        for line in output.lines() {
            // A{R}{AAAAAA} {DDDD}: 13 characters, R in {0, 1}.
            prop_assert_eq!(line.len(), 13, "line: {}", line);
            let code = line.as_bytes()[1];
            prop_assert!(code == b'0' || code == b'1', "length code: {}", line);
        }
    }

    #[test]
    fn prop_gameshark_pure_diff_run_splits_in_pairs(
        bytes in proptest::collection::vec(any::<u8>(), 1..64)
    ) {
        let events: Vec<(bool, u8)> = bytes.iter().map(|&b| (true, b)).collect();
        let output = feed(Dialect::gameshark(), &events);
        prop_assert_eq!(output.lines().count(), bytes.len().div_ceil(2));
    }

    #[test]
    fn prop_gameshark_covers_every_diff_byte(events in events_strategy()) {
        // With zero gap tolerance no matched byte is ever committed, so the
        // record payloads sum to exactly the number of diff events.
        let diff_count: usize = events.iter().filter(|&&(d, _)| d).count();
        let output = feed(Dialect::gameshark(), &events);
        let payload: usize = output
            .lines()
            .map(|line| (line.as_bytes()[1] - b'0') as usize + 1)
            .sum();
        prop_assert_eq!(payload, diff_count);
    }

    #[test]
    fn prop_stroop_trailing_matches_never_emitted(
        bytes in proptest::collection::vec(any::<u8>(), 1..32)
    ) {
        // One diff followed by any number of matches: a single 1-byte record.
        let mut events = vec![(true, bytes[0])];
        events.extend(bytes[1..].iter().map(|&b| (false, b)));
        let output = feed(Dialect::stroop(), &events);
        prop_assert_eq!(output, "80001000: ".to_string() + &format!("{:02x}\n", bytes[0]));
    }
}
