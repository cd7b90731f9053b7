//! Parsing of the human-readable durations printed in `EXPLAIN` output,
//! e.g. `12.3 ms`, `1.2s` or `850µs`.

use std::time::Duration;

/// Parse `<number>[ ]<unit>` into a [`Duration`].
///
/// Surrounding whitespace is ignored. Returns `None` for unknown units and
/// malformed input.
pub fn parse_duration(input: &str) -> Option<Duration> {
    humantime::parse_duration(input.trim()).ok()
}
