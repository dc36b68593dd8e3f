// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Source text utilities
//!
//! Line lookups for nodes whose parser span is unknown.

/// Convert a byte offset to a 1-based line number
///
/// # Arguments
///
/// * `byte_offset` - Byte offset in source (clamped to the source length)
/// * `source` - Source code text
///
/// # Examples
///
/// ```
/// use sqlscope_context::source::byte_to_line;
///
/// let source = "SELECT id\nFROM users";
/// assert_eq!(byte_to_line(0, source), 1);
/// assert_eq!(byte_to_line(10, source), 2);
/// ```
pub fn byte_to_line(byte_offset: usize, source: &str) -> usize {
    let safe_byte_offset = byte_offset.min(source.len());
    source.as_bytes()[..safe_byte_offset]
        .iter()
        .filter(|&&b| b == b'\n')
        .count()
        + 1
}

/// Line of the first case-insensitive occurrence of `needle` in `source`
///
/// Only the first line of `needle` is searched for, so multi-line node text
/// still resolves to the line it starts on.
///
/// # Returns
///
/// `None` when `needle` is blank or does not occur in `source`
pub fn find_line(source: &str, needle: &str) -> Option<usize> {
    let first_line = needle.lines().next()?.trim();
    if first_line.is_empty() {
        return None;
    }

    // ASCII lowercasing keeps byte offsets aligned with `source`
    let haystack = source.to_ascii_lowercase();
    let needle = first_line.to_ascii_lowercase();
    haystack
        .find(&needle)
        .map(|offset| byte_to_line(offset, source))
}
