use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

/// Everything but the RFC 3986 unreserved characters.
const SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

/// Encodes a record id so it reads as exactly one path segment, whatever it contains.
pub fn encode_segment(raw: &str) -> String {
    utf8_percent_encode(raw, SEGMENT).to_string()
}

/// Ids that a URL parser would collapse instead of keeping as a segment.
pub fn is_addressable(id: &str) -> bool {
    !matches!(id, "" | "." | "..")
}
