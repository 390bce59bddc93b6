//! Line-oriented wire format for provider output.
//!
//! One candidate per line, UTF-8. A line may carry a description after an
//! unescaped `:`; literal colons inside the candidate value are escaped as
//! `\:`. This is the convention zsh's `_describe` consumes, and the format
//! the legacy redtime provider emitted.
//!
//! Decoding is lenient by design: blank lines and lines that are not valid
//! UTF-8 are dropped individually while the rest of the response is kept.

use crate::protocol::{Candidate, CandidateKind};

/// Separator between a candidate value and its description.
pub const DESCRIPTION_SEPARATOR: char = ':';

/// Encode one candidate as a wire line (without the trailing newline).
pub fn encode_line(candidate: &Candidate) -> String {
    let escaped = candidate.value.replace(':', "\\:");
    match &candidate.description {
        Some(desc) => format!("{escaped}{DESCRIPTION_SEPARATOR}{desc}"),
        None => escaped,
    }
}

/// Decode one wire line into a candidate of the given kind.
///
/// Returns `None` for blank lines.
pub fn decode_line(line: &str, kind: CandidateKind) -> Option<Candidate> {
    let line = line.trim_end_matches('\r');
    if line.trim().is_empty() {
        return None;
    }

    let (value, description) = split_unescaped(line);
    let value = value.replace("\\:", ":");

    Some(Candidate {
        value,
        description: description
            .filter(|d| !d.is_empty())
            .map(|d| d.to_string()),
        kind,
    })
}

/// Decode a whole provider stdout stream.
///
/// Each line is decoded independently; undecodable lines are dropped,
/// well-formed lines in the same response are still used.
pub fn decode_stream(bytes: &[u8], kind: CandidateKind) -> Vec<Candidate> {
    bytes
        .split(|b| *b == b'\n')
        .filter_map(|raw| std::str::from_utf8(raw).ok())
        .filter_map(|line| decode_line(line, kind))
        .collect()
}

/// Render a candidate list as provider stdout.
pub fn encode_stream(candidates: &[Candidate]) -> String {
    let mut out = String::new();
    for candidate in candidates {
        out.push_str(&encode_line(candidate));
        out.push('\n');
    }
    out
}

/// Split a line at the first colon that is not preceded by a backslash.
fn split_unescaped(line: &str) -> (&str, Option<&str>) {
    let bytes = line.as_bytes();
    let mut idx = 0;
    while idx < bytes.len() {
        if bytes[idx] == b':' && (idx == 0 || bytes[idx - 1] != b'\\') {
            return (&line[..idx], Some(&line[idx + 1..]));
        }
        idx += 1;
    }
    (line, None)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_plain() {
        let c = Candidate::new("log", CandidateKind::Command);
        assert_eq!(encode_line(&c), "log");
    }

    #[test]
    fn test_encode_with_description() {
        let c = Candidate::described("log", "Log spent time", CandidateKind::Command);
        assert_eq!(encode_line(&c), "log:Log spent time");
    }

    #[test]
    fn test_encode_escapes_value_colons() {
        // "Website:42" is a value; its colon must not read as a separator.
        let c = Candidate::described("Website:42", "Website", CandidateKind::Argument);
        assert_eq!(encode_line(&c), "Website\\:42:Website");
    }

    #[test]
    fn test_decode_roundtrip_escaped() {
        let c = Candidate::described("Website:42", "Website", CandidateKind::Argument);
        let decoded = decode_line(&encode_line(&c), CandidateKind::Argument).unwrap();
        assert_eq!(decoded, c);
    }

    #[test]
    fn test_decode_without_description() {
        let c = decode_line("--project", CandidateKind::Option).unwrap();
        assert_eq!(c.value, "--project");
        assert_eq!(c.description, None);
    }

    #[test]
    fn test_decode_empty_description_is_none() {
        let c = decode_line("log:", CandidateKind::Command).unwrap();
        assert_eq!(c.description, None);
    }

    #[test]
    fn test_decode_drops_blank_lines() {
        assert!(decode_line("", CandidateKind::Command).is_none());
        assert!(decode_line("   ", CandidateKind::Command).is_none());
    }

    #[test]
    fn test_decode_stream_drops_bad_lines_individually() {
        let mut bytes = b"log:Log spent time\n".to_vec();
        bytes.extend_from_slice(&[0xff, 0xfe, b'\n']);
        bytes.extend_from_slice(b"overview:Show entries\n");

        let candidates = decode_stream(&bytes, CandidateKind::Command);
        let values: Vec<_> = candidates.iter().map(|c| c.value.as_str()).collect();
        assert_eq!(values, ["log", "overview"]);
    }

    #[test]
    fn test_decode_stream_tolerates_crlf() {
        let candidates = decode_stream(b"log:Log\r\noverview\r\n", CandidateKind::Command);
        assert_eq!(candidates.len(), 2);
        assert_eq!(candidates[1].value, "overview");
    }

    #[test]
    fn test_decode_stream_preserves_order() {
        let candidates = decode_stream(b"today\nyesterday\n", CandidateKind::Argument);
        let values: Vec<_> = candidates.iter().map(|c| c.value.as_str()).collect();
        assert_eq!(values, ["today", "yesterday"]);
    }

    #[test]
    fn test_encode_stream() {
        let candidates = vec![
            Candidate::described("--project", "Project to book on", CandidateKind::Option),
            Candidate::new("--tag", CandidateKind::Option),
        ];
        assert_eq!(
            encode_stream(&candidates),
            "--project:Project to book on\n--tag\n"
        );
    }
}
