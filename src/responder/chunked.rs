//! Chunked transfer coding helpers.

use crate::error_handling::SessionError;

/// Parses a chunk-size line, ignoring chunk extensions.
pub(crate) fn parse_chunk_size(line: &str) -> Result<usize, SessionError> {
    let size = line.split(';').next().unwrap_or_default().trim();
    if size.is_empty() || !size.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(SessionError::DecodeError(format!(
            "invalid chunk size line `{line}`"
        )));
    }
    usize::from_str_radix(size, 16)
        .map_err(|_| SessionError::DecodeError(format!("chunk size `{size}` out of range")))
}

/// What follows a chunk payload.
#[derive(Debug, PartialEq, Eq)]
pub(crate) enum Terminator {
    /// CRLF or a bare LF, with its length.
    Found(usize),
    /// Not enough bytes buffered to decide.
    Incomplete,
    Missing,
}

pub(crate) fn match_terminator(buffered: &[u8]) -> Terminator {
    match buffered {
        [b'\r', b'\n', ..] => Terminator::Found(2),
        [b'\n', ..] => Terminator::Found(1),
        [] | [b'\r'] => Terminator::Incomplete,
        _ => Terminator::Missing,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chunk_sizes() {
        assert_eq!(parse_chunk_size("5").expect("hex"), 5);
        assert_eq!(parse_chunk_size("1A").expect("hex"), 26);
        assert_eq!(parse_chunk_size("ff; name=value").expect("extension"), 255);
        assert_eq!(parse_chunk_size("0").expect("last chunk"), 0);
        assert_eq!(parse_chunk_size(" 10 ").expect("padded"), 16);
    }

    #[test]
    fn test_bad_chunk_sizes() {
        for line in ["", "zz", "-1", "0x10", "; ext", "ffffffffffffffffffff"] {
            assert!(
                matches!(parse_chunk_size(line), Err(SessionError::DecodeError(_))),
                "accepted {line:?}"
            );
        }
    }

    #[test]
    fn test_terminators() {
        assert_eq!(match_terminator(b"\r\n0\r\n"), Terminator::Found(2));
        assert_eq!(match_terminator(b"\nabc"), Terminator::Found(1));
        assert_eq!(match_terminator(b""), Terminator::Incomplete);
        assert_eq!(match_terminator(b"\r"), Terminator::Incomplete);
        assert_eq!(match_terminator(b"xx"), Terminator::Missing);
        assert_eq!(match_terminator(b"\rx"), Terminator::Missing);
    }
}
