//! Binary payloads carried as base64 JSON strings (standard alphabet, padded).
use alloc::{format, string::String, vec::Vec};

use data_encoding::BASE64;

use crate::error::{Error, SyntaxError};

/// Encodes `bytes` as base64 text, without quotes.
#[must_use]
pub fn encode(bytes: &[u8]) -> String {
    BASE64.encode(bytes)
}

/// Decodes base64 text, without quotes.
///
/// # Errors
///
/// Returns [`Error::Syntax`] pointing at the first offending character.
pub fn decode(text: &str) -> Result<Vec<u8>, Error> {
    BASE64.decode(text.as_bytes()).map_err(|e| {
        Error::Syntax(SyntaxError::new(
            text,
            e.position,
            format!("invalid base64: {}", e.kind),
        ))
    })
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::{decode, encode};

    #[rstest]
    #[case(b"", "")]
    #[case(b"f", "Zg==")]
    #[case(b"foobar", "Zm9vYmFy")]
    #[case(&[0xff, 0x00, 0x10], "/wAQ")]
    fn encodes_with_padding(#[case] bytes: &[u8], #[case] text: &str) {
        assert_eq!(encode(bytes), text);
        assert_eq!(decode(text).unwrap(), bytes);
    }

    #[test]
    fn decode_error_points_at_offender() {
        let Err(crate::Error::Syntax(e)) = decode("Zm9v*mFy") else {
            panic!("expected a syntax error");
        };
        assert_eq!(e.pos(), 4);
    }
}
