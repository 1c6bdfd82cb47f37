//! # Argument Value Encoding (`common::encoding`)
//!
//! File: cli/src/common/encoding.rs
//! Author: cpanel-api maintainers
//!
//! URL component escaping for `KEY=VALUE` tokens handed to the API utilities.
//! Letters, digits and `-._~/` pass through; every other byte of the UTF-8
//! encoding becomes `%XX`. This is the only transformation applied to
//! caller-supplied values: no process is started through a shell, so nothing
//! is ever shell-quoted.
//!
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

/// Bytes escaped in argument values.
const ARG_VALUE: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~')
    .remove(b'/');

/// Percent-encodes an argument value.
pub fn encode_value(value: &str) -> String {
    utf8_percent_encode(value, ARG_VALUE).to_string()
}

// --- Unit Tests ---
#[cfg(test)]
mod tests {
    use super::*;
    use percent_encoding::percent_decode_str;

    fn decode_value(encoded: &str) -> String {
        percent_decode_str(encoded).decode_utf8().unwrap().into_owned()
    }

    #[test]
    fn test_plain_values_unchanged() {
        assert_eq!(encode_value("foo_test1"), "foo_test1");
        assert_eq!(encode_value("changeme"), "changeme");
        assert_eq!(encode_value("/home/bob/public_html"), "/home/bob/public_html");
        assert_eq!(encode_value("a-b.c~d"), "a-b.c~d");
    }

    #[test]
    fn test_shell_metacharacters_escaped() {
        assert_eq!(encode_value("a&b"), "a%26b");
        assert_eq!(encode_value("a|b"), "a%7Cb");
        assert_eq!(encode_value("a;b"), "a%3Bb");
        assert_eq!(encode_value("<x>"), "%3Cx%3E");
        assert_eq!(encode_value("two words"), "two%20words");
        assert_eq!(encode_value("$HOME"), "%24HOME");
        assert_eq!(encode_value("`id`"), "%60id%60");
        assert_eq!(encode_value("k=v"), "k%3Dv");
    }

    #[test]
    fn test_non_ascii_encoded_as_utf8_bytes() {
        assert_eq!(encode_value("é"), "%C3%A9");
    }

    #[test]
    fn test_decode_reverses_encode() {
        let samples = [
            "",
            "plain",
            "p@ss w0rd!&|;<>",
            "100% sure?",
            "multi\nline\r\n",
            "ünïcødé ✓",
            "%41 already looks encoded",
        ];
        for sample in samples {
            let encoded = encode_value(sample);
            assert_eq!(decode_value(&encoded), sample, "round trip of {:?}", sample);
        }
    }
}
