use std::fmt;
use std::str::FromStr;

use tracing::debug;

use super::{Bignum, BignumError, Word};
use crate::digits::Digits;

/// Hex characters needed to print one full word
const HEX_DIGITS_PER_WORD: usize = (Word::BITS / 4) as usize;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// Nothing was left after the sign and `0x` prefix
    MissingDigits,
    /// A character which isn't a hex digit, `index` is its byte offset in the input
    InvalidCharacter { index: usize, character: u8 },
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self:?}")
    }
}

impl std::error::Error for ParseError {}

/// Convert a hex character to its value
fn h2b(b: u8) -> Option<Word> {
    match b {
        b'0'..=b'9' => Some(Word::from(b - b'0')),
        b'A'..=b'F' => Some(Word::from(b - b'A' + 10)),
        b'a'..=b'f' => Some(Word::from(b - b'a' + 10)),
        _ => None,
    }
}

impl Bignum {
    /// Parse `[+|-][0x]<hex digits>`, e.g. `-0xf0f0f` or `00f00`.
    ///
    /// Leading zeros are skipped so the result is always canonical, and `-0` is plain zero.
    /// ```
    /// use rusty_bignum::Bignum;
    /// assert_eq!(Bignum::from_hex("00f00").unwrap().to_string(), "0xf00");
    /// assert_eq!(Bignum::from_hex("-f0f0f").unwrap().to_string(), "-0xf0f0f");
    /// ```
    pub fn from_hex(s: &str) -> Result<Self, BignumError> {
        Self::parse_hex(s.as_bytes()).map_err(|e| {
            debug!(input = s, error = ?e, "failed to parse hex integer");
            e
        })
    }

    /// Render as `0x...` or `-0x...`, the same as the `Display` impl
    /// ```
    /// use rusty_bignum::Bignum;
    /// assert_eq!(Bignum::zero().to_hex_string(), "0x0");
    /// ```
    pub fn to_hex_string(&self) -> String {
        self.to_string()
    }

    fn parse_hex(input: &[u8]) -> Result<Self, BignumError> {
        let (positive, mut start) = match input.first() {
            Some(b'-') => (false, 1),
            Some(b'+') => (true, 1),
            _ => (true, 0),
        };
        if input[start..].starts_with(b"0x") {
            start += 2;
        }

        let hex = &input[start..];
        if hex.is_empty() {
            return Err(ParseError::MissingDigits.into());
        }

        // skip leading zeros, but always keep the last digit so zero stays "0"
        let skipped = hex
            .iter()
            .position(|&b| b != b'0')
            .unwrap_or(hex.len())
            .min(hex.len() - 1);
        let offset = start + skipped;
        let hex = &hex[skipped..];

        let mut digits = Digits::with_capacity(hex.len().div_ceil(HEX_DIGITS_PER_WORD))?;
        let mut chunk_end = hex.len();
        for chunk in hex.rchunks(HEX_DIGITS_PER_WORD) {
            let chunk_start = chunk_end - chunk.len();
            let mut word: Word = 0;
            for (i, &b) in chunk.iter().enumerate() {
                let nibble = h2b(b).ok_or(ParseError::InvalidCharacter {
                    index: offset + chunk_start + i,
                    character: b,
                })?;
                word = (word << 4) | nibble;
            }
            digits.push(word)?;
            chunk_end = chunk_start;
        }

        Ok(Self::from_parts(positive, digits)?)
    }
}

impl FromStr for Bignum {
    type Err = BignumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

impl fmt::Display for Bignum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_negative() {
            write!(f, "-")?;
        }

        let mut words = self.words().iter().rev();
        if let Some(top) = words.next() {
            write!(f, "0x{top:x}")?;
        }
        for word in words {
            write!(f, "{word:0width$x}", width = HEX_DIGITS_PER_WORD)?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_h2b() {
        for (b, v) in (b'0'..=b'9').zip(0..=9) {
            assert_eq!(h2b(b), Some(v));
        }

        for (b, v) in (b'A'..=b'F').zip(10..=15) {
            assert_eq!(h2b(b), Some(v));
        }

        for (b, v) in (b'a'..=b'f').zip(10..=15) {
            assert_eq!(h2b(b), Some(v));
        }
    }

    #[test]
    fn test_h2b_fails() {
        assert_eq!(h2b(b'G'), None);
        assert_eq!(h2b(b'x'), None);
        assert_eq!(h2b(b'#'), None);
    }

    #[test]
    fn test_display_bignums() {
        let nums = [
            Bignum::zero(),
            Bignum::from(5u8),
            Bignum::from(u64::MAX),
            Bignum::from_words(true, &[0, 1]).unwrap(),
            Bignum::from_words(false, &[0xabc, 0x1]).unwrap(),
            Bignum::from_words(true, &[Word::MAX; 3]).unwrap(),
        ];
        let strings = [
            "0x0",
            "0x5",
            "0xffffffffffffffff",
            "0x10000000000000000",
            "-0x10000000000000abc",
            "0xffffffffffffffffffffffffffffffffffffffffffffffff",
        ];

        for (n, s) in nums.iter().zip(strings.iter()) {
            assert_eq!(format!("{n}"), *s);
            assert_eq!(n.to_hex_string(), *s);
        }
    }

    #[test]
    fn test_from_str_bignums() {
        let cases = [
            ("0x0", "0x0"),
            ("0", "0x0"),
            ("000", "0x0"),
            ("-0", "0x0"),
            ("+0x0000", "0x0"),
            ("00f00", "0xf00"),
            ("-f0f0f", "-0xf0f0f"),
            ("+0xfedcba", "0xfedcba"),
            ("0x00fedcba9876543210", "0xfedcba9876543210"),
            ("0xFEDCBA", "0xfedcba"),
            (
                "-0x0123456789abcdef0123456789abcdef",
                "-0x123456789abcdef0123456789abcdef",
            ),
        ];

        for (input, output) in cases {
            let n: Bignum = input.parse().unwrap();
            assert_eq!(n.to_string(), output, "parsing {input:?}");
        }
    }

    #[test]
    fn test_from_str_word_grouping() {
        let n: Bignum = "0x1fedcba9876543210".parse().unwrap();
        assert_eq!(n.words(), &[0xfedcba9876543210, 0x1]);

        let n: Bignum = "0x00000000000000000000000000000001".parse().unwrap();
        assert_eq!(n.words(), &[1]);

        let n: Bignum = "-0x0".parse().unwrap();
        assert!(!n.is_negative());
    }

    #[test]
    fn test_from_str_fails() {
        let cases = [
            ("", ParseError::MissingDigits),
            ("-", ParseError::MissingDigits),
            ("+0x", ParseError::MissingDigits),
            (
                "0xfg",
                ParseError::InvalidCharacter {
                    index: 3,
                    character: b'g',
                },
            ),
            (
                "-12 34",
                ParseError::InvalidCharacter {
                    index: 3,
                    character: b' ',
                },
            ),
            (
                "0x0x1",
                ParseError::InvalidCharacter {
                    index: 3,
                    character: b'x',
                },
            ),
            (
                "--1",
                ParseError::InvalidCharacter {
                    index: 1,
                    character: b'-',
                },
            ),
            (
                "0x123456789abcdef0123456789abcdefz",
                ParseError::InvalidCharacter {
                    index: 33,
                    character: b'z',
                },
            ),
        ];

        for (input, err) in cases {
            assert_eq!(
                input.parse::<Bignum>(),
                Err(BignumError::ParseError(err)),
                "parsing {input:?}"
            );
        }
    }
}
