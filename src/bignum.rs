use crate::digits::Digits;
use std::cmp::Ordering;
use std::collections::TryReserveError;

mod arith;
mod div;
mod hex;

pub use hex::ParseError;

/// One digit of a [`Bignum`], the base is 2^64
pub type Word = u64;

/// Wide enough to hold a word by word product plus a carry
pub(crate) type DoubleWord = u128;

pub(crate) const WORD_BITS: u32 = Word::BITS;

/// An arbitrary precision signed integer stored as a sign and a magnitude.
///
/// The magnitude is a little endian sequence of [`Word`]s which is never empty and never has a
/// zero word in the most significant position, except for zero itself which is the single word
/// `[0]`. Zero is always non-negative. Every constructor and operation maintains this, which is
/// what makes the derived equality and the length based magnitude comparison valid.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Bignum {
    positive: bool,
    digits: Digits<Word>,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Precondition {
    /// The divisor's magnitude was zero
    ZeroDivisor,
    /// A multiply-subtract would have taken the accumulator below zero
    ProductExceedsAccumulator,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BignumError {
    AllocationFailure(TryReserveError),
    ParseError(ParseError),
    DivisionPrecondition(Precondition),
}

impl std::fmt::Display for BignumError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{self:?}")
    }
}

impl std::error::Error for BignumError {}

impl From<TryReserveError> for BignumError {
    fn from(value: TryReserveError) -> Self {
        Self::AllocationFailure(value)
    }
}

impl From<ParseError> for BignumError {
    fn from(value: ParseError) -> Self {
        Self::ParseError(value)
    }
}

impl From<Precondition> for BignumError {
    fn from(value: Precondition) -> Self {
        Self::DivisionPrecondition(value)
    }
}

/// Public utility functions
impl Bignum {
    pub fn zero() -> Self {
        Self {
            positive: true,
            digits: Digits::from(vec![0]),
        }
    }

    /// Build a number from little endian words, trimming any leading zero words
    pub fn from_words(positive: bool, words: &[Word]) -> Result<Self, BignumError> {
        let significant = words.iter().rposition(|&w| w != 0).map_or(0, |i| i + 1);
        let mut digits = Digits::with_capacity(significant)?;
        digits.extend_from_slice(&words[..significant])?;
        Ok(Self::from_parts(positive, digits)?)
    }

    /// The number `word * 2^(64 * shift)`
    pub fn from_word_power(word: Word, shift: usize) -> Result<Self, BignumError> {
        if word == 0 {
            return Ok(Self::zero());
        }

        let mut digits = Digits::with_capacity(shift + 1)?;
        digits.push_repeat(0, shift)?;
        digits.push(word)?;
        Ok(Self::from_parts(true, digits)?)
    }

    pub fn is_zero(&self) -> bool {
        self.words() == [0]
    }

    pub fn is_negative(&self) -> bool {
        !self.positive
    }

    /// The number of words in the magnitude, zero has one word
    pub fn num_words(&self) -> usize {
        self.digits.len()
    }

    /// The magnitude, least significant word first
    pub fn words(&self) -> &[Word] {
        self.digits.as_slice()
    }

    /// Reset to zero without giving up the allocation
    pub fn set_zero(&mut self) {
        // the magnitude is never empty so keeping the bottom word needs no allocation
        self.digits.truncate(1);
        self.digits[0] = 0;
        self.positive = true;
    }

    /// Make `self` equal to `src`.
    ///
    /// Storage is reserved up front so a failure leaves `self` untouched.
    pub fn assign(&mut self, src: &Self) -> Result<(), BignumError> {
        let additional = src.num_words().saturating_sub(self.num_words());
        self.digits.reserve(additional)?;
        self.digits.clear();
        self.digits.extend_from_slice(src.words())?;
        self.positive = src.positive;
        Ok(())
    }

    /// Flip the sign, zero stays non-negative
    pub fn negate(&mut self) {
        self.positive = !self.positive || self.is_zero();
    }

    /// A copy of the number with a non-negative sign
    pub fn try_abs(&self) -> Result<Self, BignumError> {
        let mut out = Self::zero();
        out.assign(self)?;
        out.positive = true;
        Ok(out)
    }

    /// Compare the absolute values of two numbers
    pub fn cmp_magnitude(&self, other: &Self) -> Ordering {
        cmp_words(self.words(), other.words())
    }
}

// private helper functions
impl Bignum {
    /// Wrap a magnitude produced by the kernel, an empty magnitude means zero
    fn from_parts(positive: bool, mut digits: Digits<Word>) -> Result<Self, TryReserveError> {
        if digits.is_empty() {
            // reuses the kernel's allocation when it has one
            digits.push(0)?;
        }
        debug_assert!(digits.len() == 1 || digits.last() != Some(0));

        let mut out = Self { positive, digits };
        out.fix_zero_sign();
        Ok(out)
    }

    fn fix_zero_sign(&mut self) {
        if self.is_zero() {
            self.positive = true;
        }
    }

    /// Drop leading zero words left behind by an in place addition
    fn trim(&mut self) {
        while self.digits.len() > 1 && self.digits.last() == Some(0) {
            self.digits.pop();
        }
    }
}

/// Compare two canonical magnitudes: more words is bigger, otherwise the first differing word
/// from the top decides
pub(crate) fn cmp_words(lhs: &[Word], rhs: &[Word]) -> Ordering {
    lhs.len()
        .cmp(&rhs.len())
        .then_with(|| lhs.iter().rev().cmp(rhs.iter().rev()))
}

impl Default for Bignum {
    fn default() -> Self {
        Self::zero()
    }
}

impl PartialOrd for Bignum {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Bignum {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self.positive, other.positive) {
            (true, false) => Ordering::Greater,
            (false, true) => Ordering::Less,
            (true, true) => self.cmp_magnitude(other),
            (false, false) => self.cmp_magnitude(other).reverse(),
        }
    }
}

macro_rules! impl_from_unsigned_for_bignum {
    ($uX:ty) => {
        impl From<$uX> for Bignum {
            fn from(value: $uX) -> Self {
                let mut out = Self::zero();
                out.digits[0] = Word::from(value);
                out
            }
        }
    };
}

impl_from_unsigned_for_bignum!(u64);
impl_from_unsigned_for_bignum!(u32);
impl_from_unsigned_for_bignum!(u16);
impl_from_unsigned_for_bignum!(u8);

macro_rules! impl_from_signed_for_bignum {
    ($iX:ty) => {
        impl From<$iX> for Bignum {
            fn from(value: $iX) -> Self {
                let mut out = Self::from(value.unsigned_abs());
                out.positive = value >= 0;
                out
            }
        }
    };
}

impl_from_signed_for_bignum!(i64);
impl_from_signed_for_bignum!(i32);
impl_from_signed_for_bignum!(i16);
impl_from_signed_for_bignum!(i8);
