use std::collections::TryReserveError;
use std::ops::{
    Add, AddAssign, Div, DivAssign, Mul, MulAssign, Neg, Rem, RemAssign, Sub, SubAssign,
};

use super::{cmp_words, Bignum, BignumError, DoubleWord, Precondition, Word, WORD_BITS};
use crate::digits::Digits;

/// x + y + carry, split into the low word and the carry out
#[inline]
const fn carrying_add(x: Word, y: Word, carry: Word) -> (Word, Word) {
    let wide = x as DoubleWord + y as DoubleWord + carry as DoubleWord;
    (wide as Word, (wide >> WORD_BITS) as Word)
}

/// x - y - borrow computed in the wrapping double wide domain.
/// A raw difference bigger than the minuend means we wrapped, so borrow from the next word.
#[inline]
const fn borrowing_sub(x: Word, y: Word, borrow: Word) -> (Word, Word) {
    let wide = (x as DoubleWord)
        .wrapping_sub(y as DoubleWord)
        .wrapping_sub(borrow as DoubleWord);
    (wide as Word, (wide > x as DoubleWord) as Word)
}

/// x * y + carry, split into the low word and the high word
#[inline]
const fn carrying_mul(x: Word, y: Word, carry: Word) -> (Word, Word) {
    let wide = x as DoubleWord * y as DoubleWord + carry as DoubleWord;
    (wide as Word, (wide >> WORD_BITS) as Word)
}

/// |big| + |little| where big has at least as many words as little
fn magnitude_add(big: &[Word], little: &[Word]) -> Result<Digits<Word>, TryReserveError> {
    debug_assert!(big.len() >= little.len());

    let mut sum = Digits::with_capacity(big.len() + 1)?;
    let mut carry = 0;
    for (i, &b) in big.iter().enumerate() {
        let l = little.get(i).copied().unwrap_or(0);
        let (word, next_carry) = carrying_add(b, l, carry);
        sum.push(word)?;
        carry = next_carry;
    }

    if carry != 0 {
        sum.push(carry)?;
    }

    Ok(sum)
}

/// |big| - |little|, big must be the larger magnitude.
///
/// Zero words are held back as a pending run and only written once a nonzero word turns up
/// above them, so zeros that end up at the top of the difference are never written at all.
/// A difference of zero comes back empty.
pub(super) fn magnitude_sub(
    big: &[Word],
    little: &[Word],
) -> Result<Digits<Word>, TryReserveError> {
    debug_assert!(cmp_words(big, little).is_ge());

    let mut diff = Digits::with_capacity(big.len())?;
    let mut borrow = 0;
    let mut pending_zeros = 0;
    for (i, &b) in big.iter().enumerate() {
        let l = little.get(i).copied().unwrap_or(0);
        let (word, next_borrow) = borrowing_sub(b, l, borrow);
        borrow = next_borrow;

        if word == 0 {
            pending_zeros += 1;
        } else {
            diff.push_repeat(0, pending_zeros)?;
            diff.push(word)?;
            pending_zeros = 0;
        }
    }

    debug_assert_eq!(
        borrow,
        0,
        "subtracted a larger magnitude from a smaller one"
    );
    Ok(diff)
}

/// src * word * 2^(64 * shift) as a new canonical magnitude
pub(super) fn scaled_product(
    src: &[Word],
    word: Word,
    shift: usize,
) -> Result<Digits<Word>, TryReserveError> {
    if word == 0 || src == [0] {
        let mut zero = Digits::with_capacity(1)?;
        zero.push(0)?;
        return Ok(zero);
    }

    let mut product = Digits::with_capacity(shift + src.len() + 1)?;
    product.push_repeat(0, shift)?;

    let mut carry = 0;
    for &s in src {
        let (low, high) = carrying_mul(s, word, carry);
        product.push(low)?;
        carry = high;
    }

    if carry != 0 {
        product.push(carry)?;
    }

    Ok(product)
}

impl Bignum {
    pub fn try_add(&self, rhs: &Self) -> Result<Self, BignumError> {
        let (big, little) = if self.cmp_magnitude(rhs).is_ge() {
            (self, rhs)
        } else {
            (rhs, self)
        };

        // the bigger magnitude always decides the sign
        let digits = if big.positive == little.positive {
            magnitude_add(big.words(), little.words())?
        } else {
            magnitude_sub(big.words(), little.words())?
        };

        Ok(Self::from_parts(big.positive, digits)?)
    }

    pub fn try_sub(&self, rhs: &Self) -> Result<Self, BignumError> {
        let lhs_bigger = self.cmp_magnitude(rhs).is_ge();
        let (big, little) = if lhs_bigger { (self, rhs) } else { (rhs, self) };

        // subtracting a number of the opposite sign grows the magnitude
        if self.positive != rhs.positive {
            let digits = magnitude_add(big.words(), little.words())?;
            return Ok(Self::from_parts(self.positive, digits)?);
        }

        let positive = if lhs_bigger {
            self.positive
        } else {
            !self.positive
        };
        let digits = magnitude_sub(big.words(), little.words())?;
        Ok(Self::from_parts(positive, digits)?)
    }

    /// Schoolbook multiplication, one word of `rhs` at a time
    pub fn try_mul(&self, rhs: &Self) -> Result<Self, BignumError> {
        let mut product = Self::zero();
        product.digits.reserve(self.num_words() + rhs.num_words())?;

        for (shift, &word) in rhs.words().iter().enumerate() {
            product.mul_word_add(self, word, shift)?;
        }

        product.positive = self.positive == rhs.positive;
        product.fix_zero_sign();
        Ok(product)
    }

    /// Add `word * 2^(64 * shift)` to the magnitude of `self`
    pub fn accumulate_word(&mut self, word: Word, shift: usize) -> Result<(), BignumError> {
        if word == 0 {
            return Ok(());
        }

        let len = self.num_words().max(shift + 1) + 1;
        self.digits.resize(len)?;

        let mut carry = word;
        for w in &mut self.digits.as_mut_slice()[shift..] {
            if carry == 0 {
                break;
            }
            let (sum, next_carry) = carrying_add(*w, carry, 0);
            *w = sum;
            carry = next_carry;
        }

        self.trim();
        Ok(())
    }

    /// Add `|src| * word * 2^(64 * shift)` to the magnitude of `self`.
    ///
    /// The sign of `self` is left alone. On allocation failure `self` is unchanged.
    pub fn mul_word_add(
        &mut self,
        src: &Self,
        word: Word,
        shift: usize,
    ) -> Result<(), BignumError> {
        if word == 0 || src.is_zero() {
            return Ok(());
        }

        let len = self.num_words().max(src.num_words() + shift + 1) + 1;
        self.digits.resize(len)?;

        let acc = &mut self.digits.as_mut_slice()[shift..];
        let (low, high) = acc.split_at_mut(src.num_words());

        let mut mul_carry = 0;
        let mut add_carry = 0;
        for (a, &s) in low.iter_mut().zip(src.words()) {
            let (prod, next_mul_carry) = carrying_mul(s, word, mul_carry);
            let (sum, next_add_carry) = carrying_add(*a, prod, add_carry);
            *a = sum;
            mul_carry = next_mul_carry;
            add_carry = next_add_carry;
        }

        // fold what is left of the multiply carry in with the add carry
        for a in high.iter_mut() {
            if mul_carry == 0 && add_carry == 0 {
                break;
            }
            let (sum, next_add_carry) = carrying_add(*a, mul_carry, add_carry);
            *a = sum;
            mul_carry = 0;
            add_carry = next_add_carry;
        }
        debug_assert!(mul_carry == 0 && add_carry == 0);

        self.trim();
        Ok(())
    }

    /// Subtract `|src| * word * 2^(64 * shift)` from the magnitude of `self`.
    ///
    /// Fails with [`Precondition::ProductExceedsAccumulator`] if the product is bigger than
    /// `|self|`, in which case `self` is unchanged.
    pub fn mul_word_sub(
        &mut self,
        src: &Self,
        word: Word,
        shift: usize,
    ) -> Result<(), BignumError> {
        let product = scaled_product(src.words(), word, shift)?;
        self.sub_magnitude(product.as_slice())
    }

    pub(super) fn sub_magnitude(&mut self, words: &[Word]) -> Result<(), BignumError> {
        if cmp_words(words, self.words()).is_gt() {
            return Err(Precondition::ProductExceedsAccumulator.into());
        }

        let diff = magnitude_sub(self.words(), words)?;
        *self = Self::from_parts(self.positive, diff)?;
        Ok(())
    }
}

impl Neg for Bignum {
    type Output = Bignum;

    fn neg(mut self) -> Self::Output {
        self.negate();
        self
    }
}

impl Neg for &Bignum {
    type Output = Bignum;

    fn neg(self) -> Self::Output {
        -self.clone()
    }
}

/// Operators have no way to hand back an error, so they panic like the primitive integers do
#[track_caller]
fn unwrap_op(result: Result<Bignum, BignumError>, op: &str) -> Bignum {
    match result {
        Ok(value) => value,
        Err(BignumError::DivisionPrecondition(Precondition::ZeroDivisor)) => {
            panic!("attempt to {op} by zero")
        }
        Err(e) => panic!("attempt to {op} failed: {e}"),
    }
}

macro_rules! impl_bignum_op {
    ($op:ident::$op_fn:ident, $assign:ident::$assign_fn:ident, $name:literal, |$lhs:ident, $rhs:ident| $body:expr) => {
        impl $op<&Bignum> for &Bignum {
            type Output = Bignum;

            #[track_caller]
            fn $op_fn(self, rhs: &Bignum) -> Self::Output {
                let ($lhs, $rhs) = (self, rhs);
                unwrap_op($body, $name)
            }
        }

        impl $op<Bignum> for &Bignum {
            type Output = Bignum;

            #[track_caller]
            fn $op_fn(self, rhs: Bignum) -> Self::Output {
                $op::$op_fn(self, &rhs)
            }
        }

        impl $op<&Bignum> for Bignum {
            type Output = Bignum;

            #[track_caller]
            fn $op_fn(self, rhs: &Bignum) -> Self::Output {
                $op::$op_fn(&self, rhs)
            }
        }

        impl $op<Bignum> for Bignum {
            type Output = Bignum;

            #[track_caller]
            fn $op_fn(self, rhs: Bignum) -> Self::Output {
                $op::$op_fn(&self, &rhs)
            }
        }

        impl $assign<&Bignum> for Bignum {
            #[track_caller]
            fn $assign_fn(&mut self, rhs: &Bignum) {
                *self = $op::$op_fn(&*self, rhs);
            }
        }

        impl $assign<Bignum> for Bignum {
            #[track_caller]
            fn $assign_fn(&mut self, rhs: Bignum) {
                *self = $op::$op_fn(&*self, &rhs);
            }
        }
    };
}

impl_bignum_op!(Add::add, AddAssign::add_assign, "add", |a, b| a.try_add(b));
impl_bignum_op!(
    Sub::sub,
    SubAssign::sub_assign,
    "subtract",
    |a, b| a.try_sub(b)
);
impl_bignum_op!(
    Mul::mul,
    MulAssign::mul_assign,
    "multiply",
    |a, b| a.try_mul(b)
);
impl_bignum_op!(
    Div::div,
    DivAssign::div_assign,
    "divide",
    |a, b| a.try_divmod(b).map(|(quotient, _)| quotient)
);
impl_bignum_op!(
    Rem::rem,
    RemAssign::rem_assign,
    "calculate the remainder",
    |a, b| a.try_divmod(b).map(|(_, remainder)| remainder)
);
