use tracing::{instrument, trace};

use super::arith::{magnitude_sub, scaled_product};
use super::{cmp_words, Bignum, BignumError, DoubleWord, Precondition, Word, WORD_BITS};

/// Quotient word estimation for one fixed divisor.
///
/// Both numbers are viewed as if shifted left until the divisor's top bit is set, without
/// actually shifting anything. With a normalised leading word the estimate taken from the top two
/// words of the remainder is never too small and at most two too big.
struct Estimator<'a> {
    divisor: &'a [Word],
    norm_shift: u32,
    leading: Word,
}

impl<'a> Estimator<'a> {
    fn new(divisor: &'a [Word]) -> Self {
        let top = divisor.len() - 1;
        let norm_shift = divisor[top].leading_zeros();
        Self {
            divisor,
            norm_shift,
            leading: shifted_word(divisor, top, norm_shift),
        }
    }

    /// The word position of the next quotient word, remainder must be at least the divisor
    fn position(&self, remainder: &[Word]) -> usize {
        let position = remainder.len() - self.divisor.len();

        // the top words of the remainder are smaller than the divisor, use one position lower
        if remainder[position..]
            .iter()
            .rev()
            .lt(self.divisor.iter().rev())
        {
            position - 1
        } else {
            position
        }
    }

    /// An estimate of the quotient word at `position` which may overshoot by up to two
    fn estimate(&self, remainder: &[Word], position: usize) -> Word {
        let top = position + self.divisor.len();
        let hi = shifted_word(remainder, top, self.norm_shift);
        let lo = shifted_word(remainder, top - 1, self.norm_shift);
        let numerator = ((hi as DoubleWord) << WORD_BITS) | lo as DoubleWord;
        let estimate = numerator / self.leading as DoubleWord;
        estimate.min(Word::MAX as DoubleWord) as Word
    }
}

/// Word `index` of `words << shift`, positions past either end read as zero
fn shifted_word(words: &[Word], index: usize, shift: u32) -> Word {
    let word = |i: usize| words.get(i).copied().unwrap_or(0);
    if shift == 0 {
        return word(index);
    }

    let carried_in = match index.checked_sub(1) {
        Some(below) => word(below) >> (WORD_BITS - shift),
        None => 0,
    };
    (word(index) << shift) | carried_in
}

impl Bignum {
    /// Euclidean division: `self == quotient * divisor + remainder` with
    /// `0 <= remainder < |divisor|`.
    ///
    /// Fails with [`Precondition::ZeroDivisor`] when the divisor is zero.
    #[instrument(
        level = "trace",
        skip_all,
        fields(dividend_words = self.num_words(), divisor_words = divisor.num_words())
    )]
    pub fn try_divmod(&self, divisor: &Self) -> Result<(Self, Self), BignumError> {
        if divisor.is_zero() {
            return Err(Precondition::ZeroDivisor.into());
        }

        let (mut quotient, mut remainder) = Self::divmod_magnitude(self, divisor)?;

        // round the quotient away from zero so the remainder comes out non-negative
        if self.is_negative() && !remainder.is_zero() {
            quotient.accumulate_word(1, 0)?;
            remainder = divisor.try_abs()?.try_sub(&remainder)?;
        }

        quotient.positive = self.positive == divisor.positive;
        quotient.fix_zero_sign();
        Ok((quotient, remainder))
    }

    /// Long division of the magnitudes, both results are non-negative
    fn divmod_magnitude(dividend: &Self, divisor: &Self) -> Result<(Self, Self), BignumError> {
        let divisor = divisor.words();
        let estimator = Estimator::new(divisor);

        let mut quotient = Self::zero();
        let mut remainder = dividend.try_abs()?;

        while cmp_words(remainder.words(), divisor).is_ge() {
            let position = estimator.position(remainder.words());
            let mut digit = estimator.estimate(remainder.words(), position);
            trace!(position, digit, "estimated quotient word");

            let mut product = scaled_product(divisor, digit, position)?;
            if cmp_words(product.as_slice(), remainder.words()).is_gt() {
                // the estimate overshot, give back one shifted divisor at a time
                let shifted_divisor = scaled_product(divisor, 1, position)?;
                while cmp_words(product.as_slice(), remainder.words()).is_gt() {
                    product = magnitude_sub(product.as_slice(), shifted_divisor.as_slice())?;
                    digit -= 1;
                    trace!(position, digit, "corrected overshooting estimate");
                }
            }
            debug_assert!(digit > 0, "quotient word estimate made no progress");

            remainder.sub_magnitude(product.as_slice())?;
            quotient.accumulate_word(digit, position)?;
        }

        Ok((quotient, remainder))
    }
}
