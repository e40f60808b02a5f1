//! Arbitrary precision signed integers built on 64 bit words.
//!
//! Every operation that allocates returns a `Result` instead of aborting when memory runs out,
//! the operators on [`Bignum`] are thin wrappers which panic on failure instead.

pub mod bignum;
pub mod digits;

pub use bignum::{Bignum, BignumError, ParseError, Precondition, Word};
pub use digits::{Digits, DigitsError};
