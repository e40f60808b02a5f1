use std::collections::TryReserveError;
use std::ops::{Index, IndexMut};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DigitsError {
    AllocationFailure(TryReserveError),
    OutOfBounds { index: usize, len: usize },
}

impl std::fmt::Display for DigitsError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{self:?}")
    }
}

impl std::error::Error for DigitsError {}

impl From<TryReserveError> for DigitsError {
    fn from(value: TryReserveError) -> Self {
        Self::AllocationFailure(value)
    }
}

/// A growable sequence of plain values where every growing operation reports
/// allocation failure instead of aborting.
///
/// A failed growth never leaves the sequence partially modified.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Digits<T> {
    elems: Vec<T>,
}

impl<T: Copy + Default> Digits<T> {
    pub const fn new() -> Self {
        Self { elems: Vec::new() }
    }

    /// Create an empty sequence able to hold at least `capacity` elements (and never less than one)
    pub fn with_capacity(capacity: usize) -> Result<Self, TryReserveError> {
        let mut elems = Vec::new();
        elems.try_reserve_exact(capacity.max(1))?;
        Ok(Self { elems })
    }

    pub fn len(&self) -> usize {
        self.elems.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elems.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.elems.capacity()
    }

    pub fn as_slice(&self) -> &[T] {
        &self.elems
    }

    pub fn as_mut_slice(&mut self) -> &mut [T] {
        &mut self.elems
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.elems.iter()
    }

    pub fn get(&self, index: usize) -> Option<T> {
        self.elems.get(index).copied()
    }

    pub fn last(&self) -> Option<T> {
        self.elems.last().copied()
    }

    /// Overwrite the element at `index`, or append when `index` is one past the end
    pub fn put(&mut self, index: usize, elem: T) -> Result<(), DigitsError> {
        let len = self.len();
        match index.cmp(&len) {
            std::cmp::Ordering::Less => {
                self.elems[index] = elem;
                Ok(())
            }
            std::cmp::Ordering::Equal => Ok(self.push(elem)?),
            std::cmp::Ordering::Greater => Err(DigitsError::OutOfBounds { index, len }),
        }
    }

    /// Make room for at least `additional` more elements, growing geometrically
    pub fn reserve(&mut self, additional: usize) -> Result<(), TryReserveError> {
        self.elems.try_reserve(additional)
    }

    pub fn push(&mut self, elem: T) -> Result<(), TryReserveError> {
        self.reserve(1)?;
        self.elems.push(elem);
        Ok(())
    }

    /// Append `count` copies of `elem`
    pub fn push_repeat(&mut self, elem: T, count: usize) -> Result<(), TryReserveError> {
        self.reserve(count)?;
        self.elems.extend(std::iter::repeat(elem).take(count));
        Ok(())
    }

    pub fn extend_from_slice(&mut self, elems: &[T]) -> Result<(), TryReserveError> {
        self.reserve(elems.len())?;
        self.elems.extend_from_slice(elems);
        Ok(())
    }

    /// Change the length to `len`, filling any new slots with `T::default()`
    pub fn resize(&mut self, len: usize) -> Result<(), TryReserveError> {
        if let Some(additional) = len.checked_sub(self.len()) {
            self.reserve(additional)?;
        }
        self.elems.resize(len, T::default());
        Ok(())
    }

    pub fn pop(&mut self) -> Option<T> {
        self.elems.pop()
    }

    pub fn truncate(&mut self, len: usize) {
        self.elems.truncate(len);
    }

    /// Remove every element, keeping the allocation
    pub fn clear(&mut self) {
        self.elems.clear();
    }
}

impl<T> From<Vec<T>> for Digits<T> {
    fn from(elems: Vec<T>) -> Self {
        Self { elems }
    }
}

impl<T> Index<usize> for Digits<T> {
    type Output = T;

    fn index(&self, index: usize) -> &Self::Output {
        &self.elems[index]
    }
}

impl<T> IndexMut<usize> for Digits<T> {
    fn index_mut(&mut self, index: usize) -> &mut Self::Output {
        &mut self.elems[index]
    }
}

impl<'a, T> IntoIterator for &'a Digits<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.elems.iter()
    }
}
