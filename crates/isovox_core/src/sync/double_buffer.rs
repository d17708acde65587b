//! # Double Buffer
//!
//! Two buffers ping-ponged between "current" and "previous".
//!
//! ```text
//! Slice N:
//!   writes go to Buffer A (current)
//!   reads of slice N-1 come from Buffer B (previous)
//!
//! Slice N+1:
//!   SWAP (move, no copy)
//!   writes go to Buffer B
//!   reads of slice N come from Buffer A
//! ```

/// A current/previous buffer pair swapped by move.
///
/// ## Usage
///
/// ```rust
/// use isovox_core::sync::DoubleBuffer;
///
/// let mut cache = DoubleBuffer::new(vec![-1; 4], vec![-1; 4]);
/// cache.current_mut()[0] = 7;
/// cache.swap();
/// assert_eq!(cache.previous()[0], 7);
/// assert_eq!(cache.current()[0], -1);
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DoubleBuffer<T> {
    current: T,
    previous: T,
    swaps: usize,
}

impl<T> DoubleBuffer<T> {
    /// Creates a pair from its two halves.
    #[must_use]
    pub const fn new(current: T, previous: T) -> Self {
        Self {
            current,
            previous,
            swaps: 0,
        }
    }

    /// The buffer being written this step.
    #[inline]
    #[must_use]
    pub const fn current(&self) -> &T {
        &self.current
    }

    /// Mutable access to the buffer being written this step.
    #[inline]
    pub fn current_mut(&mut self) -> &mut T {
        &mut self.current
    }

    /// The buffer written during the previous step.
    #[inline]
    #[must_use]
    pub const fn previous(&self) -> &T {
        &self.previous
    }

    /// Borrows both halves at once: `(current, previous)`.
    #[inline]
    pub fn split_mut(&mut self) -> (&mut T, &T) {
        (&mut self.current, &self.previous)
    }

    /// Exchanges the two halves.
    #[inline]
    pub fn swap(&mut self) {
        std::mem::swap(&mut self.current, &mut self.previous);
        self.swaps += 1;
    }

    /// Number of swaps performed so far.
    #[inline]
    #[must_use]
    pub const fn swap_count(&self) -> usize {
        self.swaps
    }
}

impl<T: Clone> DoubleBuffer<T> {
    /// Creates a pair whose halves both start as `value`.
    #[must_use]
    pub fn filled(value: T) -> Self {
        Self::new(value.clone(), value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_swap_exchanges_halves() {
        let mut buffer = DoubleBuffer::new(1, 2);
        buffer.swap();
        assert_eq!(*buffer.current(), 2);
        assert_eq!(*buffer.previous(), 1);
        assert_eq!(buffer.swap_count(), 1);
    }

    #[test]
    fn test_split_mut_reads_previous_while_writing_current() {
        let mut buffer = DoubleBuffer::filled(vec![0; 3]);
        buffer.current_mut()[1] = 5;
        buffer.swap();

        let (current, previous) = buffer.split_mut();
        current[1] = previous[1] * 2;
        assert_eq!(buffer.current(), &vec![0, 10, 0]);
        assert_eq!(buffer.previous(), &vec![0, 5, 0]);
    }
}
