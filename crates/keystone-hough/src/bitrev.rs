//! Bit-reversed counting
//!
//! `bitrev_inc(i, n)` adds one to `i` as if its bits were written in
//! reverse: the carry enters at bit `n` (a power of two) and moves toward
//! bit 0. Starting from 0 with `n = len / 2`, repeated increments visit
//! `0, n, n/2, 3n/2, ...`, every index of `0..len` exactly once.

/// Bit-reversed increment of `i` with the carry entering at `n`.
///
/// `n` must be a power of two or zero; with `n == 0` the index is returned
/// unchanged.
#[inline]
pub fn bitrev_inc(mut i: u32, mut n: u32) -> u32 {
    while n & i != 0 {
        i ^= n;
        n >>= 1;
    }
    i ^ n
}

/// Iterator over the bit-reversal permutation of `0..2n`
///
/// ```
/// use keystone_hough::BitReversal;
///
/// let order: Vec<u32> = BitReversal::new(4).collect();
/// assert_eq!(order, vec![0, 4, 2, 6, 1, 5, 3, 7]);
/// ```
#[derive(Debug, Clone)]
pub struct BitReversal {
    n: u32,
    next: u32,
    remaining: usize,
}

impl BitReversal {
    /// Sequence for carry position `n`: `2n` indices, or just `0` when
    /// `n == 0`.
    pub fn new(n: u32) -> Self {
        let remaining = if n == 0 { 1 } else { 2 * n as usize };
        Self {
            n,
            next: 0,
            remaining,
        }
    }
}

impl Iterator for BitReversal {
    type Item = u32;

    fn next(&mut self) -> Option<u32> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;
        let current = self.next;
        self.next = bitrev_inc(current, self.n);
        Some(current)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl ExactSizeIterator for BitReversal {}

#[cfg(test)]
mod tests {
    use super::*;

    fn reverse_bits(i: u32, bits: u32) -> u32 {
        if bits == 0 {
            0
        } else {
            i.reverse_bits() >> (32 - bits)
        }
    }

    #[test]
    fn test_bitrev_inc_small() {
        assert_eq!(bitrev_inc(0, 4), 4);
        assert_eq!(bitrev_inc(4, 4), 2);
        assert_eq!(bitrev_inc(2, 4), 6);
        assert_eq!(bitrev_inc(6, 4), 1);
        assert_eq!(bitrev_inc(7, 4), 0);
        assert_eq!(bitrev_inc(5, 0), 5);
    }

    #[test]
    fn test_sequence_is_permutation() {
        for bits in 0..=10 {
            let len = 1u32 << bits;
            let order: Vec<u32> = BitReversal::new(len / 2).collect();
            assert_eq!(order.len(), len as usize);
            let mut seen = vec![false; len as usize];
            for &i in &order {
                assert!(!seen[i as usize], "index {i} repeated for len {len}");
                seen[i as usize] = true;
            }
        }
    }

    #[test]
    fn test_sequence_matches_reversed_counting() {
        let bits = 6;
        for (k, i) in BitReversal::new(1 << (bits - 1)).enumerate() {
            assert_eq!(i, reverse_bits(k as u32, bits));
        }
    }

    #[test]
    fn test_exact_size() {
        assert_eq!(BitReversal::new(0).len(), 1);
        assert_eq!(BitReversal::new(256).len(), 512);
    }
}
