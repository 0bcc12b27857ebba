//! Border handling for neighborhood filters
//!
//! Samples outside the image are taken from the image mirrored about its
//! edge, with the edge pixel repeated:
//!
//! ```text
//!   d c b a | a b c d | d c b a
//! ```
//!
//! The mirroring repeats with period `2 * len`, so windows wider than the
//! image still resolve to a valid index.

/// Map a possibly out-of-range index onto `[0, len)` by edge reflection.
///
/// `reflect_index(-1, n) == 0`, `reflect_index(-2, n) == 1`,
/// `reflect_index(n, n) == n - 1`.
#[inline]
pub fn reflect_index(idx: isize, len: usize) -> usize {
    debug_assert!(len > 0);
    if len == 1 {
        return 0;
    }
    let n = len as isize;
    let period = 2 * n;
    let m = idx.rem_euclid(period);
    if m < n {
        m as usize
    } else {
        (period - 1 - m) as usize
    }
}

/// Fill `padded` with `input` extended by `before` / `after` reflected samples.
///
/// The buffer is resized to `before + input.len() + after`.
pub fn fill_padded(input: &[f32], before: usize, after: usize, padded: &mut Vec<f32>) {
    let n = input.len();
    padded.clear();
    padded.reserve(before + n + after);
    for i in 0..before {
        let src = reflect_index(i as isize - before as isize, n);
        padded.push(input[src]);
    }
    padded.extend_from_slice(input);
    for i in 0..after {
        padded.push(input[reflect_index((n + i) as isize, n)]);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reflect_near_edges() {
        let n = 4;
        assert_eq!(reflect_index(-1, n), 0);
        assert_eq!(reflect_index(-2, n), 1);
        assert_eq!(reflect_index(-4, n), 3);
        assert_eq!(reflect_index(0, n), 0);
        assert_eq!(reflect_index(3, n), 3);
        assert_eq!(reflect_index(4, n), 3);
        assert_eq!(reflect_index(5, n), 2);
    }

    #[test]
    fn test_reflect_wide_window_is_periodic() {
        let n = 3;
        // -4 -> period 6 -> 2 -> in range
        assert_eq!(reflect_index(-4, n), 2);
        assert_eq!(reflect_index(-7, n), 0);
        assert_eq!(reflect_index(9, n), 2);
        assert_eq!(reflect_index(12, n), 0);
    }

    #[test]
    fn test_single_sample_axis() {
        for i in -5..5 {
            assert_eq!(reflect_index(i, 1), 0);
        }
    }

    #[test]
    fn test_fill_padded() {
        let mut buf = Vec::new();
        fill_padded(&[1.0, 2.0, 3.0], 2, 2, &mut buf);
        assert_eq!(buf, vec![2.0, 1.0, 1.0, 2.0, 3.0, 3.0, 2.0]);
    }
}
