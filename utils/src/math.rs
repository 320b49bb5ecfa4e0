//! This module contains small integer helpers.

/// Returns ceil(log2(d)) but panics if d = 0.
fn ceil_log2(d: usize) -> usize {
    assert!(d != 0);
    if d == 1 {
        return 0;
    }
    (usize::BITS - (d - 1).leading_zeros()) as usize
}

/// Smallest `e` such that `2^e >= n * factor`.
pub fn extended_log2(k: u32, factor: usize) -> u32 {
    let n = 1usize << k;
    let target = n * factor.max(1);
    ceil_log2(target) as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log2() {
        assert_eq!(ceil_log2(1), 0);
        assert_eq!(ceil_log2(2), 1);
        assert_eq!(ceil_log2(3), 2);
        assert_eq!(ceil_log2(16), 4);
        assert_eq!(ceil_log2(17), 5);
    }

    #[test]
    fn test_extended_log2() {
        // degree 3 circuits need twice the rows
        assert_eq!(extended_log2(4, 2), 5);
        // degree 4 circuits need three times the rows
        assert_eq!(extended_log2(4, 3), 6);
        assert_eq!(extended_log2(4, 1), 4);
    }
}
