//! Bisection over sorted slices
//!
//! The layout cache is a strictly increasing prefix-sum sequence, so every
//! offset → month lookup is one of these searches.

use std::cmp::Ordering;

/// Greatest index whose element compares `<= x`
pub fn find_max_le<T, F>(arr: &[T], x: &T, mut compare: F) -> Option<usize>
where
    F: FnMut(&T, &T) -> Ordering,
{
    let n = arr.partition_point(|item| compare(item, x) != Ordering::Greater);
    n.checked_sub(1)
}

/// Least index whose element compares `>= x`
pub fn find_min_ge<T, F>(arr: &[T], x: &T, mut compare: F) -> Option<usize>
where
    F: FnMut(&T, &T) -> Ordering,
{
    let n = arr.partition_point(|item| compare(item, x) == Ordering::Less);
    (n < arr.len()).then_some(n)
}

/// Contiguous run of `arr` covered by the closed interval `[a, b]`: from
/// the least element `>= a` to the greatest element `<= b`. Empty when no
/// element falls inside.
pub fn min_range_cover<'a, T, F>(arr: &'a [T], a: &T, b: &T, mut compare: F) -> &'a [T]
where
    F: FnMut(&T, &T) -> Ordering,
{
    let left = find_min_ge(arr, a, &mut compare);
    let right = find_max_le(arr, b, &mut compare);
    match (left, right) {
        (Some(left), Some(right)) if left <= right => &arr[left..=right],
        _ => &arr[..0],
    }
}

/// [`min_range_cover`] with the natural ordering
pub fn min_range_cover_ord<'a, T: Ord>(arr: &'a [T], a: &T, b: &T) -> &'a [T] {
    min_range_cover(arr, a, b, |x, y| x.cmp(y))
}

#[cfg(test)]
mod tests {
    use super::*;

    const ARR: [i32; 5] = [1, 3, 5, 7, 9];

    #[test]
    fn test_find_max_le() {
        let cmp = |x: &i32, y: &i32| x.cmp(y);
        assert_eq!(find_max_le(&ARR, &0, cmp), None);
        assert_eq!(find_max_le(&ARR, &1, cmp), Some(0));
        assert_eq!(find_max_le(&ARR, &4, cmp), Some(1));
        assert_eq!(find_max_le(&ARR, &9, cmp), Some(4));
        assert_eq!(find_max_le(&ARR, &100, cmp), Some(4));
    }

    #[test]
    fn test_find_min_ge() {
        let cmp = |x: &i32, y: &i32| x.cmp(y);
        assert_eq!(find_min_ge(&ARR, &0, cmp), Some(0));
        assert_eq!(find_min_ge(&ARR, &4, cmp), Some(2));
        assert_eq!(find_min_ge(&ARR, &9, cmp), Some(4));
        assert_eq!(find_min_ge(&ARR, &10, cmp), None);
    }

    #[test]
    fn test_cover_interior_bounds() {
        assert_eq!(min_range_cover_ord(&ARR, &4, &8), &[5, 7]);
    }

    #[test]
    fn test_cover_past_end_is_empty() {
        assert!(min_range_cover_ord(&ARR, &10, &20).is_empty());
    }

    #[test]
    fn test_cover_before_start() {
        assert_eq!(min_range_cover_ord(&ARR, &0, &2), &[1]);
    }

    #[test]
    fn test_cover_exact_hits() {
        assert_eq!(min_range_cover_ord(&ARR, &3, &7), &[3, 5, 7]);
    }

    #[test]
    fn test_cover_inverted_bounds_is_empty() {
        assert!(min_range_cover_ord(&ARR, &8, &4).is_empty());
    }

    #[test]
    fn test_cover_empty_input() {
        let empty: [i32; 0] = [];
        assert!(min_range_cover_ord(&empty, &0, &5).is_empty());
    }

    #[test]
    fn test_cover_with_float_compare() {
        let acc = [0.0, 278.0, 556.0, 790.0];
        let slice = min_range_cover(&acc, &200.0, &600.0, |x: &f64, y: &f64| x.total_cmp(y));
        assert_eq!(slice, &[278.0, 556.0]);
    }
}
