//! Stable sorting that tolerates comparators which are not total orders.
//!
//! The ranking comparators treat distances within a tolerance as equal and
//! let NaN compare as equal, so they are not transitive. `slice::sort_by`
//! requires a total order and may panic without one. Result lists hold a
//! few dozen cafés, so a plain insertion sort is enough.

use std::cmp::Ordering;

/// Stable in-place insertion sort.
///
/// An element only moves past a neighbour that compares strictly
/// `Greater`, so elements the comparator calls equal keep their input
/// order.
pub fn stable_sort_by<T, F>(items: &mut [T], mut compare: F)
where
    F: FnMut(&T, &T) -> Ordering,
{
    for i in 1..items.len() {
        let mut j = i;
        while j > 0 && compare(&items[j - 1], &items[j]) == Ordering::Greater {
            items.swap(j - 1, j);
            j -= 1;
        }
    }
}

/// Compare two floats, treating NaN as equal to everything.
pub fn cmp_f64(a: f64, b: f64) -> Ordering {
    a.partial_cmp(&b).unwrap_or(Ordering::Equal)
}
