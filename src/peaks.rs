//! Local minima of an entropy curve.
//!
//! A window start `i` is selected when windows `i - 1`, `i` and `i + 1` are all
//! scored and the entropy at `i` is strictly lower than at both neighbours.
//! Consequently the first and last windows, windows next to a gapped window
//! and flat stretches (ties) are never selected.
//!
//! ```
//! use entroprimer::peaks::local_minima;
//! let v = [Some(1.0), Some(0.2), Some(0.9), None, Some(0.1), Some(0.5)];
//! assert_eq!(local_minima(&v), vec![1]);
//! ```

use crate::entropy::EntropyCurve;

/// Window starts that are strict local minima of `curve`.
pub fn find_minima(curve: &EntropyCurve) -> Vec<usize> {
    local_minima(&curve.values())
}

/// Strict local minima over a sequence of optional values.
pub fn local_minima(values: &[Option<f64>]) -> Vec<usize> {
    values
        .windows(3)
        .enumerate()
        .filter_map(|(i, w)| match (w[0], w[1], w[2]) {
            (Some(left), Some(mid), Some(right)) if mid < left && mid < right => Some(i + 1),
            _ => None,
        })
        .collect()
}
