//! Argmax reduction of classification scores.

use crate::core::DigitError;

/// Result of reducing a score row to its maximum element.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArgmaxResult {
    /// Index of the maximum score.
    pub index: usize,
    /// The maximum score itself.
    pub score: f32,
}

/// A processor for reducing classification score rows.
///
/// Tie-break convention: the lowest index among maxima wins (first-occurrence
/// argmax). Downstream consumers rely on this for determinism, so the
/// reduction uses a strict greater-than comparison rather than sorting.
#[derive(Debug, Default, Clone)]
pub struct Argmax;

impl Argmax {
    /// Creates a new Argmax processor.
    pub fn new() -> Self {
        Self
    }

    /// Reduces a score row to its first-occurrence maximum.
    ///
    /// # Arguments
    ///
    /// * `scores` - Confidence scores for all classes.
    ///
    /// # Returns
    ///
    /// * `Ok(ArgmaxResult)` - Index and value of the maximum score.
    /// * `Err(DigitError)` - If the score row is empty.
    pub fn process(&self, scores: &[f32]) -> Result<ArgmaxResult, DigitError> {
        let mut best: Option<ArgmaxResult> = None;
        for (index, &score) in scores.iter().enumerate() {
            let better = match best {
                Some(current) => score > current.score,
                None => true,
            };
            if better {
                best = Some(ArgmaxResult { index, score });
            }
        }
        best.ok_or_else(|| DigitError::inference("cannot take the argmax of an empty score row"))
    }

    /// Returns the top-k (index, score) pairs in descending score order.
    ///
    /// Ties keep their original index order (the sort is stable), and `k` is
    /// clamped to the number of classes.
    pub fn top_k(&self, scores: &[f32], k: usize) -> Vec<(usize, f32)> {
        let mut indexed: Vec<(usize, f32)> = scores.iter().copied().enumerate().collect();
        indexed.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
        indexed.truncate(k);
        indexed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unique_maximum_wins() {
        let argmax = Argmax::new();
        let result = argmax
            .process(&[0.1, 0.05, 0.6, 0.05, 0.05, 0.05, 0.05, 0.03, 0.01, 0.01])
            .unwrap();
        assert_eq!(result.index, 2);
        assert!((result.score - 0.6).abs() < 1e-6);
    }

    #[test]
    fn test_all_tied_returns_lowest_index() {
        let argmax = Argmax::new();
        let result = argmax.process(&[0.1; 10]).unwrap();
        assert_eq!(result.index, 0);
    }

    #[test]
    fn test_partial_tie_returns_first_occurrence() {
        let argmax = Argmax::new();
        let result = argmax.process(&[0.2, 0.5, 0.5, 0.1]).unwrap();
        assert_eq!(result.index, 1);
    }

    #[test]
    fn test_empty_row_is_an_error() {
        let argmax = Argmax::new();
        assert!(argmax.process(&[]).is_err());
    }

    #[test]
    fn test_top_k_orders_descending() {
        let argmax = Argmax::new();
        let top = argmax.top_k(&[0.1, 0.7, 0.2], 2);
        assert_eq!(top, vec![(1, 0.7), (2, 0.2)]);
    }

    #[test]
    fn test_top_k_clamps_to_class_count() {
        let argmax = Argmax::new();
        assert_eq!(argmax.top_k(&[0.3, 0.7], 5).len(), 2);
    }
}
