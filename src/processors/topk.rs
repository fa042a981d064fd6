//! Top-k decoding of classification scores.

use crate::core::errors::{OffloadError, OffloadResult};

/// Decoded top-k predictions for one score vector.
#[derive(Debug, Clone, PartialEq)]
pub struct TopkResult {
    /// Class indices in the model's output indexing, sorted by descending
    /// score.
    pub class_ids: Vec<usize>,
    /// Scores corresponding to `class_ids`.
    pub scores: Vec<f32>,
    /// Label names corresponding to `class_ids`; the class index itself when
    /// no label table is loaded.
    pub labels: Vec<String>,
}

/// Extracts the top-k entries from a raw score vector.
///
/// The model reserves output index 0 for a background class; decoding ranks
/// the scores from index 1 onward, so index 0 never appears in a result.
/// Label lookup accounts for the reserved index: class id `i` maps to line
/// `i - 1` of the label table.
#[derive(Debug, Clone, Default)]
pub struct Topk {
    labels: Option<Vec<String>>,
}

impl Topk {
    /// Creates a decoder without a label table.
    pub fn new() -> Self {
        Self { labels: None }
    }

    /// Creates a decoder with a label table, one name per class, background
    /// excluded.
    pub fn with_labels(labels: Vec<String>) -> Self {
        Self {
            labels: Some(labels),
        }
    }

    /// Whether a label table is loaded.
    pub fn has_labels(&self) -> bool {
        self.labels.is_some()
    }

    /// Decodes the top `k` predictions from `scores`.
    ///
    /// `scores` must contain the background entry at index 0 plus at least one
    /// class; `k` must be greater than 0. Fewer than `k` results are returned
    /// when the model has fewer classes.
    pub fn process(&self, scores: &[f32], k: usize) -> OffloadResult<TopkResult> {
        if k == 0 {
            return Err(OffloadError::invalid_input("k must be greater than 0"));
        }
        if scores.len() < 2 {
            return Err(OffloadError::invalid_input(format!(
                "score vector must contain the background entry and at least one class, got {}",
                scores.len()
            )));
        }

        // Rank everything after the background entry.
        let mut ranked: Vec<(usize, f32)> = scores[1..]
            .iter()
            .enumerate()
            .map(|(idx, &score)| (idx + 1, score))
            .collect();
        ranked.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
        ranked.truncate(k);

        let (class_ids, scores): (Vec<usize>, Vec<f32>) = ranked.into_iter().unzip();
        let labels = class_ids
            .iter()
            .map(|&id| self.label_for(id))
            .collect();

        Ok(TopkResult {
            class_ids,
            scores,
            labels,
        })
    }

    fn label_for(&self, class_id: usize) -> String {
        match &self.labels {
            Some(labels) => labels
                .get(class_id - 1)
                .cloned()
                .unwrap_or_else(|| format!("class {class_id}")),
            None => class_id.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_descending_order_and_background_excluded() {
        let topk = Topk::new();
        let scores = vec![0.9, 0.1, 0.5, 0.3, 0.2];

        let result = topk.process(&scores, 3).unwrap();
        // Index 0 scores highest but is the background entry.
        assert_eq!(result.class_ids, vec![2, 3, 4]);
        assert_eq!(result.scores, vec![0.5, 0.3, 0.2]);
    }

    #[test]
    fn test_label_lookup_is_offset_by_one() {
        let topk = Topk::with_labels(vec!["tabby".into(), "goldfish".into(), "shark".into()]);
        let scores = vec![0.0, 0.2, 0.7, 0.1];

        let result = topk.process(&scores, 2).unwrap();
        assert_eq!(result.class_ids, vec![2, 1]);
        assert_eq!(result.labels, vec!["goldfish".to_string(), "tabby".to_string()]);
    }

    #[test]
    fn test_k_larger_than_class_count() {
        let result = Topk::new().process(&[0.0, 0.4, 0.6], 5).unwrap();
        assert_eq!(result.class_ids, vec![2, 1]);
    }

    #[test]
    fn test_missing_label_falls_back_to_class_id() {
        let topk = Topk::with_labels(vec!["only".into()]);
        let result = topk.process(&[0.0, 0.1, 0.9], 1).unwrap();
        assert_eq!(result.labels, vec!["class 2".to_string()]);
    }

    #[test]
    fn test_invalid_inputs() {
        assert!(Topk::new().process(&[0.0, 0.1], 0).is_err());
        assert!(Topk::new().process(&[0.5], 1).is_err());
    }
}
