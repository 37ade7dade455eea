// Label collection and top-N selection.
//
// Labels are deduplicated on their full content. Two "cat" labels with
// different topicality are distinct entries and both survive.

use std::collections::HashSet;

use crate::models::Label;

/// Hashable identity of a label: every field, floats by bit pattern.
#[derive(Hash, PartialEq, Eq)]
struct LabelKey {
    mid: Option<String>,
    description: String,
    score: u64,
    topicality: u64,
}

impl From<&Label> for LabelKey {
    fn from(label: &Label) -> Self {
        Self {
            mid: label.mid.clone(),
            description: label.description.clone(),
            score: label.score.to_bits(),
            topicality: label.topicality.to_bits(),
        }
    }
}

/// An insertion-ordered set of labels.
#[derive(Default)]
pub struct UniqueLabels {
    seen: HashSet<LabelKey>,
    labels: Vec<Label>,
}

impl UniqueLabels {
    /// Insert a label, returning false if an identical one is already present.
    pub fn insert(&mut self, label: &Label) -> bool {
        if !self.seen.insert(LabelKey::from(label)) {
            return false;
        }
        self.labels.push(label.clone());
        true
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// The `n` labels with the highest topicality, highest first.
    ///
    /// The sort is stable, so equal topicality keeps first-seen order.
    /// NaN topicality ranks below every number.
    pub fn top(self, n: usize) -> Vec<Label> {
        let mut labels = self.labels;
        labels.sort_by(|a, b| rank(b.topicality).total_cmp(&rank(a.topicality)));
        labels.truncate(n);
        labels
    }
}

fn rank(topicality: f64) -> f64 {
    if topicality.is_nan() {
        f64::NEG_INFINITY
    } else {
        topicality
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn label(description: &str, topicality: f64) -> Label {
        Label {
            description: description.to_string(),
            topicality,
            ..Default::default()
        }
    }

    #[test]
    fn identical_labels_collapse() {
        let mut set = UniqueLabels::default();
        assert!(set.insert(&label("dog", 0.7)));
        assert!(!set.insert(&label("dog", 0.7)));
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn equal_topicality_keeps_insertion_order() {
        let mut set = UniqueLabels::default();
        for l in [label("a", 0.5), label("b", 0.9), label("c", 0.5), label("d", 0.5)] {
            set.insert(&l);
        }
        let names: Vec<_> = set.top(3).into_iter().map(|l| l.description).collect();
        assert_eq!(names, ["b", "a", "c"]);
    }

    #[test]
    fn nan_topicality_sorts_last() {
        let mut set = UniqueLabels::default();
        set.insert(&label("broken", f64::NAN));
        set.insert(&label("low", 0.1));
        let names: Vec<_> = set.top(2).into_iter().map(|l| l.description).collect();
        assert_eq!(names, ["low", "broken"]);
    }

    #[test]
    fn top_on_fewer_labels_returns_all() {
        let mut set = UniqueLabels::default();
        set.insert(&label("only", 0.2));
        assert_eq!(set.top(3).len(), 1);
    }
}
