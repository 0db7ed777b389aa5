use std::collections::BTreeMap;

use burn::tensor::{Element, ElementConversion};

/// Find the index and value of the highest score in a row of class probabilities
pub fn argmax<E: Element>(scores: &[E]) -> Option<(usize, E)> {
    scores
        .iter()
        .copied()
        .enumerate()
        .fold(None, |best, (index, score)| match best {
            Some((_, best_score)) if best_score.elem::<f64>() >= score.elem::<f64>() => best,
            _ => Some((index, score)),
        })
}

/// Look up the label for a class id, falling back to a generic name like the Hub does
pub fn label_for(id2label: &BTreeMap<usize, String>, class_id: usize) -> String {
    id2label
        .get(&class_id)
        .cloned()
        .unwrap_or_else(|| format!("LABEL_{}", class_id))
}
