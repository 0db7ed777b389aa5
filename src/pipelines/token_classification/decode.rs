use std::collections::BTreeMap;

use burn::tensor::Element;

use crate::{
    pipelines::{prediction::RawPrediction, words::Pieces},
    utils::classes::{argmax, label_for},
};

/// Labels that never produce a prediction
pub static IGNORE_LABELS: &[&str; 1] = &["O"];

/// Turn per-token class probabilities into raw predictions
///
/// `scores` holds one row of `n_classes` probabilities per token, for at most as many tokens as
/// the encoding has. Special tokens and tokens labeled outside of any entity are dropped.
pub fn decode_tokens<E: Element>(
    scores: &[E],
    n_classes: usize,
    pieces: &Pieces<'_>,
    id2label: &BTreeMap<usize, String>,
) -> Vec<RawPrediction<E>> {
    if n_classes == 0 {
        return Vec::new();
    }

    scores
        .chunks(n_classes)
        .zip(pieces.tokens)
        .enumerate()
        .filter(|(index, _)| !pieces.is_special(*index))
        .filter_map(|(index, (row, token))| {
            let (class_id, score) = argmax(row)?;
            let entity = label_for(id2label, class_id);

            if IGNORE_LABELS.contains(&entity.as_str()) {
                return None;
            }

            let (start, end) = pieces.offsets.get(index).copied().unwrap_or_default();

            Some(RawPrediction {
                entity,
                score,
                index,
                word: token.clone(),
                start,
                end,
            })
        })
        .collect()
}
