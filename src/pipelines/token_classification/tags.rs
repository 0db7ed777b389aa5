use crate::pipelines::prediction::TokenPrediction;

/// Prefix marking the first token of an entity mention
pub static BEGIN_PREFIX: &str = "B-";

/// Prefix marking a continuation token of an entity mention
pub static INSIDE_PREFIX: &str = "I-";

/// The begin/continue marker of a tag
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Marker {
    /// The first token of an entity
    Begin,

    /// A continuation token of an entity
    Inside,
}

/// Split a tag into its marker and entity type
///
/// Tags without a recognized marker are treated as continuations of an entity named after the
/// whole tag.
pub fn split_tag(tag: &str) -> (Marker, &str) {
    if let Some(entity_type) = tag.strip_prefix(BEGIN_PREFIX) {
        (Marker::Begin, entity_type)
    } else if let Some(entity_type) = tag.strip_prefix(INSIDE_PREFIX) {
        (Marker::Inside, entity_type)
    } else {
        (Marker::Inside, tag)
    }
}

/// Rewrite begin tags on sub-word continuation tokens to continue tags, in place
///
/// Must run before entity grouping. Without it, the pieces of one word tagged "B-PER", "B-PER"
/// would be grouped as two separate entities.
pub fn correct_subword_tags<S>(predictions: &mut [TokenPrediction<S>], prefix: &str) {
    if prefix.is_empty() {
        return;
    }

    for prediction in predictions.iter_mut() {
        if !prediction.word.contains(prefix) {
            continue;
        }

        if let Some(entity_type) = prediction.entity.strip_prefix(BEGIN_PREFIX) {
            log::debug!(
                "Correcting tag {} on continuation token {}",
                prediction.entity,
                prediction.word
            );

            prediction.entity = format!("{}{}", INSIDE_PREFIX, entity_type);
        }
    }
}
