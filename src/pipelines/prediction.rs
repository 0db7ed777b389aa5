//! Prediction types shared by the pipelines.
//!
//! Raw predictions carry their score in the backend's float element type. Normalizing converts
//! every numeric field to a plain `f64` or `usize`, which is what gets serialized. Normalizing an
//! already-normalized prediction is a no-op, since `f64` is itself a backend element type.

use burn::tensor::{Element, ElementConversion};
use derive_new::new;
use serde::{Deserialize, Serialize};

/// A single token scored by a token classification model
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, new)]
pub struct TokenPrediction<S> {
    /// The predicted tag, with its begin/continue marker (e.g., "B-LOC")
    pub entity: String,

    /// The probability of the predicted tag
    pub score: S,

    /// The position of the token in the tokenized sequence
    pub index: usize,

    /// The token text, which may carry the continuation prefix (e.g., "##bon")
    pub word: String,

    /// Character offset where the token starts
    pub start: usize,

    /// Character offset where the token ends
    pub end: usize,
}

/// The per-token output of a token classification model
pub type RawPrediction<E> = TokenPrediction<E>;

/// Consecutive tokens of one entity merged into a single span
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, new)]
pub struct EntityGroup<S> {
    /// The entity type, without the begin/continue marker (e.g., "LOC")
    pub entity_group: String,

    /// The mean score of the grouped tokens
    pub score: S,

    /// The grouped tokens joined back into text
    pub word: String,

    /// Character offset where the entity starts
    pub start: usize,

    /// Character offset where the entity ends
    pub end: usize,
}

/// A class label predicted for a whole text
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, new)]
pub struct LabelScore<S> {
    /// The class label (e.g., "POSITIVE")
    pub label: String,

    /// The probability of the label
    pub score: S,
}

/// A prediction with every numeric field coerced to a plain numeric type
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FinalPrediction {
    /// A grouped entity from the Token Classification pipeline
    Entity(EntityGroup<f64>),

    /// A label from the Text Classification pipeline
    Label(LabelScore<f64>),
}

impl FinalPrediction {
    /// The entity type or class label
    pub fn label(&self) -> &str {
        match self {
            FinalPrediction::Entity(entity) => &entity.entity_group,
            FinalPrediction::Label(label) => &label.label,
        }
    }

    /// The prediction score
    pub fn score(&self) -> f64 {
        match self {
            FinalPrediction::Entity(entity) => entity.score,
            FinalPrediction::Label(label) => label.score,
        }
    }
}

impl From<EntityGroup<f64>> for FinalPrediction {
    fn from(entity: EntityGroup<f64>) -> Self {
        FinalPrediction::Entity(entity)
    }
}

impl From<LabelScore<f64>> for FinalPrediction {
    fn from(label: LabelScore<f64>) -> Self {
        FinalPrediction::Label(label)
    }
}

/// Coerce backend numeric types into plain serializable numbers
pub trait Normalize {
    /// The normalized form
    type Output;

    /// Convert every numeric field to a plain numeric type
    fn normalize(self) -> Self::Output;
}

impl<E: Element> Normalize for TokenPrediction<E> {
    type Output = TokenPrediction<f64>;

    fn normalize(self) -> Self::Output {
        TokenPrediction {
            entity: self.entity,
            score: self.score.elem(),
            index: self.index,
            word: self.word,
            start: self.start,
            end: self.end,
        }
    }
}

impl<E: Element> Normalize for EntityGroup<E> {
    type Output = EntityGroup<f64>;

    fn normalize(self) -> Self::Output {
        EntityGroup {
            entity_group: self.entity_group,
            score: self.score.elem(),
            word: self.word,
            start: self.start,
            end: self.end,
        }
    }
}

impl<E: Element> Normalize for LabelScore<E> {
    type Output = LabelScore<f64>;

    fn normalize(self) -> Self::Output {
        LabelScore {
            label: self.label,
            score: self.score.elem(),
        }
    }
}

impl<T: Normalize> Normalize for Vec<T> {
    type Output = Vec<T::Output>;

    fn normalize(self) -> Self::Output {
        self.into_iter().map(Normalize::normalize).collect()
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    #[test]
    fn test_normalize_converts_scores() {
        let entity = EntityGroup::new("LOC".to_string(), 0.5f32, "Lisbon".to_string(), 0, 6);

        let normalized: EntityGroup<f64> = entity.normalize();

        assert_eq!(normalized.score, 0.5);
        assert_eq!(normalized.word, "Lisbon");
        assert_eq!(normalized.start, 0);
        assert_eq!(normalized.end, 6);
    }

    #[test]
    fn test_normalize_is_idempotent() {
        let raw = vec![
            TokenPrediction::new("B-PER".to_string(), 0.875f32, 1, "Bar".to_string(), 0, 3),
            TokenPrediction::new("I-PER".to_string(), 0.25f32, 2, "##ack".to_string(), 3, 6),
        ];

        let once = raw.normalize();
        let twice = once.clone().normalize();

        assert_eq!(once, twice);
        assert_eq!(twice[0].score, 0.875);
        assert_eq!(twice[1].score, 0.25);
    }

    #[test]
    fn test_entity_serializes_in_field_order() {
        let prediction = FinalPrediction::from(EntityGroup::new(
            "LOC".to_string(),
            0.5,
            "Lisbon".to_string(),
            0,
            6,
        ));

        let serialized = serde_json::to_string(&prediction).unwrap();

        assert_eq!(
            serialized,
            r#"{"entity_group":"LOC","score":0.5,"word":"Lisbon","start":0,"end":6}"#
        );
    }

    #[test]
    fn test_untagged_deserialization_picks_the_right_shape() {
        let entity: FinalPrediction = serde_json::from_value(json!({
            "entity_group": "PER", "score": 0.9, "word": "Barack Obama", "start": 25, "end": 37
        }))
        .unwrap();
        let label: FinalPrediction =
            serde_json::from_value(json!({"label": "POSITIVE", "score": 0.99})).unwrap();

        assert!(matches!(entity, FinalPrediction::Entity(_)));
        assert_eq!(entity.label(), "PER");
        assert!(matches!(label, FinalPrediction::Label(_)));
        assert_eq!(label.label(), "POSITIVE");
        assert_eq!(label.score(), 0.99);
    }
}
