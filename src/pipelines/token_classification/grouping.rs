use burn::tensor::{Element, ElementConversion};

use crate::pipelines::prediction::{EntityGroup, TokenPrediction};

use super::tags::{split_tag, Marker};

/// Merge consecutive tokens of the same entity into entity groups
///
/// A token joins the pending group when it directly follows the previous token, has the same
/// entity type and isn't tagged as the beginning of a new entity. Tokens dropped before grouping
/// (such as "O") leave a gap in the indices, which closes the group.
pub fn group_entities<E: Element>(
    predictions: &[TokenPrediction<E>],
    prefix: &str,
) -> Vec<EntityGroup<E>> {
    let mut groups = Vec::new();
    let mut pending: Vec<&TokenPrediction<E>> = Vec::new();

    for prediction in predictions {
        if let Some(last) = pending.last() {
            let (marker, entity_type) = split_tag(&prediction.entity);
            let (_, last_type) = split_tag(&last.entity);

            let adjacent = prediction.index == last.index + 1;

            if !adjacent || entity_type != last_type || marker == Marker::Begin {
                groups.extend(group_sub_entities(&pending, prefix));
                pending.clear();
            }
        }

        pending.push(prediction);
    }

    groups.extend(group_sub_entities(&pending, prefix));

    groups
}

/// Collapse one run of tokens into a single entity group
fn group_sub_entities<E: Element>(
    tokens: &[&TokenPrediction<E>],
    prefix: &str,
) -> Option<EntityGroup<E>> {
    let first = tokens.first()?;
    let last = tokens.last()?;

    let (_, entity_type) = split_tag(&first.entity);

    let total: f64 = tokens.iter().map(|t| t.score.elem::<f64>()).sum();
    let score = total / tokens.len() as f64;

    let words: Vec<&str> = tokens.iter().map(|t| t.word.as_str()).collect();

    Some(EntityGroup {
        entity_group: entity_type.to_string(),
        score: score.elem(),
        word: join_tokens(&words, prefix),
        start: first.start,
        end: last.end,
    })
}

/// Join WordPiece tokens back into text, gluing continuation pieces to the previous token
pub fn join_tokens(tokens: &[&str], prefix: &str) -> String {
    let joined = tokens.join(" ");

    if prefix.is_empty() {
        return joined.trim().to_string();
    }

    joined
        .replace(&format!(" {}", prefix), "")
        .trim()
        .to_string()
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::pipelines::token_classification::tags::correct_subword_tags;

    fn token(
        entity: &str,
        score: f32,
        index: usize,
        word: &str,
        start: usize,
        end: usize,
    ) -> TokenPrediction<f32> {
        TokenPrediction::new(entity.to_string(), score, index, word.to_string(), start, end)
    }

    #[test]
    fn test_join_tokens() {
        assert_eq!(join_tokens(&["Ú", "##lm", "##án", "Sch", "##ütze"], "##"), "Úlmán Schütze");
        assert_eq!(join_tokens(&["Barack", "Obama"], "##"), "Barack Obama");
    }

    #[test]
    fn test_begin_then_inside_is_one_entity() {
        let predictions = vec![
            token("B-PER", 0.5, 6, "Barack", 25, 31),
            token("I-PER", 1.0, 7, "Obama", 32, 37),
        ];

        let groups = group_entities(&predictions, "##");

        assert_eq!(
            groups,
            vec![EntityGroup::new("PER".to_string(), 0.75, "Barack Obama".to_string(), 25, 37)]
        );
    }

    #[test]
    fn test_consecutive_begins_are_separate_entities() {
        let predictions = vec![
            token("B-PER", 0.5, 1, "Barack", 0, 6),
            token("B-PER", 0.5, 2, "Obama", 7, 12),
        ];

        let groups = group_entities(&predictions, "##");

        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].word, "Barack");
        assert_eq!(groups[1].word, "Obama");
    }

    #[test]
    fn test_type_change_closes_the_group() {
        let predictions = vec![
            token("B-ORG", 1.0, 1, "Lisbon", 0, 6),
            token("I-LOC", 1.0, 2, "Portugal", 7, 15),
        ];

        let groups = group_entities(&predictions, "##");

        let types: Vec<_> = groups.iter().map(|g| g.entity_group.as_str()).collect();
        assert_eq!(types, vec!["ORG", "LOC"]);
    }

    #[test]
    fn test_subwords_group_after_correction() {
        let mut predictions = vec![
            token("B-PER", 1.0, 4, "Ú", 13, 14),
            token("B-PER", 1.0, 5, "##lm", 14, 16),
            token("B-PER", 1.0, 6, "##án", 16, 18),
            token("I-PER", 1.0, 7, "Sch", 19, 22),
            token("I-PER", 1.0, 8, "##ütze", 22, 26),
        ];

        correct_subword_tags(&mut predictions, "##");
        let groups = group_entities(&predictions, "##");

        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].word, "Úlmán Schütze");
        assert_eq!((groups[0].start, groups[0].end), (13, 26));
    }

    #[test]
    fn test_gap_between_tokens_closes_the_group() {
        // "Paris and London": "and" was tagged O and dropped before grouping
        let predictions = vec![
            token("B-LOC", 0.5, 1, "Paris", 0, 5),
            token("I-LOC", 1.0, 3, "London", 10, 16),
        ];

        let groups = group_entities(&predictions, "##");

        assert_eq!(
            groups,
            vec![
                EntityGroup::new("LOC".to_string(), 0.5, "Paris".to_string(), 0, 5),
                EntityGroup::new("LOC".to_string(), 1.0, "London".to_string(), 10, 16),
            ]
        );
    }

    #[test]
    fn test_no_tokens_no_groups() {
        let predictions: Vec<TokenPrediction<f32>> = Vec::new();

        assert!(group_entities(&predictions, "##").is_empty());
    }
}
