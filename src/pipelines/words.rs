use serde::{Deserialize, Serialize};
use tokenizers::{models::ModelWrapper, Encoding, Tokenizer};

/// The WordPiece continuation prefix, used when the tokenizer doesn't declare one
pub static DEFAULT_CONTINUATION_PREFIX: &str = "##";

/// A full word reconstructed from one or more sub-word tokens
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Word {
    /// The word as it appears in the original text
    pub text: String,

    /// Character offset where the word starts
    pub start: usize,

    /// Character offset where the word ends
    pub end: usize,
}

/// A borrowed view over the pieces of a tokenized text
#[derive(Clone, Copy, Debug)]
pub struct Pieces<'a> {
    /// Token strings, as produced by the tokenizer
    pub tokens: &'a [String],

    /// Character offsets of each token in the original text
    pub offsets: &'a [(usize, usize)],

    /// 1 for special tokens such as [CLS] and [SEP], 0 otherwise
    pub special_tokens_mask: &'a [u32],
}

impl<'a> From<&'a Encoding> for Pieces<'a> {
    fn from(encoding: &'a Encoding) -> Self {
        Pieces {
            tokens: encoding.get_tokens(),
            offsets: encoding.get_offsets(),
            special_tokens_mask: encoding.get_special_tokens_mask(),
        }
    }
}

impl Pieces<'_> {
    /// Whether the token at the given position is a special token
    pub fn is_special(&self, index: usize) -> bool {
        self.special_tokens_mask.get(index) == Some(&1)
    }
}

/// Read the sub-word continuation prefix from a tokenizer's WordPiece model
pub fn continuation_prefix(tokenizer: &Tokenizer) -> String {
    match tokenizer.get_model() {
        ModelWrapper::WordPiece(model) => model.continuing_subword_prefix.clone(),
        _ => DEFAULT_CONTINUATION_PREFIX.to_string(),
    }
}

/// Re-join sub-word pieces into the full words of the original text
///
/// A piece starting with the continuation prefix extends the previous word. Word text is sliced
/// from the original input, so casing and accents survive normalizing tokenizers.
pub fn full_words(text: &str, pieces: &Pieces<'_>, prefix: &str) -> Vec<Word> {
    let chars: Vec<char> = text.chars().collect();
    let mut spans: Vec<(usize, usize)> = Vec::new();

    for (i, token) in pieces.tokens.iter().enumerate() {
        if pieces.is_special(i) {
            continue;
        }

        let Some(&(start, end)) = pieces.offsets.get(i) else {
            continue;
        };

        match spans.last_mut() {
            Some(last) if !prefix.is_empty() && token.starts_with(prefix) => last.1 = end,
            _ => spans.push((start, end)),
        }
    }

    spans
        .into_iter()
        .map(|(start, end)| Word {
            text: chars[start.min(chars.len())..end.min(chars.len())]
                .iter()
                .collect(),
            start,
            end,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn strings(tokens: &[&str]) -> Vec<String> {
        tokens.iter().map(|t| t.to_string()).collect()
    }

    fn texts(words: &[Word]) -> Vec<&str> {
        words.iter().map(|w| w.text.as_str()).collect()
    }

    #[test]
    fn test_whole_words_pass_through() {
        let text = "Test sentence and stuff.";
        let tokens = strings(&["[CLS]", "Test", "sentence", "and", "stuff", ".", "[SEP]"]);
        let offsets = [(0, 0), (0, 4), (5, 13), (14, 17), (18, 23), (23, 24), (0, 0)];
        let mask = [1, 0, 0, 0, 0, 0, 1];

        let pieces = Pieces {
            tokens: &tokens,
            offsets: &offsets,
            special_tokens_mask: &mask,
        };

        let words = full_words(text, &pieces, "##");

        assert_eq!(texts(&words), vec!["Test", "sentence", "and", "stuff", "."]);
        assert_eq!(words[4].start, 23);
        assert_eq!(words[4].end, 24);
    }

    #[test]
    fn test_continuation_pieces_are_rejoined() {
        let text = "António Nunes!";
        let tokens = strings(&["[CLS]", "Ant", "##ó", "##nio", "Nun", "##es", "!", "[SEP]"]);
        let offsets = [
            (0, 0),
            (0, 3),
            (3, 4),
            (4, 7),
            (8, 11),
            (11, 13),
            (13, 14),
            (0, 0),
        ];
        let mask = [1, 0, 0, 0, 0, 0, 0, 1];

        let pieces = Pieces {
            tokens: &tokens,
            offsets: &offsets,
            special_tokens_mask: &mask,
        };

        let words = full_words(text, &pieces, "##");

        assert_eq!(texts(&words), vec!["António", "Nunes", "!"]);
        assert_eq!((words[0].start, words[0].end), (0, 7));
        assert_eq!((words[1].start, words[1].end), (8, 13));
    }

    #[test]
    fn test_leading_continuation_piece_starts_a_word() {
        let text = "x";
        let tokens = strings(&["##x"]);
        let offsets = [(0, 1)];
        let mask = [0];

        let pieces = Pieces {
            tokens: &tokens,
            offsets: &offsets,
            special_tokens_mask: &mask,
        };

        assert_eq!(texts(&full_words(text, &pieces, "##")), vec!["x"]);
    }
}
