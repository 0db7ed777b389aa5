//! Render API predictions over the original text, with entities highlighted in the terminal

use std::{collections::HashMap, ops::Range};

use url::Url;

use crate::{
    api::PredictResponse,
    pipelines::{prediction::EntityGroup, FinalPrediction, Pipeline},
};

/// The 20 colors of matplotlib's "tab20" colormap, assigned to labels in first-seen order
pub static PALETTE: &[&str; 20] = &[
    "#1f77b4", "#aec7e8", "#ff7f0e", "#ffbb78", "#2ca02c", "#98df8a", "#d62728", "#ff9896",
    "#9467bd", "#c5b0d5", "#8c564b", "#c49c94", "#e377c2", "#f7b6d2", "#7f7f7f", "#c7c7c7",
    "#bcbd22", "#dbdb8d", "#17becf", "#9edae5",
];

/// The API endpoints the visualization client calls
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Endpoints {
    /// POST /predict/
    pub predict: Url,

    /// POST /tokenize/
    pub tokenize: Url,
}

impl Endpoints {
    /// Build the endpoints of an API served at the given address
    pub fn new(ip: &str, port: u16) -> Result<Self, url::ParseError> {
        let base = Url::parse(&format!("http://{}:{}/", ip, port))?;

        Ok(Self {
            predict: base.join("predict/")?,
            tokenize: base.join("tokenize/")?,
        })
    }
}

/// An entity aligned to full words
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Span {
    /// The entity type
    pub label: String,

    /// Index of the first word
    pub start: usize,

    /// Index one past the last word
    pub end: usize,
}

/// Entities aligned to full words, ready to render
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Rendered {
    /// Aligned entities, in prediction order
    pub spans: Vec<Span>,

    /// Distinct labels, in first-seen order
    pub labels: Vec<String>,
}

impl Rendered {
    /// The palette color of a label
    pub fn color(&self, label: &str) -> Option<&'static str> {
        self.labels
            .iter()
            .position(|l| l == label)
            .map(|i| PALETTE[i.min(PALETTE.len() - 1)])
    }
}

/// Character boundaries of full words, as found in the original text
#[derive(Clone, Debug, Default)]
pub struct WordIndex {
    /// Word start offset to word index
    starts: HashMap<usize, usize>,

    /// Word end offset to word index
    ends: HashMap<usize, usize>,

    /// Character range of each word, when it was found
    positions: Vec<Option<Range<usize>>>,
}

impl WordIndex {
    /// Locate each word in the text, searching from one past the previous word's start
    pub fn new(text: &str, words: &[String]) -> Self {
        let chars: Vec<char> = text.chars().collect();
        let mut index = WordIndex::default();
        let mut from = 0;

        for (ix, word) in words.iter().enumerate() {
            let word: Vec<char> = word.chars().collect();

            let Some(start) = find_chars(&chars, &word, from) else {
                log::warn!("Word {} not found in text", word.iter().collect::<String>());
                index.positions.push(None);
                continue;
            };

            let end = start + word.len();

            index.starts.insert(start, ix);
            index.ends.insert(end, ix);
            index.positions.push(Some(start..end));

            from = start + 1;
        }

        index
    }

    /// The word range covering the given character offsets, if both fall on word boundaries
    pub fn span(&self, start: usize, end: usize) -> Option<Range<usize>> {
        let first = *self.starts.get(&start)?;
        let last = *self.ends.get(&end)?;

        Some(first..last + 1)
    }

    /// The character range of a run of words
    pub fn chars(&self, words: Range<usize>) -> Option<Range<usize>> {
        let first = self.positions.get(words.start)?.as_ref()?;
        let last = self.positions.get(words.end.checked_sub(1)?)?.as_ref()?;

        Some(first.start..last.end)
    }
}

fn find_chars(haystack: &[char], needle: &[char], from: usize) -> Option<usize> {
    if needle.is_empty() || haystack.len() < needle.len() {
        return None;
    }

    (from..=haystack.len() - needle.len()).find(|&i| haystack[i..i + needle.len()] == *needle)
}

/// Align entity predictions to full words
///
/// Entities whose offsets don't fall on word boundaries are skipped with a warning.
pub fn align(index: &WordIndex, predictions: &[FinalPrediction]) -> Rendered {
    let mut rendered = Rendered::default();

    for prediction in predictions {
        let FinalPrediction::Entity(entity) = prediction else {
            continue;
        };

        let Some(words) = index.span(entity.start, entity.end) else {
            log::warn!("Skipping: {}", describe(entity));
            continue;
        };

        if !rendered.labels.contains(&entity.entity_group) {
            rendered.labels.push(entity.entity_group.clone());
        }

        rendered.spans.push(Span {
            label: entity.entity_group.clone(),
            start: words.start,
            end: words.end,
        });
    }

    rendered
}

fn describe(entity: &EntityGroup<f64>) -> String {
    serde_json::to_string(entity).unwrap_or_else(|_| format!("{:?}", entity))
}

/// Render the text with aligned entities highlighted
///
/// With `styled` set, each entity gets its label color as an ANSI 24-bit background. Otherwise
/// entities are bracketed as `[text LABEL]`.
pub fn highlight(text: &str, index: &WordIndex, rendered: &Rendered, styled: bool) -> String {
    let chars: Vec<char> = text.chars().collect();
    let mut output = String::new();
    let mut cursor = 0;

    for span in &rendered.spans {
        let Some(range) = index.chars(span.start..span.end) else {
            continue;
        };

        // Overlapping entities can't be drawn inline
        if range.start < cursor || range.end > chars.len() {
            log::warn!("Skipping overlapping {} entity", span.label);
            continue;
        }

        output.extend(&chars[cursor..range.start]);

        let entity: String = chars[range.clone()].iter().collect();
        let color = rendered.color(&span.label).unwrap_or(PALETTE[0]);

        output.push_str(&paint(&entity, &span.label, color, styled));

        cursor = range.end;
    }

    output.extend(&chars[cursor..]);

    output
}

fn paint(entity: &str, label: &str, color: &str, styled: bool) -> String {
    match (styled, rgb(color)) {
        (true, Some((r, g, b))) => format!(
            "\x1b[30;48;2;{};{};{}m {} \x1b[1m{} \x1b[0m",
            r, g, b, entity, label
        ),
        _ => format!("[{} {}]", entity, label),
    }
}

fn rgb(hex: &str) -> Option<(u8, u8, u8)> {
    let hex = hex.strip_prefix('#')?;
    if hex.len() != 6 {
        return None;
    }

    let channel = |i: usize| u8::from_str_radix(hex.get(i..i + 2)?, 16).ok();

    Some((channel(0)?, channel(2)?, channel(4)?))
}

/// Render the full report for a text: pipeline info, highlighted predictions and details
///
/// `tokens` are the full words from the tokenize endpoint, needed by pipelines that render
/// entities inline.
pub fn report(
    text: &str,
    response: &PredictResponse,
    tokens: Option<&[String]>,
    styled: bool,
) -> String {
    let mut output = format!(
        "## Pipeline Info\nPipeline Type: {}\nLoaded Model: {}\n\n",
        response.kind, response.model
    );

    if response.predictions.is_empty() {
        output.push_str("No predictions\n");
        return output;
    }

    output.push_str("## Predictions\n");

    match Pipeline::try_from_type(&response.kind) {
        Some(Pipeline::TokenClassification) => {
            let index = WordIndex::new(text, tokens.unwrap_or_default());
            let rendered = align(&index, &response.predictions);

            output.push_str(&highlight(text, &index, &rendered, styled));
            output.push('\n');
        }
        Some(Pipeline::TextClassification) => {
            output.push_str(&format!(
                "\"{}\" - Prediction: {}\n",
                text,
                response.predictions[0].label()
            ));
        }
        None => {}
    }

    output.push_str("\n### Details\n");

    for prediction in &response.predictions {
        let line =
            serde_json::to_string(prediction).unwrap_or_else(|_| format!("{:?}", prediction));
        output.push_str(&line);
        output.push('\n');
    }

    output
}
