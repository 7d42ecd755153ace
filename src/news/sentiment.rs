//! Lexicon-based polarity for article descriptions.
//!
//! Each known word contributes a fixed weight; a negator within the two
//! preceding words flips it. The label follows the sign of the total, so an
//! unscored text is neutral.

use crate::models::Sentiment;

const POSITIVE: &[(&str, f32)] = &[
    ("good", 0.7),
    ("great", 0.8),
    ("best", 1.0),
    ("better", 0.5),
    ("excellent", 1.0),
    ("amazing", 0.6),
    ("happy", 0.8),
    ("win", 0.6),
    ("wins", 0.6),
    ("won", 0.6),
    ("success", 0.7),
    ("successful", 0.7),
    ("growth", 0.4),
    ("gain", 0.4),
    ("gains", 0.4),
    ("improve", 0.5),
    ("improved", 0.5),
    ("record", 0.3),
    ("breakthrough", 0.8),
    ("hope", 0.4),
    ("hopeful", 0.5),
    ("celebrate", 0.6),
    ("strong", 0.4),
    ("safe", 0.5),
    ("recovery", 0.5),
    ("boost", 0.5),
    ("love", 0.5),
    ("innovative", 0.6),
    ("positive", 0.5),
    ("benefit", 0.5),
];

const NEGATIVE: &[(&str, f32)] = &[
    ("bad", 0.7),
    ("worse", 0.6),
    ("worst", 1.0),
    ("terrible", 1.0),
    ("sad", 0.5),
    ("loss", 0.5),
    ("lose", 0.5),
    ("lost", 0.5),
    ("fail", 0.6),
    ("failed", 0.6),
    ("failure", 0.6),
    ("crisis", 0.7),
    ("death", 0.8),
    ("dead", 0.8),
    ("killed", 0.9),
    ("war", 0.7),
    ("attack", 0.7),
    ("crash", 0.6),
    ("decline", 0.4),
    ("drop", 0.3),
    ("fear", 0.6),
    ("threat", 0.5),
    ("danger", 0.6),
    ("dangerous", 0.6),
    ("scandal", 0.7),
    ("fraud", 0.8),
    ("violence", 0.8),
    ("disaster", 0.9),
    ("negative", 0.5),
    ("weak", 0.4),
];

const NEGATORS: &[&str] = &["not", "no", "never", "without", "hardly"];

const NEGATION_WINDOW: usize = 2;

pub fn polarity(text: &str) -> f32 {
    let words: Vec<String> = text
        .split(|c: char| !c.is_alphanumeric() && !is_apostrophe(c))
        .filter(|w| !w.is_empty())
        .map(|w| w.to_lowercase().replace('\u{2019}', "'"))
        .collect();

    let mut score = 0.0;
    for (i, word) in words.iter().enumerate() {
        let Some(weight) = word_weight(word) else {
            continue;
        };

        let negated = words[i.saturating_sub(NEGATION_WINDOW)..i]
            .iter()
            .any(|w| is_negator(w));

        score += if negated { -weight } else { weight };
    }
    score
}

pub fn classify(text: &str) -> Sentiment {
    let score = polarity(text);
    if score > 0.0 {
        Sentiment::Positive
    } else if score < 0.0 {
        Sentiment::Negative
    } else {
        Sentiment::Neutral
    }
}

fn word_weight(word: &str) -> Option<f32> {
    POSITIVE
        .iter()
        .find(|(w, _)| *w == word)
        .map(|(_, weight)| *weight)
        .or_else(|| {
            NEGATIVE
                .iter()
                .find(|(w, _)| *w == word)
                .map(|(_, weight)| -weight)
        })
}

// Feed text often uses the typographic apostrophe
fn is_apostrophe(c: char) -> bool {
    c == '\'' || c == '\u{2019}'
}

fn is_negator(word: &str) -> bool {
    NEGATORS.contains(&word) || word.ends_with("n't")
}
