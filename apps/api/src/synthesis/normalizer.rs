//! Response Normalizer — coerces free-form model text into a six-and-six `SynthesisResult`.
//!
//! Steps:
//! 1. Isolate the text between the first `{` and the last `}`
//! 2. Replace the known hallucinated transition with a comma, strip CJK characters
//! 3. Parse as `Analysis` (prompts lacking a question or answer are dropped)
//! 4. Require at least `MIN_PARSED_PROMPTS` usable profile prompts
//! 5. On any failure, substitute the canned payload
//! 6. Top up / truncate both lists to six, then resolve each image prompt to a photo
//!
//! Never fails: the worst case is the canned payload.

use thiserror::Error;
use tracing::{info, warn};

use crate::synthesis::fallback::{canned_analysis, canned_image_prompts, canned_prompts};
use crate::synthesis::models::{Analysis, SynthesisResult};
use crate::synthesis::photos::to_photo;

/// Below this many parsed profile prompts the whole model payload is discarded.
pub const MIN_PARSED_PROMPTS: usize = 3;
/// Exact number of profile prompts and photos in every result.
pub const RESULT_SIZE: usize = 6;

/// A transition phrase the model has emitted between JSON members in place of a comma.
const HALLUCINATED_SEPARATOR: &str = "に対し て";

#[derive(Debug, Error)]
pub enum NormalizeError {
    #[error("response is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("partial result: {found} profile prompts (need at least {MIN_PARSED_PROMPTS})")]
    TooFewPrompts { found: usize },
}

/// Turns raw model text into a result that always holds six prompts and six photos.
pub fn normalize(raw: &str) -> SynthesisResult {
    let analysis = match parse_analysis(raw) {
        Ok(analysis) => {
            info!(
                "Model payload accepted: {} prompts, {} image prompts",
                analysis.prompts.len(),
                analysis.image_prompts.len()
            );
            analysis
        }
        Err(e) => {
            warn!("Model payload rejected ({e}); substituting canned payload");
            canned_analysis()
        }
    };

    let prompts = top_up(analysis.prompts, canned_prompts());
    let image_prompts = top_up(analysis.image_prompts, canned_image_prompts());

    SynthesisResult {
        prompts,
        photos: image_prompts.iter().map(to_photo).collect(),
    }
}

/// Steps 1–4. Exposed separately so callers can tell a model payload from the fallback.
pub fn parse_analysis(raw: &str) -> Result<Analysis, NormalizeError> {
    let cleaned = clean(isolate_json(raw));
    let analysis: Analysis = serde_json::from_str(&cleaned)?;

    if analysis.prompts.len() < MIN_PARSED_PROMPTS {
        return Err(NormalizeError::TooFewPrompts {
            found: analysis.prompts.len(),
        });
    }

    Ok(analysis)
}

/// Returns the slice from the first `{` through the last `}`, or the whole text
/// when the pair is absent or out of order.
fn isolate_json(raw: &str) -> &str {
    match (raw.find('{'), raw.rfind('}')) {
        (Some(start), Some(end)) if start < end => &raw[start..=end],
        _ => raw,
    }
}

/// Lossy cleanup. CJK characters are dropped everywhere, including inside string
/// values; the model is instructed to answer in English only.
fn clean(text: &str) -> String {
    text.replace(HALLUCINATED_SEPARATOR, ",")
        .chars()
        .filter(|c| !is_cjk(*c))
        .collect::<String>()
        .trim()
        .to_string()
}

fn is_cjk(c: char) -> bool {
    matches!(c,
        '\u{3000}'..='\u{303F}'   // CJK symbols and punctuation
        | '\u{3040}'..='\u{309F}' // Hiragana
        | '\u{30A0}'..='\u{30FF}' // Katakana
        | '\u{FF00}'..='\u{FFEF}' // Half/full-width forms
        | '\u{4E00}'..='\u{9FAF}' // CJK unified ideographs
    )
}

/// Keeps at most `RESULT_SIZE` items and fills any shortfall from `canned`
/// at the same positions.
fn top_up<T>(mut items: Vec<T>, canned: Vec<T>) -> Vec<T> {
    items.truncate(RESULT_SIZE);
    let have = items.len();
    items.extend(canned.into_iter().skip(have).take(RESULT_SIZE - have));
    items
}
