use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use tracing::warn;

/// Categorical tag attached to every profile prompt.
///
/// Deserialized case-insensitively. A tag outside the five known ones, or a missing
/// tag, becomes the default (`Witty`) rather than failing the prompt.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", from = "String")]
pub enum Vibe {
    Cozy,
    Adventurous,
    Intellectual,
    Romantic,
    #[default]
    Witty,
}

impl From<String> for Vibe {
    fn from(value: String) -> Self {
        match value.trim().to_lowercase().as_str() {
            "cozy" => Vibe::Cozy,
            "adventurous" => Vibe::Adventurous,
            "intellectual" => Vibe::Intellectual,
            "romantic" => Vibe::Romantic,
            "witty" => Vibe::Witty,
            _ => {
                let fallback = Vibe::default();
                warn!("Unknown vibe '{value}', using '{fallback}'");
                fallback
            }
        }
    }
}

impl fmt::Display for Vibe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Vibe::Cozy => "cozy",
            Vibe::Adventurous => "adventurous",
            Vibe::Intellectual => "intellectual",
            Vibe::Romantic => "romantic",
            Vibe::Witty => "witty",
        };
        f.write_str(label)
    }
}

/// A dating-profile question with its answer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfilePrompt {
    pub question: String,
    pub answer: String,
    #[serde(default)]
    pub vibe: Vibe,
}

/// An image-generation prompt for one lifestyle category.
/// Both fields are free-form; a missing field reads as empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImagePrompt {
    #[serde(default)]
    pub style: String,
    #[serde(default)]
    pub prompt: String,
}

/// An image prompt paired with the stock photo chosen for it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Photo {
    pub style: String,
    pub prompt: String,
    pub url: String,
}

/// The payload shape the model is asked to return.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Analysis {
    /// Entries without a usable `question`/`answer` are dropped, not fatal.
    #[serde(deserialize_with = "usable_prompts")]
    pub prompts: Vec<ProfilePrompt>,
    #[serde(default)]
    pub image_prompts: Vec<ImagePrompt>,
}

/// Reads the `prompts` array, keeping only entries that form a `ProfilePrompt`.
/// A `prompts` value that is not an array is still an error.
fn usable_prompts<'de, D>(deserializer: D) -> Result<Vec<ProfilePrompt>, D::Error>
where
    D: Deserializer<'de>,
{
    let entries = Vec::<Value>::deserialize(deserializer)?;
    let total = entries.len();
    let prompts: Vec<ProfilePrompt> = entries
        .into_iter()
        .filter_map(|entry| serde_json::from_value(entry).ok())
        .collect();
    if prompts.len() < total {
        warn!("Dropped {} unusable profile prompts", total - prompts.len());
    }
    Ok(prompts)
}

/// The result of one synthesis: six profile prompts and six photos.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SynthesisResult {
    pub prompts: Vec<ProfilePrompt>,
    pub photos: Vec<Photo>,
}
