//! Stock photo lookup — maps an image prompt to an illustrative photo by keyword.
//!
//! The URL is never produced by the model. Matching is case-insensitive over
//! `style + " " + prompt`; the first keyword in table order wins.

use crate::synthesis::models::{ImagePrompt, Photo};

const OUTDOOR_URL: &str =
    "https://images.unsplash.com/photo-1501555088652-021faa106b9b?auto=format&fit=crop&q=80&w=800";
const CAFE_URL: &str =
    "https://images.unsplash.com/photo-1554118811-1e0d58224f24?auto=format&fit=crop&q=80&w=800";
const PROFESSIONAL_URL: &str =
    "https://images.unsplash.com/photo-1486312338219-ce68d2c6f44d?auto=format&fit=crop&q=80&w=800";
const CANDID_URL: &str =
    "https://images.unsplash.com/photo-1494790108377-be9c29b29330?auto=format&fit=crop&q=80&w=800";
const TRAVEL_URL: &str =
    "https://images.unsplash.com/photo-1469854523086-cc02fe5d8800?auto=format&fit=crop&q=80&w=800";
const HOBBY_URL: &str =
    "https://images.unsplash.com/photo-1511671782779-c97d3d27a1d4?auto=format&fit=crop&q=80&w=800";

/// Keyword → photo URL, in match priority order. Keywords are lowercase.
pub const PHOTO_STYLES: &[(&str, &str)] = &[
    ("outdoor", OUTDOOR_URL),
    ("adventure", OUTDOOR_URL),
    ("cafe", CAFE_URL),
    ("coffee", CAFE_URL),
    ("professional", PROFESSIONAL_URL),
    ("work", PROFESSIONAL_URL),
    ("candid", CANDID_URL),
    ("laughing", CANDID_URL),
    ("travel", TRAVEL_URL),
    ("city", TRAVEL_URL),
    ("hobby", HOBBY_URL),
    ("interest", HOBBY_URL),
];

/// Used when no keyword matches.
pub const DEFAULT_PHOTO_URL: &str = CANDID_URL;

pub fn resolve_photo_url(style: &str, prompt: &str) -> &'static str {
    let haystack = format!("{style} {prompt}").to_lowercase();
    PHOTO_STYLES
        .iter()
        .find(|(keyword, _)| haystack.contains(keyword))
        .map(|(_, url)| *url)
        .unwrap_or(DEFAULT_PHOTO_URL)
}

pub fn to_photo(image_prompt: &ImagePrompt) -> Photo {
    Photo {
        style: image_prompt.style.clone(),
        prompt: image_prompt.prompt.clone(),
        url: resolve_photo_url(&image_prompt.style, &image_prompt.prompt).to_string(),
    }
}
