//! Canned payload substituted whenever the model's output cannot be validated.

use crate::synthesis::models::{Analysis, ImagePrompt, ProfilePrompt, Vibe};

struct CannedPrompt {
    question: &'static str,
    answer: &'static str,
    vibe: Vibe,
}

struct CannedImagePrompt {
    style: &'static str,
    prompt: &'static str,
}

const CANNED_PROMPTS: [CannedPrompt; 6] = [
    CannedPrompt {
        question: "Secret talent?",
        answer: "Finding the best hidden coffee spots.",
        vibe: Vibe::Cozy,
    },
    CannedPrompt {
        question: "Life goal?",
        answer: "To see the Northern Lights from an igloo.",
        vibe: Vibe::Adventurous,
    },
    CannedPrompt {
        question: "Controversial opinion?",
        answer: "Pineapple absolutely belongs on pizza.",
        vibe: Vibe::Witty,
    },
    CannedPrompt {
        question: "Simple pleasures?",
        answer: "The smell of old books and fresh rain.",
        vibe: Vibe::Intellectual,
    },
    CannedPrompt {
        question: "Key to my heart?",
        answer: "Making me laugh when I'm being serious.",
        vibe: Vibe::Romantic,
    },
    CannedPrompt {
        question: "Social cause?",
        answer: "Sustainability and ethical tech.",
        vibe: Vibe::Intellectual,
    },
];

const CANNED_IMAGE_PROMPTS: [CannedImagePrompt; 6] = [
    CannedImagePrompt {
        style: "Outdoor Adventure",
        prompt: "A cinematic shot of a man hiking at sunset.",
    },
    CannedImagePrompt {
        style: "Cozy Cafe",
        prompt: "A warm portrait in a rustic cafe.",
    },
    CannedImagePrompt {
        style: "Professional",
        prompt: "A sharp headshot in a modern studio.",
    },
    CannedImagePrompt {
        style: "Candid",
        prompt: "A natural photo of a man laughing with friends.",
    },
    CannedImagePrompt {
        style: "Travel",
        prompt: "An atmospheric shot over a European skyline.",
    },
    CannedImagePrompt {
        style: "Hobby",
        prompt: "A creative photo focused on a craft or instrument.",
    },
];

pub fn canned_prompts() -> Vec<ProfilePrompt> {
    CANNED_PROMPTS
        .iter()
        .map(|p| ProfilePrompt {
            question: p.question.to_string(),
            answer: p.answer.to_string(),
            vibe: p.vibe,
        })
        .collect()
}

pub fn canned_image_prompts() -> Vec<ImagePrompt> {
    CANNED_IMAGE_PROMPTS
        .iter()
        .map(|p| ImagePrompt {
            style: p.style.to_string(),
            prompt: p.prompt.to_string(),
        })
        .collect()
}

/// The full six-and-six fallback.
pub fn canned_analysis() -> Analysis {
    Analysis {
        prompts: canned_prompts(),
        image_prompts: canned_image_prompts(),
    }
}
