// Shared prompt fragments.
// Each service that needs model calls defines its own prompts.rs alongside it.
// This file contains cross-cutting instruction fragments.

/// Appended to every instruction that expects a JSON object back.
pub const JSON_ONLY_INSTRUCTION: &str = "\
    Respond with the JSON object only. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences.";

/// The model has been seen drifting into other languages mid-answer.
pub const ENGLISH_ONLY_INSTRUCTION: &str = "Write every value in English only.";
