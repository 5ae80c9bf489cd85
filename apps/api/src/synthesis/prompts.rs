// Instruction sent with every uploaded portrait.
// Reuses cross-cutting fragments from llm_client::prompts.

use crate::llm_client::prompts::{ENGLISH_ONLY_INSTRUCTION, JSON_ONLY_INSTRUCTION};

/// Profile analysis instruction. Replace `{english_only}` and `{json_only}` before sending.
const PROFILE_ANALYSIS_TEMPLATE: &str = r#"You are an expert Hinge and Tinder profile consultant.
Analyze the provided selfie.

Tasks:
1. Generate EXACTLY 6 profile prompts (Hinge style). Each MUST have a 'question', 'answer', and 'vibe'.
2. Assign a 'vibe' to each: 'cozy', 'adventurous', 'intellectual', 'romantic', 'witty'.
3. Generate EXACTLY 6 image generation prompts, one for each lifestyle setting: Outdoor Adventure, Cozy Cafe, Professional, Candid, Travel, Hobby.

Return results in this EXACT JSON format:
{
  "prompts": [{"question": "...", "answer": "...", "vibe": "..."}],
  "imagePrompts": [{"style": "...", "prompt": "..."}]
}

{english_only}
{json_only}
CRITICAL: You MUST return exactly 6 items in BOTH arrays."#;

/// Builds the fixed instruction text.
pub fn profile_analysis_instruction() -> String {
    PROFILE_ANALYSIS_TEMPLATE
        .replace("{english_only}", ENGLISH_ONLY_INSTRUCTION)
        .replace("{json_only}", JSON_ONLY_INSTRUCTION)
}
