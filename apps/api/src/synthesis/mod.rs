// Synthesis: one uploaded portrait in, six profile prompts and six stock photos out.
// All model calls go through llm_client — no direct Gemini HTTP calls here.

pub mod fallback;
pub mod handlers;
pub mod models;
pub mod normalizer;
pub mod orchestrator;
pub mod photos;
pub mod prompts;

#[cfg(test)]
pub mod testing;
