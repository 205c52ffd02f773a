// Resume generation: prompt assembly, the generate/download flows, and their handlers.
// All LLM calls go through llm_client — no direct OpenAI calls here.

pub mod generator;
pub mod handlers;
pub mod prompts;
