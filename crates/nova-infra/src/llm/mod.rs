//! Inference backend adapters.
//!
//! - `openai_compat`: any server speaking the OpenAI chat-completions API
//!   (LM Studio, llama.cpp server, vLLM, Ollama's compatibility endpoint)

pub mod openai_compat;
