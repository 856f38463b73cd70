//! Upstream completion client for Textline.
//!
//! One implementation of [`textline_core::CompletionProvider`]: the
//! OpenAI-compatible `/chat/completions` endpoint, which covers OpenAI
//! itself plus the many services that mirror its API.

pub mod openai_compat;

pub use openai_compat::OpenAiCompatProvider;
