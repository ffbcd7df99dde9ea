//! Chat backend adapters.

pub mod openai;
