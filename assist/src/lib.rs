//! # Accesstrack Assist
//!
//! Best-effort AI assistance for accessibility ticket intake.
//!
//! Wraps a generative-language HTTP API behind three operations used at
//! submission time: enhancing a free-text issue description, analyzing a
//! screenshot for accessibility problems, and suggesting remediations.
//!
//! All three are best-effort: on any failure the caller's input (or a fixed
//! guidance message) is returned unchanged, so ticket submission never
//! depends on the assistant being reachable.

mod client;
mod error;
mod types;

pub use client::AssistClient;
pub use error::AssistError;
pub use types::{Candidate, Content, GenerateRequest, GenerateResponse, InlineData, Part};
