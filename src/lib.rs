//! idearalph - startup ideas, iterated until they're dope
//!
//! A model generates an idea, then critiques and rewrites it in a bounded
//! loop until its self-reported "dope level" reaches a threshold. The same
//! engine backs a small tool surface (brainstorm, validate, refine, PRD,
//! architecture) and a JSONL-backed idea store.

pub mod domain;
pub mod engine;
pub mod error;
pub mod id;
pub mod llm;
pub mod prompt;
pub mod runner;
pub mod scoring;
pub mod storage;
pub mod tools;

pub use error::{IdeaRalphError, Result};
