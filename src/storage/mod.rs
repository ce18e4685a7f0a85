//! Storage layer - JSONL collections with an idea-shaped facade.

mod ideas;
mod jsonl;
mod traits;

use std::path::{Path, PathBuf};

pub use ideas::{IDEAS, ITERATIONS, IdeaRecord, IdeaStore, IterationRecord};
pub use jsonl::JsonlStorage;
pub use traits::{Filter, FilterOp, HasId, Storage};

use crate::error::Result;

/// `<data_local_dir>/idearalph/store`, falling back to `./.idearalph`
pub fn default_store_dir() -> PathBuf {
    dirs::data_local_dir()
        .map(|d| d.join("idearalph").join("store"))
        .unwrap_or_else(|| PathBuf::from(".idearalph"))
}

/// Open the JSONL-backed idea store rooted at `dir`
pub fn open_idea_store(dir: impl AsRef<Path>) -> Result<IdeaStore<JsonlStorage>> {
    Ok(IdeaStore::new(JsonlStorage::new(dir)?))
}
