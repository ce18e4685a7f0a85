//! ID generation utilities
//!
//! Ideas and iterations get timestamp-prefixed identifiers so that a plain
//! lexical sort of a store listing is roughly chronological.

use rand::Rng;

/// Get current timestamp in milliseconds since Unix epoch
pub fn now_ms() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

/// Generate a unique idea ID
///
/// Format: `{timestamp_ms}-{random_hex}`
/// Example: `1738300800123-a1b2c3d4`
pub fn generate_idea_id() -> String {
    let random: u32 = rand::rng().random();
    format!("{}-{:08x}", now_ms(), random)
}

/// Generate an iteration ID scoped to its idea
///
/// Format: `{idea_id}-it{number:03}`
pub fn generate_iteration_id(idea_id: &str, number: u32) -> String {
    format!("{}-it{:03}", idea_id, number)
}
