// Corpus access: topic files, gold references, generated summaries, and the
// text normalization every strategy builds on.

pub mod gold;
pub mod loader;
pub mod text;

pub use loader::{DetailedSummary, GoldSet, Summaries, Topic};
