// Opinsum: extractive summarization and evaluation for opinion reviews
//
// This is the library root. Each module corresponds to a stage of the
// summarize -> evaluate workflow over the Opinosis review corpus.

pub mod config;
pub mod corpus;
pub mod embeddings;
pub mod metrics;
pub mod output;
pub mod pipeline;
pub mod status;
pub mod summarize;
