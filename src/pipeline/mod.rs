// Batch jobs: summarize a corpus, score summaries, review coverage.

pub mod evaluate;
pub mod review;
pub mod summarize;
