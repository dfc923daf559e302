// Summarizer trait: one interface for every strategy.
//
// The pipeline only ever talks to `dyn Summarizer`, so adding a strategy means
// implementing this trait and registering it in `Strategy`.

use anyhow::Result;

use crate::corpus::Topic;

/// Trait for producing a short summary from one topic's reviews.
pub trait Summarizer {
    /// Short identifier used in logs and default output paths.
    fn name(&self) -> &'static str;

    /// Produce the ordered summary sentences for a topic.
    fn summarize(&self, topic: &Topic) -> Result<Vec<String>>;
}
