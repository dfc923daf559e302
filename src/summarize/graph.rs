// Word-order graph summarization.
//
// Every cleaned review contributes its adjacent word pairs to a directed graph:
// nodes are words, and the weight of `a -> b` counts how often `b` directly
// follows `a` anywhere in the topic. Candidate summary sentences are simple
// paths through that graph; a path scores the sum of its edge weights, so
// well-trodden word sequences win.
//
// Path enumeration is exhaustive for every (start, end) pair up to the edge
// bound and grows exponentially with graph density. Only a bounded top-N
// buffer is kept, and `max_expansions` can cap the search outright.

use std::collections::HashMap;

use anyhow::Result;
use tracing::{debug, warn};

use super::traits::Summarizer;
use crate::corpus::text::clean_bare;
use crate::corpus::Topic;

/// Paths may run this many edges beyond `min_length` nodes.
const EXTRA_EDGES: usize = 3;

/// Directed word-adjacency graph with transition counts.
#[derive(Debug, Default)]
pub struct WordGraph {
    words: Vec<String>,
    index: HashMap<String, usize>,
    /// Outgoing edges per node, in first-seen order: (target, weight)
    edges: Vec<Vec<(usize, u64)>>,
}

/// A word path with its cumulative edge weight.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredPath {
    pub words: Vec<String>,
    pub score: u64,
}

impl ScoredPath {
    pub fn sentence(&self) -> String {
        self.words.join(" ")
    }
}

/// Outcome of a path search.
#[derive(Debug)]
pub struct PathSearch {
    /// Best paths, highest score first
    pub paths: Vec<ScoredPath>,
    /// Number of path extensions performed
    pub expansions: u64,
    /// True when `max_expansions` stopped the search early
    pub truncated: bool,
}

impl WordGraph {
    /// Build the graph from already-cleaned sentences (whitespace-tokenized).
    pub fn build<S: AsRef<str>>(sentences: &[S]) -> Self {
        let mut graph = Self::default();
        for sentence in sentences {
            let tokens: Vec<&str> = sentence.as_ref().split_whitespace().collect();
            for pair in tokens.windows(2) {
                graph.add_transition(pair[0], pair[1]);
            }
        }
        graph
    }

    fn node(&mut self, word: &str) -> usize {
        if let Some(&idx) = self.index.get(word) {
            return idx;
        }
        let idx = self.words.len();
        self.words.push(word.to_string());
        self.index.insert(word.to_string(), idx);
        self.edges.push(Vec::new());
        idx
    }

    fn add_transition(&mut self, from: &str, to: &str) {
        let a = self.node(from);
        let b = self.node(to);
        match self.edges[a].iter_mut().find(|(t, _)| *t == b) {
            Some((_, w)) => *w += 1,
            None => self.edges[a].push((b, 1)),
        }
    }

    pub fn node_count(&self) -> usize {
        self.words.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.iter().map(Vec::len).sum()
    }

    /// Weight of the edge `from -> to`, if present.
    pub fn weight(&self, from: &str, to: &str) -> Option<u64> {
        let a = *self.index.get(from)?;
        let b = *self.index.get(to)?;
        self.edges[a].iter().find(|(t, _)| *t == b).map(|(_, w)| *w)
    }

    /// Sum of edge weights along a word path; `None` if any hop is missing.
    pub fn score_path<S: AsRef<str>>(&self, path: &[S]) -> Option<u64> {
        path.windows(2)
            .map(|pair| self.weight(pair[0].as_ref(), pair[1].as_ref()))
            .sum()
    }

    /// Find the `top_n` highest-scoring simple paths with at least
    /// `min_length` nodes and at most `max_edges` edges.
    ///
    /// Equal scores keep enumeration order: start node, then end node (both in
    /// first-seen order), then depth-first order over successors.
    pub fn top_paths(
        &self,
        min_length: usize,
        max_edges: usize,
        top_n: usize,
        max_expansions: Option<u64>,
    ) -> PathSearch {
        let mut best = TopN::new(top_n);
        let mut expansions = 0u64;
        let mut truncated = false;

        if top_n == 0 {
            return PathSearch {
                paths: Vec::new(),
                expansions,
                truncated,
            };
        }

        let n = self.words.len();
        let mut on_path = vec![false; n];

        'starts: for start in 0..n {
            let mut path = vec![start];
            let mut score = 0u64;
            // Per-depth cursor into the successor list of path[depth]
            let mut cursors = vec![0usize];
            let mut seq = 0u64;
            on_path[start] = true;

            while let Some(cursor) = cursors.last_mut() {
                let node = path[path.len() - 1];
                let edges_used = path.len() - 1;

                let next = if edges_used < max_edges {
                    self.edges[node][*cursor..]
                        .iter()
                        .position(|(t, _)| !on_path[*t])
                        .map(|offset| *cursor + offset)
                } else {
                    None
                };

                match next {
                    Some(edge_idx) => {
                        *cursor = edge_idx + 1;
                        let (target, weight) = self.edges[node][edge_idx];

                        expansions += 1;
                        if max_expansions.is_some_and(|limit| expansions > limit) {
                            truncated = true;
                            on_path[start] = false;
                            for &p in &path[1..] {
                                on_path[p] = false;
                            }
                            break 'starts;
                        }

                        path.push(target);
                        on_path[target] = true;
                        score += weight;
                        cursors.push(0);

                        if path.len() >= min_length {
                            best.offer(Candidate {
                                score,
                                start,
                                end: target,
                                seq,
                                nodes: path.clone(),
                            });
                            seq += 1;
                        }
                    }
                    None => {
                        cursors.pop();
                        let last = path.pop().unwrap_or(start);
                        on_path[last] = false;
                        if let Some(&prev) = path.last() {
                            score -= self
                                .edges[prev]
                                .iter()
                                .find(|(t, _)| *t == last)
                                .map(|(_, w)| *w)
                                .unwrap_or(0);
                        }
                    }
                }
            }
        }

        let paths = best
            .into_sorted()
            .into_iter()
            .map(|c| ScoredPath {
                words: c.nodes.iter().map(|&i| self.words[i].clone()).collect(),
                score: c.score,
            })
            .collect();

        PathSearch {
            paths,
            expansions,
            truncated,
        }
    }
}

#[derive(Debug)]
struct Candidate {
    score: u64,
    start: usize,
    end: usize,
    seq: u64,
    nodes: Vec<usize>,
}

impl Candidate {
    /// True when `self` ranks ahead of `other`.
    fn beats(&self, other: &Candidate) -> bool {
        if self.score != other.score {
            return self.score > other.score;
        }
        (self.start, self.end, self.seq) < (other.start, other.end, other.seq)
    }
}

/// Bounded buffer of the best candidates, kept sorted best-first.
struct TopN {
    capacity: usize,
    items: Vec<Candidate>,
}

impl TopN {
    fn new(capacity: usize) -> Self {
        Self {
            capacity,
            items: Vec::with_capacity(capacity),
        }
    }

    fn offer(&mut self, candidate: Candidate) {
        if self.items.len() == self.capacity {
            match self.items.last() {
                Some(worst) if candidate.beats(worst) => {
                    self.items.pop();
                }
                _ => return,
            }
        }
        let pos = self
            .items
            .iter()
            .position(|c| candidate.beats(c))
            .unwrap_or(self.items.len());
        self.items.insert(pos, candidate);
    }

    fn into_sorted(self) -> Vec<Candidate> {
        self.items
    }
}

/// Graph-based summarizer returning the top word paths of each topic.
pub struct GraphSummarizer {
    /// Number of paths to return
    pub top_n: usize,
    /// Minimum words per path
    pub min_length: usize,
    /// Optional cap on path extensions per topic
    pub max_expansions: Option<u64>,
}

impl Default for GraphSummarizer {
    fn default() -> Self {
        Self {
            top_n: 1,
            min_length: 7,
            max_expansions: None,
        }
    }
}

impl GraphSummarizer {
    pub fn search(&self, topic: &Topic) -> PathSearch {
        let cleaned: Vec<String> = topic.sentences.iter().map(|s| clean_bare(s)).collect();
        let graph = WordGraph::build(&cleaned);

        debug!(
            topic = %topic.name,
            nodes = graph.node_count(),
            edges = graph.edge_count(),
            "Built word graph"
        );

        let search = graph.top_paths(
            self.min_length,
            self.min_length + EXTRA_EDGES,
            self.top_n,
            self.max_expansions,
        );

        if search.truncated {
            warn!(
                topic = %topic.name,
                expansions = search.expansions,
                "Path search hit the expansion limit; results cover a partial search"
            );
        }

        search
    }
}

impl Summarizer for GraphSummarizer {
    fn name(&self) -> &'static str {
        "graph"
    }

    fn summarize(&self, topic: &Topic) -> Result<Vec<String>> {
        Ok(self
            .search(topic)
            .paths
            .iter()
            .map(ScoredPath::sentence)
            .collect())
    }
}
