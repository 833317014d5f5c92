//! Placeholder backend that streams random markdown.
//!
//! Useful for exercising the UI without a model server: a short reasoning
//! block followed by headings, prose, lists and code fences, one word at a
//! time.

use crate::controller::{ChatController, ChatStream};
use crate::types::*;
use ollaix_core::{Model, Provider, Result};
use rand::rngs::StdRng;
use rand::seq::IndexedRandom;
use rand::{Rng, SeedableRng};
use std::time::Duration;

pub const DUMMY_MODEL_ID: &str = "dummy-model:1.0";

const WORDS: &[&str] = &[
    "lorem", "ipsum", "dolor", "sit", "amet", "consectetur", "adipiscing", "elit", "sed", "do", "eiusmod",
    "tempor", "incididunt", "ut", "labore", "et", "dolore", "magna", "aliqua", "enim", "ad", "minim", "veniam",
    "quis", "nostrud", "exercitation", "ullamco", "laboris", "nisi", "aliquip", "ex", "ea", "commodo",
    "consequat", "duis", "aute", "irure", "in", "reprehenderit", "voluptate", "velit", "esse", "cillum",
    "fugiat", "nulla", "pariatur", "excepteur", "sint", "occaecat", "cupidatat", "non", "proident", "sunt",
    "culpa", "qui", "officia", "deserunt", "mollit", "anim", "id", "est", "laborum",
];

const TECH_WORDS: &[&str] = &[
    "Rust", "tokio", "API", "REST", "JSON", "database", "SQL", "Redis", "Docker", "Kubernetes",
    "microservices", "authentication", "HTTP", "TLS", "encryption", "hash", "algorithm", "framework",
];

const THINKING_WORDS: &[&str] = &[
    "analyze", "consider", "evaluate", "examine", "reflect", "understand", "determine", "identify", "explore",
    "approach", "method", "solution", "problem", "question", "aspect", "factor", "context", "scenario",
    "option", "alternative", "consequence", "impact",
];

const HEADINGS: &[&str] = &[
    "## Proposed solution",
    "## Detailed explanation",
    "## Practical example",
    "## Key points",
    "### Method 1",
    "### Method 2",
    "### Alternative",
];

const INLINE_MARKUP: &[&str] =
    &["**important**", "*essential*", "`variable`", "`function()`", "[documentation](https://example.com)"];

const LIST_ITEMS: &[&str] = &[
    "- First point to consider",
    "- Second important element",
    "- Third essential aspect",
    "1. First step",
    "2. Second step",
    "3. Third step",
];

const CODE_BLOCKS: &[&str] = &[
    "```rust\nfn example() -> &'static str {\n    \"Hello World\"\n}\n```",
    "```sql\nSELECT * FROM users WHERE active = true;\n```",
    "```bash\ncargo install ollaix\n```",
    "```json\n{\n  \"status\": \"success\",\n  \"data\": []\n}\n```",
];

/// Delays used while streaming
#[derive(Debug, Clone, Copy)]
pub struct DummyTiming {
    /// Wait before the first event
    pub initial: Duration,
    /// Wait between events
    pub per_chunk: Duration,
}

impl Default for DummyTiming {
    fn default() -> Self {
        Self { initial: Duration::from_millis(1500), per_chunk: Duration::from_millis(20) }
    }
}

impl DummyTiming {
    pub fn instant() -> Self {
        Self { initial: Duration::ZERO, per_chunk: Duration::ZERO }
    }
}

/// Controller serving the single `dummy-model:1.0`
pub struct DummyController {
    timing: DummyTiming,
    seed: Option<u64>,
}

impl DummyController {
    pub fn new() -> Self {
        Self { timing: DummyTiming::default(), seed: None }
    }

    pub fn with_timing(mut self, timing: DummyTiming) -> Self {
        self.timing = timing;
        self
    }

    /// Fixed seed for reproducible replies
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn model() -> Model {
        Model::new(DUMMY_MODEL_ID, "Dummy Model", Provider::Dummy)
            .with_description("A placeholder model for testing and development. Does not perform real inference.")
    }

    fn rng(&self) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_rng(&mut rand::rng()),
        }
    }

    /// Build the full reply up front so the stream holds no generator state
    fn script(rng: &mut StdRng) -> Vec<StreamEvent> {
        let mut events = Vec::new();

        for _ in 0..3 {
            let line_count = rng.random_range(2..4);
            for _ in 0..line_count {
                let words: Vec<&str> = (0..rng.random_range(6..11))
                    .filter_map(|_| THINKING_WORDS.choose(rng).copied())
                    .collect();
                events.push(StreamEvent::Thinking(format!("{}.\n", words.join(" "))));
            }
            events.push(StreamEvent::Thinking("\n".to_string()));
        }

        let word_budget = rng.random_range(150..200);
        let mut emitted = 0;
        let mut first = true;
        while emitted < word_budget {
            let block = Self::block(rng, &mut emitted);
            let separator = if first { "" } else { "\n\n" };
            first = false;

            let mut parts = block.split_inclusive(' ');
            if let Some(head) = parts.next() {
                events.push(StreamEvent::Content(format!("{}{}", separator, head)));
            }
            events.extend(parts.map(|part| StreamEvent::Content(part.to_string())));
        }

        events.push(StreamEvent::Done);
        events
    }

    fn block(rng: &mut StdRng, emitted: &mut usize) -> String {
        match rng.random_range(0..10) {
            0 => HEADINGS.choose(rng).copied().unwrap_or("##").to_string(),
            1 => CODE_BLOCKS.choose(rng).copied().unwrap_or_default().to_string(),
            2 => {
                let count = rng.random_range(2..4);
                (0..count)
                    .filter_map(|_| LIST_ITEMS.choose(rng).copied())
                    .collect::<Vec<_>>()
                    .join("\n")
            }
            _ => {
                let count = rng.random_range(12..30);
                *emitted += count;
                let mut words: Vec<String> = (0..count)
                    .map(|_| {
                        let pool = match rng.random_range(0..10) {
                            0 => TECH_WORDS,
                            1 => INLINE_MARKUP,
                            _ => WORDS,
                        };
                        pool.choose(rng).copied().unwrap_or("lorem").to_string()
                    })
                    .collect();
                if let Some(first) = words.first_mut() {
                    *first = capitalize(first);
                }
                format!("{}.", words.join(" "))
            }
        }
    }
}

impl Default for DummyController {
    fn default() -> Self {
        Self::new()
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(c) => c.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[async_trait::async_trait]
impl ChatController for DummyController {
    async fn list_models(&self) -> Result<Vec<Model>> {
        Ok(vec![Self::model()])
    }

    async fn send_message<'a>(&'a self, request: ChatRequest, cancel: CancelToken) -> Result<ChatStream<'a>> {
        let events = if request.model == DUMMY_MODEL_ID {
            Self::script(&mut self.rng())
        } else {
            vec![StreamEvent::Error(format!("Model '{}' is not available", request.model))]
        };
        let timing = self.timing;

        tracing::debug!(model = %request.model, events = events.len(), "dummy reply scripted");

        let stream = async_stream::stream! {
            if !timing.initial.is_zero() {
                tokio::time::sleep(timing.initial).await;
            }
            for event in events {
                if cancel.is_cancelled() {
                    return;
                }
                yield event;
                if !timing.per_chunk.is_zero() {
                    tokio::time::sleep(timing.per_chunk).await;
                }
            }
        };

        Ok(Box::pin(stream))
    }
}
