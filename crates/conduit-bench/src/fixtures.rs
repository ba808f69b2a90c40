//! Deterministic generators for load-test seed data.
//! Same seed → same output across runs.

use std::time::{SystemTime, UNIX_EPOCH};

const ALPHANUMERIC: &[u8] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Xorshift generator. Not cryptographic; only used for fixture data.
#[derive(Debug, Clone)]
pub struct SimpleRng {
    state: u64,
}

impl SimpleRng {
    pub fn new(seed: u64) -> Self {
        Self {
            state: if seed == 0 { 1 } else { seed },
        }
    }

    /// Seeded from the wall clock, for runs that want fresh data.
    pub fn from_clock() -> Self {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos() as u64)
            .unwrap_or(0);
        Self::new(nanos)
    }

    pub fn next_u64(&mut self) -> u64 {
        self.state ^= self.state << 13;
        self.state ^= self.state >> 7;
        self.state ^= self.state << 17;
        self.state
    }

    /// Uniform-ish value in `0..bound`. `bound` of 0 yields 0.
    pub fn next_below(&mut self, bound: u64) -> u64 {
        if bound == 0 {
            return 0;
        }
        self.next_u64() % bound
    }

    /// Alphanumeric string of exactly `len` characters.
    pub fn string(&mut self, len: usize) -> String {
        (0..len)
            .map(|_| ALPHANUMERIC[self.next_below(ALPHANUMERIC.len() as u64) as usize] as char)
            .collect()
    }
}

/// Random `[a-zA-Z0-9]` string of length `len`.
pub fn rand_string(len: usize) -> String {
    SimpleRng::from_clock().string(len)
}

/// A synthetic article for seeding the listing endpoints.
#[derive(Debug, Clone)]
pub struct SeedArticle {
    pub title: String,
    pub description: String,
    pub body: String,
    pub tags: Vec<String>,
}

const SEED_TAGS: &[&str] = &["rust", "sqlite", "perf", "web", "testing", "async"];

/// Generate `count` articles with unique titles and one or two tags each.
pub fn seed_articles(rng: &mut SimpleRng, count: usize) -> Vec<SeedArticle> {
    (0..count)
        .map(|i| {
            let first = SEED_TAGS[rng.next_below(SEED_TAGS.len() as u64) as usize];
            let second = SEED_TAGS[rng.next_below(SEED_TAGS.len() as u64) as usize];
            let mut tags = vec![first.to_string()];
            if second != first {
                tags.push(second.to_string());
            }
            SeedArticle {
                title: format!("Perf article {i} {}", rng.string(8)),
                description: rng.string(32),
                body: rng.string(256),
                tags,
            }
        })
        .collect()
}
