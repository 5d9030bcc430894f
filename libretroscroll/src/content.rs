//! Mock content generation
//!
//! `ContentGenerator` produces one feed item per call. The variant is
//! picked uniformly from a five-entry table in which the `achievement` and
//! `ai` entries are reserved and render as a generic fact.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::art;
use crate::types::ContentItem;

const FACT_SOURCE: &str = "RetroFacts™";
const FALLBACK_CONTENT: &str = "Random content";
const FALLBACK_SOURCE: &str = "RetroScroll";
const TOKEN_LEN: usize = 11;
const BASE36: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Entries of the variant table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Variant {
    Fact,
    Image,
    Achievement,
    Ai,
    Ad,
}

pub const VARIANTS: [Variant; 5] = [
    Variant::Fact,
    Variant::Image,
    Variant::Achievement,
    Variant::Ai,
    Variant::Ad,
];

/// Monotonic id source; ids start at 1 and are never reused
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IdCounter {
    last: u64,
}

impl IdCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Increment and return the new value
    pub fn next_id(&mut self) -> u64 {
        self.last += 1;
        self.last
    }

    /// Most recently issued id, 0 if none
    pub fn last(&self) -> u64 {
        self.last
    }
}

/// Seedable producer of `ContentItem`s
#[derive(Debug, Clone)]
pub struct ContentGenerator {
    rng: ChaCha8Rng,
}

impl ContentGenerator {
    pub fn new(rng: ChaCha8Rng) -> Self {
        Self { rng }
    }

    /// Deterministic generator for a given seed
    pub fn with_seed(seed: u64) -> Self {
        Self::new(ChaCha8Rng::seed_from_u64(seed))
    }

    pub fn from_entropy() -> Self {
        Self::new(ChaCha8Rng::from_entropy())
    }

    /// Seeded when `seed` is set, entropy-seeded otherwise
    pub fn from_seed_option(seed: Option<u64>) -> Self {
        match seed {
            Some(seed) => Self::with_seed(seed),
            None => Self::from_entropy(),
        }
    }

    /// Produce one item, stamping it with `ids.next_id()`
    pub fn produce(&mut self, ids: &mut IdCounter) -> ContentItem {
        let variant = VARIANTS[self.rng.gen_range(0..VARIANTS.len())];
        let id = ids.next_id();
        self.build(variant, id)
    }

    /// Produce `count` items in generation order
    pub fn produce_batch(&mut self, ids: &mut IdCounter, count: usize) -> Vec<ContentItem> {
        (0..count).map(|_| self.produce(ids)).collect()
    }

    fn build(&mut self, variant: Variant, id: u64) -> ContentItem {
        match variant {
            Variant::Fact => ContentItem::Fact {
                id,
                content: format!("Did you know? {}", self.token()),
                source: FACT_SOURCE.to_string(),
            },
            Variant::Image => ContentItem::Image {
                id,
                image_url: art::svg_data_uri(&art::pixel_art(&mut self.rng)),
                caption: format!("Awesome pixel art #{}", id),
            },
            Variant::Ad => ContentItem::Advertisement {
                id,
                sponsored: true,
                title: "Retro Gaming Bundle".to_string(),
                description: "Get your pixels worth!".to_string(),
                cta: "Shop Now".to_string(),
            },
            Variant::Achievement | Variant::Ai => ContentItem::Fact {
                id,
                content: FALLBACK_CONTENT.to_string(),
                source: FALLBACK_SOURCE.to_string(),
            },
        }
    }

    /// Random lowercase base-36 token
    fn token(&mut self) -> String {
        (0..TOKEN_LEN)
            .map(|_| BASE36[self.rng.gen_range(0..BASE36.len())] as char)
            .collect()
    }
}
