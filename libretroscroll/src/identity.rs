//! Pseudonymous identity
//!
//! A handle like `NeonGhost4821` plus a pixel avatar, generated on first
//! start and reused afterwards.

use rand::Rng;

use crate::art;
use crate::error::Result;
use crate::storage::{load_record, save_record, KeyValueStore};
use crate::types::Identity;

const ADJECTIVES: [&str; 5] = ["Cosmic", "Pixel", "Retro", "Neon", "Digital"];
const NOUNS: [&str; 5] = ["Wizard", "Ninja", "Hacker", "Runner", "Ghost"];
const MAX_SUFFIX: u32 = 9999;

/// Generate a fresh identity
pub fn generate_identity<R: Rng + ?Sized>(rng: &mut R) -> Identity {
    let adjective = ADJECTIVES[rng.gen_range(0..ADJECTIVES.len())];
    let noun = NOUNS[rng.gen_range(0..NOUNS.len())];
    let number = rng.gen_range(0..MAX_SUFFIX);

    Identity {
        username: format!("{}{}{}", adjective, noun, number),
        avatar: art::svg_data_uri(&art::pixel_avatar(rng)),
    }
}

/// Return the stored identity, creating and persisting one if absent
///
/// Idempotent: once an identity is stored, later calls return it
/// unchanged and never write.
pub fn load_or_create<R: Rng + ?Sized>(
    store: &dyn KeyValueStore,
    key: &str,
    rng: &mut R,
) -> Result<Identity> {
    if let Some(identity) = load_record::<Identity>(store, key) {
        tracing::debug!(username = %identity.username, "identity loaded");
        return Ok(identity);
    }

    let identity = generate_identity(rng);
    save_record(store, key, &identity)?;
    tracing::info!(username = %identity.username, "identity created");
    Ok(identity)
}
