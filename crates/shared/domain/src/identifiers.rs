//! Random identifiers handed out during registration.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use rand::{rngs::OsRng, seq::SliceRandom, Rng, RngCore};

use crate::constants::VERIFICATION_TOKEN_BYTES;

const ADJECTIVES: &[&str] = &[
    "clever", "jolly", "brave", "sly", "gentle", "swift", "quiet", "bright", "lucky", "witty",
    "calm", "bold", "eager", "fuzzy", "merry", "nimble", "proud", "sunny", "tidy", "zesty",
];

const ANIMALS: &[&str] = &[
    "panda", "fox", "raccoon", "koala", "lion", "otter", "badger", "falcon", "heron", "lynx",
    "moose", "owl", "puffin", "seal", "tiger", "walrus", "yak", "zebra", "bison", "gecko",
];

/// Generate a fallback nickname such as `clever_fox_042`.
///
/// Output always satisfies the nickname rules. Uniqueness is the caller's
/// job (retry on collision).
pub fn generate_nickname() -> String {
    let mut rng = rand::thread_rng();
    let adjective = ADJECTIVES.choose(&mut rng).copied().unwrap_or("user");
    let animal = ANIMALS.choose(&mut rng).copied().unwrap_or("account");
    let number: u16 = rng.gen_range(0..1000);
    format!("{}_{}_{:03}", adjective, animal, number)
}

/// Generate a URL-safe email verification token from OS randomness.
pub fn generate_verification_token() -> String {
    let mut bytes = [0u8; VERIFICATION_TOKEN_BYTES];
    OsRng.fill_bytes(&mut bytes);
    URL_SAFE_NO_PAD.encode(bytes)
}
