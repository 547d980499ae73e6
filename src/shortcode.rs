//! Random short code generation.
//!
//! Codes are [`CODE_LENGTH`] symbols drawn uniformly from a 62-symbol
//! alphabet. Uniqueness is not the generator's concern: callers check the
//! candidate against the store and retry on collision.

use rand::distr::{Distribution, Uniform};

pub const ALPHABET: &[u8; 62] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz";

pub const CODE_LENGTH: usize = 5;

/// Source of candidate short codes.
pub trait GenerateCode: Send + Sync {
    fn generate_code(&self) -> String;
}

/// Generator backed by the thread-local RNG.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomCodeGenerator;

impl GenerateCode for RandomCodeGenerator {
    fn generate_code(&self) -> String {
        let mut rng = rand::rng();
        let dist = Uniform::new(0, ALPHABET.len()).expect("alphabet is non-empty");

        (0..CODE_LENGTH)
            .map(|_| ALPHABET[dist.sample(&mut rng)] as char)
            .collect()
    }
}

/// Whether `candidate` could have been produced by [`RandomCodeGenerator`].
pub fn is_short_code(candidate: &str) -> bool {
    candidate.len() == CODE_LENGTH && candidate.bytes().all(|b| b.is_ascii_alphanumeric())
}
