//! Internal identifier allocation
//!
//! Turns a remote alarm name into a token usable as a Terraform resource
//! name. The token keeps the sanitized name readable and appends an 8-digit
//! hex disambiguator so two alarms that sanitize to the same string still get
//! distinct identifiers.

use lazy_static::lazy_static;
use rand::rngs::{OsRng, StdRng};
use rand::{RngCore, SeedableRng};
use regex::Regex;
use serde::Serialize;
use std::fmt;
use std::sync::Mutex;

lazy_static! {
    static ref INVALID_CHARS: Regex = Regex::new(r"[^a-zA-Z0-9_-]").unwrap();
    static ref UNDERSCORE_RUNS: Regex = Regex::new(r"_+").unwrap();
}

/// Number of random bytes in a disambiguator (8 hex digits)
const DISAMBIGUATOR_BYTES: usize = 4;

/// Source of random bytes for disambiguators
///
/// Shared by every allocation of an engine, so implementations must be safe
/// to call from several threads.
pub trait EntropySource: Send + Sync {
    /// Fill `dest` with random bytes
    fn fill_bytes(&self, dest: &mut [u8]);
}

/// Operating-system CSPRNG
#[derive(Debug, Default, Clone, Copy)]
pub struct OsEntropy;

impl EntropySource for OsEntropy {
    fn fill_bytes(&self, dest: &mut [u8]) {
        OsRng.fill_bytes(dest);
    }
}

/// Seeded generator producing a reproducible byte stream
pub struct SeededEntropy {
    rng: Mutex<StdRng>,
}

impl SeededEntropy {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }
}

impl EntropySource for SeededEntropy {
    fn fill_bytes(&self, dest: &mut [u8]) {
        // A poisoned lock still holds a usable generator
        let mut rng = match self.rng.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        rng.fill_bytes(dest);
    }
}

/// Sanitized, disambiguated resource name
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct InternalIdentifier(String);

impl InternalIdentifier {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for InternalIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for InternalIdentifier {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Allocates internal identifiers from an injected entropy source
pub struct IdentifierAllocator {
    entropy: Box<dyn EntropySource>,
}

impl IdentifierAllocator {
    pub fn new(entropy: Box<dyn EntropySource>) -> Self {
        Self { entropy }
    }

    /// Allocator backed by OS randomness
    pub fn random() -> Self {
        Self::new(Box::new(OsEntropy))
    }

    /// Allocator producing the same identifiers for the same seed and input order
    pub fn seeded(seed: u64) -> Self {
        Self::new(Box::new(SeededEntropy::new(seed)))
    }

    /// Derive an identifier for `name`
    ///
    /// Total over every input; the empty name yields `_xxxxxxxx`.
    pub fn allocate(&self, name: &str) -> InternalIdentifier {
        let mut bytes = [0u8; DISAMBIGUATOR_BYTES];
        self.entropy.fill_bytes(&mut bytes);

        let identifier = format!("{}_{}", sanitize_name(name), hex::encode(bytes));
        InternalIdentifier(collapse_underscores(&identifier))
    }
}

impl Default for IdentifierAllocator {
    fn default() -> Self {
        Self::random()
    }
}

/// Replace characters outside `[A-Za-z0-9_-]` and collapse `_` runs
pub fn sanitize_name(name: &str) -> String {
    let replaced = INVALID_CHARS.replace_all(name, "_");
    collapse_underscores(&replaced)
}

fn collapse_underscores(value: &str) -> String {
    UNDERSCORE_RUNS.replace_all(value, "_").into_owned()
}
