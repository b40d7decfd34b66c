//! Filters that make certain repositories invisible to the reconciler:
//! glitched repos (identified by a poisoned hash of their name, kept out of
//! source so the name itself never appears in the codebase) and
//! security-advisory temporary forks (`<repo>-ghsa-xxxx-xxxx-xxxx`).

use std::collections::BTreeSet;

use regex::Regex;
use sha2::{Digest, Sha256};

/// SHA-256 hex digests of glitched repo names. Never enumerated, mutated, or
/// reported on, regardless of what the declared config says about them.
const GLITCHED_REPO_HASHES: &[&str] = &[];

fn ghsa_fork_pattern() -> Regex {
    Regex::new(r"^[\w]+-ghsa-[A-Za-z0-9-]{4}-[A-Za-z0-9-]{4}-[A-Za-z0-9-]{4}$").expect("static regex is valid")
}

fn hash_name(name: &str) -> String {
    let digest = Sha256::digest(name.as_bytes());
    hex::encode(digest)
}

/// True if `name` hashes to an entry in [`GLITCHED_REPO_HASHES`].
pub fn is_glitched(name: &str) -> bool {
    let hashes: BTreeSet<&str> = GLITCHED_REPO_HASHES.iter().copied().collect();
    hashes.contains(hash_name(name).as_str())
}

/// True if `name` looks like a temporary fork created by GitHub to host a
/// draft security advisory.
pub fn is_security_advisory_fork(name: &str) -> bool {
    ghsa_fork_pattern().is_match(name)
}

/// True if the repository must never be touched or reported on.
pub fn is_hidden(name: &str) -> bool {
    is_glitched(name) || is_security_advisory_fork(name)
}
