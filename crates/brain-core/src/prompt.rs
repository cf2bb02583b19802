//! Prompt helpers for fingerprinting the directive.

use sha2::{Digest, Sha256};

/// Compute a stable SHA-256 hex digest for a prompt string.
pub fn hash_prompt(prompt: &str) -> String {
    let digest = Sha256::digest(prompt.as_bytes());
    digest.iter().map(|byte| format!("{:02x}", byte)).collect()
}

/// Short fingerprint (first 12 hex chars) suitable for log lines.
pub fn prompt_fingerprint(prompt: &str) -> String {
    let mut hash = hash_prompt(prompt);
    hash.truncate(12);
    hash
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_prompt_stable() {
        let first = hash_prompt("test prompt");
        let second = hash_prompt("test prompt");
        let different = hash_prompt("another prompt");

        assert_eq!(first, second);
        assert_ne!(first, different);
        assert_eq!(first.len(), 64);
    }

    #[test]
    fn test_fingerprint_is_prefix() {
        let full = hash_prompt("directive");
        let short = prompt_fingerprint("directive");
        assert_eq!(short.len(), 12);
        assert!(full.starts_with(&short));
    }
}
