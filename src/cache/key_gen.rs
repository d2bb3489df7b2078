use sha2::{Digest, Sha256};
use std::fmt::Write;

/// Generate a cache key from components such as owner and repo names.
///
/// Plain components join with underscores; anything unsafe for a file name
/// falls back to a short hash of the whole component list.
pub fn generate_cache_key(components: &[&str]) -> String {
    if components.iter().all(|c| is_safe_key_component(c)) {
        return components.join("_");
    }

    let mut hasher = Sha256::new();
    for component in components {
        hasher.update(component.as_bytes());
        hasher.update(b"\0");
    }

    let result = hasher.finalize();
    hex_string(&result[..8])
}

fn is_safe_key_component(s: &str) -> bool {
    !s.is_empty()
        && s.len() <= 64
        && s.chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_' || c == '.')
}

fn hex_string(bytes: &[u8]) -> String {
    let mut hex = String::with_capacity(bytes.len() * 2);
    for byte in bytes {
        write!(&mut hex, "{:02x}", byte).unwrap();
    }
    hex
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_key() {
        assert_eq!(
            generate_cache_key(&["tokio-rs", "tokio", "records"]),
            "tokio-rs_tokio_records"
        );
    }

    #[test]
    fn test_unsafe_component_hashes() {
        let key = generate_cache_key(&["owner/repo", "records"]);
        assert_eq!(key.len(), 16);
        assert!(key.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_hash_is_stable() {
        let a = generate_cache_key(&["owner/repo"]);
        let b = generate_cache_key(&["owner/repo"]);
        assert_eq!(a, b);
    }

    #[test]
    fn test_is_safe_key_component() {
        assert!(is_safe_key_component("simple"));
        assert!(is_safe_key_component("dotted.name"));
        assert!(!is_safe_key_component(""));
        assert!(!is_safe_key_component("with/slash"));
        assert!(!is_safe_key_component(&"a".repeat(65)));
    }
}
