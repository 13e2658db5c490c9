//! Session identifier generation.

use rand::RngCore;
use uuid::Builder;

/// Generate a fresh session identifier in v4 UUID form.
///
/// Uniqueness is only practical, not cryptographic: it is a correlation key for the
/// backend, nothing more.
pub fn generate_session_id() -> String {
    let mut bytes = [0u8; 16];
    rand::thread_rng().fill_bytes(&mut bytes);
    Builder::from_random_bytes(bytes)
        .into_uuid()
        .hyphenated()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn is_v4_grammar(id: &str) -> bool {
        let groups: Vec<&str> = id.split('-').collect();
        let lens: Vec<usize> = groups.iter().map(|g| g.len()).collect();
        lens == [8, 4, 4, 4, 12]
            && id
                .chars()
                .all(|c| c == '-' || c.is_ascii_digit() || ('a'..='f').contains(&c))
            && groups[2].starts_with('4')
            && matches!(groups[3].chars().next(), Some('8' | '9' | 'a' | 'b'))
    }

    #[test]
    fn test_matches_uuid_v4_grammar() {
        for _ in 0..50 {
            let id = generate_session_id();
            assert!(is_v4_grammar(&id), "bad id {}", id);
        }
    }

    #[test]
    fn test_successive_ids_differ() {
        let ids: HashSet<String> = (0..200).map(|_| generate_session_id()).collect();
        assert_eq!(ids.len(), 200);
    }
}
