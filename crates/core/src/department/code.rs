//! Department code generation.
//!
//! Departments auto-created by the Odoo sync need a short unique code
//! derived from their name. Collisions get a counter suffix; if the
//! counter range is somehow exhausted, a timestamp suffix guarantees
//! uniqueness.

/// Maximum code length.
const MAX_LEN: usize = 8;

/// Highest counter suffix tried before the timestamp fallback.
const MAX_COUNTER: u32 = 99;

/// Generates a short unique department code from a name.
///
/// The base is the name stripped of non-alphanumerics, uppercased, and
/// truncated to eight characters. `exists` reports whether a candidate is
/// already taken.
pub fn generate_code(name: &str, exists: impl Fn(&str) -> bool) -> String {
    let base: String = name
        .chars()
        .filter(char::is_ascii_alphanumeric)
        .map(|c| c.to_ascii_uppercase())
        .take(MAX_LEN)
        .collect();
    let base = if base.is_empty() {
        "DEPT".to_string()
    } else {
        base
    };

    if !exists(&base) {
        return base;
    }

    for counter in 2..=MAX_COUNTER {
        let suffix = counter.to_string();
        let stem: String = base.chars().take(MAX_LEN - suffix.len()).collect();
        let candidate = format!("{stem}{suffix}");
        if !exists(&candidate) {
            return candidate;
        }
    }

    // Counter range exhausted; a timestamp suffix is effectively unique.
    let ts = chrono::Utc::now().timestamp() % 100_000;
    let suffix = format!("{ts}");
    let stem: String = base.chars().take(MAX_LEN.saturating_sub(suffix.len())).collect();
    format!("{stem}{suffix}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_strips_and_uppercases() {
        assert_eq!(generate_code("Design & Brand", |_| false), "DESIGNBR");
        assert_eq!(generate_code("dev", |_| false), "DEV");
    }

    #[test]
    fn test_truncates_to_eight() {
        assert_eq!(generate_code("Performance Marketing", |_| false), "PERFORMA");
    }

    #[test]
    fn test_empty_name_falls_back() {
        assert_eq!(generate_code("!!!", |_| false), "DEPT");
    }

    #[test]
    fn test_collision_appends_counter() {
        let taken: HashSet<&str> = ["DEV"].into_iter().collect();
        assert_eq!(generate_code("dev", |c| taken.contains(c)), "DEV2");
    }

    #[test]
    fn test_counter_keeps_max_length() {
        let taken: HashSet<&str> = ["PERFORMA", "PERFORM2"].into_iter().collect();
        assert_eq!(
            generate_code("Performance Marketing", |c| taken.contains(c)),
            "PERFORM3"
        );
    }

    #[test]
    fn test_counter_exhaustion_uses_timestamp() {
        // The base and every counter candidate are taken.
        let code = generate_code("dev", |c| {
            c == "DEV" || c[3..].parse::<u32>().is_ok_and(|n| n <= 99)
        });
        assert!(code.len() <= 8);
        assert!(code.starts_with("DEV"));
        assert_ne!(code, "DEV");
    }
}
