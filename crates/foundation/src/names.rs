//! Name comparison shared by every administrative level.
//!
//! The source data links child regions to parents by display name, with
//! inconsistent casing and stray whitespace between files. All lookups go
//! through one policy so province, district, municipality and ward matching
//! behave identically.

use std::borrow::Cow;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum NamePolicy {
    /// Byte-for-byte equality.
    Exact,
    /// Trim surrounding whitespace and compare uppercased.
    Normalized,
}

pub const NAME_MATCH_POLICY: NamePolicy = NamePolicy::Normalized;

impl NamePolicy {
    /// Canonical key for `name` under this policy.
    pub fn key<'a>(self, name: &'a str) -> Cow<'a, str> {
        match self {
            NamePolicy::Exact => Cow::Borrowed(name),
            NamePolicy::Normalized => {
                let trimmed = name.trim();
                if trimmed.chars().any(char::is_lowercase) {
                    Cow::Owned(trimmed.to_uppercase())
                } else {
                    Cow::Borrowed(trimmed)
                }
            }
        }
    }

    pub fn matches(self, a: &str, b: &str) -> bool {
        self.key(a) == self.key(b)
    }
}

pub fn name_key(name: &str) -> Cow<'_, str> {
    NAME_MATCH_POLICY.key(name)
}

pub fn names_match(a: &str, b: &str) -> bool {
    NAME_MATCH_POLICY.matches(a, b)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalized_ignores_case_and_padding() {
        assert!(NamePolicy::Normalized.matches("Kaski", " KASKI "));
        assert!(!NamePolicy::Normalized.matches("Kaski", "Kaskii"));
        assert_eq!(NamePolicy::Normalized.key(" Syangja"), "SYANGJA");
    }

    #[test]
    fn exact_is_strict() {
        assert!(NamePolicy::Exact.matches("Kaski", "Kaski"));
        assert!(!NamePolicy::Exact.matches("Kaski", "KASKI"));
    }

    #[test]
    fn normalized_borrows_when_already_canonical() {
        assert!(matches!(NamePolicy::Normalized.key("KASKI"), Cow::Borrowed(_)));
    }
}
