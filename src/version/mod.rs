//! Version ordering and resolution.
//!
//! Versions are dot-separated and the shorter version is padded with `0`
//! pieces. An all-digit piece is a number and compares by value, with no
//! upper bound on its length. Any other piece is text and sorts after every
//! number. Under this order `1.10` sorts after `1.2` and `1.2rc` after both.

use std::cmp::Ordering;

use crate::entity::PromptRecord;
use crate::error::{Result, VaultError};

/// Sort key of one version piece. Variant order puts numbers before text.
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord)]
enum Piece<'a> {
    /// Digit count and digits, leading zeros stripped.
    Num(usize, &'a str),
    Text(&'a str),
}

impl<'a> Piece<'a> {
    fn parse(raw: &'a str) -> Self {
        if !raw.is_empty() && raw.bytes().all(|b| b.is_ascii_digit()) {
            let digits = raw.trim_start_matches('0');
            Piece::Num(digits.len(), digits)
        } else {
            Piece::Text(raw)
        }
    }
}

fn compare_piece(a: &str, b: &str) -> Ordering {
    Piece::parse(a).cmp(&Piece::parse(b))
}

/// Numeric-aware comparison of two version strings.
pub fn compare_versions(a: &str, b: &str) -> Ordering {
    let mut left = a.split('.');
    let mut right = b.split('.');

    loop {
        let ordering = match (left.next(), right.next()) {
            (None, None) => return Ordering::Equal,
            (Some(x), None) => compare_piece(x, "0"),
            (None, Some(y)) => compare_piece("0", y),
            (Some(x), Some(y)) => compare_piece(x, y),
        };
        if ordering != Ordering::Equal {
            return ordering;
        }
    }
}

/// Sort versions ascending. Equal versions keep their input order.
pub fn sort_versions(versions: &mut [String]) {
    versions.sort_by(|a, b| compare_versions(a, b));
}

/// Pick one record out of same-named candidates.
///
/// With `requested` set the version must match exactly. Without it the
/// greatest version wins, the last candidate on ties.
pub fn resolve<'a>(
    name: &str,
    candidates: &'a [PromptRecord],
    requested: Option<&str>,
) -> Result<&'a PromptRecord> {
    if candidates.is_empty() {
        return Err(VaultError::PromptNotFound {
            name: name.to_string(),
            available: Vec::new(),
        });
    }

    match requested {
        Some(version) => candidates
            .iter()
            .rev()
            .find(|r| r.version == version)
            .ok_or_else(|| VaultError::VersionNotFound {
                name: name.to_string(),
                requested: version.to_string(),
                available: candidates.iter().map(|r| r.version.clone()).collect(),
            }),
        None => candidates
            .iter()
            .max_by(|a, b| compare_versions(&a.version, &b.version))
            .ok_or_else(|| VaultError::PromptNotFound {
                name: name.to_string(),
                available: Vec::new(),
            }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(version: &str, template: &str) -> PromptRecord {
        PromptRecord::new("p", version, template)
    }

    #[test]
    fn test_numeric_pieces() {
        assert_eq!(compare_versions("1.1", "1.0"), Ordering::Greater);
        assert_eq!(compare_versions("1.10", "1.2"), Ordering::Greater);
        assert_eq!(compare_versions("2", "10"), Ordering::Less);
    }

    #[test]
    fn test_padding() {
        assert_eq!(compare_versions("1", "1.0"), Ordering::Equal);
        assert_eq!(compare_versions("1.0.1", "1"), Ordering::Greater);
        assert_eq!(compare_versions("1", "1.0.0.0"), Ordering::Equal);
    }

    #[test]
    fn test_text_pieces() {
        assert_eq!(compare_versions("1.beta", "1.alpha"), Ordering::Greater);
        assert_eq!(compare_versions("1.2a", "1.10"), Ordering::Greater); // text after numbers
        assert_eq!(compare_versions("draft", "draft"), Ordering::Equal);
    }

    #[test]
    fn test_sort_versions() {
        let mut versions = vec![
            "1.10".to_string(),
            "1.2".to_string(),
            "1.0".to_string(),
            "0.9".to_string(),
        ];
        sort_versions(&mut versions);
        assert_eq!(versions, vec!["0.9", "1.0", "1.2", "1.10"]);
    }

    #[test]
    fn test_mixed_pieces_are_transitive() {
        let (a, b, c) = ("1.2", "1.10", "1.1a");
        assert_eq!(compare_versions(a, b), Ordering::Less);
        assert_eq!(compare_versions(b, c), Ordering::Less);
        assert_eq!(compare_versions(a, c), Ordering::Less);
        assert_eq!(compare_versions(c, a), Ordering::Greater);
    }

    #[test]
    fn test_long_digit_pieces_stay_numeric() {
        assert_eq!(
            compare_versions("1.123456789012345678901234", "1.99999999999999999999"),
            Ordering::Greater
        );
        assert_eq!(compare_versions("1.007", "1.7"), Ordering::Equal);
        assert_eq!(compare_versions("1.000", "1"), Ordering::Equal);
        assert_eq!(compare_versions("1.100000000000000000000", "1.rc"), Ordering::Less);
    }

    #[test]
    fn test_sort_mixed_versions_is_consistent() {
        let pieces = ["2", "10", "1a", "3", "11", "2b", "9", "100", "1rc"];
        let mut versions: Vec<String> = pieces
            .iter()
            .flat_map(|p| {
                vec![
                    format!("1.{}", p),
                    format!("1.{}.1", p),
                    format!("2.{}", p),
                    p.to_string(),
                ]
            })
            .collect();
        assert_eq!(versions.len(), 36);

        sort_versions(&mut versions);

        for pair in versions.windows(2) {
            assert_ne!(compare_versions(&pair[0], &pair[1]), Ordering::Greater);
        }
        for x in &versions {
            for y in &versions {
                assert_eq!(compare_versions(x, y), compare_versions(y, x).reverse());
            }
        }
        let ones: Vec<&str> = versions
            .iter()
            .map(String::as_str)
            .filter(|v| v.starts_with("1.") && v.matches('.').count() == 1)
            .collect();
        assert_eq!(
            ones,
            vec!["1.2", "1.3", "1.9", "1.10", "1.11", "1.100", "1.1a", "1.1rc", "1.2b"]
        );
    }

    #[test]
    fn test_resolve_latest() {
        let candidates = vec![record("1.2", "a"), record("1.10", "b"), record("1.0", "c")];
        let latest = resolve("p", &candidates, None).unwrap();
        assert_eq!(latest.version, "1.10");
    }

    #[test]
    fn test_resolve_exact() {
        let candidates = vec![record("1.0", "a"), record("1.1", "b")];
        let picked = resolve("p", &candidates, Some("1.0")).unwrap();
        assert_eq!(picked.template, "a");
    }

    #[test]
    fn test_resolve_exact_is_string_equality() {
        let candidates = vec![record("1.0", "a")];
        let err = resolve("p", &candidates, Some("1")).unwrap_err();
        match err {
            VaultError::VersionNotFound {
                requested,
                available,
                ..
            } => {
                assert_eq!(requested, "1");
                assert_eq!(available, vec!["1.0".to_string()]);
            }
            other => panic!("Expected VersionNotFound, got {:?}", other),
        }
    }

    #[test]
    fn test_resolve_ties_pick_last() {
        let candidates = vec![record("2.0", "first"), record("2.0", "second"), record("1.0", "x")];
        assert_eq!(resolve("p", &candidates, None).unwrap().template, "second");
        assert_eq!(resolve("p", &candidates, Some("2.0")).unwrap().template, "second");
    }

    #[test]
    fn test_resolve_empty() {
        assert!(matches!(
            resolve("ghost", &[], None),
            Err(VaultError::PromptNotFound { .. })
        ));
    }
}
