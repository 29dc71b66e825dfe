//! Partial profile-name matching.
//!
//! Candidates are sorted first; each tier returns the first hit in that order:
//! 1. exact name
//! 2. name starting with the query
//! 3. name matching the query as a regular expression
//!
//! The third tier treats the query as a live pattern, so `w.rk` matches
//! `work`. It lives in [`pattern_match`] on its own.

use regex::Regex;

/// Which tier produced a match
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchTier {
    Exact,
    Prefix,
    Pattern,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Match {
    pub name: String,
    pub tier: MatchTier,
}

/// Resolve `query` against candidate profile names
///
/// An empty query resolves to nothing.
pub fn resolve<S: AsRef<str>>(query: &str, candidates: &[S]) -> Option<Match> {
    if query.is_empty() {
        return None;
    }
    let mut sorted: Vec<&str> = candidates.iter().map(AsRef::as_ref).collect();
    sorted.sort_unstable();

    let hit = |name: &str, tier: MatchTier| {
        Some(Match {
            name: name.to_string(),
            tier,
        })
    };

    if let Some(name) = sorted.iter().copied().find(|c| *c == query) {
        return hit(name, MatchTier::Exact);
    }
    if let Some(name) = sorted.iter().copied().find(|c| c.starts_with(query)) {
        return hit(name, MatchTier::Prefix);
    }
    pattern_match(query, &sorted).and_then(|name| hit(name, MatchTier::Pattern))
}

/// First sorted candidate matching `query` as a regex.
///
/// An invalid pattern matches nothing.
pub fn pattern_match<'a>(query: &str, sorted: &[&'a str]) -> Option<&'a str> {
    let re = Regex::new(query).ok()?;
    sorted.iter().copied().find(|c| re.is_match(c))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_exact_beats_prefix() {
        let m = resolve("foo", &names(&["foobar", "foo"])).unwrap();
        assert_eq!(m.name, "foo");
        assert_eq!(m.tier, MatchTier::Exact);

        let m = resolve("foobar", &names(&["foo", "foobar"])).unwrap();
        assert_eq!(m.name, "foobar");
        assert_eq!(m.tier, MatchTier::Exact);
    }

    #[test]
    fn test_prefix_match() {
        let m = resolve("foo", &names(&["bar", "car", "foobar"])).unwrap();
        assert_eq!(m.name, "foobar");
        assert_eq!(m.tier, MatchTier::Prefix);
    }

    #[test]
    fn test_prefix_tie_breaks_on_sorted_order() {
        let m = resolve("wo", &names(&["work-b", "work-a", "world"])).unwrap();
        assert_eq!(m.name, "work-a");
    }

    #[test]
    fn test_substring_falls_to_pattern_tier() {
        let m = resolve("ar", &names(&["foobar", "car", "bar"])).unwrap();
        assert_eq!(m.name, "bar");
        assert_eq!(m.tier, MatchTier::Pattern);
    }

    #[test]
    fn test_query_is_a_live_pattern() {
        let m = resolve("^c.r$", &names(&["bar", "car", "foobar"])).unwrap();
        assert_eq!(m.name, "car");
        assert_eq!(m.tier, MatchTier::Pattern);
    }

    #[test]
    fn test_invalid_pattern_matches_nothing() {
        assert!(resolve("(", &names(&["bar", "car"])).is_none());
    }

    #[test]
    fn test_empty_query_matches_nothing() {
        assert!(resolve("", &names(&[".DS_Store", "default"])).is_none());
    }

    #[test]
    fn test_no_match() {
        assert!(resolve("doobar", &names(&["default", "foobar"])).is_none());
        assert!(resolve::<String>("x", &[]).is_none());
    }

    #[test]
    fn test_uppercase_is_distinct() {
        let m = resolve("Work", &names(&["work", "Work"])).unwrap();
        assert_eq!(m.name, "Work");
    }
}
