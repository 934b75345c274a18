//! Fuzzy candidate filtering
//!
//! A candidate matches when the typed word is a case-insensitive subsequence of
//! it. Matches are ranked by where the tightest match starts and how many
//! characters it spans; equal ranks keep their input order.

/// Position of the tightest match of a word inside a candidate
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct FuzzyMatch {
    /// Char offset of the first matched character
    pub start: usize,
    /// Chars from the first to the last matched character, inclusive
    pub span: usize,
}

fn same_char(a: char, b: char) -> bool {
    a == b || a.to_lowercase().eq(b.to_lowercase())
}

/// Find the shortest span of `candidate` containing `word` as a subsequence.
///
/// Among equally short spans the earliest one wins. An empty word matches
/// everything at offset zero.
pub fn fuzzy_match(word: &str, candidate: &str) -> Option<FuzzyMatch> {
    let needle: Vec<char> = word.chars().collect();
    let Some(&first) = needle.first() else {
        return Some(FuzzyMatch { start: 0, span: 0 });
    };
    let hay: Vec<char> = candidate.chars().collect();

    let mut best: Option<FuzzyMatch> = None;
    for (start, &c) in hay.iter().enumerate() {
        if !same_char(c, first) {
            continue;
        }

        let mut matched = 1;
        let mut end = start;
        for (offset, &h) in hay[start + 1..].iter().enumerate() {
            if matched == needle.len() {
                break;
            }
            if same_char(h, needle[matched]) {
                matched += 1;
                end = start + 1 + offset;
            }
        }
        if matched < needle.len() {
            // No later start can complete the match either.
            break;
        }

        let candidate_match = FuzzyMatch {
            start,
            span: end - start + 1,
        };
        if best.is_none_or(|b| candidate_match.span < b.span) {
            best = Some(candidate_match);
        }
    }
    best
}

/// Keep the candidates matching `word`, best matches first.
///
/// # Arguments
/// * `word` - The partially typed word before the cursor
/// * `candidates` - Rendered candidates in cache order
///
/// # Returns
/// * `Vec<String>` - Matching candidates ordered by (start, span)
pub fn filter<I>(word: &str, candidates: I) -> Vec<String>
where
    I: IntoIterator<Item = String>,
{
    if word.is_empty() {
        return candidates.into_iter().collect();
    }

    let mut ranked: Vec<(FuzzyMatch, String)> = candidates
        .into_iter()
        .filter_map(|c| fuzzy_match(word, &c).map(|m| (m, c)))
        .collect();
    // Stable sort keeps cache order among equal ranks.
    ranked.sort_by_key(|(m, _)| *m);
    ranked.into_iter().map(|(_, c)| c).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn owned(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_empty_word_keeps_everything() {
        let out = filter("", owned(&["b", "a", "c"]));
        assert_eq!(out, owned(&["b", "a", "c"]));
    }

    #[test]
    fn test_subsequence_match() {
        assert_eq!(
            fuzzy_match("sc", "_sourceCategory="),
            Some(FuzzyMatch { start: 1, span: 5 })
        );
        assert_eq!(fuzzy_match("xyz", "_sourceCategory="), None);
    }

    #[test]
    fn test_case_insensitive() {
        assert!(fuzzy_match("SRC", "_source").is_some());
        assert!(fuzzy_match("cat", "_sourceCategory").is_some());
    }

    #[test]
    fn test_tightest_span_wins() {
        // "ab" first occurs loosely at 0..=3, tightly at 4..=5.
        assert_eq!(
            fuzzy_match("ab", "axxbab"),
            Some(FuzzyMatch { start: 4, span: 2 })
        );
    }

    #[test]
    fn test_ranking_by_start_then_span() {
        let out = filter(
            "pr",
            owned(&["staging-prod", "prod", "p-r", "preview", "nomatch"]),
        );
        assert_eq!(out, owned(&["prod", "preview", "p-r", "staging-prod"]));
    }

    #[test]
    fn test_ties_keep_input_order() {
        let out = filter("s", owned(&["status", "service", "size"]));
        assert_eq!(out, owned(&["status", "service", "size"]));
    }
}
