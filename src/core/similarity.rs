//! String-similarity utility shared by the reference validator.
//!
//! A candidate qualifies as a suggestion for a missing id when it contains the
//! missing id as a substring, is contained by it, or sits within a bounded
//! edit distance. Candidates are ranked by edit distance, ties broken
//! alphabetically, and capped at three.

pub const MAX_SUGGESTIONS: usize = 3;
pub const EDIT_DISTANCE_CEILING: usize = 3;

/// Classic two-row Levenshtein distance over chars.
pub fn levenshtein(a: &str, b: &str) -> usize {
    if a == b {
        return 0;
    }
    let a_chars: Vec<char> = a.chars().collect();
    let b_chars: Vec<char> = b.chars().collect();
    if a_chars.is_empty() {
        return b_chars.len();
    }
    if b_chars.is_empty() {
        return a_chars.len();
    }

    let mut previous: Vec<usize> = (0..=b_chars.len()).collect();
    let mut current = vec![0usize; b_chars.len() + 1];

    for (i, a_char) in a_chars.iter().enumerate() {
        current[0] = i + 1;
        for (j, b_char) in b_chars.iter().enumerate() {
            let substitution = previous[j] + usize::from(a_char != b_char);
            current[j + 1] = substitution.min(previous[j + 1] + 1).min(current[j] + 1);
        }
        std::mem::swap(&mut previous, &mut current);
    }

    previous[b_chars.len()]
}

/// Whether `candidate` qualifies as a correction for `missing`.
pub fn is_candidate(missing: &str, candidate: &str) -> bool {
    candidate.contains(missing)
        || missing.contains(candidate)
        || levenshtein(missing, candidate) < EDIT_DISTANCE_CEILING
}

/// Up to [`MAX_SUGGESTIONS`] candidate corrections for a missing id.
pub fn suggest<'a, I>(missing: &str, pool: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut scored: Vec<(usize, &str)> = pool
        .into_iter()
        .filter(|candidate| is_candidate(missing, candidate))
        .map(|candidate| (levenshtein(missing, candidate), candidate))
        .collect();
    scored.sort_by(|a, b| a.0.cmp(&b.0).then_with(|| a.1.cmp(b.1)));
    scored
        .into_iter()
        .take(MAX_SUGGESTIONS)
        .map(|(_, candidate)| candidate.to_string())
        .collect()
}
