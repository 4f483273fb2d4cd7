//! "did you mean" hints for unknown task and package names.

/// Upper bound on the number of names listed in one hint.
pub const MAX_SUGGESTIONS: usize = 5;

/// Build a `did you mean: 'a', 'b'?` phrase for `input`, or `None` when no
/// candidate is close enough.
///
/// The lowercased input is ranked against every candidate. When nothing
/// matches, the input is trimmed one character at a time (tail first, then
/// head) and every window of the shorter length is retried, down to single
/// characters.
pub fn suggest<S: AsRef<str>>(input: &str, candidates: &[S]) -> Option<String> {
    let needle: Vec<char> = input.to_lowercase().chars().collect();
    if needle.is_empty() || candidates.is_empty() {
        return None;
    }

    for trimmed in 0..needle.len() {
        let width = needle.len() - trimmed;
        let mut best: Vec<Option<i32>> = vec![None; candidates.len()];
        for offset in window_offsets(trimmed) {
            let window: String = needle[offset..offset + width].iter().collect();
            for (slot, candidate) in best.iter_mut().zip(candidates) {
                let score = rank(&window, candidate.as_ref());
                if score >= 0 && slot.is_none_or(|current| score > current) {
                    *slot = Some(score);
                }
            }
        }

        let mut matches: Vec<(i32, &str)> = best
            .iter()
            .zip(candidates)
            .filter_map(|(score, candidate)| score.map(|s| (s, candidate.as_ref())))
            .collect();
        if matches.is_empty() {
            continue;
        }
        matches.sort_by(|a, b| b.0.cmp(&a.0));
        matches.truncate(MAX_SUGGESTIONS);
        return Some(format_phrase(matches.iter().map(|(_, name)| *name)));
    }

    None
}

/// Start offsets of the windows left after removing `trimmed` characters,
/// alternating between trimming the tail and trimming the head.
fn window_offsets(trimmed: usize) -> Vec<usize> {
    let mut offsets = Vec::with_capacity(trimmed + 1);
    let (mut low, mut high) = (0, trimmed);
    while low <= high {
        offsets.push(low);
        if low != high {
            offsets.push(high);
        }
        low += 1;
        if high == 0 {
            break;
        }
        high -= 1;
    }
    offsets
}

/// Case-insensitive fuzzy rank of `needle` against `target`.
///
/// Returns -1 unless every character of `needle` appears in `target` in
/// order. Otherwise the score is the share of `target` covered by `needle`
/// (0..=100), so closer-length candidates rank higher.
pub fn rank(needle: &str, target: &str) -> i32 {
    let target = target.to_lowercase();
    let needle = needle.to_lowercase();
    let mut remaining = target.chars();
    for wanted in needle.chars() {
        if !remaining.any(|ch| ch == wanted) {
            return -1;
        }
    }
    let target_len = target.chars().count();
    if target_len == 0 {
        return 0;
    }
    let covered = needle.chars().count() * 100 / target_len;
    i32::try_from(covered).unwrap_or(i32::MAX)
}

fn format_phrase<'a>(names: impl Iterator<Item = &'a str>) -> String {
    let quoted: Vec<String> = names.map(|name| format!("'{name}'")).collect();
    format!("did you mean: {}?", quoted.join(", "))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefix_typo_suggests_task() {
        let tasks = ["lint", "test", "build"];
        assert_eq!(
            suggest("buil", &tasks).as_deref(),
            Some("did you mean: 'build'?")
        );
    }

    #[test]
    fn input_is_case_insensitive() {
        let tasks = ["Build"];
        assert_eq!(
            suggest("BUILD", &tasks).as_deref(),
            Some("did you mean: 'Build'?")
        );
    }

    #[test]
    fn trims_until_something_matches() {
        let packages = ["pkg/log", "pkg/http"];
        // "logx" only matches once the trailing "x" is trimmed.
        assert_eq!(
            suggest("logx", &packages).as_deref(),
            Some("did you mean: 'pkg/log'?")
        );
    }

    #[test]
    fn shared_pair_anywhere_in_long_input_is_found() {
        let packages = ["cmd/ab", "zz"];
        let phrase = suggest("abqqqqqqqq", &packages).expect("suggestion");
        assert!(phrase.starts_with("did you mean:"));
        assert!(phrase.ends_with('?'));
        assert!(phrase.contains("'cmd/ab'"));
    }

    #[test]
    fn closer_length_ranks_first_and_list_is_capped() {
        let candidates = [
            "test-all-packages",
            "test",
            "tests",
            "test-e2e",
            "test-unit",
            "test-race",
            "retest",
        ];
        let phrase = suggest("test", &candidates).expect("suggestion");
        assert!(phrase.starts_with("did you mean: 'test', 'tests', "));
        assert_eq!(phrase.matches('\'').count(), MAX_SUGGESTIONS * 2);
    }

    #[test]
    fn trims_down_to_one_character() {
        let tasks = ["lint", "test", "build"];
        assert_eq!(
            suggest("bx", &tasks).as_deref(),
            Some("did you mean: 'build'?")
        );
        assert_eq!(
            suggest("xbz", &tasks).as_deref(),
            Some("did you mean: 'build'?")
        );
    }

    #[test]
    fn no_suggestion_without_overlap() {
        assert_eq!(suggest("xyz", &["lint", "build"]), None);
    }

    #[test]
    fn empty_input_or_candidates_never_suggest() {
        assert_eq!(suggest("", &["lint"]), None);
        let none: [&str; 0] = [];
        assert_eq!(suggest("lint", &none), None);
    }

    #[test]
    fn rank_requires_ordered_characters() {
        assert_eq!(rank("bd", "build"), 40);
        assert_eq!(rank("db", "build"), -1);
        assert_eq!(rank("BUILD", "build"), 100);
    }

    #[test]
    fn window_offsets_alternate_tail_and_head() {
        assert_eq!(window_offsets(0), vec![0]);
        assert_eq!(window_offsets(1), vec![0, 1]);
        assert_eq!(window_offsets(3), vec![0, 3, 1, 2]);
    }
}
