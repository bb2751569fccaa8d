use std::sync::LazyLock;

use regex::Regex;

use crate::constants::WORDS_PER_MINUTE;

static WORD: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\w+").unwrap());

/// Count maximal runs of word characters (letters, digits, underscore)
pub fn word_count(content: &str) -> usize {
    WORD.find_iter(content).count()
}

/// Estimated minutes to read `content`, never less than one.
///
/// Halves round to the nearest even minute, so 500 words is 2 minutes and
/// 700 words is 4.
pub fn reading_time(content: &str) -> i64 {
    let minutes = (word_count(content) as f64 / WORDS_PER_MINUTE as f64).round_ties_even();
    (minutes as i64).max(1)
}
