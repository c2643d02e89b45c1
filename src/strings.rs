//! String helpers. All functions are `char` based, so multi-byte input is
//! handled one Unicode scalar value at a time.

use std::collections::HashSet;

/// Reverse the order of whitespace-separated words, joined by single spaces.
pub fn reverse_words(s: &str) -> String {
    let mut words: Vec<&str> = s.split_whitespace().collect();
    words.reverse();
    words.join(" ")
}

/// Palindrome check ignoring case and any non-alphanumeric character.
///
/// A string with nothing left after normalization is a palindrome.
pub fn is_palindrome(s: &str) -> bool {
    let normalized: Vec<char> = s
        .chars()
        .filter(|c| c.is_alphanumeric())
        .flat_map(char::to_lowercase)
        .collect();
    normalized.iter().eq(normalized.iter().rev())
}

/// Count ASCII vowels, case-insensitively. Accented vowels are not counted.
pub fn count_vowels(s: &str) -> usize {
    s.chars()
        .filter(|c| matches!(c.to_ascii_lowercase(), 'a' | 'e' | 'i' | 'o' | 'u'))
        .count()
}

/// Upper-case the first alphabetic character of each word and lower-case the
/// rest. Words are rejoined with single spaces.
pub fn title_case(s: &str) -> String {
    s.split_whitespace()
        .map(capitalize)
        .collect::<Vec<_>>()
        .join(" ")
}

fn capitalize(word: &str) -> String {
    let mut out = String::with_capacity(word.len());
    let mut seen_alpha = false;
    for c in word.chars() {
        if c.is_alphabetic() && !seen_alpha {
            seen_alpha = true;
            out.extend(c.to_uppercase());
        } else {
            out.extend(c.to_lowercase());
        }
    }
    out
}

/// Drop every repeated character, keeping the first occurrence of each.
pub fn remove_duplicates(s: &str) -> String {
    let mut seen = HashSet::new();
    s.chars().filter(|c| seen.insert(*c)).collect()
}

/// Number of whitespace-separated words.
pub fn count_words(s: &str) -> usize {
    s.split_whitespace().count()
}
