//! Edit-distance metrics used to key the metric tree.

use std::cmp::min;
use std::fmt;

/// A distance function over words.
///
/// Implementations must be symmetric, non-negative, return zero only for
/// identical words, and satisfy the triangle inequality. The metric tree
/// prunes its search with the triangle inequality, so a function that breaks
/// it makes queries silently incomplete.
///
/// Any `Fn(&str, &str) -> usize` is a metric, which lets callers plug in a
/// closure without defining a type.
pub trait DistanceMetric {
    /// Distance between two words.
    fn distance(&self, a: &str, b: &str) -> usize;
}

impl<F> DistanceMetric for F
where
    F: Fn(&str, &str) -> usize,
{
    fn distance(&self, a: &str, b: &str) -> usize {
        self(a, b)
    }
}

/// Plain Levenshtein distance over Unicode scalar values.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Levenshtein;

impl DistanceMetric for Levenshtein {
    fn distance(&self, a: &str, b: &str) -> usize {
        levenshtein_distance(a, b)
    }
}

impl fmt::Display for Levenshtein {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("levenshtein")
    }
}

/// Calculate the Levenshtein distance between two strings.
/// This is the minimum number of single-character edits (insertions, deletions, or substitutions)
/// required to change one word into another.
pub fn levenshtein_distance(s1: &str, s2: &str) -> usize {
    if s1 == s2 {
        return 0;
    }

    let s1_chars: Vec<char> = s1.chars().collect();
    let s2_chars: Vec<char> = s2.chars().collect();
    let len1 = s1_chars.len();
    let len2 = s2_chars.len();

    if len1 == 0 {
        return len2;
    }
    if len2 == 0 {
        return len1;
    }

    // Use only two rows for space optimization
    let mut prev_row: Vec<usize> = (0..=len2).collect();
    let mut curr_row = vec![0; len2 + 1];

    for i in 1..=len1 {
        curr_row[0] = i;

        for j in 1..=len2 {
            let cost = if s1_chars[i - 1] == s2_chars[j - 1] {
                0
            } else {
                1
            };

            curr_row[j] = min(
                min(
                    prev_row[j] + 1,     // deletion
                    curr_row[j - 1] + 1, // insertion
                ),
                prev_row[j - 1] + cost, // substitution
            );
        }

        std::mem::swap(&mut prev_row, &mut curr_row);
    }

    prev_row[len2]
}
