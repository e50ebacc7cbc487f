// ABOUTME: Lexical lesson recommendation scoring
// ABOUTME: Similarity percentage over titles and content with weighted blending
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! # Lesson Recommendation
//!
//! Scores lessons against a query using a longest-common-substring
//! similarity percentage, blended 70/30 across title and content. Lessons
//! scoring below the threshold are dropped, and at most five are returned.

use crate::constants::limits;
use crate::models::Lesson;

const TITLE_WEIGHT: f64 = 0.7;
const CONTENT_WEIGHT: f64 = 0.3;

/// A lesson with its relevance score, highest first
#[derive(Debug, Clone)]
pub struct ScoredLesson {
    pub lesson: Lesson,
    pub score: f64,
}

/// Similarity percentage between two strings
///
/// Recursively matches the longest common substring, then the regions to
/// its left and right, and reports matched characters as a percentage of
/// the combined length. Case-insensitive. Two empty strings score zero.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn similarity_percent(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.to_lowercase().chars().collect();
    let b: Vec<char> = b.to_lowercase().chars().collect();
    let total = a.len() + b.len();
    if total == 0 {
        return 0.0;
    }
    let matched = common_chars(&a, &b);
    (matched * 2) as f64 * 100.0 / total as f64
}

/// Characters covered by recursive longest-common-substring matching
fn common_chars(a: &[char], b: &[char]) -> usize {
    let (pos_a, pos_b, len) = longest_common_substring(a, b);
    if len == 0 {
        return 0;
    }
    let mut sum = len;
    sum += common_chars(&a[..pos_a], &b[..pos_b]);
    sum += common_chars(&a[pos_a + len..], &b[pos_b + len..]);
    sum
}

fn longest_common_substring(a: &[char], b: &[char]) -> (usize, usize, usize) {
    let (mut best_a, mut best_b, mut best_len) = (0, 0, 0);
    for i in 0..a.len() {
        for j in 0..b.len() {
            let mut k = 0;
            while i + k < a.len() && j + k < b.len() && a[i + k] == b[j + k] {
                k += 1;
            }
            if k > best_len {
                best_a = i;
                best_b = j;
                best_len = k;
            }
        }
    }
    (best_a, best_b, best_len)
}

/// Score and rank lessons against the query
///
/// Returns at most [`limits::MAX_RECOMMENDATIONS`] lessons whose blended
/// score exceeds [`limits::MIN_RECOMMENDATION_SCORE`], highest first.
#[must_use]
pub fn recommend(query: &str, lessons: Vec<Lesson>) -> Vec<ScoredLesson> {
    let mut scored: Vec<ScoredLesson> = lessons
        .into_iter()
        .filter_map(|lesson| {
            let title_score = similarity_percent(query, &lesson.title);
            let content_score = similarity_percent(query, &lesson.content);
            let score = TITLE_WEIGHT * title_score + CONTENT_WEIGHT * content_score;
            (score > limits::MIN_RECOMMENDATION_SCORE).then_some(ScoredLesson { lesson, score })
        })
        .collect();

    scored.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
    scored.truncate(limits::MAX_RECOMMENDATIONS);
    scored
}
