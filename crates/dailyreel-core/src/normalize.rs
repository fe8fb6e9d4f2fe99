//! Normalisation rules applied to raw provider data before it reaches a
//! catalog item.
//!
//! Lengths are counted in Unicode scalar values, not bytes, so CJK text is
//! measured the same way a reader would count it.

/// Maximum directors kept per item.
pub const MAX_DIRECTORS: usize = 3;
/// Maximum billed actors kept per item.
pub const MAX_ACTORS: usize = 8;
/// Maximum review excerpts kept per item.
pub const MAX_REVIEWS: usize = 2;
/// Reviews at or under this many characters are dropped.
pub const MIN_REVIEW_CHARS: usize = 50;
/// Per-excerpt content budget.
pub const REVIEW_CHAR_BUDGET: usize = 400;

/// Number of characters in `s`.
pub fn char_len(s: &str) -> usize {
    s.chars().count()
}

/// First `max` characters of `s`.
pub fn truncate_chars(s: &str, max: usize) -> &str {
    match s.char_indices().nth(max) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

/// Clamp to 0.0..=10.0 and round to one decimal place.
pub fn round_rating(raw: f64) -> f64 {
    if !raw.is_finite() {
        return 0.0;
    }
    (raw.clamp(0.0, 10.0) * 10.0).round() / 10.0
}

/// Directors and actors of one item.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Credits {
    pub directors: Vec<String>,
    pub actors: Vec<String>,
}

/// A crew member as reported by the provider.
#[derive(Debug, Clone)]
pub struct CrewMember {
    pub name: String,
    pub job: String,
}

impl Credits {
    /// Build from billed cast (in billing order) and the full crew list.
    ///
    /// Only crew whose job is exactly `"Director"` count as directors.
    pub fn from_people(cast: impl IntoIterator<Item = String>, crew: &[CrewMember]) -> Self {
        let actors = cast
            .into_iter()
            .filter(|n| !n.trim().is_empty())
            .take(MAX_ACTORS)
            .collect();
        let mut directors: Vec<String> = Vec::new();
        for member in crew.iter().filter(|c| c.job == "Director") {
            if directors.len() == MAX_DIRECTORS {
                break;
            }
            if !directors.contains(&member.name) {
                directors.push(member.name.clone());
            }
        }
        Self { directors, actors }
    }
}

/// A critic review as reported by the provider.
#[derive(Debug, Clone)]
pub struct Review {
    pub author: String,
    pub content: String,
}

/// Pick the review excerpts worth showing.
///
/// Drops reviews of [`MIN_REVIEW_CHARS`] characters or fewer, keeps the
/// longest [`MAX_REVIEWS`], and formats each as `author: content` with the
/// content cut to [`REVIEW_CHAR_BUDGET`] characters.
pub fn select_reviews(reviews: Vec<Review>) -> Vec<String> {
    let mut kept: Vec<(usize, Review)> = reviews
        .into_iter()
        .map(|r| {
            let content = r.content.trim().to_string();
            (char_len(&content), Review { author: r.author, content })
        })
        .filter(|(len, _)| *len > MIN_REVIEW_CHARS)
        .collect();
    // Stable sort: equal lengths keep provider order.
    kept.sort_by(|a, b| b.0.cmp(&a.0));
    kept.into_iter()
        .take(MAX_REVIEWS)
        .map(|(_, r)| {
            let author = r.author.trim();
            let author = if author.is_empty() { "匿名" } else { author };
            format!("{author}: {}", truncate_chars(&r.content, REVIEW_CHAR_BUDGET))
        })
        .collect()
}
