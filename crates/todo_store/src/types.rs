use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Longest title the `todo.title` column accepts, in characters.
pub const MAX_TITLE_CHARS: usize = 200;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Todo {
    pub id: i64,
    pub title: String,
    pub is_done: bool,
    pub created_at: DateTime<Utc>,
}

/// Trims `raw` and caps it at [`MAX_TITLE_CHARS`].
///
/// Returns `None` when nothing but whitespace was submitted.
pub fn normalize_title(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }

    match trimmed.char_indices().nth(MAX_TITLE_CHARS) {
        Some((cut, _)) => Some(trimmed[..cut].trim_end().to_string()),
        None => Some(trimmed.to_string()),
    }
}

/// Turns the raw `q` parameter into a search term, `None` meaning "list everything".
pub fn normalize_search(raw: &str) -> Option<&str> {
    let trimmed = raw.trim();
    (!trimmed.is_empty()).then_some(trimmed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn whitespace_titles_are_rejected() {
        assert_eq!(normalize_title(""), None);
        assert_eq!(normalize_title("   \t\n "), None);
    }

    #[test]
    fn titles_are_trimmed() {
        assert_eq!(normalize_title("  Buy Milk \n").as_deref(), Some("Buy Milk"));
    }

    #[test]
    fn long_titles_are_capped_on_char_boundaries() {
        let raw = "é".repeat(MAX_TITLE_CHARS + 25);
        let title = normalize_title(&raw).expect("title");
        assert_eq!(title.chars().count(), MAX_TITLE_CHARS);

        let exact = "a".repeat(MAX_TITLE_CHARS);
        assert_eq!(normalize_title(&exact).as_deref(), Some(exact.as_str()));
    }

    #[test]
    fn empty_search_lists_everything() {
        assert_eq!(normalize_search("  "), None);
        assert_eq!(normalize_search(" milk "), Some("milk"));
    }
}
