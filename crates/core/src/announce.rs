//! Batch mail announcement paging.
//!
//! An announcement walks the member table in ascending id order, one page
//! per client request. The client echoes back the `start` cursor it was
//! given, so the server keeps no state between pages.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

use crate::types::DbId;

/// Members per page when mail is sent inline.
pub const PAGE_SIZE_DIRECT: i64 = 25;

/// Members per page when mail goes through the queue.
pub const PAGE_SIZE_QUEUED: i64 = 500;

pub fn page_size(mail_queue: bool) -> i64 {
    if mail_queue {
        PAGE_SIZE_QUEUED
    } else {
        PAGE_SIZE_DIRECT
    }
}

// ---------------------------------------------------------------------------
// Progress
// ---------------------------------------------------------------------------

/// Cursor and completion state returned to the client after each page.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AnnounceProgress {
    /// Highest member id processed so far.
    pub start: DbId,
    pub percentage: f64,
    pub done: bool,
}

/// Completion percentage for a cursor, rounded to one decimal place.
///
/// A forum with no recorded latest member counts as complete.
pub fn percentage(start: DbId, latest_member: DbId) -> f64 {
    if latest_member <= 0 {
        return 100.0;
    }
    let raw = 100.0 * start as f64 / latest_member as f64;
    ((raw * 10.0).round() / 10.0).clamp(0.0, 100.0)
}

impl AnnounceProgress {
    pub fn initial() -> Self {
        Self {
            start: 0,
            percentage: 0.0,
            done: false,
        }
    }

    /// Advance past a page whose highest member id is `last_id`.
    ///
    /// Neither the cursor nor the percentage ever move backwards, even if
    /// members were deleted or `latest_member` shrank between pages.
    pub fn advance(self, last_id: DbId, latest_member: DbId) -> Self {
        let start = self.start.max(last_id);
        Self {
            start,
            percentage: percentage(start, latest_member).max(self.percentage),
            done: false,
        }
    }

    /// The empty page that ends the walk.
    pub fn finish(self) -> Self {
        Self {
            start: self.start,
            percentage: 100.0,
            done: true,
        }
    }
}

// ---------------------------------------------------------------------------
// Recipients
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Recipient {
    pub id: DbId,
    pub email: String,
    /// Empty means "use the forum default".
    pub language: String,
}

/// Group recipients by language. Recipients without a language join the
/// forum default.
pub fn group_by_language<'a>(
    recipients: &'a [Recipient],
    default_language: &str,
) -> BTreeMap<String, Vec<&'a Recipient>> {
    let mut groups: BTreeMap<String, Vec<&Recipient>> = BTreeMap::new();
    for r in recipients {
        let lang = if r.language.trim().is_empty() {
            default_language
        } else {
            r.language.trim()
        };
        groups.entry(lang.to_string()).or_default().push(r);
    }
    groups
}

// ---------------------------------------------------------------------------
// Body text
// ---------------------------------------------------------------------------

static LINE_BREAK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)<br\s*/?>|\[br\]").expect("valid regex"));

static MARKUP: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"</?[a-zA-Z][^>]*>|\[/?[a-zA-Z*][^\]]*\]").expect("valid regex"));

static BLANK_RUNS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n{3,}").expect("valid regex"));

/// Reduce a stored message body to plain text for mail.
///
/// Line break tags become newlines, other BBCode and HTML tags are
/// dropped, and the common entities are decoded.
pub fn plain_text(body: &str) -> String {
    let text = LINE_BREAK.replace_all(body, "\n");
    let text = MARKUP.replace_all(&text, "");
    let text = text
        .replace("&nbsp;", " ")
        .replace("&quot;", "\"")
        .replace("&#039;", "'")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&amp;", "&");
    BLANK_RUNS.replace_all(text.trim(), "\n\n").into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_size_depends_on_queue() {
        assert_eq!(page_size(false), 25);
        assert_eq!(page_size(true), 500);
    }

    #[test]
    fn percentage_rounds_to_one_decimal() {
        assert_eq!(percentage(1, 3), 33.3);
        assert_eq!(percentage(2, 3), 66.7);
        assert_eq!(percentage(50, 50), 100.0);
        assert_eq!(percentage(80, 50), 100.0);
        assert_eq!(percentage(5, 0), 100.0);
    }

    #[test]
    fn progress_never_decreases() {
        let p = AnnounceProgress::initial().advance(40, 100);
        assert_eq!(p.start, 40);
        assert_eq!(p.percentage, 40.0);

        // Latest member grew between pages.
        let p = p.advance(45, 1_000);
        assert_eq!(p.start, 45);
        assert_eq!(p.percentage, 40.0);

        // A replayed, older page does not move the cursor back.
        let p = p.advance(10, 1_000);
        assert_eq!(p.start, 45);
        assert!(!p.done);
    }

    #[test]
    fn finish_is_complete() {
        let p = AnnounceProgress::initial().advance(7, 70).finish();
        assert!(p.done);
        assert_eq!(p.percentage, 100.0);
        assert_eq!(p.start, 7);
    }

    fn recipient(id: DbId, language: &str) -> Recipient {
        Recipient {
            id,
            email: format!("m{id}@example.com"),
            language: language.to_string(),
        }
    }

    #[test]
    fn groups_by_language_with_default() {
        let list = vec![
            recipient(1, "spanish"),
            recipient(2, ""),
            recipient(3, "english"),
            recipient(4, "spanish"),
        ];
        let groups = group_by_language(&list, "english");
        let ids = |lang: &str| -> Vec<DbId> { groups[lang].iter().map(|r| r.id).collect() };
        assert_eq!(groups.len(), 2);
        assert_eq!(ids("english"), vec![2, 3]);
        assert_eq!(ids("spanish"), vec![1, 4]);
    }

    #[test]
    fn plain_text_strips_markup() {
        let body = "[b]Big[/b] news<br />see [url=https://x.test]here[/url] &amp; <i>there</i>";
        assert_eq!(plain_text(body), "Big news\nsee here & there");
    }

    #[test]
    fn plain_text_collapses_blank_runs() {
        assert_eq!(plain_text("a<br><br><br><br>b"), "a\n\nb");
    }
}
