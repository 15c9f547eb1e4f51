//! Redirect targets.
//!
//! Every URL is the forum script URL plus a `;`-separated query, matching
//! what the request parser accepts.

use crate::types::DbId;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForumUrl {
    base: String,
}

impl ForumUrl {
    /// `base` is the script URL, e.g. `https://forum.example.com/index.php`.
    pub fn new(base: impl Into<String>) -> Self {
        let base = base.into();
        let base = base.trim_end_matches('?').to_string();
        Self { base }
    }

    pub fn base(&self) -> &str {
        &self.base
    }

    pub fn board_index(&self) -> String {
        self.base.clone()
    }

    pub fn board(&self, board_id: DbId, start: i64) -> String {
        format!("{}?board={board_id}.{}", self.base, start.max(0))
    }

    pub fn topic(&self, topic_id: DbId, start: i64) -> String {
        format!("{}?topic={topic_id}.{}", self.base, start.max(0))
    }

    /// Jump to one message inside a topic.
    pub fn topic_msg(&self, topic_id: DbId, msg_id: DbId) -> String {
        format!("{}?topic={topic_id}.msg{msg_id}#msg{msg_id}", self.base)
    }

    pub fn profile(&self, member_id: DbId) -> String {
        self.action("profile", &[("u", member_id.to_string())])
    }

    /// `?action=NAME;k=v;...`. Values are expected to be URL-safe.
    pub fn action(&self, name: &str, extra: &[(&str, String)]) -> String {
        let mut url = format!("{}?action={name}", self.base);
        for (key, value) in extra {
            url.push(';');
            url.push_str(key);
            url.push('=');
            url.push_str(value);
        }
        url
    }
}
