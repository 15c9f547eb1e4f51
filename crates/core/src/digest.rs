//! Notification regularity and digest composition.

use std::collections::BTreeMap;
use std::fmt::Write as _;

use crate::types::DbId;

/// `log_digest.daily` for entries not yet in any digest.
pub const DIGEST_PENDING: i16 = 0;

/// `log_digest.daily` for entries already sent in a daily digest. They
/// stay until the weekly digest consumes them.
pub const DIGEST_DAILY_SENT: i16 = 2;

// ---------------------------------------------------------------------------
// Regularity
// ---------------------------------------------------------------------------

/// How often a member wants to hear about watched topics and boards.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotifyRegularity {
    Instant,
    /// Instant, but only the first event until the member visits again.
    FirstOnly,
    Daily,
    Weekly,
    Never,
}

impl NotifyRegularity {
    /// Unknown stored values are treated as `Never`.
    pub fn from_i16(value: i16) -> Self {
        match value {
            0 => NotifyRegularity::Instant,
            1 => NotifyRegularity::FirstOnly,
            2 => NotifyRegularity::Daily,
            3 => NotifyRegularity::Weekly,
            _ => NotifyRegularity::Never,
        }
    }

    pub fn as_i16(self) -> i16 {
        match self {
            NotifyRegularity::Instant => 0,
            NotifyRegularity::FirstOnly => 1,
            NotifyRegularity::Daily => 2,
            NotifyRegularity::Weekly => 3,
            NotifyRegularity::Never => 99,
        }
    }

    pub fn is_instant(self) -> bool {
        matches!(self, NotifyRegularity::Instant | NotifyRegularity::FirstOnly)
    }

    pub fn is_digest(self) -> bool {
        matches!(self, NotifyRegularity::Daily | NotifyRegularity::Weekly)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DigestPeriod {
    Daily,
    Weekly,
}

impl DigestPeriod {
    pub fn regularity(self) -> NotifyRegularity {
        match self {
            DigestPeriod::Daily => NotifyRegularity::Daily,
            DigestPeriod::Weekly => NotifyRegularity::Weekly,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            DigestPeriod::Daily => "Daily",
            DigestPeriod::Weekly => "Weekly",
        }
    }
}

// ---------------------------------------------------------------------------
// Note types
// ---------------------------------------------------------------------------

/// Topic events that reach subscribers. Declaration order is the order of
/// sections in a digest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum NoteType {
    Topic,
    Reply,
    Lock,
    Unlock,
    Sticky,
    Remove,
}

impl NoteType {
    pub fn as_str(self) -> &'static str {
        match self {
            NoteType::Topic => "topic",
            NoteType::Reply => "reply",
            NoteType::Lock => "lock",
            NoteType::Unlock => "unlock",
            NoteType::Sticky => "sticky",
            NoteType::Remove => "remove",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "topic" => Some(NoteType::Topic),
            "reply" => Some(NoteType::Reply),
            "lock" => Some(NoteType::Lock),
            "unlock" => Some(NoteType::Unlock),
            "sticky" => Some(NoteType::Sticky),
            "remove" => Some(NoteType::Remove),
            _ => None,
        }
    }

    fn heading(self) -> &'static str {
        match self {
            NoteType::Topic => "New topics",
            NoteType::Reply => "Topics with new replies",
            NoteType::Lock => "Topics locked",
            NoteType::Unlock => "Topics unlocked",
            NoteType::Sticky => "Topics made sticky",
            NoteType::Remove => "Topics removed",
        }
    }
}

// ---------------------------------------------------------------------------
// Composition
// ---------------------------------------------------------------------------

/// One pending event as seen by one subscriber.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DigestEntry {
    pub topic_id: DbId,
    pub board_name: String,
    pub subject: String,
    pub note_type: NoteType,
}

/// Render the `{DIGEST}` block: one section per note type, each topic
/// listed once per section in first-seen order.
pub fn compose(entries: &[DigestEntry]) -> String {
    let mut sections: BTreeMap<NoteType, Vec<&DigestEntry>> = BTreeMap::new();
    for entry in entries {
        let section = sections.entry(entry.note_type).or_default();
        if !section.iter().any(|e| e.topic_id == entry.topic_id) {
            section.push(entry);
        }
    }

    let mut out = String::new();
    for (note, items) in sections {
        if !out.is_empty() {
            out.push('\n');
        }
        let _ = writeln!(out, "{}:", note.heading());
        for item in items {
            let _ = writeln!(out, "  * {} ({})", item.subject, item.board_name);
        }
    }
    out.trim_end().to_string()
}
