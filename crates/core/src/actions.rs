//! The action table: request parameters to controller and sub-action.
//!
//! Every controller exposes a closed set of sub-actions selected by the
//! `sa` parameter. An absent or unrecognised `sa` silently selects the
//! controller's default; it is never an error.

use crate::request::RequestParams;

/// A closed set of sub-actions with a fixed name table and a default.
pub trait SubAction: Sized + Copy + PartialEq + 'static {
    /// Selected when `sa` is absent or not in [`SubAction::TABLE`].
    const DEFAULT: Self;
    /// Request names and the sub-action each selects.
    const TABLE: &'static [(&'static str, Self)];

    fn resolve(name: Option<&str>) -> Self {
        name.and_then(|n| {
            Self::TABLE
                .iter()
                .find(|(key, _)| *key == n)
                .map(|(_, sa)| *sa)
        })
        .unwrap_or(Self::DEFAULT)
    }

    fn name(self) -> &'static str {
        Self::TABLE
            .iter()
            .find(|(_, sa)| *sa == self)
            .map(|(key, _)| *key)
            .unwrap_or("default")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TopicSubAction {
    Display,
    Lock,
    Sticky,
    Remove,
}

impl SubAction for TopicSubAction {
    const DEFAULT: Self = TopicSubAction::Display;
    const TABLE: &'static [(&'static str, Self)] = &[
        ("display", TopicSubAction::Display),
        ("lock", TopicSubAction::Lock),
        ("sticky", TopicSubAction::Sticky),
        ("remove", TopicSubAction::Remove),
    ];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KarmaSubAction {
    Applaud,
    Smite,
}

impl SubAction for KarmaSubAction {
    const DEFAULT: Self = KarmaSubAction::Applaud;
    const TABLE: &'static [(&'static str, Self)] = &[
        ("applaud", KarmaSubAction::Applaud),
        ("smite", KarmaSubAction::Smite),
    ];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuddySubAction {
    Toggle,
    Add,
    Remove,
}

impl SubAction for BuddySubAction {
    const DEFAULT: Self = BuddySubAction::Toggle;
    const TABLE: &'static [(&'static str, Self)] = &[
        ("toggle", BuddySubAction::Toggle),
        ("add", BuddySubAction::Add),
        ("remove", BuddySubAction::Remove),
    ];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkReadSubAction {
    Board,
    All,
    Topic,
}

impl SubAction for MarkReadSubAction {
    const DEFAULT: Self = MarkReadSubAction::Board;
    const TABLE: &'static [(&'static str, Self)] = &[
        ("board", MarkReadSubAction::Board),
        ("all", MarkReadSubAction::All),
        ("topic", MarkReadSubAction::Topic),
    ];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnnounceSubAction {
    SelectGroup,
    Send,
}

impl SubAction for AnnounceSubAction {
    const DEFAULT: Self = AnnounceSubAction::SelectGroup;
    const TABLE: &'static [(&'static str, Self)] = &[
        ("selectgroup", AnnounceSubAction::SelectGroup),
        ("send", AnnounceSubAction::Send),
    ];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttachSubAction {
    Approve,
    Reject,
    All,
}

impl SubAction for AttachSubAction {
    const DEFAULT: Self = AttachSubAction::Approve;
    const TABLE: &'static [(&'static str, Self)] = &[
        ("approve", AttachSubAction::Approve),
        ("reject", AttachSubAction::Reject),
        ("all", AttachSubAction::All),
    ];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScheduledTrigger {
    Tasks,
    MailQueue,
}

impl SubAction for ScheduledTrigger {
    const DEFAULT: Self = ScheduledTrigger::Tasks;
    const TABLE: &'static [(&'static str, Self)] = &[
        ("tasks", ScheduledTrigger::Tasks),
        ("mailq", ScheduledTrigger::MailQueue),
    ];
}

/// A fully resolved request target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    BoardIndex,
    Topic(TopicSubAction),
    Karma(KarmaSubAction),
    Buddy(BuddySubAction),
    MarkRead(MarkReadSubAction),
    Announce(AnnounceSubAction),
    AttachApprove(AttachSubAction),
    Scheduled(ScheduledTrigger),
    Xrds,
}

impl Action {
    /// Resolve `action` and `sa` from the request.
    ///
    /// Without a known `action`, a `topic` parameter selects topic display
    /// and anything else selects the board index.
    pub fn resolve(params: &RequestParams) -> Self {
        let sa = params.get("sa");
        match params.get("action") {
            Some("topic") => Action::Topic(TopicSubAction::resolve(sa)),
            Some("lock") => Action::Topic(TopicSubAction::Lock),
            Some("sticky") => Action::Topic(TopicSubAction::Sticky),
            Some("removetopic") => Action::Topic(TopicSubAction::Remove),
            Some("karma") => Action::Karma(KarmaSubAction::resolve(sa)),
            Some("buddy") => Action::Buddy(BuddySubAction::resolve(sa)),
            Some("markasread") => Action::MarkRead(MarkReadSubAction::resolve(sa)),
            Some("announce") => Action::Announce(AnnounceSubAction::resolve(sa)),
            Some("attachapprove") => Action::AttachApprove(AttachSubAction::resolve(sa)),
            Some("scheduled") => {
                Action::Scheduled(ScheduledTrigger::resolve(params.get("scheduled").or(sa)))
            }
            Some("xrds") => Action::Xrds,
            _ if params.has("topic") => Action::Topic(TopicSubAction::Display),
            _ => Action::BoardIndex,
        }
    }

    /// Short name for logging.
    pub fn name(&self) -> &'static str {
        match self {
            Action::BoardIndex => "boardindex",
            Action::Topic(_) => "topic",
            Action::Karma(_) => "karma",
            Action::Buddy(_) => "buddy",
            Action::MarkRead(_) => "markasread",
            Action::Announce(_) => "announce",
            Action::AttachApprove(_) => "attachapprove",
            Action::Scheduled(_) => "scheduled",
            Action::Xrds => "xrds",
        }
    }
}
