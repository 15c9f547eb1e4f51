//! Per-request parameters, actor, and the session/guest gate.
//!
//! [`RequestContext`] replaces ambient request globals: the front
//! controller builds one per request and passes it to the handler it
//! dispatches to.

use std::collections::BTreeMap;

use crate::error::CoreError;
use crate::types::DbId;

// ---------------------------------------------------------------------------
// Parameters
// ---------------------------------------------------------------------------

/// Name of the parameter carrying the session token on mutating requests.
pub const SESSION_PARAM: &str = "sesc";

/// Decoded request parameters.
///
/// Query strings use either `;` or `&` as the pair separator
/// (`action=topic;sa=lock;topic=5.0`). Keys of the form `who[]` or
/// `who[7]` accumulate under `who`. Single-value lookups return the last
/// value supplied.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestParams {
    values: BTreeMap<String, Vec<String>>,
}

impl RequestParams {
    /// Parse a raw query string or `application/x-www-form-urlencoded` body.
    pub fn parse(raw: &str) -> Self {
        let normalized = raw.trim_start_matches('?').replace(';', "&");
        let mut params = Self::default();
        for (key, value) in url::form_urlencoded::parse(normalized.as_bytes()) {
            params.push(&key, value.into_owned());
        }
        params
    }

    /// Build from explicit pairs. Mostly useful in tests.
    pub fn from_pairs<'a, I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut params = Self::default();
        for (key, value) in pairs {
            params.push(key, value.to_string());
        }
        params
    }

    fn push(&mut self, key: &str, value: String) {
        let key = match key.find('[') {
            Some(idx) if key.ends_with(']') => &key[..idx],
            _ => key,
        };
        if key.is_empty() {
            return;
        }
        self.values.entry(key.to_string()).or_default().push(value);
    }

    /// Merge `other` into `self`. Values from `other` are appended, so for
    /// single-value lookups they take precedence.
    pub fn merge(&mut self, other: RequestParams) {
        for (key, mut values) in other.values {
            self.values.entry(key).or_default().append(&mut values);
        }
    }

    /// The last value supplied for `key`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.values
            .get(key)
            .and_then(|v| v.last())
            .map(String::as_str)
    }

    /// Every value supplied for `key`, in request order.
    pub fn get_all(&self, key: &str) -> &[String] {
        self.values.get(key).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Whether `key` was supplied at all (value may be empty, e.g. `;xml`).
    pub fn has(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    /// A strictly positive id. Dotted values (`5.20`) yield the part before
    /// the dot.
    pub fn id(&self, key: &str) -> Option<DbId> {
        self.get(key).and_then(parse_id)
    }

    /// Every strictly positive id supplied for `key`, deduplicated in order.
    pub fn ids(&self, key: &str) -> Vec<DbId> {
        let mut ids: Vec<DbId> = Vec::new();
        for id in self.get_all(key).iter().filter_map(|v| parse_id(v)) {
            if !ids.contains(&id) {
                ids.push(id);
            }
        }
        ids
    }

    /// A non-negative integer such as a pagination cursor. Defaults to 0.
    pub fn offset(&self, key: &str) -> i64 {
        self.get(key)
            .and_then(|v| v.trim().parse::<i64>().ok())
            .map(|v| v.max(0))
            .unwrap_or(0)
    }

    /// The `topic=ID.START` reference.
    pub fn topic_ref(&self) -> Option<ItemRef> {
        self.get("topic").and_then(ItemRef::parse)
    }

    /// The `board=ID.START` reference.
    pub fn board_ref(&self) -> Option<ItemRef> {
        self.get("board").and_then(ItemRef::parse)
    }
}

fn parse_id(value: &str) -> Option<DbId> {
    let head = value.split('.').next().unwrap_or_default().trim();
    head.parse::<DbId>().ok().filter(|id| *id > 0)
}

/// A dotted `ID.START` reference as used by `topic=` and `board=`.
///
/// The start part is either a numeric page offset or `msgN` / `new`; only
/// numeric offsets are kept, everything else becomes 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ItemRef {
    pub id: DbId,
    pub start: i64,
}

impl ItemRef {
    pub fn parse(value: &str) -> Option<Self> {
        let id = parse_id(value)?;
        let start = value
            .split_once('.')
            .and_then(|(_, s)| s.parse::<i64>().ok())
            .map(|s| s.max(0))
            .unwrap_or(0);
        Some(Self { id, start })
    }
}

// ---------------------------------------------------------------------------
// Actor
// ---------------------------------------------------------------------------

/// An authenticated member acting on a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemberActor {
    pub id: DbId,
    pub is_admin: bool,
}

/// Who is making the request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Actor {
    Guest,
    Member(MemberActor),
}

impl Actor {
    pub fn member_id(&self) -> Option<DbId> {
        match self {
            Actor::Guest => None,
            Actor::Member(m) => Some(m.id),
        }
    }

    pub fn is_guest(&self) -> bool {
        matches!(self, Actor::Guest)
    }
}

// ---------------------------------------------------------------------------
// Context
// ---------------------------------------------------------------------------

/// Everything a handler knows about the request it is serving.
#[derive(Debug, Clone)]
pub struct RequestContext {
    pub actor: Actor,
    pub params: RequestParams,
    /// The token the client must echo back in `sesc` for mutating requests.
    expected_session: Option<String>,
}

impl RequestContext {
    pub fn new(actor: Actor, params: RequestParams, expected_session: Option<String>) -> Self {
        Self {
            actor,
            params,
            expected_session,
        }
    }

    /// Abort with `Unauthorized` for guests.
    pub fn require_member(&self) -> Result<&MemberActor, CoreError> {
        match &self.actor {
            Actor::Member(m) => Ok(m),
            Actor::Guest => Err(CoreError::Unauthorized(
                "Guests are not allowed to perform this action".into(),
            )),
        }
    }

    /// Abort with `SessionInvalid` unless the submitted `sesc` matches.
    pub fn require_session(&self) -> Result<(), CoreError> {
        match (&self.expected_session, self.params.get(SESSION_PARAM)) {
            (Some(expected), Some(submitted)) if !expected.is_empty() && expected == submitted => {
                Ok(())
            }
            _ => Err(CoreError::SessionInvalid),
        }
    }

    /// Whether the client asked for an XML response instead of a redirect.
    pub fn wants_xml(&self) -> bool {
        self.params.has("xml")
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn parses_semicolon_and_ampersand_separators() {
        let params = RequestParams::parse("?action=topic;sa=lock&topic=5.20;xml");
        assert_eq!(params.get("action"), Some("topic"));
        assert_eq!(params.get("sa"), Some("lock"));
        assert_eq!(params.topic_ref(), Some(ItemRef { id: 5, start: 20 }));
        assert!(params.has("xml"));
    }

    #[test]
    fn decodes_percent_escapes() {
        let params = RequestParams::parse("q=a%3Bb+c");
        assert_eq!(params.get("q"), Some("a;b c"));
    }

    #[test]
    fn bracket_keys_accumulate() {
        let params = RequestParams::parse("who[1]=1;who[4]=4;who[]=4;who[]=x");
        assert_eq!(params.ids("who"), vec![1, 4]);
    }

    #[test]
    fn last_value_wins_and_merge_overrides() {
        let mut query = RequestParams::parse("start=10;start=20");
        assert_eq!(query.get("start"), Some("20"));
        query.merge(RequestParams::parse("start=30"));
        assert_eq!(query.offset("start"), 30);
    }

    #[test]
    fn ids_reject_non_positive_and_garbage() {
        let params = RequestParams::parse("u=0;t=-3;b=abc;m=12");
        assert_eq!(params.id("u"), None);
        assert_eq!(params.id("t"), None);
        assert_eq!(params.id("b"), None);
        assert_eq!(params.id("m"), Some(12));
    }

    #[test]
    fn item_ref_non_numeric_start_is_zero() {
        assert_eq!(ItemRef::parse("9.msg44"), Some(ItemRef { id: 9, start: 0 }));
        assert_eq!(ItemRef::parse("9"), Some(ItemRef { id: 9, start: 0 }));
        assert_eq!(ItemRef::parse("x.1"), None);
    }

    #[test]
    fn offset_defaults_and_clamps() {
        let params = RequestParams::parse("start=-5");
        assert_eq!(params.offset("start"), 0);
        assert_eq!(params.offset("missing"), 0);
    }

    fn member_ctx(query: &str, token: Option<&str>) -> RequestContext {
        RequestContext::new(
            Actor::Member(MemberActor {
                id: 3,
                is_admin: false,
            }),
            RequestParams::parse(query),
            token.map(str::to_string),
        )
    }

    #[test]
    fn guest_is_rejected_by_member_gate() {
        let ctx = RequestContext::new(Actor::Guest, RequestParams::default(), None);
        assert_matches!(ctx.require_member(), Err(CoreError::Unauthorized(_)));
    }

    #[test]
    fn session_must_match() {
        assert!(member_ctx("sesc=abc", Some("abc")).require_session().is_ok());
        assert_matches!(
            member_ctx("sesc=abd", Some("abc")).require_session(),
            Err(CoreError::SessionInvalid)
        );
        assert_matches!(
            member_ctx("", Some("abc")).require_session(),
            Err(CoreError::SessionInvalid)
        );
        assert_matches!(
            member_ctx("sesc=", Some("")).require_session(),
            Err(CoreError::SessionInvalid)
        );
    }
}
