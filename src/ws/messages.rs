//! Inbound command classification.
//!
//! Client control messages are parsed to a raw JSON value first, then
//! classified into a closed set of commands. Anything that is valid
//! JSON but not a recognized command shape — unknown `type`, missing or
//! non-integer `matchId` — is [`ClientCommand::Ignored`]: no reply, no
//! state change. This permissive default is intended behavior, kept for
//! protocol evolution; only unparseable bytes get an error reply, and
//! that asymmetry is deliberate.

use serde_json::Value;

use crate::domain::MatchId;

/// A classified inbound control message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientCommand {
    /// `{"type":"subscribe","matchId":n}` — follow a match.
    Subscribe(MatchId),
    /// `{"type":"unsubscribe","matchId":n}` — stop following a match.
    Unsubscribe(MatchId),
    /// Any other shape; dropped without a reply.
    Ignored,
}

impl ClientCommand {
    /// Classifies a parsed JSON document.
    ///
    /// `matchId` must be an integer representable as `u64`; floats,
    /// negatives, and strings do not qualify. No bound or existence
    /// check beyond that — subscribing to a match nobody has created is
    /// valid and simply creates the topic.
    #[must_use]
    pub fn classify(value: &Value) -> Self {
        let kind = value.get("type").and_then(Value::as_str);
        let match_id = value.get("matchId").and_then(Value::as_u64).map(MatchId::new);
        match (kind, match_id) {
            (Some("subscribe"), Some(id)) => Self::Subscribe(id),
            (Some("unsubscribe"), Some(id)) => Self::Unsubscribe(id),
            _ => Self::Ignored,
        }
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn subscribe_with_integer_id() {
        let cmd = ClientCommand::classify(&json!({"type": "subscribe", "matchId": 42}));
        assert_eq!(cmd, ClientCommand::Subscribe(MatchId::new(42)));
    }

    #[test]
    fn unsubscribe_with_integer_id() {
        let cmd = ClientCommand::classify(&json!({"type": "unsubscribe", "matchId": 7}));
        assert_eq!(cmd, ClientCommand::Unsubscribe(MatchId::new(7)));
    }

    #[test]
    fn string_match_id_is_ignored() {
        let cmd = ClientCommand::classify(&json!({"type": "subscribe", "matchId": "x"}));
        assert_eq!(cmd, ClientCommand::Ignored);
    }

    #[test]
    fn fractional_match_id_is_ignored() {
        let cmd = ClientCommand::classify(&json!({"type": "subscribe", "matchId": 4.5}));
        assert_eq!(cmd, ClientCommand::Ignored);
    }

    #[test]
    fn negative_match_id_is_ignored() {
        let cmd = ClientCommand::classify(&json!({"type": "subscribe", "matchId": -1}));
        assert_eq!(cmd, ClientCommand::Ignored);
    }

    #[test]
    fn missing_match_id_is_ignored() {
        let cmd = ClientCommand::classify(&json!({"type": "subscribe"}));
        assert_eq!(cmd, ClientCommand::Ignored);
    }

    #[test]
    fn unknown_type_is_ignored() {
        let cmd = ClientCommand::classify(&json!({"type": "shout", "matchId": 1}));
        assert_eq!(cmd, ClientCommand::Ignored);
    }

    #[test]
    fn non_object_is_ignored() {
        assert_eq!(ClientCommand::classify(&json!([1, 2, 3])), ClientCommand::Ignored);
        assert_eq!(ClientCommand::classify(&json!(null)), ClientCommand::Ignored);
    }
}
