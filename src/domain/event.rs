//! Server-originated events and their wire shapes.
//!
//! Every outbound frame is one [`ServerEvent`] serialized to a JSON
//! document with a `type` discriminator. The discriminator strings and
//! field names are the wire protocol — clients match on them verbatim,
//! so the serde renames here must not change casually.

use serde::Serialize;

use super::MatchId;

/// Tagged payload sent from the server to a client.
///
/// Match and commentary payloads are opaque to this layer; they are
/// produced by external collaborators and carried as raw JSON values.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type")]
pub enum ServerEvent {
    /// Sent once on every successful admission.
    #[serde(rename = "welcome")]
    Welcome,

    /// A new match was created; fanned out to all connected clients.
    #[serde(rename = "match_created")]
    MatchCreated {
        /// The match object, as produced by the match collaborator.
        data: serde_json::Value,
    },

    /// A commentary entry for one match; fanned out to its subscribers.
    #[serde(rename = "Commentary")]
    Commentary {
        /// The comment object, as produced by the commentary collaborator.
        data: serde_json::Value,
    },

    /// Acknowledges a successful subscribe command.
    #[serde(rename = "Subscribed")]
    Subscribed {
        /// Echo of the subscribed match id.
        #[serde(rename = "matchId")]
        match_id: MatchId,
    },

    /// Acknowledges a successful unsubscribe command.
    #[serde(rename = "Unsubscribed")]
    Unsubscribed {
        /// Echo of the unsubscribed match id.
        #[serde(rename = "matchId")]
        match_id: MatchId,
    },

    /// Reply to an inbound frame that could not be parsed.
    #[serde(rename = "error")]
    Error {
        /// Human-readable description of the problem.
        message: String,
    },
}

impl ServerEvent {
    /// Serializes the event to its JSON wire form.
    ///
    /// Serialization of these shapes cannot fail in practice; an empty
    /// string is returned on the impossible path rather than panicking.
    #[must_use]
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn welcome_has_only_type() {
        assert_eq!(ServerEvent::Welcome.to_json(), r#"{"type":"welcome"}"#);
    }

    #[test]
    fn subscribed_echoes_match_id() {
        let event = ServerEvent::Subscribed {
            match_id: MatchId::new(42),
        };
        assert_eq!(event.to_json(), r#"{"type":"Subscribed","matchId":42}"#);
    }

    #[test]
    fn unsubscribed_echoes_match_id() {
        let event = ServerEvent::Unsubscribed {
            match_id: MatchId::new(7),
        };
        assert_eq!(event.to_json(), r#"{"type":"Unsubscribed","matchId":7}"#);
    }

    #[test]
    fn match_created_wraps_data() {
        let event = ServerEvent::MatchCreated {
            data: json!({"id": 9, "home": "A", "away": "B"}),
        };
        let value: serde_json::Value =
            serde_json::from_str(&event.to_json()).unwrap_or_default();
        assert_eq!(value.get("type").and_then(|v| v.as_str()), Some("match_created"));
        assert_eq!(
            value.get("data").and_then(|d| d.get("id")).and_then(|v| v.as_u64()),
            Some(9)
        );
    }

    #[test]
    fn commentary_keeps_capitalized_discriminator() {
        let event = ServerEvent::Commentary {
            data: json!({"text": "goal!"}),
        };
        assert!(event.to_json().contains(r#""type":"Commentary""#));
    }

    #[test]
    fn error_carries_message() {
        let event = ServerEvent::Error {
            message: "Invalid JSON".to_string(),
        };
        assert_eq!(
            event.to_json(),
            r#"{"type":"error","message":"Invalid JSON"}"#
        );
    }
}
