//! Click event model for asynchronous click recording.

use chrono::{DateTime, Utc};
use uuid::Uuid;

/// A redirect that has been accepted and awaits recording.
///
/// Created by the redirect path after the destination is decided, sent through
/// a bounded channel, and consumed by
/// [`crate::application::click_worker::run_click_worker`]. The timestamp is
/// assigned by the server at acceptance, never taken from the client.
#[derive(Debug, Clone, PartialEq)]
pub struct ClickEvent {
    pub link_id: Uuid,
    pub client_address: String,
    pub user_agent: Option<String>,
    pub referrer: Option<String>,
    pub session_id: Option<String>,
    pub received_at: DateTime<Utc>,
}

impl ClickEvent {
    /// Creates an event stamped with the current time.
    ///
    /// Blank header values are treated as absent.
    pub fn new(
        link_id: Uuid,
        client_address: String,
        user_agent: Option<&str>,
        referrer: Option<&str>,
        session_id: Option<&str>,
    ) -> Self {
        Self {
            link_id,
            client_address,
            user_agent: non_blank(user_agent),
            referrer: non_blank(referrer),
            session_id: non_blank(session_id),
            received_at: Utc::now(),
        }
    }
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_click_event_creation_full() {
        let link_id = Uuid::new_v4();
        let before = Utc::now();
        let event = ClickEvent::new(
            link_id,
            "203.0.113.5".to_string(),
            Some("Mozilla/5.0"),
            Some("https://google.com"),
            Some("sess1"),
        );

        assert_eq!(event.link_id, link_id);
        assert_eq!(event.client_address, "203.0.113.5");
        assert_eq!(event.user_agent.as_deref(), Some("Mozilla/5.0"));
        assert_eq!(event.referrer.as_deref(), Some("https://google.com"));
        assert_eq!(event.session_id.as_deref(), Some("sess1"));
        assert!(event.received_at >= before);
    }

    #[test]
    fn test_click_event_blank_headers_are_absent() {
        let event = ClickEvent::new(
            Uuid::new_v4(),
            "10.0.0.1".to_string(),
            Some("  "),
            Some(""),
            None,
        );

        assert!(event.user_agent.is_none());
        assert!(event.referrer.is_none());
        assert!(event.session_id.is_none());
    }
}
