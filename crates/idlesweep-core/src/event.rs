//! Typed alarm invocation payload for metric-triggered sweeps.
//!
//! The alarm-state-change event is parsed into an explicit structure at the
//! boundary. Missing or unknown fields fail fast with a descriptive error;
//! nothing downstream does raw key lookups on a dynamic payload.

use serde::Deserialize;

use crate::error::{Error, Result};

/// State reported by the alarm at the time the event fired.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AlarmState {
    Alarm,
    Ok,
    InsufficientData,
}

/// An alarm-state-change event, the Mode B invocation request.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AlarmEvent {
    /// Event source, e.g. "metrics.alarm".
    pub source: String,
    pub detail_type: String,
    /// Region the alarm fired in; logged for correlation.
    pub region: String,
    pub detail: AlarmDetail,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AlarmDetail {
    pub alarm_name: String,
    pub state: AlarmState,
}

impl AlarmEvent {
    /// Parse and validate an event payload.
    pub fn parse(payload: &str) -> Result<Self> {
        serde_json::from_str(payload).map_err(|e| Error::InvalidEvent(e.to_string()))
    }

    /// Whether this event should trigger a sweep. A transition back to OK or
    /// an insufficient-data notification is a logged no-op.
    pub fn is_firing(&self) -> bool {
        self.detail.state == AlarmState::Alarm
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FIRING: &str = r#"{
        "source": "metrics.alarm",
        "detail_type": "Alarm State Change",
        "region": "eu-west-1",
        "detail": {
            "alarm_name": "idle-timeout",
            "state": "ALARM"
        }
    }"#;

    #[test]
    fn test_firing_event_parses() {
        let event = AlarmEvent::parse(FIRING).unwrap();
        assert_eq!(event.region, "eu-west-1");
        assert_eq!(event.detail.alarm_name, "idle-timeout");
        assert!(event.is_firing());
    }

    #[test]
    fn test_ok_state_is_not_firing() {
        let payload = FIRING.replace("ALARM", "OK");
        let event = AlarmEvent::parse(&payload).unwrap();
        assert!(!event.is_firing());
    }

    #[test]
    fn test_missing_field_fails_with_descriptive_error() {
        let payload = r#"{
            "source": "metrics.alarm",
            "detail_type": "Alarm State Change",
            "detail": {"alarm_name": "idle-timeout", "state": "ALARM"}
        }"#;
        let err = AlarmEvent::parse(payload).unwrap_err();
        match err {
            Error::InvalidEvent(msg) => assert!(msg.contains("region"), "got: {}", msg),
            other => panic!("expected InvalidEvent, got {:?}", other),
        }
    }

    #[test]
    fn test_unknown_field_fails() {
        let payload = FIRING.replace(
            "\"region\": \"eu-west-1\",",
            "\"region\": \"eu-west-1\", \"surprise\": 1,",
        );
        assert!(AlarmEvent::parse(&payload).is_err());
    }

    #[test]
    fn test_unknown_state_fails() {
        let payload = FIRING.replace("ALARM", "EXPLODED");
        assert!(AlarmEvent::parse(&payload).is_err());
    }
}
