use serde::{Deserialize, Serialize};
use std::fmt;

use crate::StateIdentity;

/// One of the five steps of a turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Retrieve,
    Describe,
    Prompt,
    Interpret,
    Store,
}

impl Stage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Retrieve => "retrieve",
            Stage::Describe => "describe",
            Stage::Prompt => "prompt",
            Stage::Interpret => "interpret",
            Stage::Store => "store",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Progress events emitted by [`LoopRunner`](crate::LoopRunner).
///
/// Turns are numbered from 1.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum LoopEvent {
    LoopStarted {
        #[serde(with = "lossy_identity")]
        identity: StateIdentity,
    },
    TurnStarted {
        turn: usize,
    },
    StateRetrieved {
        turn: usize,
        state_len: usize,
    },
    StateDescribed {
        turn: usize,
        description_len: usize,
    },
    ResponseReceived {
        turn: usize,
        response_len: usize,
    },
    StateInterpreted {
        turn: usize,
        state_len: usize,
        continue_loop: bool,
    },
    StateStored {
        turn: usize,
    },
    LoopStopped {
        turns: usize,
        duration_secs: f64,
    },
    /// A collaborator failed; the run ends with its error
    LoopFailed {
        turn: usize,
        stage: Stage,
        error: String,
        duration_secs: f64,
    },
}

impl LoopEvent {
    /// Turn the event belongs to, if any
    pub fn turn(&self) -> Option<usize> {
        match self {
            LoopEvent::LoopStarted { .. } | LoopEvent::LoopStopped { .. } => None,
            LoopEvent::TurnStarted { turn }
            | LoopEvent::StateRetrieved { turn, .. }
            | LoopEvent::StateDescribed { turn, .. }
            | LoopEvent::ResponseReceived { turn, .. }
            | LoopEvent::StateInterpreted { turn, .. }
            | LoopEvent::StateStored { turn }
            | LoopEvent::LoopFailed { turn, .. } => Some(*turn),
        }
    }
}

/// Identities appear in event streams as lossy UTF-8 text
mod lossy_identity {
    use serde::{Deserialize, Deserializer, Serializer};

    use crate::StateIdentity;

    pub fn serialize<S: Serializer>(
        identity: &StateIdentity,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&identity.to_string_lossy())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<StateIdentity, D::Error> {
        String::deserialize(deserializer).map(StateIdentity::from)
    }
}

/// Receives [`LoopEvent`]s as a run progresses.
///
/// Observation cannot fail and cannot steer the loop.
pub trait LoopObserver: Send + Sync {
    fn observe(&self, event: &LoopEvent);
}

/// Observer that discards every event
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl LoopObserver for NoopObserver {
    fn observe(&self, _event: &LoopEvent) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_serializes_with_tag() {
        let event = LoopEvent::LoopFailed {
            turn: 2,
            stage: Stage::Interpret,
            error: "womp womp".into(),
            duration_secs: 0.5,
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["event"], "loop_failed");
        assert_eq!(json["stage"], "interpret");
        assert_eq!(json["turn"], 2);
    }

    #[test]
    fn test_loop_started_identity_is_text() {
        let event = LoopEvent::LoopStarted {
            identity: "missing".into(),
        };
        let json = serde_json::to_string(&event).unwrap();
        assert_eq!(json, r#"{"event":"loop_started","identity":"missing"}"#);

        let back: LoopEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(back, event);
    }

    #[test]
    fn test_non_utf8_identity_is_replaced_in_events() {
        let event = LoopEvent::LoopStarted {
            identity: StateIdentity::new(vec![b's', 0xff]),
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["identity"], "s\u{fffd}");
    }

    #[test]
    fn test_turn_accessor() {
        assert_eq!(LoopEvent::TurnStarted { turn: 3 }.turn(), Some(3));
        assert_eq!(
            LoopEvent::LoopStopped {
                turns: 3,
                duration_secs: 1.0
            }
            .turn(),
            None
        );
    }

    #[test]
    fn test_stage_display() {
        assert_eq!(Stage::Store.to_string(), "store");
    }
}
