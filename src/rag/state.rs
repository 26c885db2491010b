//! Per-question pipeline state machine
//!
//! Idle → Searching → Retrieving → Assembling → Generating → Done, with
//! Failed reachable from every non-terminal state.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Pipeline states
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PipelineState {
    Idle,
    Searching,
    Retrieving,
    Assembling,
    Generating,
    /// Answer produced (terminal)
    Done,
    /// Question abandoned (terminal)
    Failed,
}

/// Events that move the pipeline forward
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StateEvent {
    Start,
    TitlesReady,
    ContentsReady,
    ContextReady,
    AnswerReady,
    Fail,
}

/// Rejected transition
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidTransition {
    pub from: PipelineState,
    pub event: StateEvent,
}

impl fmt::Display for InvalidTransition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "no transition from {:?} on {:?}", self.from, self.event)
    }
}

impl std::error::Error for InvalidTransition {}

impl PipelineState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, PipelineState::Done | PipelineState::Failed)
    }

    /// Transition function; terminal states accept no events
    pub fn transition(&self, event: StateEvent) -> Result<PipelineState, InvalidTransition> {
        use PipelineState::*;
        use StateEvent::*;

        let next = match (self, event) {
            (Idle, Start) => Searching,
            (Searching, TitlesReady) => Retrieving,
            (Retrieving, ContentsReady) => Assembling,
            (Assembling, ContextReady) => Generating,
            (Generating, AnswerReady) => Done,
            (from, Fail) if !from.is_terminal() => Failed,
            (from, event) => {
                return Err(InvalidTransition { from: *from, event });
            }
        };

        Ok(next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_happy_path() {
        let mut state = PipelineState::Idle;
        for event in [
            StateEvent::Start,
            StateEvent::TitlesReady,
            StateEvent::ContentsReady,
            StateEvent::ContextReady,
            StateEvent::AnswerReady,
        ] {
            state = state.transition(event).unwrap();
        }
        assert_eq!(state, PipelineState::Done);
        assert!(state.is_terminal());
    }

    #[test]
    fn test_fail_from_any_active_state() {
        for state in [
            PipelineState::Idle,
            PipelineState::Searching,
            PipelineState::Retrieving,
            PipelineState::Assembling,
            PipelineState::Generating,
        ] {
            assert_eq!(state.transition(StateEvent::Fail).unwrap(), PipelineState::Failed);
        }
    }

    #[test]
    fn test_terminal_states_reject_events() {
        assert!(PipelineState::Done.transition(StateEvent::Fail).is_err());
        assert!(PipelineState::Failed.transition(StateEvent::Start).is_err());
    }

    #[test]
    fn test_cannot_skip_stages() {
        let err = PipelineState::Searching
            .transition(StateEvent::ContextReady)
            .unwrap_err();
        assert_eq!(err.from, PipelineState::Searching);
        assert!(err.to_string().contains("Searching"));
    }
}
