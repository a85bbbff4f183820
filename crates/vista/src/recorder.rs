//! Deferred-action recording.
//!
//! Some flows need to describe an ordered sequence of operations before
//! executing any of them — multi-step form interactions, scripted setup
//! runs. [`ActionRecorder`] accumulates method-name + argument pairs;
//! [`ActionRecorder::replay`] consumes the recorder, feeding each action to
//! the executor in recorded order, and returns the frozen list.

use crate::result::VistaResult;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One recorded method call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordedAction {
    /// Method name
    pub method: String,
    /// Call arguments
    pub args: Vec<Value>,
}

impl RecordedAction {
    /// Create a recorded action.
    #[must_use]
    pub fn new(method: impl Into<String>, args: Vec<Value>) -> Self {
        Self {
            method: method.into(),
            args,
        }
    }
}

/// Ordered recorder of deferred actions.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ActionRecorder {
    actions: Vec<RecordedAction>,
}

impl ActionRecorder {
    /// Create an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an action; returns the recorder for chaining.
    pub fn record(&mut self, method: impl Into<String>, args: Vec<Value>) -> &mut Self {
        self.actions.push(RecordedAction::new(method, args));
        self
    }

    /// The recorded actions so far, in order.
    #[must_use]
    pub fn actions(&self) -> &[RecordedAction] {
        &self.actions
    }

    /// Number of recorded actions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.actions.len()
    }

    /// Whether nothing has been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    /// Feed every action to `executor`, one at a time in recorded order.
    ///
    /// Consumes the recorder; the returned list is the immutable record of
    /// what was replayed. An executor failure stops the replay and
    /// propagates.
    pub fn replay(
        self,
        mut executor: impl FnMut(&RecordedAction) -> VistaResult<()>,
    ) -> VistaResult<Vec<RecordedAction>> {
        for action in &self.actions {
            executor(action)?;
        }
        Ok(self.actions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::result::VistaError;
    use serde_json::json;

    mod recording_tests {
        use super::*;

        #[test]
        fn test_actions_accumulate_in_order() {
            let mut recorder = ActionRecorder::new();
            recorder
                .record("fill", vec![json!("#email"), json!("dev@example.com")])
                .record("click", vec![json!("#submit")]);

            assert_eq!(recorder.len(), 2);
            assert_eq!(recorder.actions()[0].method, "fill");
            assert_eq!(recorder.actions()[1].method, "click");
        }

        #[test]
        fn test_new_recorder_is_empty() {
            assert!(ActionRecorder::new().is_empty());
        }
    }

    mod replay_tests {
        use super::*;

        #[test]
        fn test_replay_executes_in_recorded_order() {
            let mut recorder = ActionRecorder::new();
            recorder.record("first", vec![]).record("second", vec![json!(2)]);

            let mut seen = Vec::new();
            let frozen = recorder
                .replay(|action| {
                    seen.push(action.method.clone());
                    Ok(())
                })
                .unwrap();

            assert_eq!(seen, vec!["first", "second"]);
            assert_eq!(frozen.len(), 2);
            assert_eq!(frozen[1].args, vec![json!(2)]);
        }

        #[test]
        fn test_executor_failure_stops_the_replay() {
            let mut recorder = ActionRecorder::new();
            recorder
                .record("ok", vec![])
                .record("boom", vec![])
                .record("never", vec![]);

            let mut seen = Vec::new();
            let err = recorder
                .replay(|action| {
                    seen.push(action.method.clone());
                    if action.method == "boom" {
                        Err(VistaError::driver("executor exploded"))
                    } else {
                        Ok(())
                    }
                })
                .unwrap_err();

            assert!(matches!(err, VistaError::Driver { .. }));
            assert_eq!(seen, vec!["ok", "boom"]);
        }

        #[test]
        fn test_replay_of_empty_recorder_is_a_no_op() {
            let frozen = ActionRecorder::new().replay(|_| Ok(())).unwrap();
            assert!(frozen.is_empty());
        }
    }
}
