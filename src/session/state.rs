use serde_json::{Value, json};

/// Field holding the engine name inside the persisted record.
pub const SELECTED_ENGINE_FIELD: &str = "SelectedEngine";

/// Selection that survives restarts.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionState {
    selected_engine: String,
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn selected_engine(&self) -> &str {
        &self.selected_engine
    }

    pub fn set_selected_engine(&mut self, name: impl Into<String>) {
        self.selected_engine = name.into();
    }

    pub fn to_value(&self) -> Value {
        json!({ SELECTED_ENGINE_FIELD: self.selected_engine })
    }

    /// Adopt the selection stored in `record`. Anything other than an object
    /// with a string field leaves the current selection as it was. Returns
    /// whether a name was adopted.
    pub fn apply(&mut self, record: &Value) -> bool {
        match record
            .as_object()
            .and_then(|object| object.get(SELECTED_ENGINE_FIELD))
            .and_then(Value::as_str)
        {
            Some(name) => {
                self.selected_engine = name.to_string();
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_shape() {
        let mut state = SessionState::new();
        assert_eq!(state.to_value(), json!({ "SelectedEngine": "" }));
        state.set_selected_engine("Mixer");
        assert_eq!(
            serde_json::to_string(&state.to_value()).unwrap(),
            r#"{"SelectedEngine":"Mixer"}"#
        );
    }

    #[test]
    fn apply_is_permissive() {
        let mut state = SessionState::new();
        state.set_selected_engine("Drums");

        assert!(!state.apply(&Value::Null));
        assert!(!state.apply(&json!(["Synth"])));
        assert!(!state.apply(&json!({ "Other": "Synth" })));
        assert!(!state.apply(&json!({ "SelectedEngine": 4 })));
        assert_eq!(state.selected_engine(), "Drums");

        assert!(state.apply(&json!({ "SelectedEngine": "Synth", "extra": true })));
        assert_eq!(state.selected_engine(), "Synth");
    }
}
