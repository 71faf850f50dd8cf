use crate::action::Action;

/// Errors from parsing an input script.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ScriptError {
    #[error("entry {0:?} is not of the form <seconds>:<action>")]
    Malformed(String),
    #[error("invalid time {0:?}")]
    InvalidTime(String),
    #[error("unknown action {0:?}")]
    UnknownAction(String),
}

/// An action scheduled at a point in run time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScriptedAction {
    pub at: f32,
    pub action: Action,
}

/// A timeline of actions for headless runs, e.g. `"0.5:left,1.2:right,4:restart"`.
///
/// Entries are sorted by time; [`InputScript::due`] hands out each one once.
#[derive(Debug, Clone, Default)]
pub struct InputScript {
    entries: Vec<ScriptedAction>,
    cursor: usize,
}

impl InputScript {
    pub fn parse(source: &str) -> Result<Self, ScriptError> {
        let mut entries = Vec::new();
        for raw in source.split(',').map(str::trim).filter(|s| !s.is_empty()) {
            let (time, name) = raw
                .split_once(':')
                .ok_or_else(|| ScriptError::Malformed(raw.to_string()))?;
            let at: f32 = time
                .trim()
                .parse()
                .map_err(|_| ScriptError::InvalidTime(time.to_string()))?;
            if !at.is_finite() || at < 0.0 {
                return Err(ScriptError::InvalidTime(time.to_string()));
            }
            let action =
                Action::from_name(name).ok_or_else(|| ScriptError::UnknownAction(name.to_string()))?;
            entries.push(ScriptedAction { at, action });
        }
        entries.sort_by(|a, b| a.at.total_cmp(&b.at));
        tracing::debug!(entries = entries.len(), "parsed input script");
        Ok(Self { entries, cursor: 0 })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries not yet handed out.
    pub fn remaining(&self) -> usize {
        self.entries.len() - self.cursor
    }

    /// Actions scheduled at or before `now` that have not been returned yet.
    pub fn due(&mut self, now: f32) -> Vec<Action> {
        let start = self.cursor;
        while self.cursor < self.entries.len() && self.entries[self.cursor].at <= now {
            self.cursor += 1;
        }
        self.entries[start..self.cursor]
            .iter()
            .map(|e| e.action)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_and_sorts() {
        let script = InputScript::parse("2:right, 0.5:left ,4:restart").unwrap();
        assert_eq!(script.len(), 3);
        assert_eq!(script.entries[0].action, Action::MoveLaneLeft);
        assert_eq!(script.entries[2].action, Action::Restart);
    }

    #[test]
    fn empty_script() {
        let script = InputScript::parse("").unwrap();
        assert!(script.is_empty());
    }

    #[test]
    fn due_hands_out_each_entry_once() {
        let mut script = InputScript::parse("0.5:left,1.0:right,1.0:center").unwrap();
        assert!(script.due(0.4).is_empty());
        assert_eq!(script.due(0.6), vec![Action::MoveLaneLeft]);
        assert_eq!(
            script.due(1.0),
            vec![Action::MoveLaneRight, Action::SetLaneCenter]
        );
        assert!(script.due(10.0).is_empty());
        assert_eq!(script.remaining(), 0);
    }

    #[test]
    fn rejects_bad_entries() {
        assert_eq!(
            InputScript::parse("left").unwrap_err(),
            ScriptError::Malformed("left".into())
        );
        assert_eq!(
            InputScript::parse("soon:left").unwrap_err(),
            ScriptError::InvalidTime("soon".into())
        );
        assert!(matches!(
            InputScript::parse("-1:left"),
            Err(ScriptError::InvalidTime(_))
        ));
        assert_eq!(
            InputScript::parse("1:jump").unwrap_err(),
            ScriptError::UnknownAction("jump".into())
        );
    }
}
