//! Create/edit mode of a resource form.
//!
//! The form has exactly one active submit handler at any time. [`Mode`] names
//! it and [`ModeController::install`] is the only way to swap it, so a stale
//! edit handler can never survive next to a create handler.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::domain::record::RecordId;

/// What a form submission does.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "mode", content = "id", rename_all = "snake_case")]
pub enum Mode {
    /// Submitting creates a new record.
    #[default]
    Create,
    /// Submitting updates the record with this id.
    Edit(RecordId),
}

/// Holder of the single active [`Mode`].
///
/// # Examples
/// ```
/// use hotel_desk::domain::{Mode, ModeController, RecordId};
///
/// let mut controller = ModeController::default();
/// let id = RecordId::new("65f0a1").expect("valid id");
/// controller.activate_edit(id.clone());
/// assert_eq!(controller.editing(), Some(&id));
/// controller.activate_create();
/// assert_eq!(controller.mode(), &Mode::Create);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ModeController {
    active: Mode,
}

impl ModeController {
    /// Resume from a previously stored mode.
    #[must_use]
    pub fn from_mode(mode: Mode) -> Self {
        Self { active: mode }
    }

    /// Currently installed mode.
    #[must_use]
    pub fn mode(&self) -> &Mode {
        &self.active
    }

    /// Id of the record being edited, if any.
    #[must_use]
    pub fn editing(&self) -> Option<&RecordId> {
        match &self.active {
            Mode::Create => None,
            Mode::Edit(id) => Some(id),
        }
    }

    /// Replace the active handler, returning the one that was removed.
    pub fn install(&mut self, mode: Mode) -> Mode {
        let previous = std::mem::replace(&mut self.active, mode);
        if previous != self.active {
            debug!(from = ?previous, to = ?self.active, "form mode changed");
        }
        previous
    }

    /// Return to create mode.
    pub fn activate_create(&mut self) -> Mode {
        self.install(Mode::Create)
    }

    /// Switch to editing `id`, replacing any other edit in progress.
    pub fn activate_edit(&mut self, id: RecordId) -> Mode {
        self.install(Mode::Edit(id))
    }

    /// Consume the controller, yielding the mode to persist.
    #[must_use]
    pub fn into_mode(self) -> Mode {
        self.active
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(raw: &str) -> RecordId {
        RecordId::new(raw).expect("valid id")
    }

    #[test]
    fn starts_in_create_mode() {
        let controller = ModeController::default();
        assert_eq!(controller.mode(), &Mode::Create);
        assert!(controller.editing().is_none());
    }

    #[test]
    fn reentering_edit_replaces_previous_target() {
        let mut controller = ModeController::default();
        controller.activate_edit(id("first"));
        let removed = controller.activate_edit(id("second"));
        assert_eq!(removed, Mode::Edit(id("first")));
        assert_eq!(controller.editing(), Some(&id("second")));
    }

    #[test]
    fn activate_create_removes_edit_handler() {
        let mut controller = ModeController::from_mode(Mode::Edit(id("first")));
        let removed = controller.activate_create();
        assert_eq!(removed, Mode::Edit(id("first")));
        assert_eq!(controller.into_mode(), Mode::Create);
    }

    #[test]
    fn stored_shape_is_tagged() {
        let stored = serde_json::to_value(Mode::Edit(id("abc"))).expect("serialise");
        assert_eq!(stored, serde_json::json!({ "mode": "edit", "id": "abc" }));
        let create: Mode =
            serde_json::from_value(serde_json::json!({ "mode": "create" })).expect("deserialise");
        assert_eq!(create, Mode::Create);
    }
}
