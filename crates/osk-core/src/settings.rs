//! Staged edits to school-wide settings.

use osk_domain::{
    new_id, AppState, CourseCategory, CoursePrices, Instructor, OperatingHours, TimeOfDay,
    DEFAULT_INSTRUCTOR_COLOR,
};

use crate::{CoreError, CoreResult};

pub const MSG_INSTRUCTOR_NAME_REQUIRED: &str = "Proszę podać imię i nazwisko instruktora.";

#[derive(Debug, Clone, PartialEq)]
struct SettingsValues {
    app_title: String,
    course_prices: CoursePrices,
    instructors: Vec<Instructor>,
    operating_hours: OperatingHours,
    default_advance_amount: f64,
}

impl SettingsValues {
    fn capture(state: &AppState) -> Self {
        Self {
            app_title: state.app_title.clone(),
            course_prices: state.course_prices,
            instructors: state.instructors.clone(),
            operating_hours: state.operating_hours,
            default_advance_amount: state.default_advance_amount,
        }
    }
}

/// Pending settings changes. Nothing reaches the state until [`SettingsDraft::save`].
#[derive(Debug, Clone)]
pub struct SettingsDraft {
    baseline: SettingsValues,
    pending: SettingsValues,
}

impl SettingsDraft {
    pub fn from_state(state: &AppState) -> Self {
        let baseline = SettingsValues::capture(state);
        Self {
            pending: baseline.clone(),
            baseline,
        }
    }

    pub fn has_changes(&self) -> bool {
        self.pending != self.baseline
    }

    pub fn app_title(&self) -> &str {
        &self.pending.app_title
    }

    pub fn course_prices(&self) -> &CoursePrices {
        &self.pending.course_prices
    }

    pub fn instructors(&self) -> &[Instructor] {
        &self.pending.instructors
    }

    pub fn operating_hours(&self) -> &OperatingHours {
        &self.pending.operating_hours
    }

    pub fn default_advance_amount(&self) -> f64 {
        self.pending.default_advance_amount
    }

    pub fn set_app_title(&mut self, title: impl Into<String>) {
        self.pending.app_title = title.into();
    }

    pub fn set_price(&mut self, category: CourseCategory, price: f64) -> CoreResult<()> {
        if !price.is_finite() || price < 0.0 {
            return Err(CoreError::validation("Cena kursu nie może być ujemna."));
        }
        self.pending.course_prices.set(category, price);
        Ok(())
    }

    pub fn set_operating_hours(&mut self, start: TimeOfDay, end: TimeOfDay) {
        self.pending.operating_hours = OperatingHours { start, end };
    }

    pub fn set_default_advance(&mut self, amount: f64) -> CoreResult<()> {
        if !amount.is_finite() || amount < 0.0 {
            return Err(CoreError::validation("Kwota zaliczki nie może być ujemna."));
        }
        self.pending.default_advance_amount = amount;
        Ok(())
    }

    /// Stages a new instructor and returns the generated id.
    pub fn add_instructor(&mut self, name: &str, color: Option<&str>) -> CoreResult<String> {
        let name = name.trim();
        if name.is_empty() {
            return Err(CoreError::validation(MSG_INSTRUCTOR_NAME_REQUIRED));
        }
        let id = format!("inst-{}", new_id());
        self.pending.instructors.push(Instructor::new(
            id.clone(),
            name,
            color.unwrap_or(DEFAULT_INSTRUCTOR_COLOR),
        ));
        Ok(id)
    }

    /// Stages removal of an instructor. Existing schedule entries keep the dangling id.
    pub fn remove_instructor(&mut self, instructor_id: &str) -> CoreResult<Instructor> {
        let position = self
            .pending
            .instructors
            .iter()
            .position(|instructor| instructor.id == instructor_id)
            .ok_or_else(|| CoreError::InstructorNotFound(instructor_id.into()))?;
        Ok(self.pending.instructors.remove(position))
    }

    /// Writes the pending values into the state; the draft becomes clean.
    pub fn save(&mut self, state: &mut AppState) {
        let values = self.pending.clone();
        state.app_title = values.app_title;
        state.course_prices = values.course_prices;
        state.instructors = values.instructors;
        state.operating_hours = values.operating_hours;
        state.default_advance_amount = values.default_advance_amount;
        self.baseline = self.pending.clone();
        tracing::info!("settings saved");
    }

    /// Drops pending edits.
    pub fn cancel(&mut self) {
        self.pending = self.baseline.clone();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn edits_toggle_change_flag() {
        let state = AppState::default();
        let mut draft = SettingsDraft::from_state(&state);
        assert!(!draft.has_changes());
        draft.set_app_title("Nowa nazwa");
        assert!(draft.has_changes());
        draft.set_app_title(state.app_title.clone());
        assert!(!draft.has_changes());
    }

    #[test]
    fn save_applies_and_cancel_reverts() {
        let mut state = AppState::default();
        let mut draft = SettingsDraft::from_state(&state);
        draft.set_price(CourseCategory::A, 3000.0).unwrap();
        let id = draft.add_instructor("  Marek Zając ", None).unwrap();
        assert!(id.starts_with("inst-"));
        draft.save(&mut state);
        assert!(!draft.has_changes());
        assert_eq!(state.course_prices.a, 3000.0);
        assert_eq!(state.instructors.len(), 5);
        assert_eq!(state.instructors[4].name, "Marek Zając");

        draft.remove_instructor("inst1").unwrap();
        draft.set_default_advance(500.0).unwrap();
        draft.cancel();
        assert!(!draft.has_changes());
        assert_eq!(draft.instructors().len(), 5);
        assert_eq!(state.default_advance_amount, 300.0);
    }

    #[test]
    fn instructor_name_is_required() {
        let mut draft = SettingsDraft::from_state(&AppState::default());
        let err = draft.add_instructor("   ", None).unwrap_err();
        assert_eq!(err.to_string(), MSG_INSTRUCTOR_NAME_REQUIRED);
        assert!(draft.set_price(CourseCategory::B, -1.0).is_err());
    }
}
