use std::{
    fs,
    path::{Path, PathBuf},
};

use chrono::{NaiveDate, NaiveDateTime};
use osk_core::{
    fill_student_from_text, schedule_report, state_warnings, students_report, BookingRequest,
    Clock, CoreError, CoreResult, CourseDraft, CourseService, DateSelection, ExportDocument,
    ExportFormat, ExportPeriod, InstructorFilter, LabeledTextExtractor, PlanRequest,
    ReservationForm, ReservationService, ScheduleService, SettingsDraft, StateStorage,
    StudentExtractor,
};
use osk_domain::{AppState, Course, EntryPatch, Reservation, ScheduleEntry, Student};

/// How the state was obtained at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOutcome {
    Loaded,
    /// Nothing stored yet; seeded defaults are in use.
    Fresh,
    /// The store could not be read; seeded defaults are in use.
    Recovered(String),
}

/// Owns the application state and writes it back after every mutation.
///
/// A failed write is logged and remembered; the in-memory state stays
/// authoritative and the next successful write catches the store up.
pub struct AppManager {
    state: AppState,
    storage: Box<dyn StateStorage>,
    clock: Box<dyn Clock>,
    extractor: Box<dyn StudentExtractor>,
    settings: Option<SettingsDraft>,
    outcome: LoadOutcome,
    warnings: Vec<String>,
    last_save_error: Option<String>,
}

impl AppManager {
    pub fn open(storage: Box<dyn StateStorage>, clock: Box<dyn Clock>) -> Self {
        let (state, outcome) = match storage.load() {
            Ok(Some(state)) => (state, LoadOutcome::Loaded),
            Ok(None) => {
                tracing::info!("no stored state, starting with defaults");
                (AppState::default(), LoadOutcome::Fresh)
            }
            Err(err) => {
                tracing::error!(error = %err, "stored state unreadable, starting with defaults");
                (AppState::default(), LoadOutcome::Recovered(err.to_string()))
            }
        };
        let warnings = state_warnings(&state);
        for warning in &warnings {
            tracing::warn!("{warning}");
        }
        Self {
            state,
            storage,
            clock,
            extractor: Box::new(LabeledTextExtractor),
            settings: None,
            outcome,
            warnings,
            last_save_error: None,
        }
    }

    pub fn with_extractor(mut self, extractor: Box<dyn StudentExtractor>) -> Self {
        self.extractor = extractor;
        self
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn outcome(&self) -> &LoadOutcome {
        &self.outcome
    }

    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    pub fn last_save_error(&self) -> Option<&str> {
        self.last_save_error.as_deref()
    }

    pub fn now(&self) -> NaiveDateTime {
        self.clock.now()
    }

    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }

    pub fn clock(&self) -> &dyn Clock {
        self.clock.as_ref()
    }

    /// Writes the current state. Failures are logged and kept for display.
    pub fn persist(&mut self) -> bool {
        match self.storage.save(&self.state) {
            Ok(()) => {
                self.last_save_error = None;
                true
            }
            Err(err) => {
                tracing::error!(error = %err, "failed to persist state");
                self.last_save_error = Some(err.to_string());
                false
            }
        }
    }

    fn mutate<T>(&mut self, apply: impl FnOnce(&mut AppState) -> CoreResult<T>) -> CoreResult<T> {
        let value = apply(&mut self.state)?;
        self.persist();
        Ok(value)
    }

    pub fn create_course(
        &mut self,
        draft: CourseDraft,
        selection: DateSelection,
    ) -> CoreResult<String> {
        self.mutate(|state| CourseService::create(state, draft, selection))
    }

    pub fn update_course(&mut self, course_id: &str, draft: CourseDraft) -> CoreResult<()> {
        self.mutate(|state| CourseService::update_details(state, course_id, draft))
    }

    pub fn update_course_dates(
        &mut self,
        course_id: &str,
        selection: DateSelection,
    ) -> CoreResult<()> {
        self.mutate(|state| CourseService::update_dates(state, course_id, selection))
    }

    pub fn delete_course(&mut self, course_id: &str) -> CoreResult<Course> {
        self.mutate(|state| CourseService::delete(state, course_id))
    }

    pub fn create_reservation(
        &mut self,
        form: ReservationForm,
        request: BookingRequest,
    ) -> CoreResult<String> {
        self.mutate(|state| ReservationService::create(state, form, request))
    }

    pub fn remove_reservation(&mut self, reservation_id: &str) -> CoreResult<Reservation> {
        self.mutate(|state| ReservationService::remove(state, reservation_id))
    }

    /// Fills `student` from pasted text. Nothing is persisted.
    pub fn fill_student(&self, text: &str, student: &mut Student) -> CoreResult<()> {
        fill_student_from_text(self.extractor.as_ref(), text, student)
    }

    pub fn plan_session(&mut self, request: PlanRequest) -> CoreResult<String> {
        self.mutate(|state| ScheduleService::plan(state, request))
    }

    pub fn update_session(&mut self, entry_id: &str, patch: &EntryPatch) -> CoreResult<()> {
        let date = ScheduleService::locate(&self.state, entry_id)?;
        self.mutate(|state| ScheduleService::update(state, date, entry_id, patch))
    }

    pub fn unplan_session(&mut self, entry_id: &str) -> CoreResult<ScheduleEntry> {
        let date = ScheduleService::locate(&self.state, entry_id)?;
        self.mutate(|state| ScheduleService::unplan(state, date, entry_id))
    }

    /// Open settings draft, created from the current state on first use.
    pub fn settings_draft(&mut self) -> &mut SettingsDraft {
        let state = &self.state;
        self.settings
            .get_or_insert_with(|| SettingsDraft::from_state(state))
    }

    pub fn has_unsaved_settings(&self) -> bool {
        self.settings
            .as_ref()
            .is_some_and(SettingsDraft::has_changes)
    }

    /// Applies the draft. Returns false when no draft was open.
    pub fn save_settings(&mut self) -> bool {
        let Some(mut draft) = self.settings.take() else {
            return false;
        };
        draft.save(&mut self.state);
        self.persist();
        true
    }

    pub fn cancel_settings(&mut self) {
        if let Some(mut draft) = self.settings.take() {
            draft.cancel();
            tracing::debug!("settings draft discarded");
        }
    }

    pub fn export_schedule(
        &self,
        filter: &InstructorFilter,
        period: ExportPeriod,
        format: ExportFormat,
    ) -> CoreResult<ExportDocument> {
        schedule_report(&self.state, filter, period, format, self.clock.as_ref())
    }

    pub fn export_students(
        &self,
        course_filter: Option<&str>,
        period: ExportPeriod,
        format: ExportFormat,
    ) -> CoreResult<ExportDocument> {
        students_report(&self.state, course_filter, period, format, self.clock.as_ref())
    }

    /// Writes a generated report into `directory` under its own file name.
    pub fn write_document(
        &self,
        document: &ExportDocument,
        directory: &Path,
    ) -> CoreResult<PathBuf> {
        fs::create_dir_all(directory)?;
        let path = directory.join(&document.filename);
        fs::write(&path, document.content.as_bytes())?;
        tracing::info!(path = %path.display(), "report written");
        Ok(path)
    }

    pub fn export_backup(&self, directory: &Path) -> CoreResult<PathBuf> {
        self.storage
            .export_backup(&self.state, directory, self.today())
    }

    /// Replaces the whole state with a backup file. A parse failure changes nothing.
    pub fn import_backup(&mut self, path: &Path) -> CoreResult<()> {
        if !path.exists() {
            return Err(CoreError::Storage(format!(
                "Nie znaleziono pliku: {}",
                path.display()
            )));
        }
        let imported = self.storage.import_from_path(path)?;
        self.warnings = state_warnings(&imported);
        self.state = imported;
        self.settings = None;
        tracing::info!(path = %path.display(), "state imported");
        self.persist();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use osk_core::{financial_summary, FixedClock};
    use osk_storage_json::JsonStateStore;
    use std::sync::{Arc, Mutex};
    use tempfile::tempdir;

    fn march(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, day).unwrap()
    }

    /// Storage that records saves and can be told to fail.
    #[derive(Clone, Default)]
    struct RecordingStorage {
        saves: Arc<Mutex<Vec<AppState>>>,
        fail: bool,
    }

    impl StateStorage for RecordingStorage {
        fn load(&self) -> CoreResult<Option<AppState>> {
            Ok(None)
        }

        fn save(&self, state: &AppState) -> CoreResult<()> {
            if self.fail {
                return Err(CoreError::Storage("disk full".into()));
            }
            self.saves.lock().unwrap().push(state.clone());
            Ok(())
        }

        fn export_backup(
            &self,
            _: &AppState,
            directory: &Path,
            _: NaiveDate,
        ) -> CoreResult<PathBuf> {
            Ok(directory.to_path_buf())
        }

        fn import_from_path(&self, _: &Path) -> CoreResult<AppState> {
            Err(CoreError::Serde("expected value".into()))
        }
    }

    fn manager_with(storage: RecordingStorage) -> AppManager {
        AppManager::open(Box::new(storage), Box::new(FixedClock::on(march(1))))
    }

    #[test]
    fn every_mutation_is_saved() {
        let storage = RecordingStorage::default();
        let mut manager = manager_with(storage.clone());
        assert_eq!(manager.outcome(), &LoadOutcome::Fresh);

        let course_id = manager
            .create_course(
                CourseDraft::named("Kat B", 10),
                DateSelection::new().with_dates([march(4)]),
            )
            .unwrap();
        let form = ReservationForm::new(manager.state()).with_student(Student::new("Jan", "600"));
        manager
            .create_reservation(form, BookingRequest::Course(course_id))
            .unwrap();

        let saves = storage.saves.lock().unwrap();
        assert_eq!(saves.len(), 2);
        assert_eq!(saves[1], *manager.state());
    }

    #[test]
    fn rejected_mutation_is_not_saved() {
        let storage = RecordingStorage::default();
        let mut manager = manager_with(storage.clone());
        let err = manager
            .create_course(CourseDraft::named("", 10), DateSelection::new())
            .unwrap_err();
        assert!(err.is_user_error());
        assert!(storage.saves.lock().unwrap().is_empty());
    }

    #[test]
    fn failed_save_keeps_in_memory_state() {
        let mut manager = manager_with(RecordingStorage {
            fail: true,
            ..RecordingStorage::default()
        });
        manager
            .create_course(
                CourseDraft::named("Kat A", 5),
                DateSelection::new().with_dates([march(2)]),
            )
            .unwrap();
        assert_eq!(manager.state().courses.len(), 1);
        assert!(manager.last_save_error().unwrap().contains("disk full"));
    }

    #[test]
    fn failed_import_leaves_state_untouched() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("backup.json");
        fs::write(&path, "{}").unwrap();
        let mut manager = manager_with(RecordingStorage::default());
        manager.settings_draft().set_app_title("Draft");
        let before = manager.state().clone();
        assert!(manager.import_backup(&path).is_err());
        assert_eq!(manager.state(), &before);
        assert!(manager.has_unsaved_settings());
    }

    #[test]
    fn settings_draft_applies_only_on_save() {
        let mut manager = manager_with(RecordingStorage::default());
        manager.settings_draft().set_app_title("Szkoła Jazdy");
        assert!(manager.has_unsaved_settings());
        assert_eq!(manager.state().app_title, "Osk Menager");
        assert!(manager.save_settings());
        assert_eq!(manager.state().app_title, "Szkoła Jazdy");
        assert!(!manager.has_unsaved_settings());
        assert!(!manager.save_settings());
    }

    #[derive(Clone, Default)]
    struct LogBuffer(Arc<Mutex<Vec<u8>>>);

    impl std::io::Write for LogBuffer {
        fn write(&mut self, bytes: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(bytes);
            Ok(bytes.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn settings_save_is_logged_once() {
        let logs = LogBuffer::default();
        let writer = logs.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || writer.clone())
            .with_ansi(false)
            .with_max_level(tracing::Level::INFO)
            .finish();

        tracing::subscriber::with_default(subscriber, || {
            let mut manager = manager_with(RecordingStorage::default());
            manager.settings_draft().set_app_title("Szkoła Jazdy");
            assert!(manager.save_settings());
        });

        let output = String::from_utf8(logs.0.lock().unwrap().clone()).unwrap();
        assert_eq!(output.matches("settings saved").count(), 1);
    }

    #[test]
    fn json_store_roundtrip_through_manager() {
        let dir = tempdir().unwrap();
        let store = JsonStateStore::new(dir.path().join("data")).unwrap();
        let clock = FixedClock::on(march(1));
        let mut manager = AppManager::open(Box::new(store.clone()), Box::new(clock));
        let form = ReservationForm::new(manager.state()).with_student(Student::new("Ola", "1"));
        let reservation = manager
            .create_reservation(
                form,
                BookingRequest::Individual(DateSelection::new().with_dates([march(8)])),
            )
            .unwrap();
        manager
            .plan_session(PlanRequest::new(march(8), &reservation))
            .unwrap();

        let backup = manager.export_backup(&dir.path().join("exports")).unwrap();
        let reopened = AppManager::open(Box::new(store), Box::new(clock));
        assert_eq!(reopened.outcome(), &LoadOutcome::Loaded);
        assert_eq!(reopened.state(), manager.state());

        let mut fresh = manager_with(RecordingStorage::default());
        let json = JsonStateStore::new(dir.path().join("other")).unwrap();
        fresh.storage = Box::new(json);
        fresh.import_backup(&backup).unwrap();
        assert_eq!(fresh.state(), manager.state());
        assert_eq!(financial_summary(fresh.state()).revenue, 3200.0);
    }
}
