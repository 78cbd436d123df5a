use std::{
    env,
    path::PathBuf,
};

use dialoguer::theme::ColorfulTheme;
use osk_config::{resolve_home, Config, ConfigManager};
use osk_core::{Clock, ExportFormat, FixedClock};
use osk_storage_json::JsonStateStore;

use crate::cli::args::parse_date;
use crate::cli::commands;
use crate::cli::core::{CliError, CliMode, CommandError, LoopControl};
use crate::cli::io as cli_io;
use crate::cli::output::{self, OutputPreferences};
use crate::cli::registry::{CommandEntry, CommandRegistry};
use crate::core::{AppManager, LoadOutcome, SystemClock};

/// Pins "today" for reproducible reports, e.g. `OSK_MANAGER_TODAY=2024-03-01`.
pub const TODAY_ENV: &str = "OSK_MANAGER_TODAY";

pub struct ShellContext {
    pub mode: CliMode,
    pub registry: CommandRegistry,
    pub manager: AppManager,
    pub theme: ColorfulTheme,
    pub config_manager: ConfigManager,
    pub config: Config,
    pub home: PathBuf,
    pub last_command: Option<String>,
    pub running: bool,
}

impl ShellContext {
    pub fn new(mode: CliMode) -> Result<Self, CliError> {
        Self::with_home(mode, resolve_home())
    }

    pub fn with_home(mode: CliMode, home: PathBuf) -> Result<Self, CliError> {
        let config_manager = ConfigManager::with_base_dir(&home)?;
        let config = config_manager.load().unwrap_or_else(|err| {
            output::warning(format!("Nie można odczytać konfiguracji: {err}"));
            Config::default()
        });
        crate::init_with_filter(config.log_filter());
        output::set_preferences(OutputPreferences {
            color_enabled: config.ui_color_enabled && mode == CliMode::Interactive,
            quiet_mode: false,
        });

        let data_dir = config.resolve_data_dir(&home);
        let storage = JsonStateStore::new(data_dir)?;
        let manager = AppManager::open(Box::new(storage), clock_from_env()?);

        let mut registry = CommandRegistry::new();
        commands::register_all(&mut registry);

        let context = Self {
            mode,
            registry,
            manager,
            theme: ColorfulTheme::default(),
            config_manager,
            config,
            home,
            last_command: None,
            running: true,
        };
        context.report_startup();
        Ok(context)
    }

    fn report_startup(&self) {
        if let LoadOutcome::Recovered(reason) = self.manager.outcome() {
            output::warning(format!(
                "Nie udało się wczytać zapisanych danych ({reason}). Uruchomiono z danymi domyślnymi."
            ));
        }
        for warning in self.manager.warnings() {
            output::warning(warning);
        }
    }

    pub fn prompt(&self) -> String {
        let marker = if self.manager.has_unsaved_settings() {
            "*"
        } else {
            ""
        };
        format!("osk{marker}> ")
    }

    pub fn command_names(&self) -> Vec<&'static str> {
        self.registry.names().collect()
    }

    pub fn command(&self, name: &str) -> Option<&CommandEntry> {
        self.registry.get(name)
    }

    pub fn export_dir(&self) -> PathBuf {
        self.config.resolve_export_dir()
    }

    pub fn default_export_format(&self) -> ExportFormat {
        self.config
            .default_export_format
            .parse()
            .unwrap_or_default()
    }

    pub(crate) fn dispatch(
        &mut self,
        command: &str,
        raw: &str,
        args: &[&str],
    ) -> Result<LoopControl, CommandError> {
        if let Some(handler) = self.registry.handler(command) {
            match handler(self, args) {
                Ok(()) => {
                    self.report_save_failure();
                    Ok(LoopControl::Continue)
                }
                Err(CommandError::ExitRequested) => Ok(LoopControl::Exit),
                Err(err) => Err(err),
            }
        } else {
            self.suggest_command(raw);
            Ok(LoopControl::Continue)
        }
    }

    pub(crate) fn suggest_command(&self, input: &str) {
        output::warning(format!(
            "Nieznane polecenie `{input}`. Wpisz `help`, aby zobaczyć listę poleceń."
        ));
        if let Some(best) = self.registry.suggest(input) {
            output::hint(format!("Czy chodziło o `{best}`?"));
        }
    }

    fn report_save_failure(&self) {
        if let Some(reason) = self.manager.last_save_error() {
            output::warning(format!(
                "Zmiany są w pamięci, ale nie zostały zapisane na dysku: {reason}"
            ));
        }
    }

    pub(crate) fn report_error(&self, err: CommandError) -> Result<(), CliError> {
        match err {
            CommandError::ExitRequested => Ok(()),
            CommandError::InvalidArguments(message) => {
                output::error(message);
                output::hint("Użyj `help <polecenie>`, aby zobaczyć składnię.");
                Ok(())
            }
            CommandError::Core(core) if core.is_user_error() => {
                output::error(core);
                Ok(())
            }
            other => {
                tracing::debug!(error = ?other, "command failed");
                output::error(other);
                Ok(())
            }
        }
    }

    /// Asks for confirmation. Script mode never prompts: it proceeds only with `assume_yes`.
    pub fn confirm(&self, prompt: &str, assume_yes: bool) -> Result<bool, CommandError> {
        if assume_yes {
            return Ok(true);
        }
        match self.mode {
            CliMode::Interactive => cli_io::confirm_action(&self.theme, prompt, false),
            CliMode::Script => {
                output::warning(format!("{prompt} Dodaj `--yes`, aby potwierdzić."));
                Ok(false)
            }
        }
    }

    pub(crate) fn confirm_exit(&self) -> Result<bool, CommandError> {
        if !self.manager.has_unsaved_settings() {
            return Ok(true);
        }
        match self.mode {
            CliMode::Interactive => cli_io::confirm_action(
                &self.theme,
                "Masz niezapisane zmiany w ustawieniach. Zamknąć mimo to?",
                false,
            ),
            CliMode::Script => {
                output::warning("Niezapisane zmiany w ustawieniach zostały porzucone.");
                Ok(true)
            }
        }
    }

    pub fn resolve_output_dir(&self, raw: Option<&str>) -> PathBuf {
        raw.map(PathBuf::from)
            .unwrap_or_else(|| self.export_dir())
    }

    pub fn data_file(&self) -> PathBuf {
        self.config
            .resolve_data_dir(&self.home)
            .join(format!("{}.json", osk_storage_json::STATE_KEY))
    }
}

fn clock_from_env() -> Result<Box<dyn Clock>, CliError> {
    match env::var(TODAY_ENV) {
        Ok(raw) if !raw.trim().is_empty() => {
            let date = parse_date(&raw).map_err(|err| CliError::Command(err.to_string()))?;
            Ok(Box::new(FixedClock::on(date)))
        }
        _ => Ok(Box::new(SystemClock)),
    }
}
