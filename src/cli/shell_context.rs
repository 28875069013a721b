use dialoguer::theme::ColorfulTheme;

use crate::{
    config::{ConfigManager, Settings},
    core::LedgerManager,
    storage::JsonStorage,
};

use super::commands;
use super::core::{CommandError, LoopControl};
use super::io as cli_io;
use super::output;
use super::registry::{CommandEntry, CommandRegistry};
use crate::errors::CliError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CliMode {
    Interactive,
    Script,
}

pub struct ShellContext {
    pub mode: CliMode,
    pub registry: CommandRegistry,
    pub manager: LedgerManager,
    pub config_manager: ConfigManager,
    pub settings: Settings,
    pub theme: ColorfulTheme,
    pub running: bool,
}

impl ShellContext {
    /// Builds a context over the default data directory.
    pub fn new(mode: CliMode) -> Result<Self, CliError> {
        let storage = JsonStorage::new_default()?;
        let config_manager = ConfigManager::new()?;
        Self::with_parts(mode, LedgerManager::new(Box::new(storage)), config_manager)
    }

    pub fn with_parts(
        mode: CliMode,
        manager: LedgerManager,
        config_manager: ConfigManager,
    ) -> Result<Self, CliError> {
        let mut registry = CommandRegistry::new();
        commands::register_all(&mut registry);
        let settings = config_manager.load();
        manager.get_or_create_today()?;
        output::set_preferences(output::OutputPreferences {
            plain: mode == CliMode::Script,
        });
        Ok(Self {
            mode,
            registry,
            manager,
            config_manager,
            settings,
            theme: ColorfulTheme::default(),
            running: true,
        })
    }

    pub fn prompt(&self) -> String {
        format!("gas [{}]> ", self.settings.input_mode)
    }

    pub fn command_names(&self) -> Vec<&'static str> {
        self.registry.names()
    }

    pub fn command(&self, name: &str) -> Option<&CommandEntry> {
        self.registry.get(name)
    }

    /// Persists the current settings after a change.
    pub fn save_settings(&self) -> Result<(), CommandError> {
        self.config_manager.save(&self.settings)?;
        Ok(())
    }

    /// Asks before a destructive or recording action. Scripts always proceed.
    pub fn confirm(&self, prompt: &str) -> Result<bool, CommandError> {
        if self.mode == CliMode::Script {
            return Ok(true);
        }
        cli_io::confirm_action(&self.theme, prompt)
    }

    pub(crate) fn confirm_exit(&self) -> Result<bool, CliError> {
        self.confirm("Exit shell?").map_err(CliError::from)
    }

    pub(crate) fn dispatch(
        &mut self,
        command: &str,
        raw: &str,
        args: &[&str],
    ) -> Result<LoopControl, CommandError> {
        if let Some(handler) = self.registry.handler(command) {
            match handler(self, args) {
                Ok(()) => Ok(LoopControl::Continue),
                Err(CommandError::ExitRequested) => Ok(LoopControl::Exit),
                Err(err) => Err(err),
            }
        } else {
            self.suggest_command(raw);
            Ok(LoopControl::Continue)
        }
    }

    pub(crate) fn process_line(&mut self, line: &str) -> Result<LoopControl, CommandError> {
        let tokens = match crate::cli::shell::parse_command_line(line) {
            Ok(tokens) => tokens,
            Err(err) => {
                output::warning(err);
                return Ok(LoopControl::Continue);
            }
        };
        let Some(raw) = tokens.first() else {
            return Ok(LoopControl::Continue);
        };
        let command = raw.to_lowercase();
        let args: Vec<&str> = tokens.iter().skip(1).map(String::as_str).collect();

        match self.dispatch(&command, raw, &args) {
            Ok(LoopControl::Exit) => {
                self.running = false;
                Ok(LoopControl::Exit)
            }
            other => other,
        }
    }

    pub(crate) fn suggest_command(&self, raw: &str) {
        output::error(format!("Unknown command `{}`.", raw));
        match self.registry.suggest(raw) {
            Some(name) => output::hint(format!("Did you mean `{}`?", name)),
            None => output::hint("Use `help` to list commands."),
        }
    }

    /// Surfaces a failed command as a notice; only prompt failures are fatal.
    pub(crate) fn report_error(&self, err: CommandError) -> Result<(), CliError> {
        match err {
            CommandError::ExitRequested => Ok(()),
            CommandError::InvalidArguments(message) => {
                output::error(message);
                output::hint("Use `help <command>` for usage details.");
                Ok(())
            }
            CommandError::Dialoguer(err) => Err(CliError::Command(err.to_string())),
            other => {
                output::error(other);
                Ok(())
            }
        }
    }

    pub(crate) fn usage_error(&self, name: &str) -> CommandError {
        let usage = self.command(name).map(|entry| entry.usage).unwrap_or(name);
        CommandError::InvalidArguments(format!("Usage: {}", usage))
    }
}

#[cfg(test)]
pub(crate) fn script_context(
    clock: std::sync::Arc<crate::core::FixedClock>,
    base: std::path::PathBuf,
) -> ShellContext {
    use crate::storage::MemoryStorage;

    let manager = LedgerManager::with_clock(Box::new(MemoryStorage::new()), clock);
    let config_manager = ConfigManager::with_base_dir(base).expect("config manager");
    ShellContext::with_parts(CliMode::Script, manager, config_manager).expect("shell context")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::FixedClock;
    use crate::domain::InputMode;
    use chrono::NaiveDate;
    use std::sync::Arc;
    use tempfile::tempdir;

    fn run(context: &mut ShellContext, lines: &[&str]) {
        for line in lines {
            match context.process_line(line) {
                Ok(LoopControl::Continue) => {}
                Ok(LoopControl::Exit) => break,
                Err(err) => context.report_error(err).expect("non-fatal error"),
            }
        }
    }

    fn clock() -> Arc<FixedClock> {
        let at = NaiveDate::from_ymd_opt(2025, 8, 15)
            .unwrap()
            .and_hms_opt(13, 30, 0)
            .unwrap();
        Arc::new(FixedClock::new(at))
    }

    #[test]
    fn script_sells_undoes_and_deletes() {
        let temp = tempdir().unwrap();
        let mut context = script_context(clock(), temp.path().to_path_buf());
        run(
            &mut context,
            &[
                "mode weight",
                "sell 5",
                "sell 2",
                "sell 1",
                "undo",
                "delete 2025-08-15 1",
            ],
        );
        let today = context.manager.today();
        let ledger = context.manager.load();
        let record = ledger.day(today).unwrap();
        assert_eq!(record.transaction_count(), 1);
        assert_eq!(record.sales[0].weight, 2.0);
        assert_eq!(record.total_amount, 2000.0);
    }

    #[test]
    fn invalid_input_leaves_ledger_untouched() {
        let temp = tempdir().unwrap();
        let mut context = script_context(clock(), temp.path().to_path_buf());
        run(&mut context, &["sell abc", "sell -3", "sell 0", "undo", "selll 4"]);
        let today = context.manager.today();
        assert!(context.manager.load().day(today).unwrap().is_empty());
    }

    #[test]
    fn settings_commands_persist() {
        let temp = tempdir().unwrap();
        let mut context = script_context(clock(), temp.path().to_path_buf());
        run(&mut context, &["price sell 1200", "price cost 1000", "mode weight"]);
        let reloaded = context.config_manager.load();
        assert_eq!(reloaded.selling_price_per_kg, 1200.0);
        assert_eq!(reloaded.cost_price_per_kg, 1000.0);
        assert_eq!(reloaded.input_mode, InputMode::Weight);
    }

    #[test]
    fn delete_out_of_range_names_the_history_number() {
        let temp = tempdir().unwrap();
        let mut context = script_context(clock(), temp.path().to_path_buf());
        run(&mut context, &["mode weight", "sell 1", "sell 2", "sell 3"]);
        let err = context
            .process_line("delete 2025-08-15 4")
            .expect_err("no fourth sale");
        match err {
            CommandError::InvalidArguments(message) => {
                assert!(message.contains("#4"), "got {message}");
                assert!(message.contains("3 sales"), "got {message}");
            }
            other => panic!("unexpected error: {other:?}"),
        }
        let today = context.manager.today();
        assert_eq!(context.manager.load().day(today).unwrap().transaction_count(), 3);
    }

    #[test]
    fn exit_stops_processing() {
        let temp = tempdir().unwrap();
        let mut context = script_context(clock(), temp.path().to_path_buf());
        run(&mut context, &["exit", "sell 100"]);
        assert!(!context.running);
        let today = context.manager.today();
        assert!(context.manager.load().day(today).unwrap().is_empty());
    }
}
