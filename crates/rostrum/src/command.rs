//! Commands: declaration, definition merging and the run lifecycle.

use rostrum_input::{Input, InputDefinition, Value};

use crate::{ConsoleError, Output};

/// The behavior behind a command.
///
/// `execute` is the only required method. `initialize` runs first on every
/// invocation; `interact` runs after it, but only when the input is
/// interactive, and is the place to fill in missing values by asking.
pub trait CommandHandler {
    fn execute(&mut self, input: &mut dyn Input, output: &mut dyn Output) -> anyhow::Result<i32>;

    fn initialize(
        &mut self,
        _input: &mut dyn Input,
        _output: &mut dyn Output,
    ) -> anyhow::Result<()> {
        Ok(())
    }

    fn interact(
        &mut self,
        _input: &mut dyn Input,
        _output: &mut dyn Output,
    ) -> anyhow::Result<()> {
        Ok(())
    }
}

/// Framework-provided commands the application dispatches itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Builtin {
    Help,
    List,
}

type CodeFn = dyn FnMut(&mut dyn Input, &mut dyn Output) -> anyhow::Result<i32>;

/// A named command: its input schema, metadata and behavior.
///
/// Behavior comes from either a [`CommandHandler`] or a plain closure set
/// with [`Command::set_code`]; the closure wins when both are present.
pub struct Command {
    name: String,
    aliases: Vec<String>,
    description: String,
    help: String,
    hidden: bool,
    definition: InputDefinition,
    handler: Option<Box<dyn CommandHandler>>,
    code: Option<Box<CodeFn>>,
    builtin: Option<Builtin>,
    ignore_validation_errors: bool,
    merged: bool,
    merged_with_args: bool,
}

impl Default for Command {
    fn default() -> Self {
        Self::new("")
    }
}

impl Command {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            aliases: Vec::new(),
            description: String::new(),
            help: String::new(),
            hidden: false,
            definition: InputDefinition::new(),
            handler: None,
            code: None,
            builtin: None,
            ignore_validation_errors: false,
            merged: false,
            merged_with_args: false,
        }
    }

    pub(crate) fn builtin(name: &str, kind: Builtin) -> Self {
        let mut command = Self::new(name);
        command.builtin = Some(kind);
        command
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn aliases(&self) -> &[String] {
        &self.aliases
    }

    pub fn set_aliases(&mut self, aliases: Vec<String>) {
        self.aliases = aliases;
    }

    pub fn with_aliases(mut self, aliases: Vec<String>) -> Self {
        self.aliases = aliases;
        self
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn set_description(&mut self, description: impl Into<String>) {
        self.description = description.into();
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn help(&self) -> &str {
        &self.help
    }

    pub fn set_help(&mut self, help: impl Into<String>) {
        self.help = help.into();
    }

    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help = help.into();
        self
    }

    pub fn is_hidden(&self) -> bool {
        self.hidden
    }

    pub fn set_hidden(&mut self, hidden: bool) {
        self.hidden = hidden;
    }

    pub fn definition(&self) -> &InputDefinition {
        &self.definition
    }

    pub fn definition_mut(&mut self) -> &mut InputDefinition {
        &mut self.definition
    }

    pub fn set_definition(&mut self, definition: InputDefinition) {
        self.definition = definition;
    }

    pub fn with_definition(mut self, definition: InputDefinition) -> Self {
        self.definition = definition;
        self
    }

    pub fn set_handler(&mut self, handler: Box<dyn CommandHandler>) {
        self.handler = Some(handler);
    }

    pub fn with_handler(mut self, handler: Box<dyn CommandHandler>) -> Self {
        self.handler = Some(handler);
        self
    }

    pub fn set_code<F>(&mut self, code: F)
    where
        F: FnMut(&mut dyn Input, &mut dyn Output) -> anyhow::Result<i32> + 'static,
    {
        self.code = Some(Box::new(code));
    }

    pub fn with_code<F>(mut self, code: F) -> Self
    where
        F: FnMut(&mut dyn Input, &mut dyn Output) -> anyhow::Result<i32> + 'static,
    {
        self.set_code(code);
        self
    }

    pub(crate) fn builtin_kind(&self) -> Option<Builtin> {
        self.builtin
    }

    /// Lets binding errors through so the command can react to arbitrary
    /// tokens itself. Validation of required arguments still applies.
    pub fn ignore_validation_errors(&mut self) {
        self.ignore_validation_errors = true;
    }

    /// Folds the application-level definition into this command's: global
    /// options always, global arguments (prepended) when `merge_args`.
    /// Safe to call repeatedly; each half merges at most once.
    pub fn merge_application_definition(
        &mut self,
        app_definition: &InputDefinition,
        merge_args: bool,
    ) -> Result<(), ConsoleError> {
        if !self.merged {
            self.definition
                .add_options(app_definition.options().cloned().collect())?;
            self.merged = true;
        }
        if merge_args && !self.merged_with_args {
            let own: Vec<_> = self.definition.arguments().cloned().collect();
            self.definition
                .set_arguments(app_definition.arguments().cloned().collect())?;
            self.definition.add_arguments(own)?;
            self.merged_with_args = true;
        }
        Ok(())
    }

    /// `{name} {definition synopsis}`.
    pub fn synopsis(&self, short: bool) -> String {
        format!("{} {}", self.name, self.definition.synopsis(short))
            .trim()
            .to_string()
    }

    /// Help text with `%command.name%` and `%command.full_name%` expanded.
    pub fn processed_help(&self) -> String {
        let source = if self.help.is_empty() {
            &self.description
        } else {
            &self.help
        };
        let program = std::env::args().next().unwrap_or_default();
        source
            .replace("%command.name%", &self.name)
            .replace(
                "%command.full_name%",
                format!("{program} {}", self.name).trim(),
            )
    }

    /// The full lifecycle: bind, initialize, interact, autofill the
    /// `command` argument, validate, then execute.
    pub fn run(&mut self, input: &mut dyn Input, output: &mut dyn Output) -> anyhow::Result<i32> {
        if let Err(err) = input.bind(&self.definition) {
            if !self.ignore_validation_errors {
                return Err(err.into());
            }
        }

        if let Some(handler) = self.handler.as_mut() {
            handler.initialize(input, output)?;
            if input.is_interactive() {
                handler.interact(input, output)?;
            }
        }

        // An application routes through a `command` argument; commands run
        // standalone fill it with their own name so downstream code can
        // rely on it.
        if input.has_argument("command") && input.argument("command")?.is_null() {
            input.set_argument("command", Value::from(self.name.as_str()))?;
        }

        input.validate()?;

        if let Some(code) = self.code.as_mut() {
            return code(input, output);
        }
        if let Some(handler) = self.handler.as_mut() {
            return handler.execute(input, output);
        }
        Err(anyhow::anyhow!(
            "Command \"{}\" has neither a handler nor a code closure.",
            self.name
        ))
    }
}

impl std::fmt::Debug for Command {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Command")
            .field("name", &self.name)
            .field("aliases", &self.aliases)
            .field("hidden", &self.hidden)
            .field("builtin", &self.builtin)
            .finish_non_exhaustive()
    }
}

/// Command names and aliases are colon-separated non-empty segments.
pub(crate) fn validate_name(name: &str) -> Result<(), ConsoleError> {
    let valid = !name.is_empty()
        && name
            .split(':')
            .all(|segment| !segment.is_empty() && !segment.contains(char::is_whitespace));
    if valid {
        Ok(())
    } else {
        Err(ConsoleError::Logic(format!(
            "Command name \"{name}\" is invalid."
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::BufferedOutput;
    use rostrum_input::{
        ArgumentMode, ArgvInput, InputArgument, InputDefinition, InputOption, OptionMode,
    };

    fn app_definition() -> InputDefinition {
        let mut def = InputDefinition::new();
        def.add_argument(InputArgument::new("command", ArgumentMode::REQUIRED, ""))
            .unwrap();
        def.add_option(InputOption::new("help", Some("h"), OptionMode::VALUE_NONE, "").unwrap())
            .unwrap();
        def
    }

    #[test]
    fn run_executes_code_closure() {
        let mut command = Command::new("greet").with_code(|input, output| {
            let name = input.argument("name")?;
            output.writeln(&format!("hello {name}"))?;
            Ok(0)
        });
        command
            .definition_mut()
            .add_argument(InputArgument::new("name", ArgumentMode::REQUIRED, ""))
            .unwrap();

        let mut input = ArgvInput::new(vec!["alice".into()]);
        let mut output = BufferedOutput::new(false);
        let code = command.run(&mut input, &mut output).unwrap();
        assert_eq!(code, 0);
        assert_eq!(output.fetch(), "hello alice\n");
    }

    #[test]
    fn run_without_behavior_is_an_error() {
        let mut command = Command::new("empty");
        let mut input = ArgvInput::new(vec![]);
        let mut output = BufferedOutput::new(false);
        let err = command.run(&mut input, &mut output).unwrap_err();
        assert!(err.to_string().contains("neither a handler nor a code"));
    }

    #[test]
    fn run_propagates_validation_failure() {
        let mut command = Command::new("greet").with_code(|_, _| Ok(0));
        command
            .definition_mut()
            .add_argument(InputArgument::new("name", ArgumentMode::REQUIRED, ""))
            .unwrap();

        let mut input = ArgvInput::new(vec![]);
        let mut output = BufferedOutput::new(false);
        let err = command.run(&mut input, &mut output).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Not enough arguments (missing: \"name\")."
        );
    }

    #[test]
    fn ignore_validation_errors_swallows_bind_failures() {
        let mut command = Command::new("loose").with_code(|_, _| Ok(7));
        command.ignore_validation_errors();

        let mut input = ArgvInput::new(vec!["--mystery".into()]);
        let mut output = BufferedOutput::new(false);
        assert_eq!(command.run(&mut input, &mut output).unwrap(), 7);
    }

    #[test]
    fn autofills_command_argument() {
        let mut command = Command::new("greet").with_code(|input, _| {
            assert_eq!(input.argument("command")?.as_str(), Some("greet"));
            Ok(0)
        });
        command
            .definition_mut()
            .add_argument(InputArgument::new("command", ArgumentMode::OPTIONAL, ""))
            .unwrap();

        let mut input = ArgvInput::new(vec![]);
        let mut output = BufferedOutput::new(false);
        assert_eq!(command.run(&mut input, &mut output).unwrap(), 0);
    }

    #[test]
    fn merge_adds_options_and_prepends_arguments() {
        let mut command = Command::new("greet");
        command
            .definition_mut()
            .add_argument(InputArgument::new("name", ArgumentMode::REQUIRED, ""))
            .unwrap();

        command
            .merge_application_definition(&app_definition(), true)
            .unwrap();

        let names: Vec<&str> = command.definition().arguments().map(|a| a.name()).collect();
        assert_eq!(names, vec!["command", "name"]);
        assert!(command.definition().has_option("help"));

        // merging twice is a no-op
        command
            .merge_application_definition(&app_definition(), true)
            .unwrap();
        assert_eq!(command.definition().arguments().count(), 2);
    }

    #[test]
    fn synopsis_includes_name() {
        let mut command = Command::new("greet");
        command
            .definition_mut()
            .add_argument(InputArgument::new("name", ArgumentMode::REQUIRED, ""))
            .unwrap();
        assert_eq!(command.synopsis(true), "greet <name>");
    }

    #[test]
    fn processed_help_expands_placeholders() {
        let command = Command::new("greet").with_help("Run %command.name% to greet");
        assert_eq!(command.processed_help(), "Run greet to greet");
    }

    #[test]
    fn name_validation() {
        assert!(validate_name("greet").is_ok());
        assert!(validate_name("ns:greet").is_ok());
        assert!(validate_name("").is_err());
        assert!(validate_name("ns:").is_err());
        assert!(validate_name("bad name").is_err());
    }
}
