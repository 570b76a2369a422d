//! The application: a command registry with name resolution and a run loop.

use indexmap::IndexMap;
use regex::Regex;

use rostrum_input::{
    ArgumentMode, ArgvInput, CollectionInput, Input, InputArgument, InputDefinition, InputOption,
    OptionMode, Value,
};
use rostrum_markup::Formatter;

use crate::command::{validate_name, Builtin};
use crate::commands::{help_command, list_command};
use crate::descriptor::{JsonDescriptor, TextDescriptor};
use crate::{Command, ConsoleError, ExitError, Output, StreamOutput, Verbosity};

/// Holds commands, resolves names (with abbreviations and aliases), wires
/// global options into every run and renders uncaught errors.
///
/// [`Application::run`] never panics on a handler error; it renders the
/// error and returns the exit code for the caller to pass to
/// `std::process::exit`. Use [`Application::try_run`] to get the error
/// back instead.
pub struct Application {
    name: String,
    version: String,
    commands: Vec<Command>,
    /// Command names and aliases, both pointing at `commands` indices.
    names: IndexMap<String, usize>,
    definition: InputDefinition,
    default_command: String,
    single_command: bool,
}

impl Application {
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        let mut app = Self {
            name: name.into(),
            version: version.into(),
            commands: Vec::new(),
            names: IndexMap::new(),
            definition: default_input_definition(),
            default_command: "list".to_string(),
            single_command: false,
        };
        app.add(help_command()).expect("help command registers");
        app.add(list_command()).expect("list command registers");
        app
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    /// `{name} <info>{version}</info>`, or a placeholder for unnamed apps.
    pub fn long_version(&self) -> String {
        if self.name.is_empty() {
            "Console Tool".to_string()
        } else if self.version.is_empty() {
            self.name.clone()
        } else {
            format!("{} <info>{}</info>", self.name, self.version)
        }
    }

    pub fn definition(&self) -> &InputDefinition {
        &self.definition
    }

    /// Routes every bare invocation at `name`. With `single`, the
    /// application always runs it and positional routing is disabled.
    pub fn set_default_command(
        &mut self,
        name: &str,
        single: bool,
    ) -> Result<(), ConsoleError> {
        self.find_index(name)?;
        self.default_command = name.to_string();
        self.single_command = single;
        Ok(())
    }

    /// Registers a command. The name and every alias become addressable
    /// immediately; re-adding a name replaces the previous command.
    pub fn add(&mut self, command: Command) -> Result<(), ConsoleError> {
        validate_name(command.name())?;
        for alias in command.aliases() {
            validate_name(alias)?;
        }

        if let Some(&idx) = self.names.get(command.name()) {
            self.names.retain(|_, &mut i| i != idx);
            for alias in command.aliases() {
                self.names.insert(alias.clone(), idx);
            }
            self.names.insert(command.name().to_string(), idx);
            self.commands[idx] = command;
        } else {
            let idx = self.commands.len();
            for alias in command.aliases() {
                self.names.insert(alias.clone(), idx);
            }
            self.names.insert(command.name().to_string(), idx);
            self.commands.push(command);
        }
        Ok(())
    }

    pub fn has(&self, name: &str) -> bool {
        self.names.contains_key(name)
    }

    /// Exact lookup by name or alias.
    pub fn get(&self, name: &str) -> Result<&Command, ConsoleError> {
        self.names
            .get(name)
            .map(|&idx| &self.commands[idx])
            .ok_or_else(|| {
                ConsoleError::CommandNotFound(format!(
                    "The command \"{name}\" does not exist."
                ))
            })
    }

    pub fn commands(&self) -> &[Command] {
        &self.commands
    }

    /// Lookup by name or alias. Aliases are ordinary map keys, so an
    /// alias hit is exact and never scanned against other names.
    /// Abbreviation applies to namespaces only, via [`Application::find_namespace`].
    pub fn find(&self, name: &str) -> Result<&Command, ConsoleError> {
        self.find_index(name).map(|idx| &self.commands[idx])
    }

    fn find_index(&self, name: &str) -> Result<usize, ConsoleError> {
        self.names.get(name).copied().ok_or_else(|| {
            ConsoleError::CommandNotFound(format!("The command \"{name}\" does not exist."))
        })
    }

    /// Every namespace any visible command or alias lives in, shallow
    /// levels included ("a:b:c" contributes "a" and "a:b").
    pub fn namespaces(&self) -> Vec<String> {
        let mut seen = Vec::new();
        for command in &self.commands {
            if command.is_hidden() {
                continue;
            }
            for ns in extract_all_namespaces(command.name()) {
                if !seen.contains(&ns) {
                    seen.push(ns);
                }
            }
            for alias in command.aliases() {
                for ns in extract_all_namespaces(alias) {
                    if !seen.contains(&ns) {
                        seen.push(ns);
                    }
                }
            }
        }
        seen
    }

    /// Resolves a possibly abbreviated namespace to its full form.
    pub fn find_namespace(&self, namespace: &str) -> Result<String, ConsoleError> {
        let all = self.namespaces();
        let re = segment_pattern(namespace);
        let candidates: Vec<&String> = all.iter().filter(|ns| re.is_match(ns)).collect();

        if candidates.is_empty() {
            return Err(ConsoleError::NamespaceNotFound(format!(
                "There are no commands defined in the \"{namespace}\" namespace."
            )));
        }

        let exact = all.iter().any(|ns| ns == namespace);
        if candidates.len() > 1 && !exact {
            return Err(ConsoleError::NamespaceNotFound(format!(
                "The namespace \"{namespace}\" is ambiguous.\nDid you mean one of these?\n    {}.",
                candidates
                    .iter()
                    .map(|ns| ns.as_str())
                    .collect::<Vec<_>>()
                    .join("\n    ")
            )));
        }

        Ok(if exact {
            namespace.to_string()
        } else {
            candidates[0].clone()
        })
    }

    /// Runs against the process argv and standard output. The returned
    /// code is for the caller to pass to `std::process::exit`.
    pub fn run_from_env(&mut self) -> i32 {
        let mut input = ArgvInput::from_env();
        let mut output = StreamOutput::stdout();
        self.run(&mut input, &mut output)
    }

    /// Runs and converts any error into a rendered message plus a nonzero
    /// exit code, clamped to the 0..=255 range a shell can see.
    pub fn run(&mut self, input: &mut dyn Input, output: &mut dyn Output) -> i32 {
        match self.try_run(input, output) {
            Ok(code) => clamp_exit_code(code),
            Err(err) => {
                self.render_error(&err, output);
                let code = err
                    .downcast_ref::<ExitError>()
                    .map(ExitError::code)
                    .unwrap_or(1);
                clamp_exit_code(if code == 0 { 1 } else { code })
            }
        }
    }

    /// Like [`Application::run`] but propagates the error to the caller.
    pub fn try_run(
        &mut self,
        input: &mut dyn Input,
        output: &mut dyn Output,
    ) -> anyhow::Result<i32> {
        self.configure_io(input, output);
        self.do_run(input, output)
    }

    fn do_run(&mut self, input: &mut dyn Input, output: &mut dyn Output) -> anyhow::Result<i32> {
        match self.resolve(input) {
            Resolution::Version => {
                output.writeln_always(&self.long_version())?;
                Ok(0)
            }
            Resolution::Help { target } => {
                let target = self.find(&target)?.name().to_string();
                let mut params = vec![(
                    "command_name".to_string(),
                    Value::from(target.as_str()),
                )];
                // Presentation options ride along with --help.
                if let Value::Str(format) =
                    input.parameter_option(&["--format"], Value::Null, false)
                {
                    params.push(("--format".to_string(), Value::Str(format)));
                }
                if input.has_parameter_option(&["--raw"], false) {
                    params.push(("--raw".to_string(), Value::Null));
                }
                let mut help_input = CollectionInput::new(params);
                help_input.set_interactive(input.is_interactive());
                let help_idx = self.find_index("help")?;
                self.do_run_command(help_idx, &mut help_input, output)
            }
            Resolution::Command { name } => {
                let idx = self.find_index(&name)?;
                self.do_run_command(idx, input, output)
            }
            Resolution::Default { name } => {
                // Bare invocation: relax the command argument so the
                // default command binds without a positional token.
                self.relax_command_argument(&name)?;
                let idx = self.find_index(&name)?;
                self.do_run_command(idx, input, output)
            }
        }
    }

    /// Classifies the raw input before any command is involved. Probing
    /// happens on raw tokens, so this works even when binding would fail.
    fn resolve(&self, input: &mut dyn Input) -> Resolution {
        if input.has_parameter_option(&["--version", "-V"], true) {
            return Resolution::Version;
        }

        // Speculative bind so pre-dispatch probes see the base definition.
        // Binding errors do not matter yet; the resolved command binds
        // again with its merged definition.
        let _ = input.bind(&self.definition);

        let name = self.command_name(input);
        if input.has_parameter_option(&["--help", "-h"], true) {
            return Resolution::Help {
                target: name.unwrap_or_else(|| self.default_command.clone()),
            };
        }
        match name {
            Some(name) => Resolution::Command { name },
            None => Resolution::Default {
                name: self.default_command.clone(),
            },
        }
    }

    fn do_run_command(
        &mut self,
        idx: usize,
        input: &mut dyn Input,
        output: &mut dyn Output,
    ) -> anyhow::Result<i32> {
        let mut app_definition = self.definition.clone();
        if self.single_command {
            // Positional routing is disabled, so the command argument
            // must not swallow the first positional token.
            app_definition.set_arguments(Vec::new())?;
        }
        self.commands[idx].merge_application_definition(&app_definition, true)?;

        match self.commands[idx].builtin_kind() {
            Some(kind) => self.run_builtin(idx, kind, input, output),
            None => self.commands[idx].run(input, output),
        }
    }

    /// Built-ins follow the command lifecycle but execute inside the
    /// application, which has the registry access they describe.
    fn run_builtin(
        &mut self,
        idx: usize,
        kind: Builtin,
        input: &mut dyn Input,
        output: &mut dyn Output,
    ) -> anyhow::Result<i32> {
        input.bind(self.commands[idx].definition())?;
        if input.has_argument("command") && input.argument("command")?.is_null() {
            let own = self.commands[idx].name().to_string();
            input.set_argument("command", Value::from(own.as_str()))?;
        }
        input.validate()?;

        if input.option("raw")? == Value::Bool(true) {
            output.set_decorated(false);
        }
        let format = input.option("format")?;
        let format = format.as_str().unwrap_or("txt");

        match kind {
            Builtin::Help => {
                let target = input.argument("command_name")?;
                let target = target.as_str().unwrap_or("help").to_string();
                let target_idx = self.find_index(&target)?;
                let app_definition = self.definition.clone();
                self.commands[target_idx]
                    .merge_application_definition(&app_definition, false)?;
                match format {
                    "txt" => TextDescriptor::describe_command(&self.commands[target_idx], output)?,
                    "json" => JsonDescriptor::describe_command(&self.commands[target_idx], output)?,
                    other => {
                        return Err(
                            ConsoleError::Logic(format!("Unsupported format \"{other}\".")).into()
                        )
                    }
                }
            }
            Builtin::List => {
                let namespace = input.argument("namespace")?;
                let namespace = namespace.as_str().map(str::to_string);
                match format {
                    "txt" => TextDescriptor::describe_application(self, namespace.as_deref(), output)?,
                    "json" => JsonDescriptor::describe_application(self, namespace.as_deref(), output)?,
                    other => {
                        return Err(
                            ConsoleError::Logic(format!("Unsupported format \"{other}\".")).into()
                        )
                    }
                }
            }
        }
        Ok(0)
    }

    fn command_name(&self, input: &dyn Input) -> Option<String> {
        if self.single_command {
            Some(self.default_command.clone())
        } else {
            input.first_argument()
        }
    }

    fn relax_command_argument(&mut self, default: &str) -> Result<(), ConsoleError> {
        let description = self
            .definition
            .argument("command")
            .map(|a| a.description().to_string())
            .unwrap_or_default();
        let command = InputArgument::new("command", ArgumentMode::OPTIONAL, description)
            .with_default(Value::from(default))?;
        self.definition.set_arguments(vec![command])?;
        Ok(())
    }

    /// Applies the global I/O options from the raw input: ANSI forcing,
    /// interactivity, and verbosity (with the `SHELL_VERBOSITY` variable
    /// read as the baseline and republished with the outcome).
    pub fn configure_io(&self, input: &mut dyn Input, output: &mut dyn Output) {
        if input.has_parameter_option(&["--ansi"], true) {
            output.set_decorated(true);
        } else if input.has_parameter_option(&["--no-ansi"], true) {
            output.set_decorated(false);
        }

        if input.has_parameter_option(&["--no-interaction", "-n"], true) {
            input.set_interactive(false);
        }

        let mut shell_verbosity: i32 = std::env::var("SHELL_VERBOSITY")
            .ok()
            .and_then(|v| v.trim().parse().ok())
            .unwrap_or(0);
        output.set_verbosity(Verbosity::from_shell_level(shell_verbosity));

        if input.has_parameter_option(&["--quiet", "-q"], true) {
            output.set_verbosity(Verbosity::Quiet);
            shell_verbosity = -1;
        } else {
            let verbose = input.parameter_option(&["--verbose"], Value::Bool(false), true);
            if input.has_parameter_option(&["-vvv"], true)
                || input.has_parameter_option(&["--verbose=3"], true)
                || verbose == Value::from("3")
            {
                output.set_verbosity(Verbosity::Debug);
                shell_verbosity = 3;
            } else if input.has_parameter_option(&["-vv"], true)
                || input.has_parameter_option(&["--verbose=2"], true)
                || verbose == Value::from("2")
            {
                output.set_verbosity(Verbosity::VeryVerbose);
                shell_verbosity = 2;
            } else if input.has_parameter_option(&["-v"], true)
                || input.has_parameter_option(&["--verbose=1"], true)
                || input.has_parameter_option(&["--verbose"], true)
            {
                output.set_verbosity(Verbosity::Verbose);
                shell_verbosity = 1;
            }
        }

        if shell_verbosity == -1 {
            input.set_interactive(false);
        }
        std::env::set_var("SHELL_VERBOSITY", shell_verbosity.to_string());
    }

    fn render_error(&self, err: &anyhow::Error, output: &mut dyn Output) {
        let _ = output.writeln_always("");
        let _ = output.writeln_always(&format!(
            "<error>{}</error>",
            Formatter::escape(&err.to_string())
        ));
        if output.is_debug() {
            for cause in err.chain().skip(1) {
                let _ = output.writeln_always(&format!(
                    "<comment>Caused by:</comment> {}",
                    Formatter::escape(&cause.to_string())
                ));
            }
        }
        let _ = output.writeln_always("");
    }
}

/// What a raw invocation asks for, decided before any dispatch.
enum Resolution {
    Version,
    Help { target: String },
    Command { name: String },
    Default { name: String },
}

fn clamp_exit_code(code: i32) -> i32 {
    if (0..=255).contains(&code) {
        code
    } else {
        255
    }
}

/// The abbreviation pattern: each `:`-segment may be a prefix of the
/// corresponding segment in a registered name.
fn segment_pattern(name: &str) -> Regex {
    let expr = name
        .split(':')
        .map(regex::escape)
        .collect::<Vec<_>>()
        .join("[^:]*:")
        + "[^:]*";
    Regex::new(&format!("^{expr}")).expect("escaped segments form a valid pattern")
}

pub(crate) fn extract_namespace(name: &str, limit: Option<usize>) -> String {
    let mut parts: Vec<&str> = name.split(':').collect();
    parts.pop();
    let take = limit.unwrap_or(parts.len()).min(parts.len());
    parts[..take].join(":")
}

fn extract_all_namespaces(name: &str) -> Vec<String> {
    let parts: Vec<&str> = name.split(':').collect();
    (1..parts.len()).map(|i| parts[..i].join(":")).collect()
}

fn default_input_definition() -> InputDefinition {
    let mut definition = InputDefinition::new();
    definition
        .add_argument(InputArgument::new(
            "command",
            ArgumentMode::REQUIRED,
            "The command to execute",
        ))
        .expect("base arguments are valid");

    let options = vec![
        ("help", Some("h"), "Display help for the given command. When no command is given display help for the <info>list</info> command"),
        ("quiet", Some("q"), "Do not output any message"),
        ("verbose", Some("v"), "Increase the verbosity of messages: 1 for normal output, 2 for more verbose output and 3 for debug"),
        ("version", Some("V"), "Display this application version"),
        ("ansi", None, "Force ANSI output"),
        ("no-ansi", None, "Disable ANSI output"),
        ("no-interaction", Some("n"), "Do not ask any interactive question"),
    ];
    for (name, shortcut, description) in options {
        definition
            .add_option(
                InputOption::new(name, shortcut, OptionMode::VALUE_NONE, description)
                    .expect("base options are valid"),
            )
            .expect("base options are valid");
    }
    definition
}
