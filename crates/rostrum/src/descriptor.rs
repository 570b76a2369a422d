//! Rendering of command and application descriptions for `help` and `list`.

use serde::Serialize;

use rostrum_input::{InputArgument, InputDefinition, InputOption, Value};

use crate::application::extract_namespace;
use crate::{Application, Command, ConsoleError, Output};

/// Human-oriented descriptions with markup styling and aligned columns.
pub struct TextDescriptor;

impl TextDescriptor {
    pub fn describe_command(command: &Command, output: &mut dyn Output) -> Result<(), ConsoleError> {
        if !command.description().is_empty() {
            output.writeln("<comment>Description:</comment>")?;
            output.writeln(&format!("  {}", command.description()))?;
            output.writeln("")?;
        }

        output.writeln("<comment>Usage:</comment>")?;
        output.writeln(&format!("  {}", command.synopsis(true)))?;
        for alias in command.aliases() {
            output.writeln(&format!("  {alias}"))?;
        }
        output.writeln("")?;

        describe_definition(command.definition(), output)?;

        let help = command.processed_help();
        if !help.is_empty() && help != command.description() {
            output.writeln("<comment>Help:</comment>")?;
            for line in help.lines() {
                output.writeln(&format!("  {line}"))?;
            }
        }
        Ok(())
    }

    pub fn describe_application(
        app: &Application,
        namespace: Option<&str>,
        output: &mut dyn Output,
    ) -> Result<(), ConsoleError> {
        if !app.name().is_empty() {
            output.writeln(&app.long_version())?;
            output.writeln("")?;
        }

        output.writeln("<comment>Usage:</comment>")?;
        output.writeln("  command [options] [arguments]")?;
        output.writeln("")?;

        describe_options(app.definition().options(), output)?;

        let resolved = namespace.map(|ns| app.find_namespace(ns)).transpose()?;
        let mut visible: Vec<&Command> = app
            .commands()
            .iter()
            .filter(|c| !c.is_hidden() && !c.name().is_empty())
            .collect();
        if let Some(ns) = &resolved {
            let depth = ns.split(':').count();
            visible.retain(|c| extract_namespace(c.name(), Some(depth)) == *ns);
        }
        visible.sort_by_key(|c| {
            (
                extract_namespace(c.name(), Some(1)),
                c.name().to_string(),
            )
        });

        match &resolved {
            Some(ns) => output.writeln(&format!(
                "<comment>Available commands for the \"{ns}\" namespace:</comment>"
            ))?,
            None => output.writeln("<comment>Available commands:</comment>")?,
        }

        let width = visible.iter().map(|c| c.name().len()).max().unwrap_or(0);
        let mut current_ns: Option<String> = None;
        for command in visible {
            let ns = extract_namespace(command.name(), Some(1));
            if resolved.is_none() && !ns.is_empty() && current_ns.as_deref() != Some(ns.as_str()) {
                output.writeln(&format!(" <comment>{ns}</comment>"))?;
                current_ns = Some(ns);
            }
            output.writeln(&format!(
                "  <info>{:width$}</info>  {}",
                command.name(),
                command.description()
            ))?;
        }
        Ok(())
    }
}

fn describe_definition(
    definition: &InputDefinition,
    output: &mut dyn Output,
) -> Result<(), ConsoleError> {
    let argument_width = definition
        .arguments()
        .map(|a| a.name().len())
        .max()
        .unwrap_or(0);
    let option_width = definition
        .options()
        .map(|o| option_synopsis(o).len())
        .max()
        .unwrap_or(0);
    let width = argument_width.max(option_width);

    if definition.arguments().next().is_some() {
        output.writeln("<comment>Arguments:</comment>")?;
        for argument in definition.arguments() {
            output.writeln(&format!(
                "  <info>{:width$}</info>  {}{}",
                argument.name(),
                indent_continuations(argument.description(), width + 4),
                default_suffix(argument.default())
            ))?;
        }
        output.writeln("")?;
    }

    if definition.options().next().is_some() {
        describe_options_with_width(definition.options(), width, output)?;
    }
    Ok(())
}

fn describe_options<'a>(
    options: impl Iterator<Item = &'a InputOption>,
    output: &mut dyn Output,
) -> Result<(), ConsoleError> {
    let options: Vec<&InputOption> = options.collect();
    let width = options
        .iter()
        .map(|o| option_synopsis(o).len())
        .max()
        .unwrap_or(0);
    describe_options_with_width(options.into_iter(), width, output)
}

fn describe_options_with_width<'a>(
    options: impl Iterator<Item = &'a InputOption>,
    width: usize,
    output: &mut dyn Output,
) -> Result<(), ConsoleError> {
    output.writeln("<comment>Options:</comment>")?;
    for option in options {
        let multiple = if option.is_array() {
            " <comment>(multiple values allowed)</comment>"
        } else {
            ""
        };
        output.writeln(&format!(
            "  <info>{:width$}</info>  {}{}{}",
            option_synopsis(option),
            indent_continuations(option.description(), width + 4),
            default_suffix(option.default()),
            multiple
        ))?;
    }
    output.writeln("")?;
    Ok(())
}

/// `-f, --foo=FOO` with brackets when the value is optional.
fn option_synopsis(option: &InputOption) -> String {
    let value = if option.accepts_value() {
        let placeholder = format!("={}", option.name().to_uppercase());
        if option.is_value_optional() {
            format!("[{placeholder}]")
        } else {
            placeholder
        }
    } else {
        String::new()
    };
    let shortcut = match option.shortcut() {
        Some(s) => format!("-{s}, "),
        None => "    ".to_string(),
    };
    format!("{shortcut}--{}{}", option.name(), value)
}

fn default_suffix(default: &Value) -> String {
    match default {
        Value::Null | Value::Bool(false) => String::new(),
        Value::Array(items) if items.is_empty() => String::new(),
        other => format!("<comment> [default: {}]</comment>", value_to_json(other)),
    }
}

/// Keeps multi-line descriptions aligned under their own column.
fn indent_continuations(text: &str, pad: usize) -> String {
    if !text.contains('\n') {
        return text.to_string();
    }
    text.replace('\n', &format!("\n{}", " ".repeat(pad)))
}

pub(crate) fn value_to_json(value: &Value) -> serde_json::Value {
    match value {
        Value::Null => serde_json::Value::Null,
        Value::Bool(b) => serde_json::Value::Bool(*b),
        Value::Str(s) => serde_json::Value::String(s.clone()),
        Value::Array(items) => {
            serde_json::Value::Array(items.iter().map(value_to_json).collect())
        }
    }
}

/// Machine-readable descriptions, one JSON document per invocation.
pub struct JsonDescriptor;

impl JsonDescriptor {
    pub fn describe_command(command: &Command, output: &mut dyn Output) -> Result<(), ConsoleError> {
        let description = CommandDescription::new(command);
        let rendered = serde_json::to_string_pretty(&description)?;
        output.do_write(&rendered);
        output.do_write("\n");
        Ok(())
    }

    pub fn describe_application(
        app: &Application,
        namespace: Option<&str>,
        output: &mut dyn Output,
    ) -> Result<(), ConsoleError> {
        let resolved = namespace.map(|ns| app.find_namespace(ns)).transpose()?;
        let mut visible: Vec<&Command> = app
            .commands()
            .iter()
            .filter(|c| !c.is_hidden() && !c.name().is_empty())
            .collect();
        if let Some(ns) = &resolved {
            let depth = ns.split(':').count();
            visible.retain(|c| extract_namespace(c.name(), Some(depth)) == *ns);
        }
        visible.sort_by_key(|c| c.name().to_string());

        let mut namespaces: Vec<NamespaceDescription> = Vec::new();
        for command in &visible {
            let ns = extract_namespace(command.name(), Some(1));
            let id = if ns.is_empty() { "_global".to_string() } else { ns };
            match namespaces.iter_mut().find(|n| n.id == id) {
                Some(group) => group.commands.push(command.name().to_string()),
                None => namespaces.push(NamespaceDescription {
                    id,
                    commands: vec![command.name().to_string()],
                }),
            }
        }
        namespaces.sort_by(|a, b| a.id.cmp(&b.id));

        let description = ApplicationDescription {
            application: ApplicationInfo {
                name: app.name().to_string(),
                version: app.version().to_string(),
            },
            commands: visible.iter().map(|c| CommandDescription::new(c)).collect(),
            namespaces,
        };
        let rendered = serde_json::to_string_pretty(&description)?;
        output.do_write(&rendered);
        output.do_write("\n");
        Ok(())
    }
}

#[derive(Debug, Serialize)]
pub struct ArgumentDescription {
    pub name: String,
    pub is_required: bool,
    pub is_array: bool,
    pub description: String,
    pub default: serde_json::Value,
}

impl From<&InputArgument> for ArgumentDescription {
    fn from(argument: &InputArgument) -> Self {
        Self {
            name: argument.name().to_string(),
            is_required: argument.is_required(),
            is_array: argument.is_array(),
            description: argument.description().to_string(),
            default: value_to_json(argument.default()),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct OptionDescription {
    pub name: String,
    pub shortcut: String,
    pub accept_value: bool,
    pub is_value_required: bool,
    pub is_multiple: bool,
    pub description: String,
    pub default: serde_json::Value,
}

impl From<&InputOption> for OptionDescription {
    fn from(option: &InputOption) -> Self {
        Self {
            name: format!("--{}", option.name()),
            shortcut: option
                .shortcut()
                .map(|s| format!("-{}", s.replace('|', "|-")))
                .unwrap_or_default(),
            accept_value: option.accepts_value(),
            is_value_required: option.is_value_required(),
            is_multiple: option.is_array(),
            description: option.description().to_string(),
            default: value_to_json(option.default()),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CommandDescription {
    pub name: String,
    pub hidden: bool,
    pub usage: Vec<String>,
    pub description: String,
    pub help: String,
    pub arguments: Vec<ArgumentDescription>,
    pub options: Vec<OptionDescription>,
}

impl CommandDescription {
    fn new(command: &Command) -> Self {
        let mut usage = vec![command.synopsis(true)];
        usage.extend(command.aliases().iter().cloned());
        Self {
            name: command.name().to_string(),
            hidden: command.is_hidden(),
            usage,
            description: command.description().to_string(),
            help: command.processed_help(),
            arguments: command.definition().arguments().map(Into::into).collect(),
            options: command.definition().options().map(Into::into).collect(),
        }
    }
}

#[derive(Debug, Serialize)]
struct ApplicationInfo {
    name: String,
    version: String,
}

#[derive(Debug, Serialize)]
pub struct NamespaceDescription {
    pub id: String,
    pub commands: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct ApplicationDescription {
    application: ApplicationInfo,
    commands: Vec<CommandDescription>,
    namespaces: Vec<NamespaceDescription>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::BufferedOutput;
    use rostrum_input::{ArgumentMode, OptionMode};

    fn sample_command() -> Command {
        let mut command = Command::new("greet")
            .with_description("Greet someone")
            .with_code(|_, _| Ok(0));
        command
            .definition_mut()
            .add_argument(
                InputArgument::new("name", ArgumentMode::OPTIONAL, "Who to greet")
                    .with_default("world".into())
                    .unwrap(),
            )
            .unwrap();
        command
            .definition_mut()
            .add_option(
                InputOption::new("yell", Some("y"), OptionMode::VALUE_NONE, "Shout it").unwrap(),
            )
            .unwrap();
        command
    }

    #[test]
    fn option_synopsis_forms() {
        let flag = InputOption::new("yell", Some("y"), OptionMode::VALUE_NONE, "").unwrap();
        assert_eq!(option_synopsis(&flag), "-y, --yell");

        let required = InputOption::new("mode", None, OptionMode::VALUE_REQUIRED, "").unwrap();
        assert_eq!(option_synopsis(&required), "    --mode=MODE");

        let optional = InputOption::new("level", Some("l"), OptionMode::VALUE_OPTIONAL, "").unwrap();
        assert_eq!(option_synopsis(&optional), "-l, --level[=LEVEL]");

        let aliased = InputOption::new("force", Some("f|x"), OptionMode::VALUE_NONE, "").unwrap();
        assert_eq!(option_synopsis(&aliased), "-f|x, --force");
    }

    #[test]
    fn default_suffix_selection() {
        assert_eq!(default_suffix(&Value::Null), "");
        assert_eq!(default_suffix(&Value::Bool(false)), "");
        assert_eq!(default_suffix(&Value::Array(vec![])), "");
        assert_eq!(
            default_suffix(&Value::from("world")),
            "<comment> [default: \"world\"]</comment>"
        );
    }

    #[test]
    fn text_description_sections() {
        let command = sample_command();
        let mut output = BufferedOutput::new(false);
        TextDescriptor::describe_command(&command, &mut output).unwrap();
        let text = output.fetch();

        assert!(text.contains("Description:\n  Greet someone"));
        assert!(text.contains("Usage:\n  greet [options] [--] [<name>]"));
        assert!(text.contains("Arguments:"));
        assert!(text.contains("name"));
        assert!(text.contains("[default: \"world\"]"));
        assert!(text.contains("Options:"));
        assert!(text.contains("-y, --yell"));
    }

    #[test]
    fn json_description_shape() {
        let command = sample_command();
        let mut output = BufferedOutput::new(false);
        JsonDescriptor::describe_command(&command, &mut output).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&output.fetch()).unwrap();

        assert_eq!(parsed["name"], "greet");
        assert_eq!(parsed["arguments"][0]["name"], "name");
        assert_eq!(parsed["arguments"][0]["default"], "world");
        assert_eq!(parsed["options"][0]["name"], "--yell");
        assert_eq!(parsed["options"][0]["shortcut"], "-y");
    }

    #[test]
    fn json_shortcut_repeats_the_dash_per_alias() {
        let option = InputOption::new("force", Some("f|x"), OptionMode::VALUE_NONE, "").unwrap();
        let description = OptionDescription::from(&option);
        assert_eq!(description.shortcut, "-f|-x");
    }
}
