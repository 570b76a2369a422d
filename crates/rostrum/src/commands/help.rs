use rostrum_input::{ArgumentMode, InputArgument, InputDefinition, InputOption, OptionMode};

use crate::command::{Builtin, Command};

pub(crate) fn help_command() -> Command {
    let mut definition = InputDefinition::new();
    definition
        .add_argument(
            InputArgument::new(
                "command_name",
                ArgumentMode::OPTIONAL,
                "The command name",
            )
            .with_default("help".into())
            .expect("optional argument accepts a default"),
        )
        .expect("help argument registers");
    definition
        .add_option(
            InputOption::new(
                "format",
                None,
                OptionMode::VALUE_REQUIRED,
                "The output format (txt or json)",
            )
            .expect("format option is well formed")
            .with_default("txt".into())
            .expect("valued option accepts a default"),
        )
        .expect("format option registers");
    definition
        .add_option(
            InputOption::new("raw", None, OptionMode::VALUE_NONE, "To output raw command help")
                .expect("raw option is well formed"),
        )
        .expect("raw option registers");

    Command::builtin("help", Builtin::Help)
        .with_definition(definition)
        .with_description("Display help for a command")
        .with_help(
            "The <info>%command.name%</info> command displays help for a given command:

  <info>%command.full_name% list</info>

You can also output the help in other formats by using the <comment>--format</comment> option:

  <info>%command.full_name% --format=json list</info>

To display the list of available commands, please use the <info>list</info> command.",
        )
}
