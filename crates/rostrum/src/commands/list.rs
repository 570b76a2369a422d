use rostrum_input::{ArgumentMode, InputArgument, InputDefinition, InputOption, OptionMode};

use crate::command::{Builtin, Command};

pub(crate) fn list_command() -> Command {
    let mut definition = InputDefinition::new();
    definition
        .add_argument(InputArgument::new(
            "namespace",
            ArgumentMode::OPTIONAL,
            "The namespace name",
        ))
        .expect("namespace argument registers");
    definition
        .add_option(
            InputOption::new("raw", None, OptionMode::VALUE_NONE, "To output raw command list")
                .expect("raw option is well formed"),
        )
        .expect("raw option registers");
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

    Command::builtin("list", Builtin::List)
        .with_definition(definition)
        .with_description("List commands")
        .with_help(
            "The <info>%command.name%</info> command lists all commands:

  <info>%command.full_name%</info>

You can also display the commands for a specific namespace:

  <info>%command.full_name% test</info>

You can also output the information in other formats by using the <comment>--format</comment> option:

  <info>%command.full_name% --format=json</info>",
        )
}
