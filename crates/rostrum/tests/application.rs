//! End-to-end runs through [`Application`]: name resolution, built-in
//! commands, global options and error rendering.

use serial_test::serial;

use rostrum::{
    Application, ArgumentMode, ArgvInput, BufferedOutput, Command, ConsoleError, ExitError, Input,
    InputArgument, InputOption, OptionMode, Verbosity,
};

fn greet_app() -> Application {
    let mut app = Application::new("greeter", "1.2.3");

    let mut greet = Command::new("greet")
        .with_description("Greet someone")
        .with_code(|input, output| {
            let name = input.argument("name")?.to_string();
            let greeting = if input.option("yell")? == rostrum::Value::Bool(true) {
                format!("HELLO, {}!", name.to_uppercase())
            } else {
                format!("Hello, {name}!")
            };
            output.writeln(&greeting)?;
            Ok(0)
        });
    greet
        .definition_mut()
        .add_argument(
            InputArgument::new("name", ArgumentMode::OPTIONAL, "Who to greet")
                .with_default("world".into())
                .unwrap(),
        )
        .unwrap();
    greet
        .definition_mut()
        .add_option(InputOption::new("yell", Some("y"), OptionMode::VALUE_NONE, "Shout").unwrap())
        .unwrap();
    app.add(greet).unwrap();

    app
}

fn run(app: &mut Application, tokens: &[&str]) -> (i32, String) {
    let mut input = ArgvInput::new(tokens.iter().map(|t| t.to_string()).collect());
    input.set_interactive(false);
    let mut output = BufferedOutput::new(false);
    let code = app.run(&mut input, &mut output);
    (code, output.fetch())
}

#[test]
fn builtins_are_registered() {
    let app = Application::new("app", "1.0");
    assert!(app.has("help"));
    assert!(app.has("list"));
}

#[test]
fn find_is_exact_by_name_or_alias() {
    let mut app = greet_app();
    app.add(
        Command::new("test-foo")
            .with_aliases(vec!["test".to_string()])
            .with_code(|_, _| Ok(0)),
    )
    .unwrap();
    app.add(Command::new("test-bar").with_code(|_, _| Ok(0))).unwrap();

    assert_eq!(app.find("greet").unwrap().name(), "greet");
    // The alias hit is exact, never scanned against "test-bar".
    assert_eq!(app.find("test").unwrap().name(), "test-foo");

    let err = app.find("gre").unwrap_err();
    match err {
        ConsoleError::CommandNotFound(message) => {
            assert_eq!(message, "The command \"gre\" does not exist.");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn namespaces_abbreviate_but_commands_do_not() {
    let mut app = greet_app();
    app.add(
        Command::new("cache:clear")
            .with_description("Clear the cache")
            .with_code(|_, _| Ok(0)),
    )
    .unwrap();

    assert_eq!(app.find_namespace("ca").unwrap(), "cache");
    assert_eq!(app.find_namespace("cache").unwrap(), "cache");
    assert!(app.find("cache:c").is_err());
}

#[test]
fn ambiguous_namespace_lists_candidates() {
    let mut app = greet_app();
    app.add(Command::new("cache:clear").with_code(|_, _| Ok(0))).unwrap();
    app.add(Command::new("cargo:build").with_code(|_, _| Ok(0))).unwrap();

    let err = app.find_namespace("ca").unwrap_err();
    match err {
        ConsoleError::NamespaceNotFound(message) => {
            assert!(message.starts_with("The namespace \"ca\" is ambiguous."));
            assert!(message.contains("cache"));
            assert!(message.contains("cargo"));
        }
        other => panic!("unexpected error: {other}"),
    }

    let err = app.find_namespace("nope").unwrap_err();
    match err {
        ConsoleError::NamespaceNotFound(message) => {
            assert_eq!(
                message,
                "There are no commands defined in the \"nope\" namespace."
            );
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
#[serial]
fn runs_a_command_with_arguments_and_options() {
    let mut app = greet_app();

    let (code, text) = run(&mut app, &["greet", "Ada", "--yell"]);
    assert_eq!(code, 0);
    assert_eq!(text, "HELLO, ADA!\n");

    let (code, text) = run(&mut app, &["greet"]);
    assert_eq!(code, 0);
    assert_eq!(text, "Hello, world!\n");
}

#[test]
#[serial]
fn no_command_runs_the_default_list() {
    let mut app = greet_app();
    let (code, text) = run(&mut app, &[]);
    assert_eq!(code, 0);
    assert!(text.contains("Available commands:"));
    assert!(text.contains("greet"));
}

#[test]
#[serial]
fn version_flag_prints_the_long_version() {
    let mut app = greet_app();
    let (code, text) = run(&mut app, &["--version"]);
    assert_eq!(code, 0);
    assert_eq!(text, "greeter 1.2.3\n");
}

#[test]
#[serial]
fn help_flag_describes_the_command() {
    let mut app = greet_app();
    let (code, text) = run(&mut app, &["greet", "--help"]);
    assert_eq!(code, 0);
    assert!(text.contains("Description:"));
    assert!(text.contains("Greet someone"));
    assert!(text.contains("Usage:"));
    assert!(text.contains("greet [options]"));
    assert!(text.contains("-y, --yell"));
}

#[test]
#[serial]
fn help_flag_keeps_presentation_options() {
    let mut app = greet_app();
    let (code, text) = run(&mut app, &["greet", "--help", "--format=json"]);
    assert_eq!(code, 0);
    let parsed: serde_json::Value = serde_json::from_str(&text).unwrap();
    assert_eq!(parsed["name"], "greet");
}

#[test]
#[serial]
fn help_command_supports_json_format() {
    let mut app = greet_app();
    let (code, text) = run(&mut app, &["help", "--format=json", "greet"]);
    assert_eq!(code, 0);
    let parsed: serde_json::Value = serde_json::from_str(&text).unwrap();
    assert_eq!(parsed["name"], "greet");
    assert_eq!(parsed["arguments"][0]["name"], "name");
}

#[test]
#[serial]
fn list_groups_commands_by_namespace() {
    let mut app = greet_app();
    app.add(
        Command::new("cache:clear")
            .with_description("Clear the cache")
            .with_code(|_, _| Ok(0)),
    )
    .unwrap();

    let (code, text) = run(&mut app, &["list"]);
    assert_eq!(code, 0);
    assert!(text.contains(" cache\n"));
    assert!(text.contains("cache:clear"));

    let (code, text) = run(&mut app, &["list", "cache"]);
    assert_eq!(code, 0);
    assert!(text.contains("Available commands for the \"cache\" namespace:"));
    assert!(text.contains("cache:clear"));
    assert!(!text.contains("greet "));
}

#[test]
#[serial]
fn unknown_command_renders_error_and_returns_one() {
    let mut app = greet_app();
    let (code, text) = run(&mut app, &["nope"]);
    assert_eq!(code, 1);
    assert!(text.contains("The command \"nope\" does not exist."));
}

#[test]
#[serial]
fn exit_error_carries_its_code() {
    let mut app = greet_app();
    app.add(Command::new("fail").with_code(|_, _| {
        Err(ExitError::new(3, anyhow::anyhow!("it broke")).into())
    }))
    .unwrap();

    let (code, text) = run(&mut app, &["fail"]);
    assert_eq!(code, 3);
    assert!(text.contains("it broke"));
}

#[test]
#[serial]
fn quiet_suppresses_command_output() {
    let mut app = greet_app();
    let (code, text) = run(&mut app, &["greet", "--quiet"]);
    assert_eq!(code, 0);
    assert_eq!(text, "");
    std::env::remove_var("SHELL_VERBOSITY");
}

#[test]
#[serial]
fn verbosity_flags_set_the_level() {
    std::env::remove_var("SHELL_VERBOSITY");
    let mut app = greet_app();
    let mut checked = Command::new("check").with_code(|_, output| {
        assert_eq!(output.verbosity(), Verbosity::Debug);
        Ok(0)
    });
    checked.set_description("Check verbosity");
    app.add(checked).unwrap();

    let (code, _) = run(&mut app, &["check", "-vvv"]);
    assert_eq!(code, 0);
    assert_eq!(std::env::var("SHELL_VERBOSITY").as_deref(), Ok("3"));
    std::env::remove_var("SHELL_VERBOSITY");
}

#[test]
#[serial]
fn shell_verbosity_env_is_the_baseline() {
    std::env::set_var("SHELL_VERBOSITY", "2");
    let mut app = greet_app();
    let mut checked = Command::new("check").with_code(|_, output| {
        assert_eq!(output.verbosity(), Verbosity::VeryVerbose);
        Ok(0)
    });
    checked.set_description("Check verbosity");
    app.add(checked).unwrap();

    let (code, _) = run(&mut app, &["check"]);
    assert_eq!(code, 0);
    std::env::remove_var("SHELL_VERBOSITY");
}

#[test]
#[serial]
fn single_command_applications_skip_the_command_name() {
    let mut app = greet_app();
    app.set_default_command("greet", true).unwrap();

    let (code, text) = run(&mut app, &["Ada"]);
    assert_eq!(code, 0);
    assert_eq!(text, "Hello, Ada!\n");
}
