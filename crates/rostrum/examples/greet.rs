//! A tiny two-command application. Try:
//!
//! ```sh
//! cargo run --example greet -- greet Ada --yell
//! cargo run --example greet -- help greet
//! cargo run --example greet -- list --format=json
//! ```

use rostrum::{
    Application, ArgumentMode, Command, Input, InputArgument, InputOption, OptionMode, Output,
};

fn main() {
    let mut app = Application::new("greet", "1.0.0");
    if let Err(err) = register(&mut app) {
        eprintln!("{err}");
        std::process::exit(1);
    }
    std::process::exit(app.run_from_env());
}

fn register(app: &mut Application) -> Result<(), Box<dyn std::error::Error>> {
    let mut greet = Command::new("greet")
        .with_description("Greet someone by name")
        .with_code(greet_code);
    greet.definition_mut().add_argument(
        InputArgument::new("name", ArgumentMode::OPTIONAL, "Who to greet")
            .with_default("world".into())?,
    )?;
    greet
        .definition_mut()
        .add_option(InputOption::new(
            "yell",
            Some("y"),
            OptionMode::VALUE_NONE,
            "Print the greeting in upper case",
        )?)?;
    app.add(greet)?;

    let mut wave = Command::new("farewell:wave")
        .with_description("Wave goodbye")
        .with_code(|_input, output| {
            output.writeln("<comment>o/</comment>")?;
            Ok(0)
        });
    wave.set_aliases(vec!["wave".to_string()]);
    app.add(wave)?;

    Ok(())
}

fn greet_code(input: &mut dyn Input, output: &mut dyn Output) -> anyhow::Result<i32> {
    let name = input.argument("name")?.to_string();
    let line = if input.option("yell")? == rostrum::Value::Bool(true) {
        format!("<info>HELLO, {}!</info>", name.to_uppercase())
    } else {
        format!("Hello, <info>{name}</info>!")
    };
    output.writeln(&line)?;
    Ok(0)
}
