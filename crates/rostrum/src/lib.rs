//! A command-line application framework: register commands on an
//! [`Application`], and it takes care of parsing `argv`, resolving
//! abbreviated names, rendering help and list screens, and turning
//! handler errors into styled output and exit codes.
//!
//! ```
//! use rostrum::{Application, ArgumentMode, Command, Input, InputArgument, Output};
//!
//! let mut app = Application::new("greeter", "1.0.0");
//!
//! let mut command = Command::new("greet")
//!     .with_description("Greet someone")
//!     .with_code(|input, output| {
//!         let name = input.argument("name")?;
//!         output.writeln(&format!("Hello, <info>{name}</info>!"))?;
//!         Ok(0)
//!     });
//! command
//!     .definition_mut()
//!     .add_argument(
//!         InputArgument::new("name", ArgumentMode::OPTIONAL, "Who to greet")
//!             .with_default("world".into())?,
//!     )?;
//! app.add(command)?;
//!
//! let mut input = rostrum::ArgvInput::new(vec!["greet".into()]);
//! let mut output = rostrum::BufferedOutput::new(false);
//! let code = app.try_run(&mut input, &mut output)?;
//! assert_eq!(code, 0);
//! assert_eq!(output.fetch(), "Hello, world!\n");
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod application;
mod command;
mod commands;
mod descriptor;
mod error;
mod output;
mod terminal;

pub use application::Application;
pub use command::{Command, CommandHandler};
pub use descriptor::{
    ApplicationDescription, ArgumentDescription, CommandDescription, NamespaceDescription,
    OptionDescription,
};
pub use error::{ConsoleError, ExitError};
pub use output::{BufferedOutput, Output, StreamOutput, Verbosity};
pub use terminal::Terminal;

pub use rostrum_input::{
    ArgumentMode, ArgvInput, CollectionInput, DefinitionError, Input, InputArgument,
    InputDefinition, InputError, InputOption, OptionMode, Value,
};
pub use rostrum_markup::{Attribute, Color, Formatter, MarkupError, Style};
