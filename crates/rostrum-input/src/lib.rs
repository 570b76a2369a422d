//! Declarative command-line input: definitions, parsing and binding.
//!
//! A command declares what it takes as an [`InputDefinition`] of positional
//! [`InputArgument`]s and named [`InputOption`]s. Concrete input sources
//! ([`ArgvInput`] for shell tokens, [`CollectionInput`] for programmatic
//! calls) bind against a definition and expose validated, defaulted values
//! through the [`Input`] trait.
//!
//! ```rust
//! use rostrum_input::{
//!     ArgumentMode, ArgvInput, Input, InputArgument, InputDefinition, InputOption,
//!     OptionMode, Value,
//! };
//!
//! let mut definition = InputDefinition::new();
//! definition.add_argument(InputArgument::new("name", ArgumentMode::REQUIRED, "Who to greet"))?;
//! definition.add_option(InputOption::new("yell", Some("y"), OptionMode::VALUE_NONE, "Shout")?)?;
//!
//! let mut input = ArgvInput::new(vec!["alice".into(), "-y".into()]);
//! input.bind(&definition)?;
//! assert_eq!(input.argument("name")?, Value::from("alice"));
//! assert_eq!(input.option("yell")?, Value::Bool(true));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod argv;
mod collection;
mod definition;
mod error;
mod input;
mod value;

pub use argv::ArgvInput;
pub use collection::CollectionInput;
pub use definition::{ArgumentMode, InputArgument, InputDefinition, InputOption, OptionMode};
pub use error::{DefinitionError, InputError};
pub use input::{Bound, Input};
pub use value::Value;
