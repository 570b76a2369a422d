//! Error types for input definitions and binding.

/// Errors raised while building an [`crate::InputDefinition`].
///
/// These are programmer mistakes in the definition itself, not bad user
/// input, so they surface at registration time.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DefinitionError {
    #[error("An argument with name \"{0}\" already exists.")]
    ArgumentAlreadyExists(String),

    #[error("Cannot add a required argument \"{0}\" after an optional one \"{1}\".")]
    RequiredAfterOptional(String, String),

    #[error("Cannot add an argument \"{0}\" after an array argument \"{1}\".")]
    ArgumentAfterArray(String, String),

    #[error("Cannot set a default value for a required argument.")]
    DefaultOnRequiredArgument,

    #[error("A default value for an array argument must be an array.")]
    ArrayArgumentDefault,

    #[error("An option name cannot be empty.")]
    EmptyOptionName,

    #[error("An option shortcut cannot be empty.")]
    EmptyOptionShortcut,

    #[error("An option named \"{0}\" already exists.")]
    OptionAlreadyExists(String),

    #[error("An option with shortcut \"{0}\" already exists.")]
    ShortcutAlreadyExists(char),

    #[error("Impossible to have an option mode VALUE_IS_ARRAY if the option does not accept a value.")]
    ArrayWithoutValue,

    #[error("Cannot set a default value when using OptionMode::VALUE_NONE mode.")]
    DefaultOnValuelessOption,

    #[error("A default value for an array option must be an array.")]
    ArrayOptionDefault,
}

/// Errors raised while binding or reading user input.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InputError {
    /// The token named an option the definition does not declare. Carries
    /// the option as written, dashes included (`--foo` or `-f`).
    #[error("The \"{0}\" option does not exist.")]
    UnknownOption(String),

    #[error("The \"{0}\" option does not accept a value.")]
    OptionRejectsValue(String),

    #[error("The \"{0}\" option requires a value.")]
    OptionRequiresValue(String),

    /// Carries the quoted, space-separated list of declared argument names.
    #[error("Too many arguments, expected arguments \"{0}\".")]
    TooManyArguments(String),

    #[error("No arguments expected, got \"{0}\".")]
    NoArgumentsExpected(String),

    /// Carries the comma-separated list of missing required arguments.
    #[error("Not enough arguments (missing: \"{0}\").")]
    MissingArguments(String),

    #[error("The \"{0}\" argument does not exist.")]
    UnknownArgument(String),
}
