//! The [`Input`] trait and the shared binding state behind it.

use indexmap::IndexMap;

use crate::{InputDefinition, InputError, Value};

/// Values bound against a definition, shared by every input flavor.
#[derive(Debug, Clone)]
pub struct Bound {
    pub(crate) definition: InputDefinition,
    pub(crate) arguments: IndexMap<String, Value>,
    pub(crate) options: IndexMap<String, Value>,
    interactive: bool,
}

impl Default for Bound {
    fn default() -> Self {
        Self {
            definition: InputDefinition::new(),
            arguments: IndexMap::new(),
            options: IndexMap::new(),
            interactive: true,
        }
    }
}

impl Bound {
    pub(crate) fn reset(&mut self, definition: InputDefinition) {
        self.definition = definition;
        self.arguments.clear();
        self.options.clear();
    }

    pub fn definition(&self) -> &InputDefinition {
        &self.definition
    }

    pub fn validate(&self) -> Result<(), InputError> {
        let missing: Vec<&str> = self
            .definition
            .arguments()
            .filter(|a| a.is_required() && !self.arguments.contains_key(a.name()))
            .map(|a| a.name())
            .collect();
        if missing.is_empty() {
            Ok(())
        } else {
            Err(InputError::MissingArguments(missing.join(", ")))
        }
    }

    pub fn arguments(&self) -> IndexMap<String, Value> {
        let mut all = self.definition.argument_defaults();
        for (name, value) in &self.arguments {
            all.insert(name.clone(), value.clone());
        }
        all
    }

    pub fn argument(&self, name: &str) -> Result<Value, InputError> {
        let declared = self.definition.argument(name)?;
        Ok(self
            .arguments
            .get(name)
            .cloned()
            .unwrap_or_else(|| declared.default().clone()))
    }

    pub fn set_argument(&mut self, name: &str, value: Value) -> Result<(), InputError> {
        self.definition.argument(name)?;
        self.arguments.insert(name.to_string(), value);
        Ok(())
    }

    pub fn has_argument(&self, name: &str) -> bool {
        self.definition.has_argument(name)
    }

    pub fn options(&self) -> IndexMap<String, Value> {
        let mut all = self.definition.option_defaults();
        for (name, value) in &self.options {
            all.insert(name.clone(), value.clone());
        }
        all
    }

    pub fn option(&self, name: &str) -> Result<Value, InputError> {
        let declared = self.definition.option(name)?;
        Ok(self
            .options
            .get(name)
            .cloned()
            .unwrap_or_else(|| declared.default().clone()))
    }

    pub fn set_option(&mut self, name: &str, value: Value) -> Result<(), InputError> {
        self.definition.option(name)?;
        self.options.insert(name.to_string(), value);
        Ok(())
    }

    pub fn has_option(&self, name: &str) -> bool {
        self.definition.has_option(name)
    }

    pub fn is_interactive(&self) -> bool {
        self.interactive
    }

    pub fn set_interactive(&mut self, interactive: bool) {
        self.interactive = interactive;
    }
}

/// A source of command-line input.
///
/// Implementations carry raw parameters (argv tokens, a value collection)
/// and parse them against a definition on [`Input::bind`]. The raw side can
/// also be probed before binding, which is how an application reads
/// `--verbose` or `--no-ansi` before it knows which command will run.
pub trait Input {
    fn bound(&self) -> &Bound;

    fn bound_mut(&mut self) -> &mut Bound;

    /// Re-parses the raw parameters against the freshly installed
    /// definition. Called by [`Input::bind`].
    fn parse(&mut self) -> Result<(), InputError>;

    /// The first raw positional token, if any. Works without a definition
    /// and is how an application learns the requested command name.
    fn first_argument(&self) -> Option<String>;

    /// Raw presence probe for any of `values` (e.g. `["--ansi"]` or
    /// `["-q", "--quiet"]`). With `only_params`, scanning stops at `--`.
    fn has_parameter_option(&self, values: &[&str], only_params: bool) -> bool;

    /// Raw value probe: the value of the first of `values` present, or
    /// `default`. Same pre-binding caveats as `has_parameter_option`.
    fn parameter_option(&self, values: &[&str], default: Value, only_params: bool) -> Value;

    fn bind(&mut self, definition: &InputDefinition) -> Result<(), InputError> {
        self.bound_mut().reset(definition.clone());
        self.parse()
    }

    fn validate(&self) -> Result<(), InputError> {
        self.bound().validate()
    }

    fn definition(&self) -> &InputDefinition {
        self.bound().definition()
    }

    fn arguments(&self) -> IndexMap<String, Value> {
        self.bound().arguments()
    }

    fn argument(&self, name: &str) -> Result<Value, InputError> {
        self.bound().argument(name)
    }

    fn set_argument(&mut self, name: &str, value: Value) -> Result<(), InputError> {
        self.bound_mut().set_argument(name, value)
    }

    fn has_argument(&self, name: &str) -> bool {
        self.bound().has_argument(name)
    }

    fn options(&self) -> IndexMap<String, Value> {
        self.bound().options()
    }

    fn option(&self, name: &str) -> Result<Value, InputError> {
        self.bound().option(name)
    }

    fn set_option(&mut self, name: &str, value: Value) -> Result<(), InputError> {
        self.bound_mut().set_option(name, value)
    }

    fn has_option(&self, name: &str) -> bool {
        self.bound().has_option(name)
    }

    fn is_interactive(&self) -> bool {
        self.bound().is_interactive()
    }

    fn set_interactive(&mut self, interactive: bool) {
        self.bound_mut().set_interactive(interactive)
    }
}

/// Quotes a token for shell display unless it is a plain word.
pub(crate) fn escape_token(token: &str) -> String {
    let plain = !token.is_empty()
        && token
            .chars()
            .all(|c| c.is_alphanumeric() || c == '_' || c == '-');
    if plain {
        token.to_string()
    } else {
        shell_words::quote(token).into_owned()
    }
}
