//! Argument and option schemas.

use std::collections::HashMap;

use bitflags::bitflags;
use indexmap::IndexMap;

use crate::{DefinitionError, InputError, Value};

bitflags! {
    /// How a positional argument behaves.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct ArgumentMode: u8 {
        const REQUIRED = 1;
        const OPTIONAL = 2;
        /// Consumes every remaining positional token. Only valid on the
        /// last declared argument.
        const IS_ARRAY = 4;
    }
}

impl Default for ArgumentMode {
    fn default() -> Self {
        ArgumentMode::OPTIONAL
    }
}

bitflags! {
    /// How an option treats its value.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct OptionMode: u8 {
        /// A pure flag. Presence binds `true`.
        const VALUE_NONE = 1;
        const VALUE_REQUIRED = 2;
        const VALUE_OPTIONAL = 4;
        /// Repeatable; every occurrence appends. Requires one of
        /// `VALUE_REQUIRED` or `VALUE_OPTIONAL`.
        const VALUE_IS_ARRAY = 8;
    }
}

impl Default for OptionMode {
    fn default() -> Self {
        OptionMode::VALUE_NONE
    }
}

/// A declared positional argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputArgument {
    name: String,
    mode: ArgumentMode,
    description: String,
    default: Value,
}

impl InputArgument {
    pub fn new(
        name: impl Into<String>,
        mode: ArgumentMode,
        description: impl Into<String>,
    ) -> Self {
        let default = if mode.contains(ArgumentMode::IS_ARRAY) {
            Value::Array(Vec::new())
        } else {
            Value::Null
        };
        Self {
            name: name.into(),
            mode,
            description: description.into(),
            default,
        }
    }

    /// Attaches a default, enforced against the mode: required arguments
    /// take no default, array arguments only take array (or null) ones.
    pub fn with_default(mut self, default: Value) -> Result<Self, DefinitionError> {
        self.set_default(default)?;
        Ok(self)
    }

    pub fn set_default(&mut self, default: Value) -> Result<(), DefinitionError> {
        if self.is_required() && !default.is_null() {
            return Err(DefinitionError::DefaultOnRequiredArgument);
        }
        if self.is_array() {
            match default {
                Value::Null => {
                    self.default = Value::Array(Vec::new());
                    return Ok(());
                }
                Value::Array(_) => {}
                _ => return Err(DefinitionError::ArrayArgumentDefault),
            }
        }
        self.default = default;
        Ok(())
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_required(&self) -> bool {
        self.mode.contains(ArgumentMode::REQUIRED)
    }

    pub fn is_array(&self) -> bool {
        self.mode.contains(ArgumentMode::IS_ARRAY)
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn default(&self) -> &Value {
        &self.default
    }
}

/// A declared option, addressed as `--name` or by one-letter shortcuts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputOption {
    name: String,
    /// Pipe-joined single-character aliases, e.g. `"f"` or `"f|x"`.
    shortcut: Option<String>,
    mode: OptionMode,
    description: String,
    default: Value,
}

impl InputOption {
    /// Leading dashes on the name are stripped, so `"--foo"` and `"foo"`
    /// declare the same option. A shortcut may list several one-character
    /// aliases, pipe-separated and with or without their own dashes:
    /// `"f"`, `"f|x"` and `"-f|-x"` all work.
    pub fn new(
        name: impl Into<String>,
        shortcut: Option<&str>,
        mode: OptionMode,
        description: impl Into<String>,
    ) -> Result<Self, DefinitionError> {
        let name = name.into();
        let name = name.trim_start_matches('-').to_string();
        if name.is_empty() {
            return Err(DefinitionError::EmptyOptionName);
        }
        let shortcut = match shortcut {
            Some(raw) => {
                let aliases: Vec<String> = raw
                    .split('|')
                    .map(|part| part.trim_start_matches('-'))
                    .filter(|part| !part.is_empty())
                    .flat_map(|part| part.chars())
                    .map(String::from)
                    .collect();
                if aliases.is_empty() {
                    return Err(DefinitionError::EmptyOptionShortcut);
                }
                Some(aliases.join("|"))
            }
            None => None,
        };
        if mode.contains(OptionMode::VALUE_IS_ARRAY)
            && !mode.intersects(OptionMode::VALUE_REQUIRED | OptionMode::VALUE_OPTIONAL)
        {
            return Err(DefinitionError::ArrayWithoutValue);
        }

        let mut option = Self {
            name,
            shortcut,
            mode,
            description: description.into(),
            default: Value::Null,
        };
        // Normalizes the do-not-care default: arrays start empty, flags
        // start false.
        option.set_default(Value::Null)?;
        Ok(option)
    }

    pub fn with_default(mut self, default: Value) -> Result<Self, DefinitionError> {
        self.set_default(default)?;
        Ok(self)
    }

    pub fn set_default(&mut self, default: Value) -> Result<(), DefinitionError> {
        if self.mode.contains(OptionMode::VALUE_NONE) && !default.is_null() {
            return Err(DefinitionError::DefaultOnValuelessOption);
        }
        let default = if self.is_array() {
            match default {
                Value::Null => Value::Array(Vec::new()),
                Value::Array(items) => Value::Array(items),
                _ => return Err(DefinitionError::ArrayOptionDefault),
            }
        } else {
            default
        };
        self.default = if self.accepts_value() {
            default
        } else {
            Value::Bool(false)
        };
        Ok(())
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The normalized pipe-joined shortcut string, if any.
    pub fn shortcut(&self) -> Option<&str> {
        self.shortcut.as_deref()
    }

    /// Every single-character alias, in declaration order.
    pub fn shortcut_chars(&self) -> impl Iterator<Item = char> + '_ {
        self.shortcut
            .as_deref()
            .into_iter()
            .flat_map(|s| s.split('|'))
            .filter_map(|alias| alias.chars().next())
    }

    pub fn accepts_value(&self) -> bool {
        self.mode
            .intersects(OptionMode::VALUE_REQUIRED | OptionMode::VALUE_OPTIONAL)
    }

    pub fn is_value_required(&self) -> bool {
        self.mode.contains(OptionMode::VALUE_REQUIRED)
    }

    pub fn is_value_optional(&self) -> bool {
        self.mode.contains(OptionMode::VALUE_OPTIONAL)
    }

    pub fn is_array(&self) -> bool {
        self.mode.contains(OptionMode::VALUE_IS_ARRAY)
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn default(&self) -> &Value {
        &self.default
    }

    /// Behavioral equality: everything except the description.
    pub fn equals(&self, other: &InputOption) -> bool {
        self.name == other.name
            && self.shortcut == other.shortcut
            && self.default == other.default
            && self.is_array() == other.is_array()
            && self.is_value_required() == other.is_value_required()
            && self.is_value_optional() == other.is_value_optional()
    }
}

/// The complete input schema of a command: ordered positional arguments
/// plus named options with optional shortcuts.
#[derive(Debug, Clone, Default)]
pub struct InputDefinition {
    arguments: IndexMap<String, InputArgument>,
    required_count: usize,
    last_optional: Option<String>,
    last_array: Option<String>,
    options: IndexMap<String, InputOption>,
    shortcuts: HashMap<char, String>,
}

impl InputDefinition {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces every declared argument.
    pub fn set_arguments(&mut self, arguments: Vec<InputArgument>) -> Result<(), DefinitionError> {
        self.arguments.clear();
        self.required_count = 0;
        self.last_optional = None;
        self.last_array = None;
        self.add_arguments(arguments)
    }

    pub fn add_arguments(&mut self, arguments: Vec<InputArgument>) -> Result<(), DefinitionError> {
        for argument in arguments {
            self.add_argument(argument)?;
        }
        Ok(())
    }

    /// Appends an argument, enforcing declaration order: nothing after an
    /// array argument, no required argument after an optional one.
    pub fn add_argument(&mut self, argument: InputArgument) -> Result<(), DefinitionError> {
        if self.arguments.contains_key(argument.name()) {
            return Err(DefinitionError::ArgumentAlreadyExists(
                argument.name().to_string(),
            ));
        }
        if let Some(prev) = &self.last_array {
            return Err(DefinitionError::ArgumentAfterArray(
                argument.name().to_string(),
                prev.clone(),
            ));
        }
        if argument.is_required() {
            if let Some(prev) = &self.last_optional {
                return Err(DefinitionError::RequiredAfterOptional(
                    argument.name().to_string(),
                    prev.clone(),
                ));
            }
            self.required_count += 1;
        } else {
            self.last_optional = Some(argument.name().to_string());
        }
        if argument.is_array() {
            self.last_array = Some(argument.name().to_string());
        }
        self.arguments
            .insert(argument.name().to_string(), argument);
        Ok(())
    }

    pub fn has_argument(&self, name: &str) -> bool {
        self.arguments.contains_key(name)
    }

    pub fn has_argument_at(&self, index: usize) -> bool {
        index < self.arguments.len()
    }

    pub fn argument(&self, name: &str) -> Result<&InputArgument, InputError> {
        self.arguments
            .get(name)
            .ok_or_else(|| InputError::UnknownArgument(name.to_string()))
    }

    pub fn argument_at(&self, index: usize) -> Option<&InputArgument> {
        self.arguments.get_index(index).map(|(_, a)| a)
    }

    pub fn arguments(&self) -> impl Iterator<Item = &InputArgument> {
        self.arguments.values()
    }

    /// Number of positional slots, unbounded when the last one is an array.
    pub fn argument_count(&self) -> usize {
        if self.last_array.is_some() {
            usize::MAX
        } else {
            self.arguments.len()
        }
    }

    pub fn required_argument_count(&self) -> usize {
        self.required_count
    }

    pub fn argument_defaults(&self) -> IndexMap<String, Value> {
        self.arguments
            .values()
            .map(|a| (a.name().to_string(), a.default().clone()))
            .collect()
    }

    pub fn set_options(&mut self, options: Vec<InputOption>) -> Result<(), DefinitionError> {
        self.options.clear();
        self.shortcuts.clear();
        self.add_options(options)
    }

    pub fn add_options(&mut self, options: Vec<InputOption>) -> Result<(), DefinitionError> {
        for option in options {
            self.add_option(option)?;
        }
        Ok(())
    }

    /// Registers an option. Re-adding a behaviorally identical option is a
    /// no-op; a conflicting name or shortcut is an error.
    pub fn add_option(&mut self, option: InputOption) -> Result<(), DefinitionError> {
        if let Some(existing) = self.options.get(option.name()) {
            if !existing.equals(&option) {
                return Err(DefinitionError::OptionAlreadyExists(
                    option.name().to_string(),
                ));
            }
        }
        for shortcut in option.shortcut_chars() {
            if let Some(owner) = self.shortcuts.get(&shortcut) {
                if owner != option.name() && !self.options[owner.as_str()].equals(&option) {
                    return Err(DefinitionError::ShortcutAlreadyExists(shortcut));
                }
            }
            self.shortcuts.insert(shortcut, option.name().to_string());
        }
        self.options.insert(option.name().to_string(), option);
        Ok(())
    }

    pub fn has_option(&self, name: &str) -> bool {
        self.options.contains_key(name)
    }

    pub fn option(&self, name: &str) -> Result<&InputOption, InputError> {
        self.options
            .get(name)
            .ok_or_else(|| InputError::UnknownOption(format!("--{name}")))
    }

    pub fn options(&self) -> impl Iterator<Item = &InputOption> {
        self.options.values()
    }

    pub fn has_shortcut(&self, shortcut: char) -> bool {
        self.shortcuts.contains_key(&shortcut)
    }

    pub fn option_for_shortcut(&self, shortcut: char) -> Result<&InputOption, InputError> {
        let name = self
            .shortcuts
            .get(&shortcut)
            .ok_or_else(|| InputError::UnknownOption(format!("-{shortcut}")))?;
        self.option(name)
    }

    pub fn shortcut_to_name(&self, shortcut: char) -> Option<&str> {
        self.shortcuts.get(&shortcut).map(String::as_str)
    }

    pub fn option_defaults(&self) -> IndexMap<String, Value> {
        self.options
            .values()
            .map(|o| (o.name().to_string(), o.default().clone()))
            .collect()
    }

    /// One-line usage summary. With `short`, options collapse to a single
    /// `[options]` placeholder.
    pub fn synopsis(&self, short: bool) -> String {
        let mut elements: Vec<String> = Vec::new();

        if short && !self.options.is_empty() {
            elements.push("[options]".to_string());
        } else if !short {
            for option in self.options.values() {
                let value = if option.accepts_value() {
                    format!(
                        " {}{}{}",
                        if option.is_value_optional() { "[" } else { "" },
                        option.name().to_uppercase(),
                        if option.is_value_optional() { "]" } else { "" },
                    )
                } else {
                    String::new()
                };
                let shortcut = option
                    .shortcut()
                    .map(|s| format!("-{s}|"))
                    .unwrap_or_default();
                elements.push(format!("[{}--{}{}]", shortcut, option.name(), value));
            }
        }

        if !elements.is_empty() && !self.arguments.is_empty() {
            elements.push("[--]".to_string());
        }

        let mut tail = String::new();
        for argument in self.arguments.values() {
            let mut element = format!("<{}>", argument.name());
            if argument.is_array() {
                element.push_str("...");
            }
            if !argument.is_required() {
                element.insert(0, '[');
                tail.push(']');
            }
            elements.push(element);
        }

        elements.join(" ") + &tail
    }
}
