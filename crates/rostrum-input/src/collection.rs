//! Input assembled programmatically instead of parsed from a shell.

use std::fmt;

use crate::input::escape_token;
use crate::{Bound, Input, InputError, Value};

/// Input built from named parameters, for calling one command from
/// another or from tests. Keys follow the argv look: `--name` and `-s`
/// address options, anything else names an argument, and a literal `--`
/// entry marks the end of options for the raw probes.
#[derive(Debug, Clone, Default)]
pub struct CollectionInput {
    params: Vec<(String, Value)>,
    bound: Bound,
}

impl CollectionInput {
    pub fn new(params: Vec<(String, Value)>) -> Self {
        Self {
            params,
            bound: Bound::default(),
        }
    }

    /// Convenience for the common "just a command name" case.
    pub fn of_command(name: &str) -> Self {
        Self::new(vec![("command".to_string(), Value::from(name))])
    }

    fn add_long_option(&mut self, name: &str, value: Value) -> Result<(), InputError> {
        let option = self
            .bound
            .definition
            .option(name)
            .map_err(|_| InputError::UnknownOption(format!("--{name}")))?;
        let (required, optional, canonical) = (
            option.is_value_required(),
            option.is_value_optional(),
            option.name().to_string(),
        );

        let value = if value.is_null() {
            if required {
                return Err(InputError::OptionRequiresValue(format!("--{name}")));
            }
            if optional {
                Value::Null
            } else {
                Value::Bool(true)
            }
        } else {
            value
        };
        self.bound.options.insert(canonical, value);
        Ok(())
    }

    fn add_short_option(&mut self, shortcut: char, value: Value) -> Result<(), InputError> {
        let name = self
            .bound
            .definition
            .shortcut_to_name(shortcut)
            .ok_or_else(|| InputError::UnknownOption(format!("-{shortcut}")))?
            .to_string();
        self.add_long_option(&name, value)
    }

    fn add_argument(&mut self, name: &str, value: Value) -> Result<(), InputError> {
        if !self.bound.definition.has_argument(name) {
            return Err(InputError::UnknownArgument(name.to_string()));
        }
        self.bound.arguments.insert(name.to_string(), value);
        Ok(())
    }
}

impl Input for CollectionInput {
    fn bound(&self) -> &Bound {
        &self.bound
    }

    fn bound_mut(&mut self) -> &mut Bound {
        &mut self.bound
    }

    fn parse(&mut self) -> Result<(), InputError> {
        let params = self.params.clone();
        for (key, value) in params {
            if key == "--" {
                continue;
            }
            if let Some(name) = key.strip_prefix("--") {
                self.add_long_option(&name.to_string(), value)?;
            } else if let Some(rest) = key.strip_prefix('-') {
                let mut chars = rest.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => self.add_short_option(c, value)?,
                    _ => return Err(InputError::UnknownOption(key.clone())),
                }
            } else {
                self.add_argument(&key, value)?;
            }
        }
        Ok(())
    }

    fn first_argument(&self) -> Option<String> {
        self.params
            .iter()
            .find(|(key, _)| !key.starts_with('-'))
            .map(|(_, value)| value.to_string())
    }

    fn has_parameter_option(&self, values: &[&str], only_params: bool) -> bool {
        for (key, _) in &self.params {
            if only_params && key == "--" {
                return false;
            }
            if values.contains(&key.as_str()) {
                return true;
            }
        }
        false
    }

    fn parameter_option(&self, values: &[&str], default: Value, only_params: bool) -> Value {
        for (key, value) in &self.params {
            if only_params && key == "--" {
                return default;
            }
            if values.contains(&key.as_str()) {
                return value.clone();
            }
        }
        default
    }
}

impl fmt::Display for CollectionInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut rendered: Vec<String> = Vec::new();
        for (key, value) in &self.params {
            if key.starts_with('-') {
                let glue = if key.starts_with("--") { "=" } else { " " };
                match value {
                    Value::Array(items) => {
                        for item in items {
                            let text = item.to_string();
                            if text.is_empty() {
                                rendered.push(key.clone());
                            } else {
                                rendered.push(format!("{key}{glue}{}", escape_token(&text)));
                            }
                        }
                    }
                    other => {
                        let text = other.to_string();
                        if text.is_empty() {
                            rendered.push(key.clone());
                        } else {
                            rendered.push(format!("{key}{glue}{}", escape_token(&text)));
                        }
                    }
                }
            } else {
                match value {
                    Value::Array(items) => {
                        for item in items {
                            rendered.push(escape_token(&item.to_string()));
                        }
                    }
                    other => rendered.push(escape_token(&other.to_string())),
                }
            }
        }
        f.write_str(&rendered.join(" "))
    }
}
