//! Parsing of raw argv token streams.

use std::collections::VecDeque;
use std::fmt;

use crate::input::escape_token;
use crate::{Bound, Input, InputError, Value};

/// Input backed by shell tokens, parsed with GNU-style conventions:
/// `--name value`, `--name=value`, short options, clustered short flags,
/// glued short values and a `--` end-of-options marker.
#[derive(Debug, Clone, Default)]
pub struct ArgvInput {
    tokens: Vec<String>,
    parsed: VecDeque<String>,
    bound: Bound,
}

/// Definition facts about one option, copied out so parsing can mutate
/// the bound state while it consults them.
struct OptionTraits {
    name: String,
    accepts_value: bool,
    value_required: bool,
    value_optional: bool,
    is_array: bool,
}

impl ArgvInput {
    /// Builds input from tokens that do not include the binary name.
    pub fn new(tokens: Vec<String>) -> Self {
        Self {
            tokens,
            parsed: VecDeque::new(),
            bound: Bound::default(),
        }
    }

    /// Builds input from the process arguments, dropping `argv[0]`.
    pub fn from_env() -> Self {
        Self::new(std::env::args().skip(1).collect())
    }

    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }

    fn option_traits(&self, name: &str) -> Option<OptionTraits> {
        let option = self.bound.definition.option(name).ok()?;
        Some(OptionTraits {
            name: option.name().to_string(),
            accepts_value: option.accepts_value(),
            value_required: option.is_value_required(),
            value_optional: option.is_value_optional(),
            is_array: option.is_array(),
        })
    }

    fn shortcut_traits(&self, shortcut: char) -> Option<OptionTraits> {
        let name = self.bound.definition.shortcut_to_name(shortcut)?.to_string();
        self.option_traits(&name)
    }

    /// The `c` of a plain `-c` probe value, or `None` for anything longer.
    fn lone_shortcut(value: &str) -> Option<char> {
        let rest = value.strip_prefix('-')?;
        let mut chars = rest.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) if c != '-' => Some(c),
            _ => None,
        }
    }

    fn parse_long_option(&mut self, token: &str) -> Result<(), InputError> {
        let name = &token[2..];
        if let Some(pos) = name.find('=') {
            let value = name[pos + 1..].to_string();
            if value.is_empty() {
                // `--foo=` means "explicitly empty"; the lookahead in
                // add_long_option will pick this token back up.
                self.parsed.push_front(String::new());
            }
            let name = name[..pos].to_string();
            self.add_long_option(&name, Some(value))
        } else {
            let name = name.to_string();
            self.add_long_option(&name, None)
        }
    }

    fn parse_short_option(&mut self, token: &str) -> Result<(), InputError> {
        let chars: Vec<char> = token[1..].chars().collect();
        if chars.len() > 1 {
            let first = chars[0];
            if self
                .shortcut_traits(first)
                .is_some_and(|t| t.accepts_value)
            {
                // Glued value: -fvalue.
                let value: String = chars[1..].iter().collect();
                return self.add_short_option(first, Some(value));
            }
            return self.parse_short_option_set(&chars);
        }
        self.add_short_option(chars[0], None)
    }

    /// Walks a cluster like `-abc`: flags accumulate until the first
    /// value-accepting option, which greedily takes the rest as its value.
    fn parse_short_option_set(&mut self, chars: &[char]) -> Result<(), InputError> {
        for (i, &c) in chars.iter().enumerate() {
            let traits = self
                .shortcut_traits(c)
                .ok_or_else(|| InputError::UnknownOption(format!("-{c}")))?;
            if traits.accepts_value {
                let value = if i == chars.len() - 1 {
                    None
                } else {
                    Some(chars[i + 1..].iter().collect())
                };
                return self.add_long_option(&traits.name, value);
            }
            self.add_long_option(&traits.name, None)?;
        }
        Ok(())
    }

    fn add_short_option(&mut self, shortcut: char, value: Option<String>) -> Result<(), InputError> {
        let name = self
            .bound
            .definition
            .shortcut_to_name(shortcut)
            .ok_or_else(|| InputError::UnknownOption(format!("-{shortcut}")))?
            .to_string();
        self.add_long_option(&name, value)
    }

    fn add_long_option(&mut self, name: &str, mut value: Option<String>) -> Result<(), InputError> {
        let traits = self
            .option_traits(name)
            .ok_or_else(|| InputError::UnknownOption(format!("--{name}")))?;

        if value.is_some() && !traits.accepts_value {
            return Err(InputError::OptionRejectsValue(format!("--{name}")));
        }

        // Lookahead: a value-accepting option may take the next token,
        // unless that token looks like another option.
        if matches!(value.as_deref(), None | Some("")) && traits.accepts_value {
            if let Some(next) = self.parsed.pop_front() {
                if next.is_empty() || !next.starts_with('-') {
                    value = Some(next);
                } else {
                    self.parsed.push_front(next);
                }
            }
        }

        let resolved = match value {
            Some(v) => Value::Str(v),
            None if traits.value_required => {
                return Err(InputError::OptionRequiresValue(format!("--{name}")));
            }
            None if !traits.is_array && !traits.value_optional => Value::Bool(true),
            None => Value::Null,
        };

        if traits.is_array {
            let entry = self
                .bound
                .options
                .entry(traits.name)
                .or_insert_with(|| Value::Array(Vec::new()));
            // A bare occurrence of an optional-value array option records
            // only the (possibly empty) entry itself.
            if matches!(resolved, Value::Str(_)) {
                entry.push(resolved);
            }
        } else {
            self.bound.options.insert(traits.name, resolved);
        }
        Ok(())
    }

    fn parse_positional(&mut self, token: &str) -> Result<(), InputError> {
        let count = self.bound.arguments.len();

        if self.bound.definition.has_argument_at(count) {
            let argument = self
                .bound
                .definition
                .argument_at(count)
                .expect("index checked");
            let name = argument.name().to_string();
            let value = if argument.is_array() {
                Value::Array(vec![Value::Str(token.to_string())])
            } else {
                Value::Str(token.to_string())
            };
            self.bound.arguments.insert(name, value);
            return Ok(());
        }

        if count > 0 {
            let last = self.bound.definition.argument_at(count - 1);
            if last.is_some_and(|a| a.is_array()) {
                let name = last.expect("index checked").name().to_string();
                if let Some(entry) = self.bound.arguments.get_mut(&name) {
                    entry.push(Value::Str(token.to_string()));
                }
                return Ok(());
            }
        }

        let names: Vec<&str> = self.bound.definition.arguments().map(|a| a.name()).collect();
        if names.is_empty() {
            Err(InputError::NoArgumentsExpected(token.to_string()))
        } else {
            Err(InputError::TooManyArguments(names.join("\" \"")))
        }
    }
}

impl Input for ArgvInput {
    fn bound(&self) -> &Bound {
        &self.bound
    }

    fn bound_mut(&mut self) -> &mut Bound {
        &mut self.bound
    }

    fn parse(&mut self) -> Result<(), InputError> {
        let mut parse_options = true;
        self.parsed = self.tokens.iter().cloned().collect();
        while let Some(token) = self.parsed.pop_front() {
            if parse_options && token.is_empty() {
                self.parse_positional(&token)?;
            } else if parse_options && token == "--" {
                parse_options = false;
            } else if parse_options && token.starts_with("--") {
                self.parse_long_option(&token)?;
            } else if parse_options && token.starts_with('-') && token != "-" {
                self.parse_short_option(&token)?;
            } else {
                self.parse_positional(&token)?;
            }
        }
        Ok(())
    }

    fn first_argument(&self) -> Option<String> {
        let mut skip_next = false;
        for (i, token) in self.tokens.iter().enumerate() {
            if token.starts_with('-') && !token.is_empty() {
                if token.contains('=') || i + 1 >= self.tokens.len() {
                    continue;
                }
                // A value-accepting option swallows the following token,
                // so that token is not the command name.
                let name = match token.strip_prefix("--") {
                    Some(long) => Some(long.to_string()),
                    None => token.chars().last().map(|c| c.to_string()),
                };
                let traits = name.and_then(|n| {
                    if self.bound.definition.has_option(&n) {
                        self.option_traits(&n)
                    } else {
                        let mut chars = n.chars();
                        match (chars.next(), chars.next()) {
                            (Some(c), None) => self.shortcut_traits(c),
                            _ => None,
                        }
                    }
                });
                if traits.is_some_and(|t| t.accepts_value) {
                    skip_next = true;
                }
                continue;
            }
            if skip_next {
                skip_next = false;
                continue;
            }
            return Some(token.clone());
        }
        None
    }

    fn has_parameter_option(&self, values: &[&str], only_params: bool) -> bool {
        for token in &self.tokens {
            if only_params && token == "--" {
                return false;
            }
            for value in values {
                if token.as_str() == *value {
                    return true;
                }
                // `--opt` also matches `--opt=...`. A short option only
                // claims a longer token when its remainder could be a glued
                // value, so `-fh` is seen by `-f` when `-f` takes a value,
                // while `-hf` is seen by neither flag.
                if value.starts_with("--") {
                    if token.starts_with(&format!("{value}=")) {
                        return true;
                    }
                } else if let Some(shortcut) = Self::lone_shortcut(value) {
                    if token.starts_with(*value)
                        && self
                            .shortcut_traits(shortcut)
                            .is_some_and(|t| t.accepts_value)
                    {
                        return true;
                    }
                }
            }
        }
        false
    }

    fn parameter_option(&self, values: &[&str], default: Value, only_params: bool) -> Value {
        let mut tokens: VecDeque<&String> = self.tokens.iter().collect();
        while let Some(token) = tokens.pop_front() {
            if only_params && token == "--" {
                return default;
            }
            for value in values {
                if token.as_str() == *value {
                    return match tokens.pop_front() {
                        Some(next) => Value::Str(next.clone()),
                        None => Value::Null,
                    };
                }
                let leading = if value.starts_with("--") {
                    format!("{value}=")
                } else {
                    (*value).to_string()
                };
                if !leading.is_empty() && token.starts_with(&leading) {
                    return Value::Str(token[leading.len()..].to_string());
                }
            }
        }
        default
    }
}

impl fmt::Display for ArgvInput {
    /// Shell-safe rendition of the raw tokens, mostly for log lines.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rendered: Vec<String> = self
            .tokens
            .iter()
            .map(|token| {
                if token.starts_with('-') {
                    if let Some(pos) = token.find('=') {
                        if pos >= 2 && pos + 1 < token.len() {
                            return format!(
                                "{}{}",
                                &token[..=pos],
                                escape_token(&token[pos + 1..])
                            );
                        }
                    }
                    token.clone()
                } else if !token.is_empty() {
                    escape_token(token)
                } else {
                    token.clone()
                }
            })
            .collect();
        f.write_str(&rendered.join(" "))
    }
}
