//! ANSI styles: colors, attributes, and the SGR code table.

use crate::MarkupError;

/// The eight base ANSI colors plus the terminal default.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Color {
    Black,
    Red,
    Green,
    Yellow,
    Blue,
    Magenta,
    Cyan,
    White,
    Default,
}

const COLOR_NAMES: [(&str, Color); 9] = [
    ("black", Color::Black),
    ("red", Color::Red),
    ("green", Color::Green),
    ("yellow", Color::Yellow),
    ("blue", Color::Blue),
    ("magenta", Color::Magenta),
    ("cyan", Color::Cyan),
    ("white", Color::White),
    ("default", Color::Default),
];

impl Color {
    fn from_name(name: &str) -> Option<Color> {
        let lower = name.to_ascii_lowercase();
        COLOR_NAMES
            .iter()
            .find(|(n, _)| *n == lower)
            .map(|(_, c)| *c)
    }

    fn valid_names() -> String {
        COLOR_NAMES
            .iter()
            .map(|(n, _)| *n)
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// SGR code when used as a foreground color (30-37, default 39).
    pub fn foreground_code(self) -> u8 {
        match self {
            Color::Black => 30,
            Color::Red => 31,
            Color::Green => 32,
            Color::Yellow => 33,
            Color::Blue => 34,
            Color::Magenta => 35,
            Color::Cyan => 36,
            Color::White => 37,
            Color::Default => 39,
        }
    }

    /// SGR code when used as a background color (40-47, default 49).
    pub fn background_code(self) -> u8 {
        self.foreground_code() + 10
    }
}

/// Text attributes with their `{set, unset}` SGR code pairs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Attribute {
    Bold,
    Underscore,
    Blink,
    Reverse,
    Conceal,
}

const ATTRIBUTE_NAMES: [(&str, Attribute); 5] = [
    ("bold", Attribute::Bold),
    ("underscore", Attribute::Underscore),
    ("blink", Attribute::Blink),
    ("reverse", Attribute::Reverse),
    ("conceal", Attribute::Conceal),
];

impl Attribute {
    fn from_name(name: &str) -> Option<Attribute> {
        let lower = name.to_ascii_lowercase();
        ATTRIBUTE_NAMES
            .iter()
            .find(|(n, _)| *n == lower)
            .map(|(_, a)| *a)
    }

    fn valid_names() -> String {
        ATTRIBUTE_NAMES
            .iter()
            .map(|(n, _)| *n)
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// SGR code that enables the attribute.
    pub fn set_code(self) -> u8 {
        match self {
            Attribute::Bold => 1,
            Attribute::Underscore => 4,
            Attribute::Blink => 5,
            Attribute::Reverse => 7,
            Attribute::Conceal => 8,
        }
    }

    /// SGR code that disables the attribute.
    pub fn unset_code(self) -> u8 {
        match self {
            Attribute::Bold => 22,
            Attribute::Underscore => 24,
            Attribute::Blink => 25,
            Attribute::Reverse => 27,
            Attribute::Conceal => 28,
        }
    }
}

/// A terminal style: optional foreground, optional background, and an
/// ordered list of attributes.
///
/// A style with nothing set is a no-op: [`Style::apply`] returns its input
/// unchanged. Attribute order is insertion order, which determines the order
/// of SGR codes in the rendered escape sequence.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Style {
    foreground: Option<Color>,
    background: Option<Color>,
    attributes: Vec<Attribute>,
}

impl Style {
    pub fn new() -> Self {
        Self::default()
    }

    /// Typed builder for the foreground color.
    pub fn fg(mut self, color: Color) -> Self {
        self.foreground = Some(color);
        self
    }

    /// Typed builder for the background color.
    pub fn bg(mut self, color: Color) -> Self {
        self.background = Some(color);
        self
    }

    /// Typed builder appending an attribute.
    pub fn attribute(mut self, attribute: Attribute) -> Self {
        if !self.attributes.contains(&attribute) {
            self.attributes.push(attribute);
        }
        self
    }

    /// Sets the foreground color by name.
    pub fn set_foreground(&mut self, name: &str) -> Result<(), MarkupError> {
        match Color::from_name(name) {
            Some(color) => {
                self.foreground = Some(color);
                Ok(())
            }
            None => Err(MarkupError::InvalidForeground(
                name.to_string(),
                Color::valid_names(),
            )),
        }
    }

    /// Sets the background color by name.
    pub fn set_background(&mut self, name: &str) -> Result<(), MarkupError> {
        match Color::from_name(name) {
            Some(color) => {
                self.background = Some(color);
                Ok(())
            }
            None => Err(MarkupError::InvalidBackground(
                name.to_string(),
                Color::valid_names(),
            )),
        }
    }

    /// Adds an attribute by name.
    pub fn set_attribute(&mut self, name: &str) -> Result<(), MarkupError> {
        match Attribute::from_name(name) {
            Some(attribute) => {
                if !self.attributes.contains(&attribute) {
                    self.attributes.push(attribute);
                }
                Ok(())
            }
            None => Err(MarkupError::InvalidAttribute(
                name.to_string(),
                Attribute::valid_names(),
            )),
        }
    }

    /// Removes an attribute by name.
    pub fn unset_attribute(&mut self, name: &str) -> Result<(), MarkupError> {
        match Attribute::from_name(name) {
            Some(attribute) => {
                self.attributes.retain(|a| *a != attribute);
                Ok(())
            }
            None => Err(MarkupError::InvalidAttribute(
                name.to_string(),
                Attribute::valid_names(),
            )),
        }
    }

    /// Returns true if no color or attribute is set.
    pub fn is_plain(&self) -> bool {
        self.foreground.is_none() && self.background.is_none() && self.attributes.is_empty()
    }

    /// Wraps `text` in the SGR set/unset sequences for this style.
    ///
    /// A plain style returns `text` unchanged. Codes are emitted in
    /// foreground, background, attribute order; unset codes mirror that
    /// order so nested styles can restore the outer state per attribute.
    pub fn apply(&self, text: &str) -> String {
        let mut set = Vec::new();
        let mut unset = Vec::new();

        if let Some(fg) = self.foreground {
            set.push(fg.foreground_code().to_string());
            unset.push("39".to_string());
        }
        if let Some(bg) = self.background {
            set.push(bg.background_code().to_string());
            unset.push("49".to_string());
        }
        for attribute in &self.attributes {
            set.push(attribute.set_code().to_string());
            unset.push(attribute.unset_code().to_string());
        }

        if set.is_empty() {
            return text.to_string();
        }

        format!("\x1b[{}m{}\x1b[{}m", set.join(";"), text, unset.join(";"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_style_is_identity() {
        let style = Style::new();
        assert!(style.is_plain());
        assert_eq!(style.apply("foo"), "foo");
    }

    #[test]
    fn foreground_only() {
        let style = Style::new().fg(Color::Green);
        assert_eq!(style.apply("foo"), "\x1b[32mfoo\x1b[39m");
    }

    #[test]
    fn foreground_and_background() {
        let style = Style::new().fg(Color::White).bg(Color::Red);
        assert_eq!(style.apply("some error"), "\x1b[37;41msome error\x1b[39;49m");
    }

    #[test]
    fn attributes_keep_insertion_order() {
        let style = Style::new()
            .attribute(Attribute::Bold)
            .attribute(Attribute::Underscore);
        assert_eq!(style.apply("x"), "\x1b[1;4mx\x1b[22;24m");
    }

    #[test]
    fn duplicate_attribute_ignored() {
        let style = Style::new()
            .attribute(Attribute::Bold)
            .attribute(Attribute::Bold);
        assert_eq!(style.apply("x"), "\x1b[1mx\x1b[22m");
    }

    #[test]
    fn default_color_codes() {
        let style = Style::new().fg(Color::Default).bg(Color::Default);
        assert_eq!(style.apply("x"), "\x1b[39;49mx\x1b[39;49m");
    }

    #[test]
    fn set_foreground_by_name() {
        let mut style = Style::new();
        style.set_foreground("RED").unwrap();
        assert_eq!(style.apply("x"), "\x1b[31mx\x1b[39m");
    }

    #[test]
    fn invalid_foreground_lists_valid_names() {
        let mut style = Style::new();
        let err = style.set_foreground("pink").unwrap_err();
        match err {
            MarkupError::InvalidForeground(name, valid) => {
                assert_eq!(name, "pink");
                assert!(valid.contains("magenta"));
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn invalid_attribute_rejected() {
        let mut style = Style::new();
        assert!(style.set_attribute("italic").is_err());
    }

    #[test]
    fn unset_attribute_removes() {
        let mut style = Style::new().attribute(Attribute::Bold);
        style.unset_attribute("bold").unwrap();
        assert!(style.is_plain());
    }
}
