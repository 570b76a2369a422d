//! The markup formatter: tag scanning, style resolution, escaping, wrapping.

use std::collections::HashMap;

use regex::Regex;
use unicode_width::UnicodeWidthChar;

use crate::{Color, MarkupError, Style, StyleStack};

/// Formats `<tag>...</tag>` markup into ANSI-decorated (or plain) text.
///
/// Four styles are pre-registered: `error` (white on red), `info` (green),
/// `comment` (yellow), and `question` (black on cyan). Style names are
/// case-insensitive. Tags that resolve to no style pass through verbatim,
/// angle brackets included.
pub struct Formatter {
    decorated: bool,
    styles: HashMap<String, Style>,
    stack: StyleStack,
    tag_re: Regex,
    spec_re: Regex,
}

struct TagMatch {
    start: usize,
    end: usize,
    text: String,
    open: bool,
    tag: String,
}

impl Formatter {
    /// Creates a formatter with the built-in styles registered.
    pub fn new(decorated: bool) -> Self {
        let mut styles = HashMap::new();
        styles.insert(
            "error".to_string(),
            Style::new().fg(Color::White).bg(Color::Red),
        );
        styles.insert("info".to_string(), Style::new().fg(Color::Green));
        styles.insert("comment".to_string(), Style::new().fg(Color::Yellow));
        styles.insert(
            "question".to_string(),
            Style::new().fg(Color::Black).bg(Color::Cyan),
        );

        Self {
            decorated,
            styles,
            stack: StyleStack::new(),
            // Open tags start with a letter and may not contain `\`, `<`
            // or `>`; close tags allow `\` (they carry no inline spec);
            // a bare `</>` closes the innermost style.
            tag_re: Regex::new(r"(?i)<(([a-z][^\\<>]*)|/([a-z][^<>]*)?)>").expect("tag pattern"),
            spec_re: Regex::new(r"([^=]+)=([^;]+)(;|$)").expect("spec pattern"),
        }
    }

    pub fn is_decorated(&self) -> bool {
        self.decorated
    }

    pub fn set_decorated(&mut self, decorated: bool) {
        self.decorated = decorated;
    }

    /// Registers (or replaces) a named style. Names are lowercased.
    pub fn set_style(&mut self, name: &str, style: Style) {
        self.styles.insert(name.to_ascii_lowercase(), style);
    }

    pub fn has_style(&self, name: &str) -> bool {
        self.styles.contains_key(&name.to_ascii_lowercase())
    }

    pub fn style(&self, name: &str) -> Option<&Style> {
        self.styles.get(&name.to_ascii_lowercase())
    }

    /// Formats markup without wrapping.
    pub fn format(&mut self, message: &str) -> Result<String, MarkupError> {
        self.format_and_wrap(message, 0)
    }

    /// Formats markup, wrapping rendered text at `width` columns (0 = off).
    ///
    /// The line-length counter persists across tag-delimited segments so a
    /// styled span wraps seamlessly with the plain text around it. Styles
    /// are applied per wrapped line, never across a line break.
    pub fn format_and_wrap(&mut self, message: &str, width: usize) -> Result<String, MarkupError> {
        let mut output = String::new();
        let mut offset = 0usize;
        let mut line_len = 0usize;
        let bytes = message.as_bytes();

        let matches: Vec<TagMatch> = self
            .tag_re
            .captures_iter(message)
            .map(|caps| {
                let full = caps.get(0).expect("match");
                let open = !caps.get(1).expect("tag body").as_str().starts_with('/');
                let tag = if open {
                    caps.get(2).map(|m| m.as_str()).unwrap_or("")
                } else {
                    caps.get(3).map(|m| m.as_str()).unwrap_or("")
                };
                TagMatch {
                    start: full.start(),
                    end: full.end(),
                    text: full.as_str().to_string(),
                    open,
                    tag: tag.to_string(),
                }
            })
            .collect();

        for m in matches {
            // A backslash right before the tag escapes it; the tag text
            // stays in the running segment and is unescaped at the end.
            if m.start != 0 && bytes[m.start - 1] == b'\\' {
                continue;
            }

            let segment = &message[offset..m.start];
            let styled = self.apply_current_style(segment, &output, width, &mut line_len);
            output.push_str(&styled);
            offset = m.end;

            if !m.open && m.tag.is_empty() {
                self.stack.pop();
            } else if let Some(style) = self.style_for_tag(&m.tag)? {
                if m.open {
                    self.stack.push(style);
                } else {
                    self.stack.pop_matching(&style)?;
                }
            } else {
                // Not a style: the whole tag is literal text.
                let styled = self.apply_current_style(&m.text, &output, width, &mut line_len);
                output.push_str(&styled);
            }
        }

        let tail = self.apply_current_style(&message[offset..], &output, width, &mut line_len);
        output.push_str(&tail);

        // Restore trailing backslashes hidden as NUL padding, then unescape
        // literal angle brackets.
        if output.contains('\0') {
            output = output.replace('\0', "\\");
        }
        Ok(output.replace("\\<", "<"))
    }

    /// Resolves a tag name to a style: named registry first, inline spec
    /// second. `Ok(None)` means "not a style, emit as literal text".
    fn style_for_tag(&self, tag: &str) -> Result<Option<Style>, MarkupError> {
        if let Some(style) = self.styles.get(&tag.to_ascii_lowercase()) {
            return Ok(Some(style.clone()));
        }
        self.style_from_spec(tag)
    }

    /// Parses an inline `fg=COLOR;bg=COLOR;options=OPT,OPT` spec.
    ///
    /// Returns `Ok(None)` when the string does not match the `key=value`
    /// grammar or names an unknown key; invalid color/option *values* are
    /// an error (the tag was clearly meant as a style).
    pub fn style_from_spec(&self, spec: &str) -> Result<Option<Style>, MarkupError> {
        let mut style = Style::new();
        let mut matched = false;

        for caps in self.spec_re.captures_iter(spec) {
            matched = true;
            let key = caps[1].to_ascii_lowercase();
            let value = caps[2].to_ascii_lowercase();
            match key.as_str() {
                "fg" => style.set_foreground(&value)?,
                "bg" => style.set_background(&value)?,
                "options" => {
                    for option in value.split(',').filter(|o| !o.is_empty()) {
                        style.set_attribute(option)?;
                    }
                }
                _ => return Ok(None),
            }
        }

        if matched {
            Ok(Some(style))
        } else {
            Ok(None)
        }
    }

    /// Escapes `<` so it survives tag scanning as literal text.
    ///
    /// A trailing run of backslashes is swapped for NUL padding so it is
    /// not mistaken for an escape of whatever follows when strings are
    /// concatenated; `format` restores it.
    pub fn escape(text: &str) -> String {
        let chars: Vec<char> = text.chars().collect();
        let mut out = String::with_capacity(text.len() + 4);
        let mut i = 0;
        while i < chars.len() {
            let c = chars[i];
            if c != '\\' && i + 1 < chars.len() && chars[i + 1] == '<' {
                out.push(c);
                out.push_str("\\<");
                i += 2;
            } else if c == '<' {
                out.push_str("\\<");
                i += 1;
            } else {
                out.push(c);
                i += 1;
            }
        }
        Self::escape_trailing_backslash(&out)
    }

    fn escape_trailing_backslash(text: &str) -> String {
        if !text.ends_with('\\') {
            return text.to_string();
        }
        let len = text.chars().count();
        let mut trimmed: String = text
            .trim_end_matches('\\')
            .chars()
            .filter(|c| *c != '\0')
            .collect();
        let pad = len - trimmed.chars().count();
        trimmed.extend(std::iter::repeat('\0').take(pad));
        trimmed
    }

    /// Renders one segment through the active style, maintaining the
    /// running line-length counter when wrapping is on.
    fn apply_current_style(
        &self,
        text: &str,
        current: &str,
        width: usize,
        line_len: &mut usize,
    ) -> String {
        if text.is_empty() {
            return String::new();
        }

        if width == 0 {
            return if self.decorated {
                self.stack.current().apply(text)
            } else {
                text.to_string()
            };
        }

        let mut text = text.to_string();

        // A segment starting a fresh line mid-output drops its leading
        // whitespace (the wrap already provided the separation).
        if *line_len == 0 && !current.is_empty() {
            text = text.trim_start().to_string();
        }

        let mut prefix = String::new();
        if *line_len > 0 {
            let take = width - *line_len;
            let split = column_boundary(&text, take);
            prefix = format!("{}\n", &text[..split]);
            text = text[split..].to_string();
        }

        let had_trailing_newline = text.ends_with('\n');
        let mut text = format!("{}{}", prefix, chunk_at_width(&text, width));
        while text.ends_with('\n') {
            text.pop();
        }
        if had_trailing_newline {
            text.push('\n');
        }

        // A fresh segment after a line that exactly filled needs the break
        // the filled line never got.
        if *line_len == 0 && !current.is_empty() && !current.ends_with('\n') {
            text = format!("\n{}", text);
        }

        let lines: Vec<&str> = text.split('\n').collect();
        for line in &lines {
            *line_len += display_width(line);
            if width <= *line_len {
                *line_len = 0;
            }
        }

        if self.decorated {
            let style = self.stack.current();
            lines
                .iter()
                .map(|line| style.apply(line))
                .collect::<Vec<_>>()
                .join("\n")
        } else {
            text
        }
    }
}

fn display_width(text: &str) -> usize {
    text.chars().map(|c| c.width().unwrap_or(0)).sum()
}

/// Byte index of the boundary after `columns` display columns.
fn column_boundary(text: &str, columns: usize) -> usize {
    let mut width = 0;
    for (i, c) in text.char_indices() {
        let w = c.width().unwrap_or(0);
        if width + w > columns {
            return i;
        }
        width += w;
    }
    text.len()
}

/// Breaks runs of `width` columns with newlines, eating the spaces that
/// immediately follow each break. Existing newlines reset the count.
fn chunk_at_width(text: &str, width: usize) -> String {
    let mut out = String::with_capacity(text.len() + text.len() / width.max(1));
    let mut count = 0usize;
    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '\n' {
            out.push('\n');
            count = 0;
            continue;
        }
        out.push(c);
        count += c.width().unwrap_or(0);
        if count >= width {
            while chars.peek() == Some(&' ') {
                chars.next();
            }
            out.push('\n');
            count = 0;
        }
    }
    out
}
