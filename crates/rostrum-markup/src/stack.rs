//! The style nesting stack used by the formatter.

use crate::{MarkupError, Style};

/// A LIFO of active styles with a plain-style fallback.
///
/// Popping or peeking an empty stack yields the fallback style rather than
/// failing; only mismatched closing tags are an error.
#[derive(Debug, Clone, Default)]
pub struct StyleStack {
    styles: Vec<Style>,
    empty: Style,
}

impl StyleStack {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drops every pushed style.
    pub fn reset(&mut self) {
        self.styles.clear();
    }

    pub fn push(&mut self, style: Style) {
        self.styles.push(style);
    }

    /// Pops the top style, or returns the plain fallback when empty.
    pub fn pop(&mut self) -> Style {
        self.styles.pop().unwrap_or_else(|| self.empty.clone())
    }

    /// Pops styles until one matching `style` is found and returns it.
    ///
    /// Matching compares each candidate's rendered escape codes
    /// (`apply("")`) against the target's, i.e. structural equality as seen
    /// by the terminal. An exhausted stack means the markup closed a tag
    /// that was never opened at this nesting level.
    pub fn pop_matching(&mut self, style: &Style) -> Result<Style, MarkupError> {
        if self.styles.is_empty() {
            return Ok(self.empty.clone());
        }

        let wanted = style.apply("");
        for index in (0..self.styles.len()).rev() {
            if self.styles[index].apply("") == wanted {
                let matched = self.styles.remove(index);
                self.styles.truncate(index);
                return Ok(matched);
            }
        }

        Err(MarkupError::IncorrectlyNested)
    }

    /// The active style: the top of the stack, or the plain fallback.
    pub fn current(&self) -> &Style {
        self.styles.last().unwrap_or(&self.empty)
    }

    pub fn is_empty(&self) -> bool {
        self.styles.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Attribute, Color};

    fn red() -> Style {
        Style::new().fg(Color::Red)
    }

    fn blue_bold() -> Style {
        Style::new().fg(Color::Blue).attribute(Attribute::Bold)
    }

    #[test]
    fn pop_returns_in_reverse_order() {
        let mut stack = StyleStack::new();
        stack.push(red());
        stack.push(blue_bold());

        assert_eq!(stack.pop(), blue_bold());
        assert_eq!(stack.pop(), red());
    }

    #[test]
    fn pop_on_empty_returns_plain_style() {
        let mut stack = StyleStack::new();
        let style = stack.pop();
        assert!(style.is_plain());
    }

    #[test]
    fn current_falls_back_to_plain() {
        let stack = StyleStack::new();
        assert!(stack.current().is_plain());
    }

    #[test]
    fn current_tracks_top() {
        let mut stack = StyleStack::new();
        stack.push(red());
        stack.push(blue_bold());
        assert_eq!(*stack.current(), blue_bold());
    }

    #[test]
    fn pop_matching_unwinds_past_intermediates() {
        let mut stack = StyleStack::new();
        stack.push(red());
        stack.push(blue_bold());
        stack.push(Style::new().fg(Color::Green));

        let matched = stack.pop_matching(&red()).unwrap();
        assert_eq!(matched, red());
        assert!(stack.is_empty());
    }

    #[test]
    fn pop_matching_without_match_is_error() {
        let mut stack = StyleStack::new();
        stack.push(red());

        let err = stack.pop_matching(&blue_bold()).unwrap_err();
        assert_eq!(err, MarkupError::IncorrectlyNested);
    }

    #[test]
    fn pop_matching_on_empty_returns_plain() {
        let mut stack = StyleStack::new();
        assert!(stack.pop_matching(&red()).unwrap().is_plain());
    }

    #[test]
    fn push_pop_sequence_property() {
        let styles: Vec<Style> = (0..8)
            .map(|i| {
                if i % 2 == 0 {
                    Style::new().fg(Color::Cyan)
                } else {
                    Style::new().bg(Color::Yellow)
                }
            })
            .collect();

        let mut stack = StyleStack::new();
        for style in &styles {
            stack.push(style.clone());
        }
        for style in styles.iter().rev() {
            assert_eq!(stack.pop(), *style);
        }
        assert!(stack.pop().is_plain());
    }
}
