//! Tag-based ANSI markup formatter for terminal output.
//!
//! This crate turns `<tag>content</tag>` style markup into ANSI-decorated
//! text. It handles nested tags through a style stack, supports inline style
//! specs (`<fg=green;bg=blue;options=bold>`), escaping of literal `<`, and
//! optional column-aware wrapping that keeps escape sequences confined to a
//! single rendered line.
//!
//! # Example
//!
//! ```rust
//! use rostrum_markup::Formatter;
//!
//! let mut formatter = Formatter::new(true);
//! let out = formatter.format("<error>some error</error>").unwrap();
//! assert_eq!(out, "\u{1b}[37;41msome error\u{1b}[39;49m");
//!
//! // Undecorated formatters strip the tags instead.
//! let mut plain = Formatter::new(false);
//! assert_eq!(plain.format("<info>done</info>").unwrap(), "done");
//! ```
//!
//! # Markup rules
//!
//! - `<name>` pushes a registered style (or an inline `fg=..;bg=..` spec).
//! - `</name>` pops back to the matching style; mismatches are an error.
//! - `</>` pops the most recent style.
//! - Tags that resolve to no style are emitted verbatim.
//! - A literal `<` is written as `\<`; a lone trailing backslash survives.

mod formatter;
mod stack;
mod style;

pub use formatter::Formatter;
pub use stack::StyleStack;
pub use style::{Attribute, Color, Style};

use thiserror::Error;

/// Errors raised while interpreting markup or style specs.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MarkupError {
    /// A closing tag did not match any open style on the stack.
    #[error("Incorrectly nested style tag found.")]
    IncorrectlyNested,

    /// An unknown color name was given for the foreground.
    #[error("Invalid foreground color specified: \"{0}\". Expected one of ({1})")]
    InvalidForeground(String, String),

    /// An unknown color name was given for the background.
    #[error("Invalid background color specified: \"{0}\". Expected one of ({1})")]
    InvalidBackground(String, String),

    /// An unknown style attribute name was given.
    #[error("Invalid option specified: \"{0}\". Expected one of ({1})")]
    InvalidAttribute(String, String),
}
