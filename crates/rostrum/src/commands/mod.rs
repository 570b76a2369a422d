//! Built-in commands registered by every application.

mod help;
mod list;

pub(crate) use help::help_command;
pub(crate) use list::list_command;
