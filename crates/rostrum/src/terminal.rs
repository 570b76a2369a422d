//! Terminal geometry, with environment overrides.

use terminal_size::{terminal_size, Height, Width};

/// Reports the terminal dimensions. `COLUMNS` and `LINES` take precedence
/// over what the tty reports; without either, classic defaults apply.
pub struct Terminal;

impl Terminal {
    pub const DEFAULT_WIDTH: usize = 80;
    pub const DEFAULT_HEIGHT: usize = 50;

    pub fn width() -> usize {
        if let Some(columns) = Self::env_dimension("COLUMNS") {
            return columns;
        }
        terminal_size()
            .map(|(Width(w), _)| w as usize)
            .unwrap_or(Self::DEFAULT_WIDTH)
    }

    pub fn height() -> usize {
        if let Some(lines) = Self::env_dimension("LINES") {
            return lines;
        }
        terminal_size()
            .map(|(_, Height(h))| h as usize)
            .unwrap_or(Self::DEFAULT_HEIGHT)
    }

    fn env_dimension(name: &str) -> Option<usize> {
        std::env::var(name).ok()?.trim().parse().ok().filter(|n| *n > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    #[serial]
    fn columns_env_wins() {
        std::env::set_var("COLUMNS", "120");
        assert_eq!(Terminal::width(), 120);
        std::env::remove_var("COLUMNS");
    }

    #[test]
    #[serial]
    fn garbage_env_is_ignored() {
        std::env::remove_var("COLUMNS");
        let baseline = Terminal::width();
        std::env::set_var("COLUMNS", "wide");
        assert_eq!(Terminal::width(), baseline);
        std::env::remove_var("COLUMNS");
    }
}
