//! Output abstraction: verbosity-gated, markup-formatted text sinks.

use std::io::Write;

use rostrum_markup::Formatter;

use crate::ConsoleError;

/// How chatty output should be. Maps onto the `SHELL_VERBOSITY` convention
/// (-1 for quiet, 0..3 upward).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum Verbosity {
    Quiet,
    #[default]
    Normal,
    Verbose,
    VeryVerbose,
    Debug,
}

impl Verbosity {
    pub fn shell_level(self) -> i32 {
        match self {
            Verbosity::Quiet => -1,
            Verbosity::Normal => 0,
            Verbosity::Verbose => 1,
            Verbosity::VeryVerbose => 2,
            Verbosity::Debug => 3,
        }
    }

    pub fn from_shell_level(level: i32) -> Self {
        match level {
            i32::MIN..=-1 => Verbosity::Quiet,
            0 => Verbosity::Normal,
            1 => Verbosity::Verbose,
            2 => Verbosity::VeryVerbose,
            _ => Verbosity::Debug,
        }
    }
}

/// A formatted text sink.
///
/// `write`/`writeln` run messages through the markup [`Formatter`] and are
/// suppressed entirely at quiet verbosity; `writeln_always` bypasses the
/// gate for things that must be seen, like rendered errors.
pub trait Output {
    fn formatter_mut(&mut self) -> &mut Formatter;

    fn verbosity(&self) -> Verbosity;

    fn set_verbosity(&mut self, verbosity: Verbosity);

    fn is_decorated(&self) -> bool;

    fn set_decorated(&mut self, decorated: bool);

    /// Raw sink behind the formatting layer.
    fn do_write(&mut self, text: &str);

    fn is_quiet(&self) -> bool {
        self.verbosity() == Verbosity::Quiet
    }

    fn is_verbose(&self) -> bool {
        self.verbosity() >= Verbosity::Verbose
    }

    fn is_very_verbose(&self) -> bool {
        self.verbosity() >= Verbosity::VeryVerbose
    }

    fn is_debug(&self) -> bool {
        self.verbosity() >= Verbosity::Debug
    }

    fn write(&mut self, message: &str) -> Result<(), ConsoleError> {
        if self.is_quiet() {
            return Ok(());
        }
        let rendered = self.formatter_mut().format(message)?;
        self.do_write(&rendered);
        Ok(())
    }

    fn writeln(&mut self, message: &str) -> Result<(), ConsoleError> {
        self.write(message)?;
        if !self.is_quiet() {
            self.do_write("\n");
        }
        Ok(())
    }

    fn writeln_always(&mut self, message: &str) -> Result<(), ConsoleError> {
        let rendered = self.formatter_mut().format(message)?;
        self.do_write(&rendered);
        self.do_write("\n");
        Ok(())
    }
}

enum Target {
    Stdout,
    Stderr,
}

/// Output bound to one of the process streams. Decoration defaults to
/// whether that stream is a terminal.
pub struct StreamOutput {
    target: Target,
    formatter: Formatter,
    verbosity: Verbosity,
}

impl StreamOutput {
    pub fn stdout() -> Self {
        Self::new(Target::Stdout, atty::is(atty::Stream::Stdout))
    }

    pub fn stderr() -> Self {
        Self::new(Target::Stderr, atty::is(atty::Stream::Stderr))
    }

    fn new(target: Target, decorated: bool) -> Self {
        Self {
            target,
            formatter: Formatter::new(decorated),
            verbosity: Verbosity::Normal,
        }
    }
}

impl Output for StreamOutput {
    fn formatter_mut(&mut self) -> &mut Formatter {
        &mut self.formatter
    }

    fn verbosity(&self) -> Verbosity {
        self.verbosity
    }

    fn set_verbosity(&mut self, verbosity: Verbosity) {
        self.verbosity = verbosity;
    }

    fn is_decorated(&self) -> bool {
        self.formatter.is_decorated()
    }

    fn set_decorated(&mut self, decorated: bool) {
        self.formatter.set_decorated(decorated);
    }

    fn do_write(&mut self, text: &str) {
        // A broken pipe on the way out is not worth a panic.
        let _ = match self.target {
            Target::Stdout => std::io::stdout().write_all(text.as_bytes()),
            Target::Stderr => std::io::stderr().write_all(text.as_bytes()),
        };
    }
}

/// Output captured in memory, for tests and for rendering help text that
/// is post-processed before display.
pub struct BufferedOutput {
    buffer: String,
    formatter: Formatter,
    verbosity: Verbosity,
}

impl BufferedOutput {
    pub fn new(decorated: bool) -> Self {
        Self {
            buffer: String::new(),
            formatter: Formatter::new(decorated),
            verbosity: Verbosity::Normal,
        }
    }

    /// Returns the captured text and clears the buffer.
    pub fn fetch(&mut self) -> String {
        std::mem::take(&mut self.buffer)
    }

    pub fn contents(&self) -> &str {
        &self.buffer
    }
}

impl Default for BufferedOutput {
    fn default() -> Self {
        Self::new(false)
    }
}

impl Output for BufferedOutput {
    fn formatter_mut(&mut self) -> &mut Formatter {
        &mut self.formatter
    }

    fn verbosity(&self) -> Verbosity {
        self.verbosity
    }

    fn set_verbosity(&mut self, verbosity: Verbosity) {
        self.verbosity = verbosity;
    }

    fn is_decorated(&self) -> bool {
        self.formatter.is_decorated()
    }

    fn set_decorated(&mut self, decorated: bool) {
        self.formatter.set_decorated(decorated);
    }

    fn do_write(&mut self, text: &str) {
        self.buffer.push_str(text);
    }
}
