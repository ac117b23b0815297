//! Rendering of command responses.

use std::io::{self, Write};

/// How responses are written to standard output.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[allow(clippy::struct_excessive_bools)]
pub struct OutputOptions {
    /// Write responses verbatim, without a trailing newline.
    pub raw: bool,

    /// Disable colored output. Responses are never colored, so this has no
    /// visible effect.
    pub no_color: bool,

    /// Write nothing at all. Errors are still reported.
    pub silent: bool,
}

/// Writes responses according to [`OutputOptions`].
#[derive(Debug, Clone, Copy)]
pub struct Formatter {
    options: OutputOptions,
}

impl Formatter {
    /// Create a formatter for the given options.
    #[must_use]
    pub fn new(options: OutputOptions) -> Self {
        Self { options }
    }

    /// Write one response to `out`.
    ///
    /// # Errors
    /// Returns `Err` if writing to `out` fails.
    pub fn write_response<W: Write>(&self, out: &mut W, response: &str) -> io::Result<()> {
        if self.options.silent {
            return Ok(());
        }

        // responses are not colorized, so `no_color` has nothing to turn off
        if self.options.raw {
            write!(out, "{response}")?;
        } else {
            writeln!(out, "{response}")?;
        }

        out.flush()
    }
}
