use std::io::{self, BufRead, BufReader, Stdin, Stdout, Write};

use anyhow::{bail, Context, Result};

/// Line-oriented console boundary. Everything the program says or hears goes
/// through this pair of handles, so tests can swap in a scripted reader and a
/// byte buffer instead of the real terminal.
pub struct Console<R, W> {
    reader: R,
    writer: W,
}

/// Console bound to the process's real stdin and stdout.
pub fn stdio_console() -> Console<BufReader<Stdin>, Stdout> {
    Console::new(BufReader::new(io::stdin()), io::stdout())
}

impl<R: BufRead, W: Write> Console<R, W> {
    pub fn new(reader: R, writer: W) -> Self {
        Self { reader, writer }
    }

    /// Tear the console apart, mainly so tests can inspect the written bytes.
    pub fn into_inner(self) -> (R, W) {
        (self.reader, self.writer)
    }

    /// Print one full line.
    pub fn line(&mut self, text: &str) -> Result<()> {
        writeln!(self.writer, "{text}").context("failed to write to console")
    }

    /// Print a label without a newline, flush, and read the user's answer.
    /// The trailing line break is stripped; interior whitespace is kept
    /// because names may legitimately contain it.
    pub fn prompt(&mut self, label: &str) -> Result<String> {
        write!(self.writer, "{label}").context("failed to write to console")?;
        self.writer.flush().context("failed to flush console")?;

        let mut entry = String::new();
        let read = self
            .reader
            .read_line(&mut entry)
            .context("failed to read from console")?;
        if read == 0 {
            bail!("console input closed");
        }
        Ok(entry.trim_end_matches(['\r', '\n']).to_string())
    }

    /// Read a menu selection bounded to `[0, max]`, or `[1, max]` when zero
    /// is disallowed. Out-of-range and non-numeric entries re-prompt; this is
    /// the only retry loop in the program.
    pub fn read_selection(&mut self, max: u32, allow_zero: bool) -> Result<u32> {
        let low = if allow_zero { 0 } else { 1 };
        loop {
            let entry = self.prompt("> ")?;
            match entry.trim().parse::<u32>() {
                Ok(value) if value >= low && value <= max => return Ok(value),
                _ => self.line(&format!("Give a number between {low} and {max}"))?,
            }
        }
    }
}
