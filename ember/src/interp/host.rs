//! Host services used by the built-in functions: line output, line input
//! and a random source

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::cell::RefCell;
use std::io::{self, BufRead, Write};
use std::rc::Rc;

/// Reads one line into the buffer, returning the byte count
type LineReader = Box<dyn FnMut(&mut String) -> io::Result<usize>>;

pub struct Host {
    output: Box<dyn Write>,
    input: LineReader,
    rng: StdRng,
}

impl Host {
    /// Host bound to the process's stdin/stdout, seeded from entropy
    ///
    /// Stdin is locked per read so the REPL's line editor can share it.
    pub fn stdio() -> Self {
        Host::with_reader(Box::new(|buf: &mut String| io::stdin().read_line(buf)), io::stdout())
    }

    pub fn new(mut input: impl BufRead + 'static, output: impl Write + 'static) -> Self {
        Host::with_reader(Box::new(move |buf: &mut String| input.read_line(buf)), output)
    }

    fn with_reader(input: LineReader, output: impl Write + 'static) -> Self {
        Host {
            output: Box::new(output),
            input,
            rng: StdRng::from_entropy(),
        }
    }

    /// Replace the random source with a deterministic one
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    /// Write `text` followed by a newline
    pub fn write_line(&mut self, text: &str) -> io::Result<()> {
        writeln!(self.output, "{text}")?;
        self.output.flush()
    }

    /// Write `prompt` without a newline, then read one line
    ///
    /// The trailing line terminator is stripped; end of input gives "".
    pub fn prompt(&mut self, prompt: &str) -> io::Result<String> {
        write!(self.output, "{prompt}")?;
        self.output.flush()?;

        let mut line = String::new();
        (self.input)(&mut line)?;
        let trimmed = line.trim_end_matches(['\n', '\r']).len();
        line.truncate(trimmed);
        Ok(line)
    }

    /// Uniform integer in `1..=upper`; `upper` must be at least 1
    pub fn rand_int(&mut self, upper: i64) -> i64 {
        self.rng.gen_range(1..=upper)
    }
}

impl Default for Host {
    fn default() -> Self {
        Host::stdio()
    }
}

/// In-memory output sink whose contents stay readable after being handed
/// to a [`Host`]
#[derive(Debug, Clone, Default)]
pub struct Capture(Rc<RefCell<Vec<u8>>>);

impl Capture {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.borrow()).into_owned()
    }
}

impl Write for Capture {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.borrow_mut().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
