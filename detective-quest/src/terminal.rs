use std::io::{self, BufRead, Write};

/// Line-oriented console the game talks through.
pub trait Terminal {
    fn say(&mut self, line: &str) -> io::Result<()>;

    /// Shows `prompt` and reads one line without its terminator.
    /// `None` means the input is exhausted.
    fn ask(&mut self, prompt: &str) -> io::Result<Option<String>>;
}

pub struct ConsoleTerminal<R, W> {
    input: R,
    output: W,
}

impl ConsoleTerminal<io::StdinLock<'static>, io::Stdout> {
    pub fn stdio() -> Self {
        Self::new(io::stdin().lock(), io::stdout())
    }
}

impl<R: BufRead, W: Write> ConsoleTerminal<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    pub fn into_output(self) -> W {
        self.output
    }
}

impl<R: BufRead, W: Write> Terminal for ConsoleTerminal<R, W> {
    fn say(&mut self, line: &str) -> io::Result<()> {
        writeln!(self.output, "{}", line)
    }

    fn ask(&mut self, prompt: &str) -> io::Result<Option<String>> {
        write!(self.output, "{}", prompt)?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        let trimmed = line.trim_end_matches(['\r', '\n']).len();
        line.truncate(trimmed);
        Ok(Some(line))
    }
}
