//! I/O channel capability
//!
//! The engine never touches the console or filesystem itself; it reads and
//! writes single characters and integers through a channel injected at
//! construction. Reads are blocking and may fail; failures surface as
//! [`RuntimeFault::Io`](crate::RuntimeFault::Io).

use std::collections::VecDeque;
use std::io::{self, BufRead, Read, Write};

/// Four-operation channel the engine performs all I/O through
pub trait IoChannel {
    /// Read one character
    fn read_char(&mut self) -> io::Result<char>;
    /// Read one integer (textual decimal)
    fn read_int(&mut self) -> io::Result<i64>;
    /// Write one character
    fn write_char(&mut self, ch: char) -> io::Result<()>;
    /// Write one integer as decimal text
    fn write_int(&mut self, value: i64) -> io::Result<()>;
}

/// Deterministic in-memory channel for tests and embedding
///
/// Input is scripted up front; all output is captured into one string in
/// emission order.
#[derive(Debug, Default)]
pub struct MemoryChannel {
    chars: VecDeque<char>,
    ints: VecDeque<i64>,
    output: String,
}

impl MemoryChannel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue characters to be returned by `read_char`, in order
    pub fn with_chars(mut self, chars: &str) -> Self {
        self.chars.extend(chars.chars());
        self
    }

    /// Queue integers to be returned by `read_int`, in order
    pub fn with_ints(mut self, ints: impl IntoIterator<Item = i64>) -> Self {
        self.ints.extend(ints);
        self
    }

    /// Everything written so far
    pub fn output(&self) -> &str {
        &self.output
    }
}

impl IoChannel for MemoryChannel {
    fn read_char(&mut self) -> io::Result<char> {
        self.chars
            .pop_front()
            .ok_or_else(|| io::Error::new(io::ErrorKind::UnexpectedEof, "no scripted character"))
    }

    fn read_int(&mut self) -> io::Result<i64> {
        self.ints
            .pop_front()
            .ok_or_else(|| io::Error::new(io::ErrorKind::UnexpectedEof, "no scripted integer"))
    }

    fn write_char(&mut self, ch: char) -> io::Result<()> {
        self.output.push(ch);
        Ok(())
    }

    fn write_int(&mut self, value: i64) -> io::Result<()> {
        self.output.push_str(&value.to_string());
        Ok(())
    }
}

/// Console channel over stdin/stdout for embedding hosts
///
/// `read_char` consumes one byte from stdin; `read_int` consumes one line
/// and parses it as trimmed decimal.
#[derive(Debug, Default)]
pub struct StdioChannel;

impl StdioChannel {
    pub fn new() -> Self {
        StdioChannel
    }
}

impl IoChannel for StdioChannel {
    fn read_char(&mut self) -> io::Result<char> {
        let mut byte = [0u8; 1];
        io::stdin().lock().read_exact(&mut byte)?;
        Ok(byte[0] as char)
    }

    fn read_int(&mut self) -> io::Result<i64> {
        let mut line = String::new();
        io::stdin().lock().read_line(&mut line)?;
        line.trim()
            .parse()
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
    }

    fn write_char(&mut self, ch: char) -> io::Result<()> {
        let mut stdout = io::stdout().lock();
        write!(stdout, "{ch}")?;
        stdout.flush()
    }

    fn write_int(&mut self, value: i64) -> io::Result<()> {
        let mut stdout = io::stdout().lock();
        write!(stdout, "{value}")?;
        stdout.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_channel_scripts_input_and_captures_output() {
        let mut channel = MemoryChannel::new().with_chars("ab").with_ints([7]);
        assert_eq!(channel.read_char().unwrap(), 'a');
        assert_eq!(channel.read_int().unwrap(), 7);
        channel.write_int(-3).unwrap();
        channel.write_char('!').unwrap();
        assert_eq!(channel.output(), "-3!");
    }

    #[test]
    fn memory_channel_exhaustion_is_an_error() {
        let mut channel = MemoryChannel::new();
        assert!(channel.read_char().is_err());
        assert!(channel.read_int().is_err());
    }
}
