use std::fmt::{self, Debug, Formatter};
use std::io::{self, Read};

use crate::options::DecompressOptions;
use crate::session::{Flush, Format, Session, Status};
use crate::terminal::Terminal;
use crate::Error;

/// A decompressor that wraps a [`Read`] and implements [`Read`], yielding decompressed bytes
///
/// Compressed data is pulled from the underlying reader into a fixed-size
/// buffer, allocated once at construction, and inflated straight into the
/// buffer passed to [`Read::read`].
///
/// Once the end of the stream is reached, or an error occurs, the engine is
/// released and every later `read` returns the same result without touching
/// the underlying reader again. Dropping the reader without calling
/// [`DecompressReader::close`] also releases the engine.
///
/// ```rust
/// use std::io::{self, Write};
///
/// use zflate::{CompressWriter, DecompressReader};
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let mut writer = CompressWriter::new(Vec::new())?;
/// writer.write_all(b"a stream of bytes")?;
/// let compressed = writer.finish()?;
///
/// let mut reader = DecompressReader::new(compressed.as_slice())?;
/// let mut output = Vec::new();
/// io::copy(&mut reader, &mut output)?;
/// reader.close()?;
///
/// assert_eq!(output, b"a stream of bytes");
/// # Ok(())
/// # }
/// ```
pub struct DecompressReader<R> {
    session: Session,

    reader: R,
    in_buf: Box<[u8]>,

    terminal: Option<Terminal>,
    // the engine still holds output from the last step, even if
    // all of its input has been consumed
    skip_refill: bool,
}

impl<R> DecompressReader<R> {
    /// Construct a new decompressor for a zlib stream read from `reader`
    ///
    /// # Errors
    ///
    /// Never fails with the default parameters, the [`Result`] is kept
    /// for symmetry with the other constructors.
    pub fn new(reader: R) -> Result<Self, Error> {
        Self::with_options(reader, DecompressOptions::new())
    }

    /// Construct a new decompressor for a zlib stream, reading
    /// `buffer_size` bytes at a time from `reader`
    ///
    /// # Errors
    ///
    /// Returns [`Error::EngineInit`] if `buffer_size` is zero
    pub fn with_buffer_size(reader: R, buffer_size: usize) -> Result<Self, Error> {
        Self::with_options(reader, DecompressOptions::new().buffer_size(buffer_size))
    }

    /// Construct a new decompressor for a raw deflate stream, without
    /// header or trailer, using the largest window
    ///
    /// # Errors
    ///
    /// Never fails with the default parameters, the [`Result`] is kept
    /// for symmetry with the other constructors.
    pub fn new_raw(reader: R) -> Result<Self, Error> {
        Self::with_options(reader, DecompressOptions::new().format(Format::Raw))
    }

    /// Construct a new decompressor for a raw deflate stream, reading
    /// `buffer_size` bytes at a time from `reader`
    ///
    /// # Errors
    ///
    /// Returns [`Error::EngineInit`] if `buffer_size` is zero
    pub fn raw_with_buffer_size(reader: R, buffer_size: usize) -> Result<Self, Error> {
        let options = DecompressOptions::new()
            .format(Format::Raw)
            .buffer_size(buffer_size);
        Self::with_options(reader, options)
    }

    /// Construct a new decompressor with the given [`DecompressOptions`]
    ///
    /// # Errors
    ///
    /// Returns [`Error::EngineInit`] if the buffer size is zero or the
    /// window bits are out of range
    pub fn with_options(reader: R, options: DecompressOptions) -> Result<Self, Error> {
        let buffer_size = options.checked_buffer_size()?;
        let session = Session::decompress(options.format, options.window_bits)?;

        Ok(Self {
            session,

            reader,
            in_buf: vec![0; buffer_size].into_boxed_slice(),

            terminal: None,
            skip_refill: false,
        })
    }

    /// Release the decompression engine
    ///
    /// Does not close the underlying reader. Calling this more than once
    /// is harmless.
    ///
    /// # Errors
    ///
    /// Returns the error the stream previously failed with, if any
    pub fn close(&mut self) -> Result<(), Error> {
        match &self.terminal {
            Some(terminal) => terminal.close_result(),
            None => {
                self.latch(Terminal::Finished);
                Ok(())
            }
        }
    }

    /// Whether the end of the stream has been reached, the stream has
    /// failed or [`DecompressReader::close`] has been called
    pub fn is_closed(&self) -> bool {
        self.terminal.is_some()
    }

    /// Total compressed bytes consumed so far
    pub fn total_in(&self) -> u64 {
        self.session.total_in()
    }

    /// Total decompressed bytes produced so far
    pub fn total_out(&self) -> u64 {
        self.session.total_out()
    }

    /// Get a reference to the underlying reader
    pub fn get_ref(&self) -> &R {
        &self.reader
    }

    /// Get a mutable reference to the underlying reader
    ///
    /// Reading from it directly will corrupt the decompressed stream.
    pub fn get_mut(&mut self) -> &mut R {
        &mut self.reader
    }

    /// Release the engine and return the underlying reader
    ///
    /// Compressed bytes already buffered internally are lost.
    pub fn into_inner(mut self) -> R {
        self.session.end();
        self.reader
    }

    fn latch(&mut self, terminal: Terminal) {
        self.session.end();
        self.terminal = Some(terminal);
    }

    fn fail(&mut self, err: Error) -> io::Error {
        log::debug!("decompression failed: {}", err);
        self.latch(Terminal::Failed(err.clone()));
        err.into()
    }
}

impl<R: Read> Read for DecompressReader<R> {
    /// Decompress data from the underlying reader
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match &self.terminal {
            Some(Terminal::Finished) => return Ok(0),
            Some(Terminal::Failed(err)) => return Err(err.clone().into()),
            None => {}
        }

        if buf.is_empty() {
            return Ok(0);
        }

        self.session.set_output(buf.len());

        loop {
            if !self.skip_refill && self.session.remaining_input() == 0 {
                // `Read` never reports data and end of input in the same call,
                // so the bytes are always inflated before the end is observed
                match read_retrying(&mut self.reader, &mut self.in_buf) {
                    Ok(0) => {
                        self.latch(Terminal::Finished);
                        return Ok(0);
                    }
                    Ok(n) => {
                        log::trace!("refilled {} compressed bytes", n);
                        self.session.set_input(n);
                    }
                    Err(err) => return Err(self.fail(Error::source_read(err))),
                }
            } else {
                self.skip_refill = false;
            }

            let status = match self.session.step(&self.in_buf, buf, Flush::None) {
                Ok(status) => status,
                Err(err) => return Err(self.fail(err)),
            };

            let produced = buf.len() - self.session.remaining_output();
            if produced > 0 {
                self.skip_refill = status == Status::Ok && self.session.remaining_output() == 0;
                return Ok(produced);
            }

            match status {
                // anything left in the input is trailing garbage
                Status::StreamEnd => {
                    self.latch(Terminal::Finished);
                    return Ok(0);
                }
                Status::BufError if self.session.remaining_input() > 0 => {
                    return Err(self.fail(Error::EngineStep(
                        "engine made no progress on pending input".to_owned(),
                    )));
                }
                Status::Ok | Status::BufError => {}
            }
        }
    }
}

impl<R: Debug> Debug for DecompressReader<R> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("DecompressReader")
            .field("session", &self.session)
            .field("reader", &self.reader)
            .field("buffer_size", &self.in_buf.len())
            .field("terminal", &self.terminal)
            .field("skip_refill", &self.skip_refill)
            .finish()
    }
}

fn read_retrying<R: Read>(reader: &mut R, buf: &mut [u8]) -> io::Result<usize> {
    loop {
        match reader.read(buf) {
            Err(err) if err.kind() == io::ErrorKind::Interrupted => continue,
            result => return result,
        }
    }
}
