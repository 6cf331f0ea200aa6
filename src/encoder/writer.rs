use std::fmt::{self, Debug, Formatter};
use std::io::{self, Write};

use crate::options::CompressOptions;
use crate::session::{Flush, Format, Session, Status};
use crate::terminal::Terminal;
use crate::Error;

/// A compressor that wraps a [`Write`] and implements [`Write`], compressing written bytes
///
/// Compressed output is produced into a fixed-size buffer, allocated once at
/// construction, and handed to the underlying writer every time the engine
/// fills some of it.
///
/// The stream is only complete once [`CompressWriter::close`] or
/// [`CompressWriter::finish`] succeeds. Dropping the writer releases the
/// engine, but the end of the stream is never written in that case.
///
/// ```rust
/// use std::io::Write;
///
/// use zflate::CompressWriter;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let mut writer = CompressWriter::new_raw(Vec::new())?;
/// writer.write_all(b"first part, ")?;
/// // everything written so far can now be decompressed by the receiver
/// writer.flush()?;
/// writer.write_all(b"second part")?;
///
/// let compressed = writer.finish()?;
/// # assert!(!compressed.is_empty());
/// # Ok(())
/// # }
/// ```
pub struct CompressWriter<W> {
    session: Session,

    writer: W,
    out_buf: Box<[u8]>,

    terminal: Option<Terminal>,
}

impl<W> CompressWriter<W> {
    /// Construct a new compressor writing a zlib stream at the default level
    ///
    /// # Errors
    ///
    /// Never fails with the default parameters, the [`Result`] is kept
    /// for symmetry with the other constructors.
    pub fn new(writer: W) -> Result<Self, Error> {
        Self::with_options(writer, CompressOptions::new())
    }

    /// Construct a new compressor writing a zlib stream at `level`
    ///
    /// # Errors
    ///
    /// Returns [`Error::EngineInit`] if `level` isn't `0..=9`
    pub fn with_level(writer: W, level: u32) -> Result<Self, Error> {
        Self::with_options(writer, CompressOptions::new().level(level))
    }

    /// Construct a new compressor writing a zlib stream at `level`,
    /// handing at most `buffer_size` bytes at a time to `writer`
    ///
    /// # Errors
    ///
    /// Returns [`Error::EngineInit`] if `level` isn't `0..=9`
    /// or `buffer_size` is smaller than [`MIN_COMPRESS_BUFFER_SIZE`]
    ///
    /// [`MIN_COMPRESS_BUFFER_SIZE`]: crate::options::MIN_COMPRESS_BUFFER_SIZE
    pub fn with_level_buffer_size(
        writer: W,
        level: u32,
        buffer_size: usize,
    ) -> Result<Self, Error> {
        let options = CompressOptions::new().level(level).buffer_size(buffer_size);
        Self::with_options(writer, options)
    }

    /// Construct a new compressor writing a raw deflate stream, without
    /// header or trailer, at the default level
    ///
    /// # Errors
    ///
    /// Never fails with the default parameters, the [`Result`] is kept
    /// for symmetry with the other constructors.
    pub fn new_raw(writer: W) -> Result<Self, Error> {
        Self::with_options(writer, CompressOptions::new().format(Format::Raw))
    }

    /// Construct a new compressor writing a raw deflate stream at `level`
    ///
    /// # Errors
    ///
    /// Returns [`Error::EngineInit`] if `level` isn't `0..=9`
    pub fn raw_with_level(writer: W, level: u32) -> Result<Self, Error> {
        let options = CompressOptions::new().format(Format::Raw).level(level);
        Self::with_options(writer, options)
    }

    /// Construct a new compressor writing a raw deflate stream at `level`
    /// with a `window_bits` window
    ///
    /// # Errors
    ///
    /// Returns [`Error::EngineInit`] if `level` isn't `0..=9`,
    /// `window_bits` isn't `9..=15` or `buffer_size` is smaller
    /// than [`MIN_COMPRESS_BUFFER_SIZE`]
    ///
    /// [`MIN_COMPRESS_BUFFER_SIZE`]: crate::options::MIN_COMPRESS_BUFFER_SIZE
    pub fn raw_with_window(
        writer: W,
        level: u32,
        window_bits: u8,
        buffer_size: usize,
    ) -> Result<Self, Error> {
        let options = CompressOptions::new()
            .format(Format::Raw)
            .level(level)
            .window_bits(window_bits)
            .buffer_size(buffer_size);
        Self::with_options(writer, options)
    }

    /// Construct a new compressor with the given [`CompressOptions`]
    ///
    /// # Errors
    ///
    /// Returns [`Error::EngineInit`] if any of the options is out of range
    pub fn with_options(writer: W, options: CompressOptions) -> Result<Self, Error> {
        let buffer_size = options.checked_buffer_size()?;
        let session = Session::compress(options.format, options.level, options.window_bits)?;

        Ok(Self {
            session,

            writer,
            out_buf: vec![0; buffer_size].into_boxed_slice(),

            terminal: None,
        })
    }

    /// Whether the stream has been closed or has failed
    pub fn is_closed(&self) -> bool {
        self.terminal.is_some()
    }

    /// Total uncompressed bytes consumed so far
    pub fn total_in(&self) -> u64 {
        self.session.total_in()
    }

    /// Total compressed bytes produced so far
    pub fn total_out(&self) -> u64 {
        self.session.total_out()
    }

    /// Get a reference to the underlying writer
    pub fn get_ref(&self) -> &W {
        &self.writer
    }

    /// Get a mutable reference to the underlying writer
    ///
    /// Writing to it directly will corrupt the compressed stream.
    pub fn get_mut(&mut self) -> &mut W {
        &mut self.writer
    }

    fn check_open(&self) -> Result<(), Error> {
        match &self.terminal {
            None => Ok(()),
            Some(Terminal::Finished) => Err(Error::UseAfterClose),
            Some(Terminal::Failed(err)) => Err(err.clone()),
        }
    }

    fn latch(&mut self, terminal: Terminal) {
        self.session.end();
        self.terminal = Some(terminal);
    }

    fn fail(&mut self, err: Error) -> Error {
        log::debug!("compression failed: {}", err);
        self.latch(Terminal::Failed(err.clone()));
        err
    }
}

impl<W: Write> CompressWriter<W> {
    /// Like [`Write::flush`], but also resets the compression dictionary,
    /// so that decompression can restart from this point
    ///
    /// # Errors
    ///
    /// Returns any error from the engine or the underlying writer
    pub fn full_flush(&mut self) -> Result<(), Error> {
        self.check_open()?;
        self.flush_with(Flush::Full).map_err(|err| self.fail(err))
    }

    /// Write the end of the stream, flush the underlying writer
    /// and release the compression engine
    ///
    /// Does not close the underlying writer. Calling this more than once
    /// is harmless.
    ///
    /// # Errors
    ///
    /// Returns any error from the engine or the underlying writer,
    /// or the error the stream previously failed with
    pub fn close(&mut self) -> Result<(), Error> {
        if let Some(terminal) = &self.terminal {
            return terminal.close_result();
        }

        match self.finish_stream() {
            Ok(()) => {
                self.latch(Terminal::Finished);
                Ok(())
            }
            Err(err) => Err(self.fail(err)),
        }
    }

    /// [`CompressWriter::close`] the stream and return the underlying writer
    ///
    /// # Errors
    ///
    /// See [`CompressWriter::close`]
    pub fn finish(mut self) -> Result<W, Error> {
        self.close()?;
        Ok(self.writer)
    }

    /// Step the session once over the bound input and hand
    /// whatever it produced to the underlying writer
    fn step_and_write(&mut self, input: &[u8], flush: Flush) -> Result<(Status, usize), Error> {
        self.session.set_output(self.out_buf.len());
        let status = self.session.step(input, &mut self.out_buf, flush)?;

        let produced = self.out_buf.len() - self.session.remaining_output();
        if produced > 0 {
            self.writer
                .write_all(&self.out_buf[..produced])
                .map_err(Error::sink_write)?;
            log::trace!("wrote {} compressed bytes", produced);
        }

        Ok((status, produced))
    }

    fn compress_input(&mut self, buf: &[u8]) -> Result<(), Error> {
        self.session.set_input(buf.len());

        while self.session.remaining_input() > 0 {
            let pending = self.session.remaining_input();
            let (_, produced) = self.step_and_write(buf, Flush::None)?;

            if produced == 0 && self.session.remaining_input() == pending {
                return Err(Error::EngineStep(
                    "engine made no progress on pending input".to_owned(),
                ));
            }
        }

        Ok(())
    }

    fn flush_with(&mut self, flush: Flush) -> Result<(), Error> {
        self.session.set_input(0);

        // a step that leaves room in the output has emitted everything
        loop {
            self.step_and_write(&[], flush)?;
            if self.session.remaining_output() > 0 {
                break;
            }
        }

        self.writer.flush().map_err(Error::sink_write)
    }

    fn finish_stream(&mut self) -> Result<(), Error> {
        self.session.set_input(0);

        loop {
            match self.step_and_write(&[], Flush::Finish)? {
                (Status::StreamEnd, _) => break,
                (_, 0) => {
                    return Err(Error::EngineStep(
                        "engine made no progress while finishing".to_owned(),
                    ))
                }
                _ => {}
            }
        }

        self.writer.flush().map_err(Error::sink_write)
    }
}

impl<W: Write> Write for CompressWriter<W> {
    /// Compress `buf`, handing compressed output to the underlying writer
    /// as the internal buffer fills
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.check_open()?;

        if buf.is_empty() {
            return Ok(0);
        }

        match self.compress_input(buf) {
            Ok(()) => Ok(buf.len()),
            Err(err) => Err(self.fail(err).into()),
        }
    }

    /// Hand all compressed output that doesn't depend on future input
    /// to the underlying writer, then flush it
    ///
    /// The stream stays open.
    fn flush(&mut self) -> io::Result<()> {
        self.check_open()?;

        match self.flush_with(Flush::Sync) {
            Ok(()) => Ok(()),
            Err(err) => Err(self.fail(err).into()),
        }
    }
}

impl<W: Debug> Debug for CompressWriter<W> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompressWriter")
            .field("session", &self.session)
            .field("writer", &self.writer)
            .field("buffer_size", &self.out_buf.len())
            .field("terminal", &self.terminal)
            .finish()
    }
}
