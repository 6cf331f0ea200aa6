//! Low-level codec session APIs
//!
//! A [`Session`] does no IO by itself. Callers bind an input and an output
//! buffer, then call [`Session::step`] until the engine has consumed what it
//! needs or filled what it can. The [`DecompressReader`] and
//! [`CompressWriter`] adapters are built on top of it.
//!
//! ```rust
//! use zflate::session::{Flush, Format, Session, Status};
//!
//! # fn main() -> Result<(), zflate::Error> {
//! let input = b"hello hello hello hello";
//!
//! let mut compressed = [0; 64];
//! let mut session = Session::compress(Format::Raw, 6, 15)?;
//! session.set_input(input.len());
//! session.set_output(compressed.len());
//! assert_eq!(session.step(input, &mut compressed, Flush::Finish)?, Status::StreamEnd);
//! let compressed_len = compressed.len() - session.remaining_output();
//! session.end();
//!
//! let mut output = [0; 64];
//! let mut session = Session::decompress(Format::Raw, 15)?;
//! session.set_input(compressed_len);
//! session.set_output(output.len());
//! session.step(&compressed, &mut output, Flush::None)?;
//! assert_eq!(&output[..input.len()], input);
//! # Ok(())
//! # }
//! ```
//!
//! [`DecompressReader`]: crate::decoder::DecompressReader
//! [`CompressWriter`]: crate::encoder::CompressWriter

use std::fmt::{self, Debug, Formatter};
use std::sync::atomic::{AtomicUsize, Ordering};

use flate2::{Compress, Compression, Decompress, FlushCompress, FlushDecompress};

use self::cursor::Cursor;
use crate::Error;

mod cursor;

/// The smallest accepted window size, in bits
pub const MIN_WINDOW_BITS: u8 = 9;
/// The largest accepted window size, in bits
pub const MAX_WINDOW_BITS: u8 = 15;
/// The highest compression level
pub const MAX_LEVEL: u32 = 9;
/// The engine's standard compression level
pub const DEFAULT_LEVEL: u32 = 6;

static LIVE_SESSIONS: AtomicUsize = AtomicUsize::new(0);

/// Number of sessions, across the whole process, whose engine state
/// hasn't been released yet
pub fn live_sessions() -> usize {
    LIVE_SESSIONS.load(Ordering::SeqCst)
}

/// Whether a [`Session`] compresses or decompresses
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Bytes in, deflate stream out
    Compress,
    /// Deflate stream in, bytes out
    Decompress,
}

/// The framing around the deflate stream
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    /// No header or trailer
    Raw,
    /// zlib header and adler32 trailer, handled by the engine
    Zlib,
}

impl Default for Format {
    fn default() -> Self {
        Format::Zlib
    }
}

/// Controls how much buffered output the engine may hold back after a step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flush {
    /// The engine decides how much output to emit
    None,
    /// Emit all output that doesn't depend on future input,
    /// aligned to a byte boundary
    Sync,
    /// Like [`Flush::Sync`], but also reset the compression dictionary.
    ///
    /// Behaves like [`Flush::None`] when decompressing.
    Full,
    /// No more input will follow, emit everything including the end marker
    Finish,
}

impl Flush {
    fn to_compress(self) -> FlushCompress {
        match self {
            Flush::None => FlushCompress::None,
            Flush::Sync => FlushCompress::Sync,
            Flush::Full => FlushCompress::Full,
            Flush::Finish => FlushCompress::Finish,
        }
    }

    fn to_decompress(self) -> FlushDecompress {
        match self {
            Flush::None | Flush::Full => FlushDecompress::None,
            Flush::Sync => FlushDecompress::Sync,
            Flush::Finish => FlushDecompress::Finish,
        }
    }
}

/// Outcome of a successful [`Session::step`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    /// Progress was made, more may be possible
    Ok,
    /// No progress was possible, the engine needs more input or more output space
    BufError,
    /// The end of the deflate stream has been reached
    StreamEnd,
}

impl From<flate2::Status> for Status {
    fn from(status: flate2::Status) -> Self {
        match status {
            flate2::Status::Ok => Status::Ok,
            flate2::Status::BufError => Status::BufError,
            flate2::Status::StreamEnd => Status::StreamEnd,
        }
    }
}

enum Engine {
    Compress(Compress),
    Decompress(Decompress),
}

impl Engine {
    fn totals(&self) -> (u64, u64) {
        match self {
            Engine::Compress(c) => (c.total_in(), c.total_out()),
            Engine::Decompress(d) => (d.total_in(), d.total_out()),
        }
    }
}

/// A stateful compression or decompression engine driven through
/// input and output cursors
///
/// The engine is released exactly once: either by [`Session::end`] or,
/// if that never happens, when the session is dropped.
/// Every operation after [`Session::end`] fails with [`Error::UseAfterClose`].
pub struct Session {
    engine: Option<Engine>,
    mode: Mode,
    format: Format,

    input: Cursor,
    output: Cursor,

    // totals at the moment the engine was released
    final_totals: (u64, u64),
}

impl Session {
    /// Construct a new decompression session
    ///
    /// # Errors
    ///
    /// Returns [`Error::EngineInit`] if `window_bits` isn't
    /// `MIN_WINDOW_BITS..=MAX_WINDOW_BITS`
    pub fn decompress(format: Format, window_bits: u8) -> Result<Self, Error> {
        check_window_bits(window_bits)?;

        let engine = Decompress::new_with_window_bits(format == Format::Zlib, window_bits);
        Ok(Self::with_engine(Engine::Decompress(engine), Mode::Decompress, format))
    }

    /// Construct a new compression session
    ///
    /// # Errors
    ///
    /// Returns [`Error::EngineInit`] if `level` is greater than [`MAX_LEVEL`]
    /// or `window_bits` isn't `MIN_WINDOW_BITS..=MAX_WINDOW_BITS`
    pub fn compress(format: Format, level: u32, window_bits: u8) -> Result<Self, Error> {
        if level > MAX_LEVEL {
            return Err(Error::EngineInit("compression level must be 0..=9"));
        }
        check_window_bits(window_bits)?;

        let engine = Compress::new_with_window_bits(
            Compression::new(level),
            format == Format::Zlib,
            window_bits,
        );
        Ok(Self::with_engine(Engine::Compress(engine), Mode::Compress, format))
    }

    fn with_engine(engine: Engine, mode: Mode, format: Format) -> Self {
        LIVE_SESSIONS.fetch_add(1, Ordering::SeqCst);
        log::debug!("initialized {:?} session ({:?})", mode, format);

        Self {
            engine: Some(engine),
            mode,
            format,

            input: Cursor::default(),
            output: Cursor::default(),

            final_totals: (0, 0),
        }
    }

    /// Bind the first `len` bytes of the next input buffer
    ///
    /// Does nothing once the session has ended.
    pub fn set_input(&mut self, len: usize) {
        if !self.is_ended() {
            self.input = Cursor::bind(len);
        }
    }

    /// Bind the first `len` bytes of the next output buffer
    ///
    /// Does nothing once the session has ended.
    pub fn set_output(&mut self, len: usize) {
        if !self.is_ended() {
            self.output = Cursor::bind(len);
        }
    }

    /// Bytes of the bound input not consumed yet, `0` once the session has ended
    pub fn remaining_input(&self) -> usize {
        if self.is_ended() {
            return 0;
        }
        self.input.remaining()
    }

    /// Bytes of the bound output not filled yet, `0` once the session has ended
    pub fn remaining_output(&self) -> usize {
        if self.is_ended() {
            return 0;
        }
        self.output.remaining()
    }

    /// Consume from the input cursor and produce into the output cursor
    ///
    /// `input` and `output` must be the buffers whose lengths were bound
    /// with [`Session::set_input`] and [`Session::set_output`]. After the call
    /// both cursors reflect exactly what the engine consumed and produced.
    ///
    /// # Panics
    ///
    /// Panics if `input` or `output` is shorter than the bound length.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UseAfterClose`] after [`Session::end`], or
    /// [`Error::EngineStep`] if the engine rejected the data.
    pub fn step(&mut self, input: &[u8], output: &mut [u8], flush: Flush) -> Result<Status, Error> {
        let engine = self.engine.as_mut().ok_or(Error::UseAfterClose)?;

        let (before_in, before_out) = engine.totals();
        let in_window = self.input.window(input);
        let out_window = self.output.window_mut(output);
        let status = match engine {
            Engine::Compress(c) => c.compress(in_window, out_window, flush.to_compress())?,
            Engine::Decompress(d) => d.decompress(in_window, out_window, flush.to_decompress())?,
        };
        let (after_in, after_out) = engine.totals();

        // both deltas are bounded by the window lengths
        self.input.advance((after_in - before_in) as usize);
        self.output.advance((after_out - before_out) as usize);

        Ok(status.into())
    }

    /// Release the engine state
    ///
    /// Returns `true` if this call released it, `false` if it
    /// had already been released.
    pub fn end(&mut self) -> bool {
        match self.engine.take() {
            Some(engine) => {
                self.final_totals = engine.totals();
                LIVE_SESSIONS.fetch_sub(1, Ordering::SeqCst);
                log::debug!(
                    "ended {:?} session: {} bytes in, {} bytes out",
                    self.mode,
                    self.final_totals.0,
                    self.final_totals.1
                );
                true
            }
            None => false,
        }
    }

    /// Whether [`Session::end`] has released the engine
    pub fn is_ended(&self) -> bool {
        self.engine.is_none()
    }

    /// Whether this session compresses or decompresses
    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// The framing this session reads or writes
    pub fn format(&self) -> Format {
        self.format
    }

    /// Total bytes consumed by the engine
    pub fn total_in(&self) -> u64 {
        self.engine.as_ref().map_or(self.final_totals.0, |e| e.totals().0)
    }

    /// Total bytes produced by the engine
    pub fn total_out(&self) -> u64 {
        self.engine.as_ref().map_or(self.final_totals.1, |e| e.totals().1)
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        if !self.is_ended() {
            log::debug!("{:?} session dropped without being ended", self.mode);
            self.end();
        }
    }
}

impl Debug for Session {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("mode", &self.mode)
            .field("format", &self.format)
            .field("input", &self.input)
            .field("output", &self.output)
            .field("ended", &self.is_ended())
            .finish()
    }
}

fn check_window_bits(window_bits: u8) -> Result<(), Error> {
    if (MIN_WINDOW_BITS..=MAX_WINDOW_BITS).contains(&window_bits) {
        Ok(())
    } else {
        Err(Error::EngineInit("window bits must be 9..=15"))
    }
}
