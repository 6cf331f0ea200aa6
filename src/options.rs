//! Construction parameters for [`DecompressReader`] and [`CompressWriter`]
//!
//! [`DecompressReader`]: crate::decoder::DecompressReader
//! [`CompressWriter`]: crate::encoder::CompressWriter

use crate::session::{Format, DEFAULT_LEVEL, MAX_WINDOW_BITS};
use crate::Error;

/// Size of the internal buffer used when none is given
pub const DEFAULT_BUFFER_SIZE: usize = 32 * 1024;

/// Smallest output buffer a [`CompressWriter`] accepts
///
/// Sync and full flushes need more than 6 bytes of output space,
/// otherwise the engine keeps emitting new flush markers.
///
/// [`CompressWriter`]: crate::encoder::CompressWriter
pub const MIN_COMPRESS_BUFFER_SIZE: usize = 8;

/// Parameters of a [`DecompressReader`]
///
/// ```rust
/// use zflate::options::DecompressOptions;
/// use zflate::session::Format;
///
/// let options = DecompressOptions::new()
///     .format(Format::Raw)
///     .buffer_size(4096);
/// ```
///
/// [`DecompressReader`]: crate::decoder::DecompressReader
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecompressOptions {
    pub(crate) format: Format,
    pub(crate) window_bits: u8,
    pub(crate) buffer_size: usize,
}

impl DecompressOptions {
    /// zlib framing, the largest window and the default buffer size
    pub fn new() -> Self {
        Self {
            format: Format::Zlib,
            window_bits: MAX_WINDOW_BITS,
            buffer_size: DEFAULT_BUFFER_SIZE,
        }
    }

    /// Set the framing of the compressed stream
    pub fn format(mut self, format: Format) -> Self {
        self.format = format;
        self
    }

    /// Set the window size, in bits
    pub fn window_bits(mut self, window_bits: u8) -> Self {
        self.window_bits = window_bits;
        self
    }

    /// Set the size of the buffer compressed data is read into
    pub fn buffer_size(mut self, buffer_size: usize) -> Self {
        self.buffer_size = buffer_size;
        self
    }

    pub(crate) fn checked_buffer_size(&self) -> Result<usize, Error> {
        check_buffer_size(self.buffer_size)
    }
}

impl Default for DecompressOptions {
    fn default() -> Self {
        Self::new()
    }
}

/// Parameters of a [`CompressWriter`]
///
/// [`CompressWriter`]: crate::encoder::CompressWriter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompressOptions {
    pub(crate) format: Format,
    pub(crate) level: u32,
    pub(crate) window_bits: u8,
    pub(crate) buffer_size: usize,
}

impl CompressOptions {
    /// zlib framing, the default level, the largest window and the default buffer size
    pub fn new() -> Self {
        Self {
            format: Format::Zlib,
            level: DEFAULT_LEVEL,
            window_bits: MAX_WINDOW_BITS,
            buffer_size: DEFAULT_BUFFER_SIZE,
        }
    }

    /// Set the framing of the compressed stream
    pub fn format(mut self, format: Format) -> Self {
        self.format = format;
        self
    }

    /// Set the compression level, `0..=9`
    pub fn level(mut self, level: u32) -> Self {
        self.level = level;
        self
    }

    /// Set the window size, in bits
    pub fn window_bits(mut self, window_bits: u8) -> Self {
        self.window_bits = window_bits;
        self
    }

    /// Set the size of the buffer compressed data is written from,
    /// at least [`MIN_COMPRESS_BUFFER_SIZE`]
    pub fn buffer_size(mut self, buffer_size: usize) -> Self {
        self.buffer_size = buffer_size;
        self
    }

    pub(crate) fn checked_buffer_size(&self) -> Result<usize, Error> {
        if self.buffer_size < MIN_COMPRESS_BUFFER_SIZE {
            Err(Error::EngineInit("compression buffer size must be at least 8"))
        } else {
            Ok(self.buffer_size)
        }
    }
}

impl Default for CompressOptions {
    fn default() -> Self {
        Self::new()
    }
}

fn check_buffer_size(buffer_size: usize) -> Result<usize, Error> {
    if buffer_size == 0 {
        Err(Error::EngineInit("buffer size must be greater than zero"))
    } else {
        Ok(buffer_size)
    }
}
