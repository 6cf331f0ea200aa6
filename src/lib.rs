//! `zflate` exposes a stateful deflate engine through ordinary
//! [`Read`] and [`Write`] streams.
//!
//! ## Main APIs
//!
//! * [`Session`]: low-level, Sans I/O, cursor-driven codec session
//! * [`DecompressReader`]: high-level synchronous decompressor over a [`Read`]
//! * [`CompressWriter`]: high-level synchronous compressor over a [`Write`]
//!
//! Both adapters accept raw deflate streams (no header or trailer) and
//! zlib streams. Each adapter owns exactly one session; the session is
//! released when the stream ends, fails, is closed or is dropped,
//! whichever happens first, and never more than once.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use std::fs::File;
//! use std::io;
//!
//! use zflate::{CompressWriter, DecompressReader};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut input = File::open("input")?;
//! let mut writer = CompressWriter::new_raw(File::create("input.deflate")?)?;
//! io::copy(&mut input, &mut writer)?;
//! writer.close()?;
//!
//! let mut reader = DecompressReader::new_raw(File::open("input.deflate")?)?;
//! let mut output = File::create("output")?;
//! io::copy(&mut reader, &mut output)?;
//! reader.close()?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Concurrency
//!
//! Every call runs to completion on the caller's thread. An adapter is a
//! single mutable resource: methods take `&mut self`, and separate adapters
//! are fully independent of each other.
//!
//! [`Read`]: std::io::Read
//! [`Write`]: std::io::Write
//! [`Session`]: crate::session::Session

#![deny(
    trivial_casts,
    trivial_numeric_casts,
    rust_2018_idioms,
    clippy::cast_lossless,
    clippy::doc_markdown,
    missing_docs,
    rustdoc::broken_intra_doc_links
)]
#![forbid(unsafe_code)]

#[doc(no_inline)]
pub use self::decoder::DecompressReader;
#[doc(no_inline)]
pub use self::encoder::CompressWriter;
pub use self::error::Error;
pub use self::options::{
    CompressOptions, DecompressOptions, DEFAULT_BUFFER_SIZE, MIN_COMPRESS_BUFFER_SIZE,
};

pub mod decoder;
pub mod encoder;
mod error;
pub mod options;
pub mod session;
mod terminal;
