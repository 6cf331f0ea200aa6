//! Decompression APIs
//!
//! [`DecompressReader`] wraps anything implementing [`Read`] that yields a
//! deflate stream, and itself implements [`Read`], yielding the decompressed
//! bytes.
//!
//! [`Read`]: std::io::Read

pub use self::reader::DecompressReader;

mod reader;
