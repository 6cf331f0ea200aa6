//! Compression APIs
//!
//! [`CompressWriter`] wraps anything implementing [`Write`] and itself
//! implements [`Write`], compressing everything written to it.
//!
//! [`Write`]: std::io::Write

pub use self::writer::CompressWriter;

mod writer;
