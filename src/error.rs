use std::io;
use std::sync::Arc;

use thiserror::Error;

/// An error returned by [`Session`], [`DecompressReader`] or [`CompressWriter`]
///
/// Errors are cheap to clone so that a terminal failure can be
/// replayed on every call made after it was first reported.
///
/// [`Session`]: crate::session::Session
/// [`DecompressReader`]: crate::decoder::DecompressReader
/// [`CompressWriter`]: crate::encoder::CompressWriter
#[derive(Debug, Clone, Error)]
#[non_exhaustive]
pub enum Error {
    /// The engine parameters (level, window bits or buffer size) were rejected
    #[error("invalid engine parameters: {0}")]
    EngineInit(&'static str),
    /// The underlying reader returned an error
    #[error("reading from source: {0}")]
    SourceRead(#[source] Arc<io::Error>),
    /// The underlying writer returned an error
    #[error("writing to sink: {0}")]
    SinkWrite(#[source] Arc<io::Error>),
    /// The engine rejected the input as corrupt, or failed internally
    #[error("codec step: {0}")]
    EngineStep(String),
    /// The stream was used after its session had been torn down
    #[error("stream used after close")]
    UseAfterClose,
}

impl Error {
    pub(crate) fn source_read(err: io::Error) -> Self {
        Error::SourceRead(Arc::new(err))
    }

    pub(crate) fn sink_write(err: io::Error) -> Self {
        Error::SinkWrite(Arc::new(err))
    }
}

impl From<flate2::DecompressError> for Error {
    fn from(err: flate2::DecompressError) -> Self {
        Error::EngineStep(err.to_string())
    }
}

impl From<flate2::CompressError> for Error {
    fn from(err: flate2::CompressError) -> Self {
        Error::EngineStep(err.to_string())
    }
}

impl From<Error> for io::Error {
    fn from(err: Error) -> io::Error {
        let kind = match &err {
            Error::SourceRead(inner) | Error::SinkWrite(inner) => inner.kind(),
            Error::EngineStep(_) => io::ErrorKind::InvalidData,
            Error::EngineInit(_) => io::ErrorKind::InvalidInput,
            Error::UseAfterClose => io::ErrorKind::Other,
        };
        io::Error::new(kind, err)
    }
}
