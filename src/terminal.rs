use crate::Error;

/// A condition after which a stream never touches its session again
#[derive(Debug, Clone)]
pub(crate) enum Terminal {
    /// The stream ended cleanly, or was closed by the caller
    Finished,
    /// The stream failed, the error is replayed on every later call
    Failed(Error),
}

impl Terminal {
    /// The result `close` reports once this condition is latched
    pub(crate) fn close_result(&self) -> Result<(), Error> {
        match self {
            Terminal::Finished => Ok(()),
            Terminal::Failed(err) => Err(err.clone()),
        }
    }
}
