/// A `pos..end` window into a buffer bound to a [`Session`]
///
/// [`Session`]: super::Session
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(super) struct Cursor {
    pos: usize,
    end: usize,
}

impl Cursor {
    pub(super) fn bind(len: usize) -> Self {
        Self { pos: 0, end: len }
    }

    pub(super) fn remaining(&self) -> usize {
        self.end - self.pos
    }

    pub(super) fn window<'a>(&self, buf: &'a [u8]) -> &'a [u8] {
        &buf[self.pos..self.end]
    }

    pub(super) fn window_mut<'a>(&self, buf: &'a mut [u8]) -> &'a mut [u8] {
        &mut buf[self.pos..self.end]
    }

    /// Marks `n` bytes of the window as consumed or filled
    pub(super) fn advance(&mut self, n: usize) {
        debug_assert!(n <= self.remaining());
        self.pos += n;
    }
}
