#![allow(dead_code)]

use std::io::{self, Read, Write};

use flate2::write::{DeflateEncoder, ZlibEncoder};
use flate2::Compression;

/// Mildly repetitive text, so that it actually compresses
pub fn sample(len: usize) -> Vec<u8> {
    let words: &[&[u8]] = &[b"stream ", b"deflate ", b"window ", b"cursor ", b"block\n"];
    words
        .iter()
        .cycle()
        .enumerate()
        .flat_map(|(i, word)| word.iter().copied().chain(std::iter::once(b'0' + (i % 10) as u8)))
        .take(len)
        .collect()
}

pub fn reference_raw(data: &[u8]) -> Vec<u8> {
    let mut encoder = DeflateEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(data).unwrap();
    encoder.finish().unwrap()
}

pub fn reference_zlib(data: &[u8]) -> Vec<u8> {
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(data).unwrap();
    encoder.finish().unwrap()
}

/// Hands out at most `chunk` bytes per read and counts the calls
pub struct ChunkedSource<'a> {
    data: &'a [u8],
    chunk: usize,
    pub reads: usize,
}

impl<'a> ChunkedSource<'a> {
    pub fn new(data: &'a [u8], chunk: usize) -> Self {
        Self {
            data,
            chunk,
            reads: 0,
        }
    }

    pub fn remaining(&self) -> usize {
        self.data.len()
    }
}

impl Read for ChunkedSource<'_> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.reads += 1;
        let len = buf.len().min(self.chunk).min(self.data.len());
        buf[..len].copy_from_slice(&self.data[..len]);
        self.data = &self.data[len..];
        Ok(len)
    }
}

/// Fails every read with `kind`
pub struct FailingSource {
    kind: io::ErrorKind,
    pub reads: usize,
}

impl FailingSource {
    pub fn new(kind: io::ErrorKind) -> Self {
        Self { kind, reads: 0 }
    }
}

impl Read for FailingSource {
    fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
        self.reads += 1;
        Err(io::Error::new(self.kind, "source failed"))
    }
}

/// Accepts `capacity` bytes, then fails every write
pub struct FailingSink {
    pub written: Vec<u8>,
    capacity: usize,
    pub writes: usize,
}

impl FailingSink {
    pub fn new(capacity: usize) -> Self {
        Self {
            written: Vec::new(),
            capacity,
            writes: 0,
        }
    }
}

impl Write for FailingSink {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.writes += 1;
        let room = self.capacity - self.written.len();
        if room == 0 {
            return Err(io::Error::new(io::ErrorKind::WriteZero, "sink full"));
        }

        let len = buf.len().min(room);
        self.written.extend_from_slice(&buf[..len]);
        Ok(len)
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
