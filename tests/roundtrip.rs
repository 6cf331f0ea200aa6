use std::io::{Read, Write};

use proptest::prelude::*;

use zflate::options::{CompressOptions, DecompressOptions};
use zflate::session::Format;
use zflate::{CompressWriter, DecompressReader, MIN_COMPRESS_BUFFER_SIZE};

fn roundtrip(
    data: &[u8],
    format: Format,
    write_chunk: usize,
    read_chunk: usize,
    buffer_size: usize,
) -> Vec<u8> {
    let options = CompressOptions::new()
        .format(format)
        .buffer_size(buffer_size.max(MIN_COMPRESS_BUFFER_SIZE));
    let mut writer = CompressWriter::with_options(Vec::new(), options).unwrap();
    for chunk in data.chunks(write_chunk) {
        writer.write_all(chunk).unwrap();
    }
    let compressed = writer.finish().unwrap();

    let options = DecompressOptions::new().format(format).buffer_size(buffer_size);
    let mut reader = DecompressReader::with_options(compressed.as_slice(), options).unwrap();
    let mut out = Vec::new();
    let mut buf = vec![0; read_chunk];
    loop {
        match reader.read(&mut buf).unwrap() {
            0 => break,
            n => out.extend_from_slice(&buf[..n]),
        }
    }
    reader.close().unwrap();
    out
}

#[test]
fn empty_input() {
    assert!(roundtrip(&[], Format::Raw, 1, 1, 1).is_empty());
    assert!(roundtrip(&[], Format::Zlib, 1, 1024, 1024).is_empty());
}

proptest! {
    #[test]
    fn raw_roundtrip(
        data in proptest::collection::vec(any::<u8>(), 0..8192),
        write_chunk in 1usize..512,
        read_chunk in 1usize..512,
        buffer_size in 1usize..256,
    ) {
        prop_assert_eq!(roundtrip(&data, Format::Raw, write_chunk, read_chunk, buffer_size), data);
    }

    #[test]
    fn zlib_roundtrip_repetitive(
        seed in proptest::collection::vec(0u8..4, 1..64),
        repeat in 1usize..200,
        read_chunk in 1usize..64,
    ) {
        let data: Vec<u8> = seed.iter().copied().cycle().take(seed.len() * repeat).collect();
        prop_assert_eq!(roundtrip(&data, Format::Zlib, 100, read_chunk, 64), data);
    }
}
