#![no_main]
use libfuzzer_sys::fuzz_target;

use std::io::{self, Read};

use flate2::bufread::DeflateEncoder;
use flate2::Compression;
use zflate::DecompressReader;

fuzz_target!(|data: &[u8]| {
    let mut encoder = DeflateEncoder::new(data, Compression::new(3));
    let mut compressed = Vec::new();
    encoder.read_to_end(&mut compressed).expect("reference encoder worked");

    let mut reader = DecompressReader::raw_with_buffer_size(compressed.as_slice(), 7)
        .expect("valid parameters");
    let mut decompressed = Vec::new();
    io::copy(&mut reader, &mut decompressed).expect("failed decompressing what the reference implementation compressed");

    assert_eq!(data, decompressed.as_slice());
});
