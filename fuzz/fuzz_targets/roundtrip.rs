#![no_main]
use libfuzzer_sys::fuzz_target;

use std::io::{self, Write};

use zflate::{CompressWriter, DecompressReader};

fuzz_target!(|data: &[u8]| {
    let mut writer = CompressWriter::raw_with_window(Vec::new(), 6, 15, 13).expect("valid parameters");
    for chunk in data.chunks(97) {
        writer.write_all(chunk).expect("writing to a Vec never fails");
    }
    let compressed = writer.finish().expect("writing to a Vec never fails");

    let mut reader = DecompressReader::raw_with_buffer_size(compressed.as_slice(), 5).expect("valid parameters");
    let mut decompressed = Vec::new();
    io::copy(&mut reader, &mut decompressed).expect("failed decompressing our own output");

    assert_eq!(data, decompressed.as_slice());
});
