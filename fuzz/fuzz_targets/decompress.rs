#![no_main]
use libfuzzer_sys::fuzz_target;

use std::io;

use zflate::DecompressReader;

fuzz_target!(|data: &[u8]| {
    let mut reader = DecompressReader::new_raw(data).expect("default parameters are valid");
    let _ = io::copy(&mut reader, &mut io::sink());
    let _ = reader.close();
});
