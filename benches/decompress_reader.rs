use std::io::{Read, Write};

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use flate2::read::DeflateDecoder;
use flate2::write::DeflateEncoder;
use flate2::Compression;
use zflate::{CompressWriter, DecompressReader};

fn sample() -> Vec<u8> {
    (0..4 * 1024 * 1024u32)
        .map(|i| (i % 251) as u8 ^ (i / 4096) as u8)
        .collect()
}

fn bench_decompress(c: &mut Criterion) {
    let decompressed = sample();
    let mut encoder = DeflateEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(&decompressed).unwrap();
    let compressed = encoder.finish().unwrap();

    let compressed: &[u8] = compressed.as_ref();
    let decompressed: &[u8] = decompressed.as_ref();

    c.bench_function("decompress zflate", move |b| {
        b.iter(|| {
            let compressed = black_box(compressed);

            let mut reader = DecompressReader::new_raw(compressed).unwrap();

            let mut out = Vec::with_capacity(decompressed.len());
            reader.read_to_end(&mut out).unwrap();

            let decompressed = black_box(decompressed);
            assert_eq!(decompressed, out.as_slice());
        })
    });

    c.bench_function("decompress flate2", move |b| {
        b.iter(|| {
            let compressed = black_box(compressed);

            let mut decoder = DeflateDecoder::new(compressed);

            let mut out = Vec::with_capacity(decompressed.len());
            decoder.read_to_end(&mut out).unwrap();

            let decompressed = black_box(decompressed);
            assert_eq!(decompressed, out.as_slice());
        })
    });
}

fn bench_compress(c: &mut Criterion) {
    let decompressed = sample();
    let decompressed: &[u8] = decompressed.as_ref();

    c.bench_function("compress zflate", move |b| {
        b.iter(|| {
            let mut writer = CompressWriter::new_raw(Vec::new()).unwrap();
            writer.write_all(black_box(decompressed)).unwrap();
            black_box(writer.finish().unwrap());
        })
    });
}

criterion_group!(benches, bench_decompress, bench_compress);
criterion_main!(benches);
