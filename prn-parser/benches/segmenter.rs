//! Spool reader benchmarks

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use prn_parser::SpoolReader;

const START: &[u8] = b"\x1b%-12345X@PJL\r\n";

/// Pseudo-random payload with the occasional '@' and ESC to force probing
fn payload(len: usize, seed: u32) -> Vec<u8> {
    let mut state = seed;
    (0..len)
        .map(|_| {
            state = state.wrapping_mul(1_664_525).wrapping_add(1_013_904_223);
            (state >> 24) as u8
        })
        .collect()
}

fn bench_plain_payload(c: &mut Criterion) {
    let mut group = c.benchmark_group("reader");

    // Unframed image: whole file as one page
    let plain = payload(1 << 20, 7);
    group.throughput(Throughput::Bytes(plain.len() as u64));

    group.bench_function("unframed", |b| {
        let reader = SpoolReader::new(1, b"\r\n").unwrap();
        b.iter(|| black_box(reader.read(black_box(plain.as_slice())).unwrap()))
    });

    group.finish();
}

fn bench_framed_pages(c: &mut Criterion) {
    let mut group = c.benchmark_group("reader");

    // Ten pages separated by three command lines each
    let mut spool = START.to_vec();
    for page in 0..10 {
        spool.extend_from_slice(format!("@PJL SET PAGE={}\r\n", page).as_bytes());
        spool.extend_from_slice(b"@PJL SET RESOLUTION=600\r\n");
        spool.extend_from_slice(b"@PJL ENTER LANGUAGE=JBIG\r\n");
        spool.extend_from_slice(&payload(100_000, page));
    }
    spool.extend_from_slice(b"\x1b%-12345X\r\n");
    group.throughput(Throughput::Bytes(spool.len() as u64));

    group.bench_function("framed_pages", |b| {
        let reader = SpoolReader::new(3, b"\r\n").unwrap();
        b.iter(|| black_box(reader.read(black_box(spool.as_slice())).unwrap()))
    });

    group.finish();
}

fn bench_command_heavy(c: &mut Criterion) {
    let mut group = c.benchmark_group("reader");

    // Mostly command lines with tiny payloads between them
    let mut spool = START.to_vec();
    for _ in 0..5_000 {
        spool.extend_from_slice(b"@PJL COMMENT benchmark line\r\n");
        spool.extend_from_slice(b"xy");
    }
    group.throughput(Throughput::Bytes(spool.len() as u64));

    group.bench_function("command_heavy", |b| {
        let reader = SpoolReader::new(1, b"\r\n").unwrap();
        b.iter(|| black_box(reader.read(black_box(spool.as_slice())).unwrap()))
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_plain_payload,
    bench_framed_pages,
    bench_command_heavy
);

criterion_main!(benches);
