/*
 * Copyright 2026 Cyclo Project Developers.
 *
 * Licensed under the Apache License, Version 2.0 (the "License");
 * you may not use this file except in compliance with the License.
 */

//! # Bit Conversion Benchmarks
//!
//! The conversion engine runs once per mismatched signal element per cycle,
//! so per-call cost directly bounds achievable cycle rates. These benches
//! cover the three granularity bands (sub-byte, word, 128-bit).

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use cyclo_bitfield::{bit_range_to_integer, integer_to_bit_range, BitCursor};

fn bench_extract(c: &mut Criterion) {
    let buf: Vec<u8> = (0..64u8).collect();
    let mut group = c.benchmark_group("extract");
    for &(size, signed) in &[(3u32, false), (13, true), (31, true), (64, false), (100, true)] {
        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{}bit_signed_{}", size, signed)),
            &(size, signed),
            |b, &(size, signed)| {
                b.iter(|| {
                    let mut cur = BitCursor::new(1, 5);
                    let v: i64 =
                        bit_range_to_integer(black_box(&buf), &mut cur, size, signed).unwrap();
                    black_box(v)
                })
            },
        );
    }
    group.finish();
}

fn bench_insert(c: &mut Criterion) {
    let mut buf = vec![0u8; 64];
    let mut group = c.benchmark_group("insert");
    for &size in &[7u32, 17, 48, 96] {
        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, &size| {
            b.iter(|| {
                let mut cur = BitCursor::new(2, 3);
                integer_to_bit_range(black_box(&mut buf), &mut cur, size, true, -12345i64).unwrap();
            })
        });
    }
    group.finish();
}

fn bench_packed_record_walk(c: &mut Criterion) {
    // A representative packed telemetry record: 16 mixed-width fields.
    let widths: [u32; 16] = [1, 3, 5, 7, 9, 11, 13, 15, 2, 4, 6, 8, 10, 12, 14, 16];
    let buf = vec![0xA5u8; 32];
    c.bench_function("packed_record_walk", |b| {
        b.iter(|| {
            let mut cur = BitCursor::start();
            let mut acc = 0i64;
            for &w in &widths {
                let v: i64 = bit_range_to_integer(black_box(&buf), &mut cur, w, true).unwrap();
                acc = acc.wrapping_add(v);
            }
            black_box(acc)
        })
    });
}

criterion_group!(benches, bench_extract, bench_insert, bench_packed_record_walk);
criterion_main!(benches);
