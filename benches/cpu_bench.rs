// CPU Benchmarks
// Dispatch and bus-timing cost for common instruction patterns

use criterion::{criterion_group, criterion_main, Criterion};
use snes_rs::{Emulator, FlatRom};
use std::hint::black_box;

fn emulator_with_loop(program: &[u8]) -> Emulator {
    let mut rom = vec![0xeau8; 0x8000]; // NOP slide
    rom[..program.len()].copy_from_slice(program);
    rom[0x7ffc] = 0x00;
    rom[0x7ffd] = 0x80;
    let mut emu = Emulator::new(Box::new(FlatRom::new(rom))).unwrap();
    emu.step(); // reset sequence
    emu
}

fn bench_cpu_instructions(c: &mut Criterion) {
    let mut group = c.benchmark_group("cpu_instructions");

    // NOP slide: pure dispatch and idle-cycle cost
    group.bench_function("nop", |b| {
        let mut emu = emulator_with_loop(&[]);
        b.iter(|| {
            black_box(&mut emu).step();
        });
    });

    // Immediate load: operand fetch through the ROM timing path
    group.bench_function("lda_immediate", |b| {
        let mut emu = emulator_with_loop(&[0xa9, 0x42, 0x80, 0xfc]); // lda; bra -4
        b.iter(|| {
            black_box(&mut emu).step();
        });
    });

    // Work RAM store: the 8-cycle WRAM path
    group.bench_function("sta_absolute", |b| {
        let mut emu = emulator_with_loop(&[0x8d, 0x00, 0x02, 0x80, 0xfb]); // sta $0200; bra -5
        b.iter(|| {
            black_box(&mut emu).step();
        });
    });

    group.finish();
}

fn bench_cpu_frame(c: &mut Criterion) {
    let mut group = c.benchmark_group("cpu_frame");
    group.sample_size(20);

    // whole frames of the NOP slide, including PPU scanline work
    group.bench_function("run_frame", |b| {
        let mut emu = emulator_with_loop(&[]);
        b.iter(|| {
            black_box(&mut emu).run_frame();
        });
    });

    group.finish();
}

criterion_group!(benches, bench_cpu_instructions, bench_cpu_frame);
criterion_main!(benches);
