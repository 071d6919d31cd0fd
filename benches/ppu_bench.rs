// PPU Benchmarks
// Scanline rendering cost for representative screen setups

use criterion::{criterion_group, criterion_main, Criterion};
use snes_rs::Ppu;
use std::hint::black_box;

fn view(in_vblank: bool) -> snes_rs::ppu::BusView {
    snes_rs::ppu::BusView {
        h_pos: 0,
        v_pos: 0,
        open_bus: 0,
        ppu_latch: true,
        in_vblank,
        pal_timing: false,
    }
}

/// Mode-1 screen with two backgrounds and a row of sprites
fn busy_ppu() -> Ppu {
    let mut ppu = Ppu::new();
    let v = view(true);
    ppu.write(0x00, 0x0f, v); // full brightness
    ppu.write(0x05, 0x01, v); // mode 1
    ppu.write(0x2c, 0x13, v); // BG1, BG2 and OBJ on the main screen
    // some non-trivial tile data
    for adr in 0..0x800u16 {
        ppu.write(0x16, (adr & 0xff) as u8, v);
        ppu.write(0x17, (adr >> 8) as u8, v);
        ppu.write(0x18, (adr & 0xff) as u8, v);
        ppu.write(0x19, (adr >> 7) as u8, v);
    }
    // a row of sprites on line 0
    for i in 0..32u8 {
        ppu.write(0x02, i.wrapping_mul(2), v);
        ppu.write(0x04, i.wrapping_mul(8), v);
        ppu.write(0x04, 0x00, v);
        ppu.write(0x04, 0x01, v);
        ppu.write(0x04, 0x00, v);
    }
    ppu
}

fn bench_scanline(c: &mut Criterion) {
    let mut group = c.benchmark_group("ppu_scanline");

    group.bench_function("backdrop_only", |b| {
        let mut ppu = Ppu::new();
        ppu.write(0x00, 0x0f, view(true));
        b.iter(|| {
            black_box(&mut ppu).run_line(1);
        });
    });

    group.bench_function("two_bgs_and_sprites", |b| {
        let mut ppu = busy_ppu();
        b.iter(|| {
            black_box(&mut ppu).run_line(1);
        });
    });

    group.bench_function("mode7", |b| {
        let mut ppu = Ppu::new();
        let v = view(true);
        ppu.write(0x00, 0x0f, v);
        ppu.write(0x05, 0x07, v);
        ppu.write(0x2c, 0x01, v);
        ppu.write(0x1b, 0x00, v);
        ppu.write(0x1b, 0x01, v);
        ppu.write(0x1e, 0x00, v);
        ppu.write(0x1e, 0x01, v);
        b.iter(|| {
            black_box(&mut ppu).run_line(1);
        });
    });

    group.finish();
}

criterion_group!(benches, bench_scanline);
criterion_main!(benches);
