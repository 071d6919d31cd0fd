// Common test utilities for full-console integration tests
//
// Builds an emulator around a flat ROM image with the reset vector
// pointing at $8000, where the test program lives.

#![allow(dead_code)]

use snes_rs::{Emulator, EmulatorConfig, FlatRom, VideoRegion};

/// Assemble a 32 KiB ROM image: `program` at $8000, vectors at the top
pub fn rom_with_program(program: &[u8]) -> Vec<u8> {
    let mut rom = vec![0xeau8; 0x8000]; // NOP everywhere else
    rom[..program.len()].copy_from_slice(program);
    // reset vector -> $8000
    rom[0x7ffc] = 0x00;
    rom[0x7ffd] = 0x80;
    // native NMI -> $9000, native IRQ -> $9100, emulation IRQ -> $9200
    rom[0x7fea] = 0x00;
    rom[0x7feb] = 0x90;
    rom[0x7fee] = 0x00;
    rom[0x7fef] = 0x91;
    rom[0x7ffe] = 0x00;
    rom[0x7fff] = 0x92;
    rom
}

/// Emulator that has completed its reset sequence
pub fn emulator_with_program(program: &[u8]) -> Emulator {
    let _ = env_logger::builder().is_test(true).try_init();
    let mut emu = Emulator::new(Box::new(FlatRom::new(rom_with_program(program)))).unwrap();
    emu.step(); // reset sequence
    emu
}

/// PAL-timed variant
pub fn pal_emulator_with_program(program: &[u8]) -> Emulator {
    let _ = env_logger::builder().is_test(true).try_init();
    let config = EmulatorConfig {
        region: VideoRegion::Pal,
        ..EmulatorConfig::default()
    };
    let mut emu = Emulator::with_config(
        Box::new(FlatRom::new(rom_with_program(program))),
        &config,
    )
    .unwrap();
    emu.step();
    emu
}
