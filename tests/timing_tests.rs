// Raster and scheduling invariants across whole frames.

mod common;

use common::{emulator_with_program, pal_emulator_with_program};

#[test]
fn test_raster_position_stays_in_range() {
    let mut emu = emulator_with_program(&[]);
    for _ in 0..20_000 {
        emu.step();
        assert!(emu.bus.h_pos < 1368, "hPos {} out of range", emu.bus.h_pos);
        assert_eq!(emu.bus.h_pos % 2, 0, "hPos advances in dot pairs");
        assert!(emu.bus.v_pos < 262, "vPos {} out of range", emu.bus.v_pos);
    }
}

#[test]
fn test_pal_line_count() {
    let mut emu = pal_emulator_with_program(&[]);
    let mut max_v = 0;
    for _ in 0..80_000 {
        emu.step();
        max_v = max_v.max(emu.bus.v_pos);
        assert!(emu.bus.v_pos < 313);
    }
    assert!(max_v > 262, "PAL frames run past the NTSC line count");
}

#[test]
fn test_cycle_counter_is_even_and_monotonic() {
    let mut emu = emulator_with_program(&[]);
    let mut last = emu.bus.cycles;
    for _ in 0..5_000 {
        emu.step();
        assert_eq!(emu.bus.cycles % 2, 0);
        assert!(emu.bus.cycles > last);
        last = emu.bus.cycles;
    }
}

#[test]
fn test_emulation_mode_invariants_hold_every_opcode() {
    let mut emu = emulator_with_program(&[]);
    for _ in 0..5_000 {
        emu.step();
        if emu.cpu.e {
            assert!(emu.cpu.mf && emu.cpu.xf);
            assert_eq!(emu.cpu.sp & 0xff00, 0x0100);
        }
        if emu.cpu.xf {
            assert_eq!(emu.cpu.x & 0xff00, 0);
            assert_eq!(emu.cpu.y & 0xff00, 0);
        }
    }
}

#[test]
fn test_vblank_window_and_frame_wrap() {
    let mut emu = emulator_with_program(&[]);
    // run two full frames, recording where vblank starts and ends
    let mut entered_at = None;
    let start_frame = emu.bus.frames;
    while emu.bus.frames < start_frame + 2 {
        let was = emu.bus.in_vblank;
        emu.step();
        if !was && emu.bus.in_vblank && entered_at.is_none() {
            entered_at = Some(emu.bus.v_pos);
        }
        if emu.bus.in_vblank {
            assert!(emu.bus.v_pos >= 225 || emu.bus.v_pos == 0);
        }
    }
    assert_eq!(entered_at, Some(225), "vblank begins at line 225");
}

#[test]
fn test_run_frame_lands_in_vblank() {
    let mut emu = emulator_with_program(&[]);
    emu.run_frame();
    assert!(emu.bus.in_vblank);
    let frame = emu.bus.frames;
    emu.run_frame();
    assert!(emu.bus.in_vblank);
    assert_eq!(emu.bus.frames, frame + 1, "one frame per call");
}

#[test]
fn test_run_cycles_advances_at_least_requested() {
    let mut emu = emulator_with_program(&[]);
    let start = emu.bus.cycles;
    emu.run_cycles(10_000);
    assert!(emu.bus.cycles >= start + 10_000);
    // opcode granularity: the overshoot stays small
    assert!(emu.bus.cycles < start + 10_200);
}

#[test]
fn test_auto_joypad_busy_window() {
    let mut emu = emulator_with_program(&[]);
    emu.bus.write(0x00_4200, 0x01);
    while !emu.bus.in_vblank {
        emu.step();
    }
    let busy = emu.bus.read(0x00_4212) & 0x01;
    assert_eq!(busy, 1, "busy right after vblank entry");
    emu.run_cycles(4300);
    let busy = emu.bus.read(0x00_4212) & 0x01;
    assert_eq!(busy, 0, "done within 4224 cycles");
}

#[test]
fn test_vblank_flag_spans_bottom_of_frame() {
    let mut emu = emulator_with_program(&[]);
    while !(emu.bus.v_pos == 100 && !emu.bus.in_vblank) {
        emu.step();
    }
    let status = emu.bus.read(0x00_4212);
    assert_eq!(status & 0x80, 0, "mid-frame is not vblank");
    while emu.bus.v_pos != 230 {
        emu.step();
    }
    let status = emu.bus.read(0x00_4212);
    assert_eq!(status & 0x80, 0x80, "line 230 is inside vblank");
}
