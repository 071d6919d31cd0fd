//! PPU register behaviour

use super::super::Ppu;
use super::*;

// ========================================
// VRAM data port
// ========================================

#[test]
fn test_vram_write_and_read_back() {
    let mut ppu = Ppu::new();
    write_vram(&mut ppu, 0x1000, 0xbeef);
    // re-point and read through the prefetched data port
    ppu.write(0x16, 0x00, vblank_view());
    ppu.write(0x17, 0x10, vblank_view());
    let low = ppu.read(0x39, vblank_view());
    let high = ppu.read(0x3a, vblank_view());
    assert_eq!(low, 0xef);
    assert_eq!(high, 0xbe);
}

#[test]
fn test_vram_write_ignored_outside_blanking() {
    let mut ppu = Ppu::new();
    ppu.write(0x00, 0x0f, view()); // disable forced blank, full brightness
    ppu.write(0x16, 0x00, view());
    ppu.write(0x17, 0x10, view());
    ppu.write(0x18, 0xcd, view());
    ppu.write(0x19, 0xab, view());
    assert_eq!(ppu.vram[0x1000], 0, "write discarded mid-frame");
    assert_eq!(ppu.vram_pointer, 0x1001, "pointer still advanced");
}

#[test]
fn test_vram_write_allowed_during_forced_blank() {
    let mut ppu = Ppu::new();
    // forced blank is set out of reset
    write_vram(&mut ppu, 0x0123, 0x4567);
    assert_eq!(ppu.vram[0x0123], 0x4567);
}

#[test]
fn test_vram_remap_modes() {
    let mut ppu = Ppu::new();
    ppu.vram_pointer = 0x00ff;
    ppu.vram_remap_mode = 0;
    assert_eq!(ppu.vram_remap(), 0x00ff);
    ppu.vram_remap_mode = 1;
    // low 8 bits rotated: aaaaaaaYYYbbbbb -> aaaaaaabbbbbYYY
    assert_eq!(ppu.vram_remap(), (0x00ff & 0xff00) | 0x07 | ((0x1f) << 3));
    ppu.vram_remap_mode = 2;
    assert_eq!(ppu.vram_remap(), (0x00ff & 0xfe00) | 0x03 | ((0x3f) << 3));
}

#[test]
fn test_vram_increment_amounts() {
    let mut ppu = Ppu::new();
    ppu.write(0x15, 0x01, vblank_view()); // step 32, increment on low
    ppu.write(0x16, 0x00, vblank_view());
    ppu.write(0x17, 0x00, vblank_view());
    ppu.write(0x18, 0x11, vblank_view());
    assert_eq!(ppu.vram_pointer, 32);
}

// ========================================
// CGRAM and OAM word latches
// ========================================

#[test]
fn test_cgram_word_latch() {
    let mut ppu = Ppu::new();
    write_cgram(&mut ppu, 0x10, 0x7fff);
    assert_eq!(ppu.cgram[0x10], 0x7fff);
    // read back low then high
    ppu.write(0x21, 0x10, view());
    assert_eq!(ppu.read(0x3b, view()), 0xff);
    assert_eq!(ppu.read(0x3b, view()) & 0x7f, 0x7f);
}

#[test]
fn test_cgram_first_write_is_buffered() {
    let mut ppu = Ppu::new();
    ppu.write(0x21, 0x00, view());
    ppu.write(0x22, 0x34, view());
    assert_eq!(ppu.cgram[0], 0, "single write does not commit");
    ppu.write(0x22, 0x12, view());
    assert_eq!(ppu.cgram[0], 0x1234);
}

#[test]
fn test_oam_word_latch_and_autoincrement() {
    let mut ppu = Ppu::new();
    write_oam_sprite(&mut ppu, 0, 0x20, 0x30, 0x05, 0x00);
    assert_eq!(ppu.oam[0], 0x3020, "y in the high byte, x in the low");
    assert_eq!(ppu.oam[1], 0x0005);
}

// ========================================
// Counter latching
// ========================================

#[test]
fn test_counter_latch_and_double_read() {
    let mut ppu = Ppu::new();
    let mut bus = view();
    bus.h_pos = 400;
    bus.v_pos = 101;
    ppu.read(0x37, bus); // SLHV latches hPos/4 and vPos
    assert_eq!(ppu.h_count, 100);
    assert_eq!(ppu.v_count, 101);
    assert_eq!(ppu.read(0x3c, bus), 100, "horizontal low byte");
    assert_eq!(ppu.read(0x3c, bus) & 1, 0, "horizontal high bit");
    assert_eq!(ppu.read(0x3d, bus), 101);
    // status read resets the toggles and the latch flag
    ppu.read(0x3c, bus);
    let stat = ppu.read(0x3f, bus);
    assert_eq!(stat & 0x40, 0x40, "latched flag visible");
    assert_eq!(ppu.read(0x3c, bus), 100, "toggle reset by status read");
    let stat = ppu.read(0x3f, bus);
    assert_eq!(stat & 0x40, 0, "latch flag cleared");
}

#[test]
fn test_status_reads_expose_versions() {
    let mut ppu = Ppu::new();
    assert_eq!(ppu.read(0x3e, view()) & 0xf, 0x1, "PPU1 version");
    assert_eq!(ppu.read(0x3f, view()) & 0xf, 0x3, "PPU2 version");
    let mut pal = view();
    pal.pal_timing = true;
    assert_eq!(ppu.read(0x3f, pal) & 0x10, 0x10, "PAL flag");
}

#[test]
fn test_write_only_registers_read_ppu1_open_bus() {
    let mut ppu = Ppu::new();
    ppu.ppu1_open_bus = 0x5a;
    assert_eq!(ppu.read(0x04, view()), 0x5a);
    assert_eq!(ppu.read(0x28, view()), 0x5a);
}

#[test]
fn test_mode7_multiply_readout() {
    let mut ppu = Ppu::new();
    // M7A = 0x0100, M7B high byte = 0x02 -> product 0x200
    ppu.write(0x1b, 0x00, view());
    ppu.write(0x1b, 0x01, view());
    ppu.write(0x1c, 0x00, view());
    ppu.write(0x1c, 0x02, view());
    assert_eq!(ppu.read(0x34, view()), 0x00);
    assert_eq!(ppu.read(0x35, view()), 0x02, "0x100 * 2 = 0x200");
    assert_eq!(ppu.read(0x36, view()), 0x00);
}

#[test]
fn test_scroll_write_latch() {
    let mut ppu = Ppu::new();
    ppu.write(0x0f, 0x45, view()); // BG2HOFS low
    ppu.write(0x0f, 0x01, view()); // BG2HOFS high
    assert_eq!(ppu.bg_layer[1].h_scroll, ((0x01 << 8) | 0x40 | 0x05) & 0x3ff);
    ppu.write(0x10, 0x23, view());
    ppu.write(0x10, 0x01, view());
    assert_eq!(ppu.bg_layer[1].v_scroll, 0x123);
}
