//! Sprite evaluation tests
//!
//! Range/time overflow limits and line-buffer priorities.

use super::super::Ppu;
use super::*;

/// Solid 4bpp sprite tile 0: plane 0 all ones on every row
fn fill_sprite_tile(ppu: &mut Ppu) {
    for row in 0..8 {
        write_vram(ppu, row, 0x00ff);
    }
}

fn renderable(ppu: &mut Ppu) {
    ppu.write(0x00, 0x0f, vblank_view()); // leave forced blank
    ppu.write(0x01, 0x00, vblank_view()); // 8x16 sprites, tiles at word 0
    ppu.write(0x2c, 0x10, vblank_view()); // OBJ on the main screen
}

#[test]
fn test_sprite_pixels_enter_line_buffer() {
    let mut ppu = Ppu::new();
    renderable(&mut ppu);
    fill_sprite_tile(&mut ppu);
    write_oam_sprite(&mut ppu, 0, 0x10, 0x00, 0x00, 0x00);
    // hide the other 127 sprites below the screen
    for i in 1..128 {
        write_oam_sprite(&mut ppu, i, 0, 0xf0, 0, 0);
    }
    ppu.run_line(1);
    assert_eq!(ppu.obj_pixel_buffer[0x0f], 0, "left of the sprite");
    assert_eq!(ppu.obj_pixel_buffer[0x10], 0x81, "palette 0, color 1");
    assert_eq!(ppu.obj_pixel_buffer[0x17], 0x81, "8 pixels wide");
    assert_eq!(ppu.obj_pixel_buffer[0x18], 0, "right of the sprite");
}

#[test]
fn test_sprite_priority_buffer() {
    let mut ppu = Ppu::new();
    renderable(&mut ppu);
    fill_sprite_tile(&mut ppu);
    // attribute bits 4-5 hold the priority
    write_oam_sprite(&mut ppu, 0, 0x10, 0x00, 0x00, 0x30);
    for i in 1..128 {
        write_oam_sprite(&mut ppu, i, 0, 0xf0, 0, 0);
    }
    ppu.run_line(1);
    assert_eq!(ppu.obj_priority_buffer[0x10], 3);
}

#[test]
fn test_range_over_on_33rd_sprite() {
    let mut ppu = Ppu::new();
    renderable(&mut ppu);
    fill_sprite_tile(&mut ppu);
    // 33 sprites share line 0
    for i in 0..33 {
        write_oam_sprite(&mut ppu, i, i.wrapping_mul(7), 0x00, 0x00, 0x00);
    }
    for i in 33..128 {
        write_oam_sprite(&mut ppu, i, 0, 0xf0, 0, 0);
    }
    ppu.run_line(1);
    assert!(ppu.range_over, "33rd in-range sprite sets the flag");
    assert!(!ppu.time_over, "32 sprites are only 32 slivers");
}

#[test]
fn test_range_limit_not_hit_by_32_sprites() {
    let mut ppu = Ppu::new();
    renderable(&mut ppu);
    fill_sprite_tile(&mut ppu);
    for i in 0..32 {
        write_oam_sprite(&mut ppu, i, i.wrapping_mul(8), 0x00, 0x00, 0x00);
    }
    for i in 32..128 {
        write_oam_sprite(&mut ppu, i, 0, 0xf0, 0, 0);
    }
    ppu.run_line(1);
    assert!(!ppu.range_over);
}

#[test]
fn test_time_over_on_35th_sliver() {
    let mut ppu = Ppu::new();
    renderable(&mut ppu);
    // large-size sprites (bit in high OAM) are 64 pixels wide: 8 slivers
    ppu.write(0x01, 0xa0, vblank_view()); // size selection 5: 32/64
    fill_sprite_tile(&mut ppu);
    // five 64-wide sprites are 40 slivers, well past the 34 limit
    for i in 0..9 {
        write_oam_sprite(&mut ppu, i, i.wrapping_mul(16), 0x00, 0x00, 0x00);
    }
    for i in 9..128 {
        write_oam_sprite(&mut ppu, i, 0, 0xf0, 0, 0);
    }
    // mark all nine as the large 64-pixel size
    for i in 0..3 {
        // two size bits per sprite, interleaved with the x high bits
        ppu.high_oam[i] = 0xaa;
    }
    ppu.run_line(1);
    assert!(ppu.time_over, "35th sliver sets the flag");
}

#[test]
fn test_sprites_hidden_by_forced_blank() {
    let mut ppu = Ppu::new();
    renderable(&mut ppu);
    fill_sprite_tile(&mut ppu);
    write_oam_sprite(&mut ppu, 0, 0x10, 0x00, 0x00, 0x00);
    for i in 1..128 {
        write_oam_sprite(&mut ppu, i, 0, 0xf0, 0, 0);
    }
    ppu.write(0x00, 0x80, vblank_view()); // forced blank back on
    ppu.run_line(1);
    assert_eq!(ppu.obj_pixel_buffer[0x10], 0, "no evaluation in forced blank");
}

#[test]
fn test_flags_clear_at_frame_start() {
    let mut ppu = Ppu::new();
    ppu.range_over = true;
    ppu.time_over = true;
    ppu.handle_frame_start();
    assert!(!ppu.range_over);
    assert!(!ppu.time_over);
}
