//! Rendering pipeline tests
//!
//! Mode 0 background fetch, color math bounds, brightness and the frame
//! composition path.

use super::super::Ppu;
use super::*;

/// Minimal mode-0 setup: BG1 on the main screen, one solid 8x8 tile at
/// the top-left of the tilemap, palette entry 1 set to `color`
fn setup_bg1(ppu: &mut Ppu, color: u16) {
    ppu.write(0x00, 0x0f, vblank_view()); // full brightness, no forced blank
    ppu.write(0x05, 0x00, vblank_view()); // mode 0
    ppu.write(0x07, 0x00, vblank_view()); // BG1 tilemap at word 0
    ppu.write(0x0b, 0x01, vblank_view()); // BG1 tiles at word 0x1000
    ppu.write(0x2c, 0x01, vblank_view()); // BG1 on the main screen
    // first tilemap row: tile 1, palette 0, no flip
    for entry in 0..32 {
        write_vram(ppu, entry, 0x0001);
    }
    // tile 1, 2bpp: plane 0 all ones for each of the 8 rows
    for row in 0..8 {
        write_vram(ppu, 0x1008 + row, 0x00ff);
    }
    write_cgram(ppu, 1, color);
}

#[test]
fn test_mode0_bg_pixel_reaches_the_buffer() {
    let mut ppu = Ppu::new();
    setup_bg1(&mut ppu, 0x7fff); // white
    ppu.run_line(1);
    let (r, g, b) = channels(pixel_at(&ppu, 0, 1));
    assert_eq!((r, g, b), (0x1f, 0x1f, 0x1f));
    let (r, _, _) = channels(pixel_at(&ppu, 200, 1));
    assert_eq!(r, 0x1f, "tile repeats across the row");
}

#[test]
fn test_backdrop_uses_cgram_entry_zero() {
    let mut ppu = Ppu::new();
    ppu.write(0x00, 0x0f, vblank_view());
    write_cgram(&mut ppu, 0, 0x001f); // red backdrop
    ppu.run_line(1);
    let (r, g, b) = channels(pixel_at(&ppu, 128, 1));
    assert_eq!((r, g, b), (0x1f, 0, 0));
}

#[test]
fn test_forced_blank_renders_black() {
    let mut ppu = Ppu::new();
    write_cgram(&mut ppu, 0, 0x7fff);
    // forced blank stays set from reset
    ppu.run_line(1);
    assert_eq!(pixel_at(&ppu, 0, 1), 0);
}

#[test]
fn test_brightness_scales_output() {
    let mut ppu = Ppu::new();
    setup_bg1(&mut ppu, 0x7fff);
    ppu.write(0x00, 0x07, vblank_view()); // half brightness
    ppu.run_line(1);
    let (r, g, b) = channels(pixel_at(&ppu, 0, 1));
    assert_eq!((r, g, b), (0x0e, 0x0e, 0x0e), "15-step linear scale");
    ppu.write(0x00, 0x00, vblank_view()); // brightness 0
    ppu.run_line(2);
    assert_eq!(pixel_at(&ppu, 0, 2), 0);
}

#[test]
fn test_color_math_add_clamps_channels() {
    let mut ppu = Ppu::new();
    setup_bg1(&mut ppu, 0x7fff); // already white
    ppu.write(0x31, 0x01, vblank_view()); // math on BG1, add
    ppu.write(0x32, 0xff, vblank_view()); // fixed color: all channels 31
    ppu.run_line(1);
    let (r, g, b) = channels(pixel_at(&ppu, 0, 1));
    assert!(r <= 0x1f && g <= 0x1f && b <= 0x1f, "channels clamp at 31");
    assert_eq!((r, g, b), (0x1f, 0x1f, 0x1f));
}

#[test]
fn test_color_math_subtract_clamps_at_zero() {
    let mut ppu = Ppu::new();
    setup_bg1(&mut ppu, 0x0010); // dim red
    ppu.write(0x31, 0x81, vblank_view()); // subtract, math on BG1
    ppu.write(0x32, 0xff, vblank_view()); // subtract full white
    ppu.run_line(1);
    let (r, g, b) = channels(pixel_at(&ppu, 0, 1));
    assert_eq!((r, g, b), (0, 0, 0), "negative channels clamp at 0");
}

#[test]
fn test_color_math_half() {
    let mut ppu = Ppu::new();
    setup_bg1(&mut ppu, 0x7fff);
    ppu.write(0x31, 0x41, vblank_view()); // half, add fixed (black)
    ppu.run_line(1);
    let (r, g, b) = channels(pixel_at(&ppu, 0, 1));
    assert_eq!((r, g, b), (0x0f, 0x0f, 0x0f));
}

#[test]
fn test_clip_window_forces_black() {
    let mut ppu = Ppu::new();
    setup_bg1(&mut ppu, 0x7fff);
    ppu.write(0x30, 0xc0, vblank_view()); // clip always
    ppu.run_line(1);
    assert_eq!(pixel_at(&ppu, 0, 1), 0);
    assert_eq!(pixel_at(&ppu, 255, 1), 0);
}

#[test]
fn test_window_disables_layer_inside_range() {
    let mut ppu = Ppu::new();
    setup_bg1(&mut ppu, 0x7fff);
    ppu.write(0x23, 0x02, vblank_view()); // window 1 on BG1
    ppu.write(0x26, 0x40, vblank_view()); // left edge
    ppu.write(0x27, 0x80, vblank_view()); // right edge
    ppu.write(0x2e, 0x01, vblank_view()); // window the BG1 main screen
    write_cgram(&mut ppu, 0, 0x001f); // red backdrop
    ppu.run_line(1);
    let (r, _, _) = channels(pixel_at(&ppu, 0x20, 1));
    assert_eq!(r, 0x1f, "outside the window BG1 shows");
    let (r, g, b) = channels(pixel_at(&ppu, 0x60, 1));
    assert_eq!((r, g, b), (0x1f, 0, 0), "inside the window the backdrop shows");
}

#[test]
fn test_mosaic_floors_horizontal_position() {
    let mut ppu = Ppu::new();
    setup_bg1(&mut ppu, 0x7fff);
    // second tilemap entry: transparent (tile 0 has no data)
    write_vram(&mut ppu, 0x0001, 0x0000);
    ppu.write(0x06, 0xf1, vblank_view()); // BG1 mosaic, size 16
    ppu.run_line(1);
    let first = pixel_at(&ppu, 0, 1);
    for x in 0..16 {
        assert_eq!(pixel_at(&ppu, x, 1), first, "mosaic block is uniform");
    }
}

#[test]
fn test_mode7_renders_from_interleaved_vram() {
    let mut ppu = Ppu::new();
    ppu.write(0x00, 0x0f, vblank_view());
    ppu.write(0x05, 0x07, vblank_view()); // mode 7
    ppu.write(0x2c, 0x01, vblank_view()); // BG1 main
    // identity matrix: a = d = 1.0
    ppu.write(0x1b, 0x00, vblank_view());
    ppu.write(0x1b, 0x01, vblank_view());
    ppu.write(0x1e, 0x00, vblank_view());
    ppu.write(0x1e, 0x01, vblank_view());
    // tile 0 character data: all pixels color 5 (high bytes)
    for i in 0..64 {
        write_vram(&mut ppu, i, 0x0500);
    }
    write_cgram(&mut ppu, 5, 0x03e0); // green
    ppu.run_line(1);
    let (r, g, b) = channels(pixel_at(&ppu, 10, 1));
    assert_eq!((r, g, b), (0, 0x1f, 0));
}

#[test]
fn test_put_pixels_letterboxes_normal_frames() {
    let mut ppu = Ppu::new();
    setup_bg1(&mut ppu, 0x7fff);
    for line in 1..=224 {
        ppu.run_line(line);
    }
    ppu.handle_vblank();
    let mut frame = vec![0xffu8; 320 * 240 * 2];
    ppu.put_pixels(&mut frame);
    assert_eq!(&frame[..640], &vec![0u8; 640][..], "top border cleared");
    let row16 = &frame[16 * 640..16 * 640 + 2];
    assert_eq!(u16::from_le_bytes([row16[0], row16[1]]), 0xffdf, "white line");
}
