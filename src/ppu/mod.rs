// PPU module - Picture Processing Unit implementation
//
// A scanline renderer: the bus calls `run_line` once per visible line (at
// a fixed raster position halfway through the line) and the PPU composes
// all enabled layers pixel by pixel into an internal two-field buffer.
//
// ## Scanline pipeline
//
// 1. Clear the sprite line buffer and evaluate sprites for the previous
//    line (32-sprite range limit, 34-sliver time limit).
// 2. In mode 7, precompute the per-line affine start vector.
// 3. For each of the 256 pixels, walk the mode's layer list front to back
//    until a non-transparent pixel is found, on both main and sub screen
//    as needed.
// 4. Apply color math (add/subtract sub screen or fixed color, optional
//    halving, clamp to 5 bits per channel), the clip window, and
//    brightness, then store the pixel as RGB565.
//
// ## Register interface
//
// An 8-bit register file at B-bus $00-$3F. VRAM data-port writes are only
// honoured during forced blank or vertical blank; CGRAM and OAM ports are
// word-latched. Reads of write-only addresses yield the two PPU open-bus
// bytes; the status reads clear the counter latches.

mod constants;
mod memory;
mod registers;
mod rendering;
#[cfg(test)]
mod tests;

use crate::emulator::save_state::StateHandler;

/// Bus state the PPU observes during register accesses
///
/// Copied in by the bus for each access; the PPU never mutates bus state.
#[derive(Debug, Clone, Copy)]
pub struct BusView {
    pub h_pos: u16,
    pub v_pos: u16,
    pub open_bus: u8,
    pub ppu_latch: bool,
    pub in_vblank: bool,
    pub pal_timing: bool,
}

/// Per-background-layer register state
#[derive(Default, Clone, Copy)]
pub(crate) struct BgLayer {
    pub h_scroll: u16,
    pub v_scroll: u16,
    pub tilemap_wider: bool,
    pub tilemap_higher: bool,
    pub tilemap_adr: u16,
    pub tile_adr: u16,
    pub big_tiles: bool,
    pub mosaic_enabled: bool,
}

/// Main/sub screen enables for the five screen layers (BG1-4 + OBJ)
#[derive(Default, Clone, Copy)]
pub(crate) struct ScreenLayer {
    pub main_screen_enabled: bool,
    pub sub_screen_enabled: bool,
    pub main_screen_windowed: bool,
    pub sub_screen_windowed: bool,
}

/// Window configuration for the six windowed layers (BG1-4, OBJ, color)
#[derive(Default, Clone, Copy)]
pub(crate) struct WindowLayer {
    pub window1_enabled: bool,
    pub window2_enabled: bool,
    pub window1_inversed: bool,
    pub window2_inversed: bool,
    pub mask_logic: u8,
}

/// PPU structure holding all video state
pub struct Ppu {
    // ========================================
    // VRAM access
    // ========================================
    pub(crate) vram: Vec<u16>, // 32 Ki words
    pub(crate) vram_pointer: u16,
    pub(crate) vram_increment_on_high: bool,
    pub(crate) vram_increment: u16,
    pub(crate) vram_remap_mode: u8,
    pub(crate) vram_read_buffer: u16,

    // ========================================
    // CGRAM access
    // ========================================
    pub(crate) cgram: [u16; 0x100],
    pub(crate) cgram_pointer: u8,
    pub(crate) cgram_second_write: bool,
    pub(crate) cgram_buffer: u8,

    // ========================================
    // OAM access
    // ========================================
    pub(crate) oam: [u16; 0x100],
    pub(crate) high_oam: [u8; 0x20],
    pub(crate) oam_adr: u8,
    pub(crate) oam_adr_written: u8,
    pub(crate) oam_in_high: bool,
    pub(crate) oam_in_high_written: bool,
    pub(crate) oam_second_write: bool,
    pub(crate) oam_buffer: u8,

    // ========================================
    // Object/sprite configuration
    // ========================================
    pub(crate) obj_priority: bool,
    pub(crate) obj_tile_adr1: u16,
    pub(crate) obj_tile_adr2: u16,
    pub(crate) obj_size: u8,
    pub(crate) obj_pixel_buffer: [u8; 256],
    pub(crate) obj_priority_buffer: [u8; 256],
    pub(crate) time_over: bool,
    pub(crate) range_over: bool,
    pub(crate) obj_interlace: bool,

    // ========================================
    // Background layers
    // ========================================
    pub(crate) bg_layer: [BgLayer; 4],
    pub(crate) scroll_prev: u8,
    pub(crate) scroll_prev2: u8,
    pub(crate) mosaic_size: u8,
    pub(crate) mosaic_start_line: u8,

    // ========================================
    // Screen layers and windows
    // ========================================
    pub(crate) layer: [ScreenLayer; 5],
    pub(crate) window_layer: [WindowLayer; 6],
    pub(crate) window1_left: u8,
    pub(crate) window1_right: u8,
    pub(crate) window2_left: u8,
    pub(crate) window2_right: u8,

    // ========================================
    // Mode 7
    // ========================================
    pub(crate) m7_matrix: [i16; 8], // a, b, c, d, center x/y, scroll x/y
    pub(crate) m7_prev: u8,
    pub(crate) m7_large_field: bool,
    pub(crate) m7_char_fill: bool,
    pub(crate) m7_x_flip: bool,
    pub(crate) m7_y_flip: bool,
    pub(crate) m7_ext_bg: bool,
    pub(crate) m7_start_x: i32,
    pub(crate) m7_start_y: i32,

    // ========================================
    // Color math
    // ========================================
    pub(crate) clip_mode: u8,
    pub(crate) prevent_math_mode: u8,
    pub(crate) add_subscreen: bool,
    pub(crate) subtract_color: bool,
    pub(crate) half_color: bool,
    pub(crate) math_enabled: [bool; 6],
    pub(crate) fixed_color_r: u8,
    pub(crate) fixed_color_g: u8,
    pub(crate) fixed_color_b: u8,

    // ========================================
    // Display configuration and frame shape
    // ========================================
    pub(crate) forced_blank: bool,
    pub(crate) brightness: u8,
    pub(crate) mode: u8,
    pub(crate) bg3_priority: bool,
    pub(crate) even_frame: bool,
    pub(crate) pseudo_hires: bool,
    pub(crate) overscan: bool,
    pub(crate) frame_overscan: bool,
    pub(crate) interlace: bool,
    pub(crate) frame_interlace: bool,
    pub(crate) direct_color: bool,

    // ========================================
    // Latched counters and open bus
    // ========================================
    pub(crate) h_count: u16,
    pub(crate) v_count: u16,
    pub(crate) h_count_second: bool,
    pub(crate) v_count_second: bool,
    pub(crate) counters_latched: bool,
    pub(crate) ppu1_open_bus: u8,
    pub(crate) ppu2_open_bus: u8,

    // ========================================
    // Output and per-line scratch
    // ========================================
    /// Two interleaved 239-line fields of 256 RGB565 pixels
    pub(crate) pixel_buffer: Vec<u16>,
    pub(crate) layer_cache: [i32; 4],
    pub(crate) bg_pixel: [u16; 4],
    pub(crate) bg_prio: [u8; 4],
    pub(crate) window_state: [bool; 6],
}

impl Ppu {
    pub fn new() -> Self {
        let mut ppu = Ppu {
            vram: vec![0; 0x8000],
            vram_pointer: 0,
            vram_increment_on_high: false,
            vram_increment: 1,
            vram_remap_mode: 0,
            vram_read_buffer: 0,
            cgram: [0; 0x100],
            cgram_pointer: 0,
            cgram_second_write: false,
            cgram_buffer: 0,
            oam: [0; 0x100],
            high_oam: [0; 0x20],
            oam_adr: 0,
            oam_adr_written: 0,
            oam_in_high: false,
            oam_in_high_written: false,
            oam_second_write: false,
            oam_buffer: 0,
            obj_priority: false,
            obj_tile_adr1: 0,
            obj_tile_adr2: 0,
            obj_size: 0,
            obj_pixel_buffer: [0; 256],
            obj_priority_buffer: [0; 256],
            time_over: false,
            range_over: false,
            obj_interlace: false,
            bg_layer: [BgLayer::default(); 4],
            scroll_prev: 0,
            scroll_prev2: 0,
            mosaic_size: 1,
            mosaic_start_line: 1,
            layer: [ScreenLayer::default(); 5],
            window_layer: [WindowLayer::default(); 6],
            window1_left: 0,
            window1_right: 0,
            window2_left: 0,
            window2_right: 0,
            m7_matrix: [0; 8],
            m7_prev: 0,
            m7_large_field: false,
            m7_char_fill: false,
            m7_x_flip: false,
            m7_y_flip: false,
            m7_ext_bg: false,
            m7_start_x: 0,
            m7_start_y: 0,
            clip_mode: 0,
            prevent_math_mode: 0,
            add_subscreen: false,
            subtract_color: false,
            half_color: false,
            math_enabled: [false; 6],
            fixed_color_r: 0,
            fixed_color_g: 0,
            fixed_color_b: 0,
            forced_blank: true,
            brightness: 0,
            mode: 0,
            bg3_priority: false,
            even_frame: false,
            pseudo_hires: false,
            overscan: false,
            frame_overscan: false,
            interlace: false,
            frame_interlace: false,
            direct_color: false,
            h_count: 0,
            v_count: 0,
            h_count_second: false,
            v_count_second: false,
            counters_latched: false,
            ppu1_open_bus: 0,
            ppu2_open_bus: 0,
            pixel_buffer: vec![0; 512 * 256],
            layer_cache: [-1; 4],
            bg_pixel: [0; 4],
            bg_prio: [0; 4],
            window_state: [false; 6],
        };
        ppu.reset();
        ppu
    }

    pub fn reset(&mut self) {
        self.vram.iter_mut().for_each(|w| *w = 0);
        self.vram_pointer = 0;
        self.vram_increment_on_high = false;
        self.vram_increment = 1;
        self.vram_remap_mode = 0;
        self.vram_read_buffer = 0;
        self.cgram = [0; 0x100];
        self.cgram_pointer = 0;
        self.cgram_second_write = false;
        self.cgram_buffer = 0;
        self.oam = [0; 0x100];
        self.high_oam = [0; 0x20];
        self.oam_adr = 0;
        self.oam_adr_written = 0;
        self.oam_in_high = false;
        self.oam_in_high_written = false;
        self.oam_second_write = false;
        self.oam_buffer = 0;
        self.obj_priority = false;
        self.obj_tile_adr1 = 0;
        self.obj_tile_adr2 = 0;
        self.obj_size = 0;
        self.obj_pixel_buffer = [0; 256];
        self.obj_priority_buffer = [0; 256];
        self.time_over = false;
        self.range_over = false;
        self.obj_interlace = false;
        self.bg_layer = [BgLayer::default(); 4];
        self.scroll_prev = 0;
        self.scroll_prev2 = 0;
        self.mosaic_size = 1;
        self.mosaic_start_line = 1;
        self.layer = [ScreenLayer::default(); 5];
        self.window_layer = [WindowLayer::default(); 6];
        self.window1_left = 0;
        self.window1_right = 0;
        self.window2_left = 0;
        self.window2_right = 0;
        self.m7_matrix = [0; 8];
        self.m7_prev = 0;
        self.m7_large_field = false;
        self.m7_char_fill = false;
        self.m7_x_flip = false;
        self.m7_y_flip = false;
        self.m7_ext_bg = false;
        self.m7_start_x = 0;
        self.m7_start_y = 0;
        self.clip_mode = 0;
        self.prevent_math_mode = 0;
        self.add_subscreen = false;
        self.subtract_color = false;
        self.half_color = false;
        self.math_enabled = [false; 6];
        self.fixed_color_r = 0;
        self.fixed_color_g = 0;
        self.fixed_color_b = 0;
        self.forced_blank = true;
        self.brightness = 0;
        self.mode = 0;
        self.bg3_priority = false;
        self.even_frame = false;
        self.pseudo_hires = false;
        self.overscan = false;
        self.frame_overscan = false;
        self.interlace = false;
        self.frame_interlace = false;
        self.direct_color = false;
        self.h_count = 0;
        self.v_count = 0;
        self.h_count_second = false;
        self.v_count_second = false;
        self.counters_latched = false;
        self.ppu1_open_bus = 0;
        self.ppu2_open_bus = 0;
        self.pixel_buffer.iter_mut().for_each(|p| *p = 0);
    }

    // ========================================
    // Frame hooks driven by the bus raster loop
    // ========================================

    /// Called at (0, 225); reports whether vblank is postponed to line 240
    pub fn check_overscan(&mut self) -> bool {
        self.frame_overscan = self.overscan;
        self.frame_overscan
    }

    /// Called on the transition into vertical blank
    pub fn handle_vblank(&mut self) {
        if !self.forced_blank {
            self.oam_adr = self.oam_adr_written;
            self.oam_in_high = self.oam_in_high_written;
            self.oam_second_write = false;
        }
        self.frame_interlace = self.interlace;
    }

    /// Called at (0, 0)
    pub fn handle_frame_start(&mut self) {
        self.mosaic_start_line = 1;
        self.range_over = false;
        self.time_over = false;
        self.even_frame = !self.even_frame;
    }

    /// Latch the raster counters ($4201 falling edge or $2137 read)
    pub fn latch_hv(&mut self, h_pos: u16, v_pos: u16) {
        self.h_count = h_pos / 4;
        self.v_count = v_pos;
        self.counters_latched = true;
    }

    // ========================================
    // Frame composition
    // ========================================

    /// Compose the finished frame into `pixels`: 320x240 RGB565, with
    /// letterbox borders cleared when the frame is not overscanned
    pub fn put_pixels(&self, pixels: &mut [u8]) {
        let lines = if self.frame_overscan { 239 } else { 224 };
        let vshift = if self.frame_overscan { 2 } else { 16 };
        for y in 0..lines {
            let dest = y + vshift;
            let (y1, y2) = if self.frame_interlace {
                (y, y + 239)
            } else {
                let field = y + if self.even_frame { 0 } else { 239 };
                (field, field)
            };
            self.copy_line(pixels, y1, dest);
            if y1 != y2 && dest + 1 < 240 {
                self.copy_line(pixels, y2, dest + 1);
            }
        }
        // top 2 lines always cleared; letterbox the rest when not overscanning
        for b in pixels[..2 * 640].iter_mut() {
            *b = 0;
        }
        if !self.frame_overscan {
            for b in pixels[2 * 640..16 * 640].iter_mut() {
                *b = 0;
            }
            for b in pixels[224 * 640..240 * 640].iter_mut() {
                *b = 0;
            }
        }
    }

    fn copy_line(&self, pixels: &mut [u8], src_line: usize, dest_line: usize) {
        let src = &self.pixel_buffer[src_line * 256..src_line * 256 + 256];
        let dst = &mut pixels[dest_line * 640..dest_line * 640 + 512];
        for (chunk, &pixel) in dst.chunks_exact_mut(2).zip(src.iter()) {
            chunk[0] = (pixel & 0xff) as u8;
            chunk[1] = (pixel >> 8) as u8;
        }
    }

    pub(crate) fn handle_state(&mut self, sh: &mut StateHandler) {
        sh.handle_bool(&mut self.vram_increment_on_high);
        sh.handle_bool(&mut self.cgram_second_write);
        sh.handle_bool(&mut self.oam_in_high);
        sh.handle_bool(&mut self.oam_in_high_written);
        sh.handle_bool(&mut self.oam_second_write);
        sh.handle_bool(&mut self.obj_priority);
        sh.handle_bool(&mut self.time_over);
        sh.handle_bool(&mut self.range_over);
        sh.handle_bool(&mut self.obj_interlace);
        sh.handle_bool(&mut self.m7_large_field);
        sh.handle_bool(&mut self.m7_char_fill);
        sh.handle_bool(&mut self.m7_x_flip);
        sh.handle_bool(&mut self.m7_y_flip);
        sh.handle_bool(&mut self.m7_ext_bg);
        sh.handle_bool(&mut self.add_subscreen);
        sh.handle_bool(&mut self.subtract_color);
        sh.handle_bool(&mut self.half_color);
        for i in 0..6 {
            sh.handle_bool(&mut self.math_enabled[i]);
        }
        sh.handle_bool(&mut self.forced_blank);
        sh.handle_bool(&mut self.bg3_priority);
        sh.handle_bool(&mut self.even_frame);
        sh.handle_bool(&mut self.pseudo_hires);
        sh.handle_bool(&mut self.overscan);
        sh.handle_bool(&mut self.frame_overscan);
        sh.handle_bool(&mut self.interlace);
        sh.handle_bool(&mut self.frame_interlace);
        sh.handle_bool(&mut self.direct_color);
        sh.handle_bool(&mut self.h_count_second);
        sh.handle_bool(&mut self.v_count_second);
        sh.handle_bool(&mut self.counters_latched);
        sh.handle_u8(&mut self.vram_remap_mode);
        sh.handle_u8(&mut self.cgram_pointer);
        sh.handle_u8(&mut self.cgram_buffer);
        sh.handle_u8(&mut self.oam_adr);
        sh.handle_u8(&mut self.oam_adr_written);
        sh.handle_u8(&mut self.oam_buffer);
        sh.handle_u8(&mut self.obj_size);
        sh.handle_u8(&mut self.scroll_prev);
        sh.handle_u8(&mut self.scroll_prev2);
        sh.handle_u8(&mut self.mosaic_size);
        sh.handle_u8(&mut self.mosaic_start_line);
        sh.handle_u8(&mut self.m7_prev);
        sh.handle_u8(&mut self.window1_left);
        sh.handle_u8(&mut self.window1_right);
        sh.handle_u8(&mut self.window2_left);
        sh.handle_u8(&mut self.window2_right);
        sh.handle_u8(&mut self.clip_mode);
        sh.handle_u8(&mut self.prevent_math_mode);
        sh.handle_u8(&mut self.fixed_color_r);
        sh.handle_u8(&mut self.fixed_color_g);
        sh.handle_u8(&mut self.fixed_color_b);
        sh.handle_u8(&mut self.brightness);
        sh.handle_u8(&mut self.mode);
        sh.handle_u8(&mut self.ppu1_open_bus);
        sh.handle_u8(&mut self.ppu2_open_bus);
        sh.handle_u16(&mut self.vram_pointer);
        sh.handle_u16(&mut self.vram_increment);
        sh.handle_u16(&mut self.vram_read_buffer);
        sh.handle_u16(&mut self.obj_tile_adr1);
        sh.handle_u16(&mut self.obj_tile_adr2);
        sh.handle_u16(&mut self.h_count);
        sh.handle_u16(&mut self.v_count);
        for i in 0..8 {
            sh.handle_i16(&mut self.m7_matrix[i]);
        }
        sh.handle_i32(&mut self.m7_start_x);
        sh.handle_i32(&mut self.m7_start_y);
        for layer in self.bg_layer.iter_mut() {
            sh.handle_bool(&mut layer.tilemap_wider);
            sh.handle_bool(&mut layer.tilemap_higher);
            sh.handle_bool(&mut layer.big_tiles);
            sh.handle_bool(&mut layer.mosaic_enabled);
            sh.handle_u16(&mut layer.h_scroll);
            sh.handle_u16(&mut layer.v_scroll);
            sh.handle_u16(&mut layer.tilemap_adr);
            sh.handle_u16(&mut layer.tile_adr);
        }
        for layer in self.layer.iter_mut() {
            sh.handle_bool(&mut layer.main_screen_enabled);
            sh.handle_bool(&mut layer.sub_screen_enabled);
            sh.handle_bool(&mut layer.main_screen_windowed);
            sh.handle_bool(&mut layer.sub_screen_windowed);
        }
        for layer in self.window_layer.iter_mut() {
            sh.handle_bool(&mut layer.window1_enabled);
            sh.handle_bool(&mut layer.window1_inversed);
            sh.handle_bool(&mut layer.window2_enabled);
            sh.handle_bool(&mut layer.window2_inversed);
            sh.handle_u8(&mut layer.mask_logic);
        }
        sh.handle_u16_slice(&mut self.vram);
        sh.handle_u16_slice(&mut self.cgram);
        sh.handle_u16_slice(&mut self.oam);
        sh.handle_u8_array(&mut self.high_oam);
        sh.handle_u8_array(&mut self.obj_pixel_buffer);
        sh.handle_u8_array(&mut self.obj_priority_buffer);
    }
}

impl Default for Ppu {
    fn default() -> Self {
        Self::new()
    }
}
