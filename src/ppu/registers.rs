// PPU register handling
//
// 8-bit register file at B-bus $00-$3F. Write-only addresses read back as
// one of the two PPU open-bus bytes; $2137 and $213F implement the
// counter-latch handshake with the bus I/O port bit.

use super::{BusView, Ppu};

impl Ppu {
    /// Read from a PPU register (B-bus $00-$3F)
    pub fn read(&mut self, adr: u8, bus: BusView) -> u8 {
        match adr {
            0x04 | 0x14 | 0x24 | 0x05 | 0x15 | 0x25 | 0x06 | 0x16 | 0x26 | 0x08 | 0x18
            | 0x28 | 0x09 | 0x19 | 0x29 | 0x0a | 0x1a | 0x2a => self.ppu1_open_bus,
            0x34 | 0x35 | 0x36 => {
                // MPYL/MPYM/MPYH: signed product of M7A and the high byte of M7B
                let result = self.m7_matrix[0] as i32 * (self.m7_matrix[1] as i32 >> 8);
                self.ppu1_open_bus = (result >> (8 * (adr - 0x34))) as u8;
                self.ppu1_open_bus
            }
            0x37 => {
                // SLHV: latch the counters if the I/O port latch is high
                if bus.ppu_latch {
                    self.latch_hv(bus.h_pos, bus.v_pos);
                }
                bus.open_bus
            }
            0x38 => self.oam_data_read(),
            0x39 => self.vram_data_read(false),
            0x3a => self.vram_data_read(true),
            0x3b => self.cgram_data_read(),
            0x3c => {
                // OPHCT: latched horizontal counter, low then high
                let val = if self.h_count_second {
                    ((self.h_count >> 8) as u8 & 1) | (self.ppu2_open_bus & 0xfe)
                } else {
                    (self.h_count & 0xff) as u8
                };
                self.h_count_second = !self.h_count_second;
                self.ppu2_open_bus = val;
                val
            }
            0x3d => {
                // OPVCT: latched vertical counter, low then high
                let val = if self.v_count_second {
                    ((self.v_count >> 8) as u8 & 1) | (self.ppu2_open_bus & 0xfe)
                } else {
                    (self.v_count & 0xff) as u8
                };
                self.v_count_second = !self.v_count_second;
                self.ppu2_open_bus = val;
                val
            }
            0x3e => {
                // STAT77: sprite overflow flags and PPU1 version
                let mut val = 0x1;
                val |= self.ppu1_open_bus & 0x10;
                val |= (self.range_over as u8) << 6;
                val |= (self.time_over as u8) << 7;
                self.ppu1_open_bus = val;
                val
            }
            0x3f => {
                // STAT78: field/latch flags, region and PPU2 version
                let mut val = 0x3;
                val |= (bus.pal_timing as u8) << 4;
                val |= self.ppu2_open_bus & 0x20;
                val |= (self.counters_latched as u8) << 6;
                val |= (self.even_frame as u8) << 7;
                if bus.ppu_latch {
                    self.counters_latched = false;
                    self.h_count_second = false;
                    self.v_count_second = false;
                }
                self.ppu2_open_bus = val;
                val
            }
            _ => bus.open_bus,
        }
    }

    /// Write to a PPU register (B-bus $00-$3F)
    pub fn write(&mut self, adr: u8, val: u8, bus: BusView) {
        match adr {
            0x00 => {
                // INIDISP: brightness and forced blank
                self.brightness = val & 0xf;
                self.forced_blank = val & 0x80 != 0;
            }
            0x01 => {
                // OBSEL: sprite sizes and tile base addresses
                self.obj_size = val >> 5;
                self.obj_tile_adr1 = ((val & 7) as u16) << 13;
                self.obj_tile_adr2 =
                    self.obj_tile_adr1.wrapping_add((((val & 0x18) as u16) + 8) << 9);
            }
            0x02 => {
                // OAMADDL
                self.oam_adr = val;
                self.oam_adr_written = self.oam_adr;
                self.oam_in_high = self.oam_in_high_written;
                self.oam_second_write = false;
            }
            0x03 => {
                // OAMADDH
                self.obj_priority = val & 0x80 != 0;
                self.oam_in_high = val & 1 != 0;
                self.oam_in_high_written = self.oam_in_high;
                self.oam_adr = self.oam_adr_written;
                self.oam_second_write = false;
            }
            0x04 => self.oam_data_write(val),
            0x05 => {
                // BGMODE
                self.mode = val & 0x7;
                self.bg3_priority = val & 0x8 != 0;
                self.bg_layer[0].big_tiles = val & 0x10 != 0;
                self.bg_layer[1].big_tiles = val & 0x20 != 0;
                self.bg_layer[2].big_tiles = val & 0x40 != 0;
                self.bg_layer[3].big_tiles = val & 0x80 != 0;
            }
            0x06 => {
                // MOSAIC; the start line samples the current raster line
                self.bg_layer[0].mosaic_enabled = val & 0x1 != 0;
                self.bg_layer[1].mosaic_enabled = val & 0x2 != 0;
                self.bg_layer[2].mosaic_enabled = val & 0x4 != 0;
                self.bg_layer[3].mosaic_enabled = val & 0x8 != 0;
                self.mosaic_size = (val >> 4) + 1;
                self.mosaic_start_line = bus.v_pos as u8;
            }
            0x07 | 0x08 | 0x09 | 0x0a => {
                // BGnSC: tilemap address and shape
                let layer = &mut self.bg_layer[(adr - 7) as usize];
                layer.tilemap_wider = val & 0x1 != 0;
                layer.tilemap_higher = val & 0x2 != 0;
                layer.tilemap_adr = ((val & 0xfc) as u16) << 8;
            }
            0x0b => {
                // BG12NBA
                self.bg_layer[0].tile_adr = ((val & 0xf) as u16) << 12;
                self.bg_layer[1].tile_adr = ((val & 0xf0) as u16) << 8;
            }
            0x0c => {
                // BG34NBA
                self.bg_layer[2].tile_adr = ((val & 0xf) as u16) << 12;
                self.bg_layer[3].tile_adr = ((val & 0xf0) as u16) << 8;
            }
            0x0d => {
                // M7HOFS doubles as BG1HOFS
                self.m7_matrix[6] = (((val as u16) << 8 | self.m7_prev as u16) & 0x1fff) as i16;
                self.m7_prev = val;
                self.write_bg_h_scroll(0, val);
            }
            0x0f | 0x11 | 0x13 => {
                self.write_bg_h_scroll(((adr - 0xd) / 2) as usize, val);
            }
            0x0e => {
                // M7VOFS doubles as BG1VOFS
                self.m7_matrix[7] = (((val as u16) << 8 | self.m7_prev as u16) & 0x1fff) as i16;
                self.m7_prev = val;
                self.write_bg_v_scroll(0, val);
            }
            0x10 | 0x12 | 0x14 => {
                self.write_bg_v_scroll(((adr - 0xe) / 2) as usize, val);
            }
            0x15 => {
                // VMAIN: increment amount, remap mode, increment half
                self.vram_increment = match val & 3 {
                    0 => 1,
                    1 => 32,
                    _ => 128,
                };
                self.vram_remap_mode = (val & 0xc) >> 2;
                self.vram_increment_on_high = val & 0x80 != 0;
            }
            0x16 => {
                // VMADDL; refills the prefetch buffer
                self.vram_pointer = (self.vram_pointer & 0xff00) | val as u16;
                self.vram_read_buffer = self.vram[(self.vram_remap() & 0x7fff) as usize];
            }
            0x17 => {
                // VMADDH; refills the prefetch buffer
                self.vram_pointer = (self.vram_pointer & 0x00ff) | (val as u16) << 8;
                self.vram_read_buffer = self.vram[(self.vram_remap() & 0x7fff) as usize];
            }
            0x18 => {
                let blanked = self.forced_blank || bus.in_vblank;
                self.vram_data_write(false, val, blanked);
            }
            0x19 => {
                let blanked = self.forced_blank || bus.in_vblank;
                self.vram_data_write(true, val, blanked);
            }
            0x1a => {
                // M7SEL
                self.m7_large_field = val & 0x80 != 0;
                self.m7_char_fill = val & 0x40 != 0;
                self.m7_y_flip = val & 0x2 != 0;
                self.m7_x_flip = val & 0x1 != 0;
            }
            0x1b | 0x1c | 0x1d | 0x1e => {
                // M7A-M7D: full 16-bit matrix entries
                self.m7_matrix[(adr - 0x1b) as usize] =
                    ((val as u16) << 8 | self.m7_prev as u16) as i16;
                self.m7_prev = val;
            }
            0x1f | 0x20 => {
                // M7X/M7Y: 13-bit center
                self.m7_matrix[(adr - 0x1b) as usize] =
                    (((val as u16) << 8 | self.m7_prev as u16) & 0x1fff) as i16;
                self.m7_prev = val;
            }
            0x21 => {
                // CGADD
                self.cgram_pointer = val;
                self.cgram_second_write = false;
            }
            0x22 => self.cgram_data_write(val),
            0x23 | 0x24 | 0x25 => {
                // W12SEL/W34SEL/WOBJSEL: two windowed layers per register
                let base = ((adr - 0x23) * 2) as usize;
                self.window_layer[base].window1_inversed = val & 0x1 != 0;
                self.window_layer[base].window1_enabled = val & 0x2 != 0;
                self.window_layer[base].window2_inversed = val & 0x4 != 0;
                self.window_layer[base].window2_enabled = val & 0x8 != 0;
                self.window_layer[base + 1].window1_inversed = val & 0x10 != 0;
                self.window_layer[base + 1].window1_enabled = val & 0x20 != 0;
                self.window_layer[base + 1].window2_inversed = val & 0x40 != 0;
                self.window_layer[base + 1].window2_enabled = val & 0x80 != 0;
            }
            0x26 => self.window1_left = val,
            0x27 => self.window1_right = val,
            0x28 => self.window2_left = val,
            0x29 => self.window2_right = val,
            0x2a => {
                // WBGLOG
                self.window_layer[0].mask_logic = val & 0x3;
                self.window_layer[1].mask_logic = (val >> 2) & 0x3;
                self.window_layer[2].mask_logic = (val >> 4) & 0x3;
                self.window_layer[3].mask_logic = (val >> 6) & 0x3;
            }
            0x2b => {
                // WOBJLOG
                self.window_layer[4].mask_logic = val & 0x3;
                self.window_layer[5].mask_logic = (val >> 2) & 0x3;
            }
            0x2c => {
                // TM
                for i in 0..5 {
                    self.layer[i].main_screen_enabled = val & (1 << i) != 0;
                }
            }
            0x2d => {
                // TS
                for i in 0..5 {
                    self.layer[i].sub_screen_enabled = val & (1 << i) != 0;
                }
            }
            0x2e => {
                // TMW
                for i in 0..5 {
                    self.layer[i].main_screen_windowed = val & (1 << i) != 0;
                }
            }
            0x2f => {
                // TSW
                for i in 0..5 {
                    self.layer[i].sub_screen_windowed = val & (1 << i) != 0;
                }
            }
            0x30 => {
                // CGWSEL
                self.direct_color = val & 0x1 != 0;
                self.add_subscreen = val & 0x2 != 0;
                self.prevent_math_mode = (val & 0x30) >> 4;
                self.clip_mode = (val & 0xc0) >> 6;
            }
            0x31 => {
                // CGADSUB
                self.subtract_color = val & 0x80 != 0;
                self.half_color = val & 0x40 != 0;
                for i in 0..6 {
                    self.math_enabled[i] = val & (1 << i) != 0;
                }
            }
            0x32 => {
                // COLDATA: per-channel fixed color
                if val & 0x80 != 0 {
                    self.fixed_color_b = val & 0x1f;
                }
                if val & 0x40 != 0 {
                    self.fixed_color_g = val & 0x1f;
                }
                if val & 0x20 != 0 {
                    self.fixed_color_r = val & 0x1f;
                }
            }
            0x33 => {
                // SETINI
                self.interlace = val & 0x1 != 0;
                self.obj_interlace = val & 0x2 != 0;
                self.overscan = val & 0x4 != 0;
                self.pseudo_hires = val & 0x8 != 0;
                self.m7_ext_bg = val & 0x40 != 0;
            }
            _ => {}
        }
    }

    /// Shared BGnHOFS write latch (three-byte history)
    fn write_bg_h_scroll(&mut self, layer: usize, val: u8) {
        self.bg_layer[layer].h_scroll = ((val as u16) << 8
            | (self.scroll_prev & 0xf8) as u16
            | (self.scroll_prev2 & 0x7) as u16)
            & 0x3ff;
        self.scroll_prev = val;
        self.scroll_prev2 = val;
    }

    /// Shared BGnVOFS write latch
    fn write_bg_v_scroll(&mut self, layer: usize, val: u8) {
        self.bg_layer[layer].v_scroll = ((val as u16) << 8 | self.scroll_prev as u16) & 0x3ff;
        self.scroll_prev = val;
    }
}
