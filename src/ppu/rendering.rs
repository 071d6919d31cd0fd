// Scanline rendering
//
// `run_line` renders one visible line into the internal field buffer:
// sprite evaluation first (it runs even for skipped frames on hardware),
// then one front-to-back layer walk per pixel for the main screen and,
// when color math or hires asks for it, the sub screen.

use super::constants::*;
use super::Ppu;

#[inline]
fn clamp5(v: i32) -> i32 {
    v.clamp(0, 0x1f)
}

impl Ppu {
    /// Render visible line `line` (1..=224/239)
    pub fn run_line(&mut self, line: u16) {
        // evaluate sprites for this line before anything else
        self.obj_pixel_buffer = [0; 256];
        if !self.forced_blank {
            self.evaluate_sprites(line as i32 - 1);
        }
        if self.mode == 7 {
            self.calculate_mode7_starts(line as i32);
        }
        self.layer_cache = [-1; 4];
        for x in 0..256 {
            self.handle_pixel(x, line as i32);
        }
    }

    fn handle_pixel(&mut self, x: i32, y: i32) {
        let mut r = 0;
        let mut g = 0;
        let mut b = 0;
        let mut r2 = 0;
        let mut g2 = 0;
        let mut b2 = 0;
        let mut half_color = self.half_color;
        let mut window_state = [false; 6];
        for (layer, state) in window_state.iter_mut().enumerate() {
            *state = self.window_in_range(layer, x);
        }
        self.window_state = window_state;
        if !self.forced_blank {
            let (main_layer, mr, mg, mb) = self.get_pixel(x, y, false);
            r = mr;
            g = mg;
            b = mb;
            let color_window_state = self.window_state[5];
            let mut clip_if_hires = false;
            if self.clip_mode == 3
                || (self.clip_mode == 2 && color_window_state)
                || (self.clip_mode == 1 && !color_window_state)
            {
                if self.clip_mode < 3 {
                    half_color = false;
                }
                r = 0;
                g = 0;
                b = 0;
                clip_if_hires = true;
            }
            let mut second_layer = 5; // backdrop
            let math_enabled = main_layer < 6
                && self.math_enabled[main_layer]
                && !(self.prevent_math_mode == 3
                    || (self.prevent_math_mode == 2 && color_window_state)
                    || (self.prevent_math_mode == 1 && !color_window_state));
            let hires = self.pseudo_hires || self.mode == 5 || self.mode == 6;
            if (math_enabled && self.add_subscreen) || hires {
                let (sl, sr, sg, sb) = self.get_pixel(x, y, true);
                second_layer = sl;
                r2 = sr;
                g2 = sg;
                b2 = sb;
                if hires && clip_if_hires {
                    r2 = 0;
                    g2 = 0;
                    b2 = 0;
                }
            }
            if math_enabled {
                if self.subtract_color {
                    if self.add_subscreen && second_layer != 5 {
                        r -= r2;
                        g -= g2;
                        b -= b2;
                    } else {
                        r -= self.fixed_color_r as i32;
                        g -= self.fixed_color_g as i32;
                        b -= self.fixed_color_b as i32;
                        if hires {
                            r2 = clamp5(r2 - self.fixed_color_r as i32);
                            g2 = clamp5(g2 - self.fixed_color_g as i32);
                            b2 = clamp5(b2 - self.fixed_color_b as i32);
                        }
                    }
                } else if self.add_subscreen && second_layer != 5 {
                    r += r2;
                    g += g2;
                    b += b2;
                } else {
                    r += self.fixed_color_r as i32;
                    g += self.fixed_color_g as i32;
                    b += self.fixed_color_b as i32;
                    if hires {
                        r2 = clamp5(r2 + self.fixed_color_r as i32);
                        g2 = clamp5(g2 + self.fixed_color_g as i32);
                        b2 = clamp5(b2 + self.fixed_color_b as i32);
                    }
                }
                if half_color && (second_layer != 5 || !self.add_subscreen) {
                    r >>= 1;
                    g >>= 1;
                    b >>= 1;
                }
                r = clamp5(r);
                g = clamp5(g);
                b = clamp5(b);
            }
            if self.pseudo_hires && self.mode < 5 {
                // the two half-dots blend into one output pixel
                r = (r + r2) >> 1;
                g = (g + g2) >> 1;
                b = (b + b2) >> 1;
            }
        }

        if !self.forced_blank {
            let scale = BRIGHTNESS_SCALE[self.brightness as usize];
            r = ((r as u32 * scale) >> 16) as i32;
            g = ((g as u32 * scale) >> 16) as i32;
            b = ((b as u32 * scale) >> 16) as i32;
        }

        // RGB565 with 5 significant bits per channel
        let rgb565 =
            ((r as u16 & 0x1f) << 11) | ((g as u16 & 0x1f) << 6) | (b as u16 & 0x1f);
        let row = (y - 1) + if self.even_frame { 0 } else { 239 };
        self.pixel_buffer[(row * 256 + x) as usize] = rgb565;
    }

    /// Find the front-most opaque pixel on the main or sub screen
    ///
    /// Returns (layer, r, g, b): layers 0-3 are backgrounds, 4 sprites
    /// with palette 4-7, 6 sprites with palette 0-3, 5 the backdrop.
    fn get_pixel(&mut self, x: i32, y: i32, sub: bool) -> (usize, i32, i32, i32) {
        let mut act_mode = if self.mode == 1 && self.bg3_priority {
            8
        } else {
            self.mode as usize
        };
        if self.mode == 7 && self.m7_ext_bg {
            act_mode = 9;
        }
        let mut layer = 5usize;
        let mut pixel: u16 = 0;
        for i in 0..LAYER_COUNT_PER_MODE[act_mode] {
            let cur_layer = LAYERS_PER_MODE[act_mode][i] as usize;
            let cur_priority = PRIORITIES_PER_MODE[act_mode][i];
            let layer_active = if !sub {
                self.layer[cur_layer].main_screen_enabled
                    && (!self.layer[cur_layer].main_screen_windowed
                        || !self.window_state[cur_layer])
            } else {
                self.layer[cur_layer].sub_screen_enabled
                    && (!self.layer[cur_layer].sub_screen_windowed
                        || !self.window_state[cur_layer])
            };
            if layer_active {
                if cur_layer < 4 {
                    // background layer
                    let mut lx = x;
                    let mut ly = y;
                    if self.bg_layer[cur_layer].mosaic_enabled && self.mosaic_size > 1 {
                        let size = self.mosaic_size as i32;
                        lx -= lx % size;
                        ly -= (ly - self.mosaic_start_line as i32) % size;
                    }
                    if self.mode == 7 {
                        pixel = self.get_pixel_for_mode7(lx, cur_layer, cur_priority != 0);
                    } else {
                        lx += self.bg_layer[cur_layer].h_scroll as i32;
                        if self.mode == 5 || self.mode == 6 {
                            lx *= 2;
                            lx += if sub || self.bg_layer[cur_layer].mosaic_enabled {
                                0
                            } else {
                                1
                            };
                            if self.interlace {
                                ly *= 2;
                                ly += if self.even_frame
                                    || self.bg_layer[cur_layer].mosaic_enabled
                                {
                                    0
                                } else {
                                    1
                                };
                            }
                        }
                        ly += self.bg_layer[cur_layer].v_scroll as i32;
                        if self.mode == 2 || self.mode == 4 || self.mode == 6 {
                            self.handle_offset_per_tile(cur_layer, &mut lx, &mut ly);
                        }
                        if lx != self.layer_cache[cur_layer] {
                            self.fetch_bg_pixel(lx & 0x3ff, ly & 0x3ff, cur_layer);
                            self.layer_cache[cur_layer] = lx;
                        }
                        pixel = if self.bg_prio[cur_layer] == cur_priority {
                            self.bg_pixel[cur_layer]
                        } else {
                            0
                        };
                    }
                } else {
                    // sprite layer: sample the line buffer
                    pixel = 0;
                    if self.obj_priority_buffer[x as usize] == cur_priority {
                        pixel = self.obj_pixel_buffer[x as usize] as u16;
                    }
                }
            }
            if pixel > 0 {
                layer = cur_layer;
                break;
            }
        }
        let (r, g, b);
        if self.direct_color && layer < 4 && BIT_DEPTHS_PER_MODE[act_mode][layer] == 8 {
            r = (((pixel & 0x7) << 2) | ((pixel & 0x100) >> 7)) as i32;
            g = (((pixel & 0x38) >> 1) | ((pixel & 0x200) >> 8)) as i32;
            b = (((pixel & 0xc0) >> 3) | ((pixel & 0x400) >> 8)) as i32;
        } else {
            let color = self.cgram[(pixel & 0xff) as usize];
            r = (color & 0x1f) as i32;
            g = ((color >> 5) & 0x1f) as i32;
            b = ((color >> 10) & 0x1f) as i32;
        }
        if layer == 4 && pixel < 0xc0 {
            layer = 6; // sprites with palette 0-3 are exempt from math
        }
        (layer, r, g, b)
    }

    /// Offset-per-tile fetch for modes 2, 4 and 6
    fn handle_offset_per_tile(&self, layer: usize, lx: &mut i32, ly: &mut i32) {
        let x = *lx;
        let y = *ly;
        let h_scroll = self.bg_layer[layer].h_scroll as i32;
        let column = if self.mode == 6 {
            ((x - (x & 0xf)) - ((h_scroll * 2) & 0xfff0)) >> 4
        } else {
            ((x - (x & 0x7)) - (h_scroll & 0xfff8)) >> 3
        };
        if column > 0 {
            // fetch offset values from the layer 3 tilemap
            let valid = if layer == 0 { 0x2000 } else { 0x4000 };
            let mut h_offset = self.get_offset_value(column - 1, 0) as i32;
            let v_offset;
            if self.mode == 4 {
                if h_offset & 0x8000 != 0 {
                    v_offset = h_offset;
                    h_offset = 0;
                } else {
                    v_offset = 0;
                }
            } else {
                v_offset = self.get_offset_value(column - 1, 1) as i32;
            }
            if self.mode == 6 {
                if h_offset & valid != 0 {
                    *lx = (((h_offset & 0x3f8) + column * 8) * 2) | (x & 0xf);
                }
            } else if h_offset & valid != 0 {
                *lx = ((h_offset & 0x3f8) + column * 8) | (x & 0x7);
            }
            if v_offset & valid != 0 {
                *ly = (v_offset & 0x3ff) + (y - self.bg_layer[layer].v_scroll as i32);
            }
        }
    }

    fn get_offset_value(&self, col: i32, row: i32) -> u16 {
        let x = col * 8 + self.bg_layer[2].h_scroll as i32;
        let y = row * 8 + self.bg_layer[2].v_scroll as i32;
        let tile_bits = if self.bg_layer[2].big_tiles { 4 } else { 3 };
        let tile_high_bit = if self.bg_layer[2].big_tiles { 0x200 } else { 0x100 };
        let mut tilemap_adr = self.bg_layer[2].tilemap_adr as i32
            + (((y >> tile_bits) & 0x1f) << 5 | ((x >> tile_bits) & 0x1f));
        if x & tile_high_bit != 0 && self.bg_layer[2].tilemap_wider {
            tilemap_adr += 0x400;
        }
        if y & tile_high_bit != 0 && self.bg_layer[2].tilemap_higher {
            tilemap_adr += if self.bg_layer[2].tilemap_wider { 0x800 } else { 0x400 };
        }
        self.vram[(tilemap_adr & 0x7fff) as usize]
    }

    /// Fetch one background pixel into the per-layer line cache
    fn fetch_bg_pixel(&mut self, x: i32, y: i32, layer: usize) {
        // locate and read the tilemap word
        let wide_tiles = self.bg_layer[layer].big_tiles || self.mode == 5 || self.mode == 6;
        let tile_bits_x = if wide_tiles { 4 } else { 3 };
        let tile_high_bit_x = if wide_tiles { 0x200 } else { 0x100 };
        let tile_bits_y = if self.bg_layer[layer].big_tiles { 4 } else { 3 };
        let tile_high_bit_y = if self.bg_layer[layer].big_tiles { 0x200 } else { 0x100 };
        let mut tilemap_adr = self.bg_layer[layer].tilemap_adr as i32
            + (((y >> tile_bits_y) & 0x1f) << 5 | ((x >> tile_bits_x) & 0x1f));
        if x & tile_high_bit_x != 0 && self.bg_layer[layer].tilemap_wider {
            tilemap_adr += 0x400;
        }
        if y & tile_high_bit_y != 0 && self.bg_layer[layer].tilemap_higher {
            tilemap_adr += if self.bg_layer[layer].tilemap_wider { 0x800 } else { 0x400 };
        }
        let tile = self.vram[(tilemap_adr & 0x7fff) as usize];
        // priority and palette
        let tile_prio = ((tile >> 13) & 1) as u8;
        let mut palette_num = ((tile & 0x1c00) >> 10) as i32;
        // position within the tile, honouring flips
        let row = if tile & 0x8000 != 0 { 7 - (y & 0x7) } else { y & 0x7 };
        let col = if tile & 0x4000 != 0 { x & 0x7 } else { 7 - (x & 0x7) };
        let mut tile_num = (tile & 0x3ff) as i32;
        if wide_tiles {
            // unflipped right half or flipped left half selects the next tile
            if ((x & 8) != 0) != ((tile & 0x4000) != 0) {
                tile_num += 1;
            }
        }
        if self.bg_layer[layer].big_tiles {
            // unflipped bottom half or flipped top half is one tile row down
            if ((y & 8) != 0) != ((tile & 0x8000) != 0) {
                tile_num += 0x10;
            }
        }
        let bit_depth = BIT_DEPTHS_PER_MODE[self.mode as usize][layer] as i32;
        if self.mode == 0 {
            palette_num += 8 * layer as i32;
        }
        let base_adr = self.bg_layer[layer].tile_adr as i32 + (tile_num & 0x3ff) * 4 * bit_depth;
        let bit2_shift = 8 + col;
        let mut pixel: u16 = 0;
        let plane = self.vram[((base_adr + row) & 0x7fff) as usize];
        pixel |= (plane >> col) & 1;
        pixel |= ((plane >> bit2_shift) & 1) << 1;
        if bit_depth >= 4 {
            let plane = self.vram[((base_adr + 8 + row) & 0x7fff) as usize];
            pixel |= ((plane >> col) & 1) << 2;
            pixel |= ((plane >> bit2_shift) & 1) << 3;
        }
        if bit_depth == 8 {
            let plane = self.vram[((base_adr + 16 + row) & 0x7fff) as usize];
            pixel |= ((plane >> col) & 1) << 4;
            pixel |= ((plane >> bit2_shift) & 1) << 5;
            let plane = self.vram[((base_adr + 24 + row) & 0x7fff) as usize];
            pixel |= ((plane >> col) & 1) << 6;
            pixel |= ((plane >> bit2_shift) & 1) << 7;
        }
        // cgram index, or 0 for transparent
        self.bg_pixel[layer] = if pixel == 0 {
            0
        } else {
            ((palette_num as u16) << bit_depth) + pixel
        };
        self.bg_prio[layer] = tile_prio;
    }

    /// Compute the per-line affine start vector for mode 7
    fn calculate_mode7_starts(&mut self, y: i32) {
        // sign-extend the 13-bit scroll and center values
        let h_scroll = ((self.m7_matrix[6] << 3) >> 3) as i32;
        let v_scroll = ((self.m7_matrix[7] << 3) >> 3) as i32;
        let x_center = ((self.m7_matrix[4] << 3) >> 3) as i32;
        let y_center = ((self.m7_matrix[5] << 3) >> 3) as i32;
        let mut clipped_h = h_scroll - x_center;
        let mut clipped_v = v_scroll - y_center;
        clipped_h = if clipped_h & 0x2000 != 0 {
            clipped_h | !1023
        } else {
            clipped_h & 1023
        };
        clipped_v = if clipped_v & 0x2000 != 0 {
            clipped_v | !1023
        } else {
            clipped_v & 1023
        };
        let mut y = y;
        if self.bg_layer[0].mosaic_enabled && self.mosaic_size > 1 {
            y -= (y - self.mosaic_start_line as i32) % self.mosaic_size as i32;
        }
        let ry = (if self.m7_y_flip { 255 - y } else { y }) as u8 as i32;
        let m = &self.m7_matrix;
        self.m7_start_x = ((m[0] as i32 * clipped_h) & !63)
            + ((m[1] as i32 * ry) & !63)
            + ((m[1] as i32 * clipped_v) & !63)
            + (x_center << 8);
        self.m7_start_y = ((m[2] as i32 * clipped_h) & !63)
            + ((m[3] as i32 * ry) & !63)
            + ((m[3] as i32 * clipped_v) & !63)
            + (y_center << 8);
    }

    /// One mode 7 pixel; layer 1 is the EXTBG plane with its priority bit
    fn get_pixel_for_mode7(&self, x: i32, layer: usize, priority: bool) -> u16 {
        let rx = (if self.m7_x_flip { 255 - x } else { x }) as u8 as i32;
        let x_pos = (self.m7_start_x + self.m7_matrix[0] as i32 * rx) >> 8;
        let y_pos = (self.m7_start_y + self.m7_matrix[2] as i32 * rx) >> 8;
        let mut outside_map = x_pos < 0 || x_pos >= 1024 || y_pos < 0 || y_pos >= 1024;
        let x_pos = x_pos & 0x3ff;
        let y_pos = y_pos & 0x3ff;
        if !self.m7_large_field {
            outside_map = false;
        }
        let tile = if outside_map {
            0
        } else {
            (self.vram[((y_pos >> 3) * 128 + (x_pos >> 3)) as usize] & 0xff) as i32
        };
        let pixel = if outside_map && !self.m7_char_fill {
            0
        } else {
            self.vram[(tile * 64 + (y_pos & 7) * 8 + (x_pos & 7)) as usize] >> 8
        };
        if layer == 1 {
            if ((pixel & 0x80) != 0) != priority {
                return 0;
            }
            return pixel & 0x7f;
        }
        pixel
    }

    /// Window coverage test for the six windowed layers
    fn window_in_range(&self, layer: usize, x: i32) -> bool {
        let win = &self.window_layer[layer];
        let test1 = x >= self.window1_left as i32 && x <= self.window1_right as i32;
        let test2 = x >= self.window2_left as i32 && x <= self.window2_right as i32;
        match (win.window1_enabled, win.window2_enabled) {
            (false, false) => false,
            (true, false) => {
                if win.window1_inversed {
                    !test1
                } else {
                    test1
                }
            }
            (false, true) => {
                if win.window2_inversed {
                    !test2
                } else {
                    test2
                }
            }
            (true, true) => {
                let t1 = if win.window1_inversed { !test1 } else { test1 };
                let t2 = if win.window2_inversed { !test2 } else { test2 };
                match win.mask_logic {
                    0 => t1 || t2,
                    1 => t1 && t2,
                    2 => t1 != t2,
                    _ => t1 == t2,
                }
            }
        }
    }

    /// Sprite evaluation for one line
    ///
    /// Scans all 128 OAM entries in priority order, keeps at most 32
    /// in-range sprites (the 33rd sets the range flag), then walks them in
    /// reverse fetching at most 34 tile slivers (the 35th sets the time
    /// flag) into the line buffer.
    fn evaluate_sprites(&mut self, line: i32) {
        let mut index: u8 = if self.obj_priority { self.oam_adr & 0xfe } else { 0 };
        let mut sprites_found = 0usize;
        let mut tiles_found = 0;
        let mut found_sprites = [0u8; 32];
        // scan OAM for sprites in y-range
        for _ in 0..128 {
            let y = (self.oam[index as usize] >> 8) as u8;
            let row = (line as u8).wrapping_sub(y) as i32;
            let size_select =
                (self.high_oam[(index >> 3) as usize] >> ((index & 7) + 1)) & 1;
            let sprite_size = SPRITE_SIZES[self.obj_size as usize][size_select as usize] as i32;
            let sprite_height = if self.obj_interlace {
                sprite_size / 2
            } else {
                sprite_size
            };
            if row < sprite_height {
                // in y-range; decode the 9-bit x coordinate
                let mut x = (self.oam[index as usize] & 0xff) as i32;
                x |= (((self.high_oam[(index >> 3) as usize] >> (index & 7)) & 1) as i32) << 8;
                if x > 255 {
                    x -= 512;
                }
                if x > -sprite_size || x == -256 {
                    sprites_found += 1;
                    if sprites_found > 32 {
                        self.range_over = true;
                        sprites_found = 32;
                        break;
                    }
                    found_sprites[sprites_found - 1] = index;
                }
            }
            index = index.wrapping_add(2);
        }
        // walk the found sprites backwards, fetching tile slivers
        for i in (0..sprites_found).rev() {
            let index = found_sprites[i];
            let y = (self.oam[index as usize] >> 8) as u8;
            let mut row = (line as u8).wrapping_sub(y) as i32;
            let size_select =
                (self.high_oam[(index >> 3) as usize] >> ((index & 7) + 1)) & 1;
            let sprite_size = SPRITE_SIZES[self.obj_size as usize][size_select as usize] as i32;
            let mut x = (self.oam[index as usize] & 0xff) as i32;
            x |= (((self.high_oam[(index >> 3) as usize] >> (index & 7)) & 1) as i32) << 8;
            if x > 255 {
                x -= 512;
            }
            if x <= -sprite_size {
                continue;
            }
            if self.obj_interlace {
                row = row * 2 + if self.even_frame { 0 } else { 1 };
            }
            let attr = self.oam[index as usize + 1];
            let tile = (attr & 0xff) as i32;
            let palette = ((attr & 0xe00) >> 9) as i32;
            let h_flipped = attr & 0x4000 != 0;
            if attr & 0x8000 != 0 {
                row = sprite_size - 1 - row;
            }
            // fetch all slivers in x-range
            let mut col = 0;
            while col < sprite_size {
                if col + x > -8 && col + x < 256 {
                    tiles_found += 1;
                    if tiles_found > 34 {
                        self.time_over = true;
                        break;
                    }
                    // tile selection loops within the 16x16 character page
                    let used_col = if h_flipped { sprite_size - 1 - col } else { col };
                    let used_tile = ((((tile >> 4) + (row / 8)) << 4)
                        | (((tile & 0xf) + (used_col / 8)) & 0xf))
                        as u8 as u16;
                    let obj_adr = if attr & 0x100 != 0 {
                        self.obj_tile_adr2
                    } else {
                        self.obj_tile_adr1
                    };
                    let plane1 = self.vram[((obj_adr
                        .wrapping_add(used_tile.wrapping_mul(16))
                        .wrapping_add((row & 0x7) as u16))
                        & 0x7fff) as usize];
                    let plane2 = self.vram[((obj_adr
                        .wrapping_add(used_tile.wrapping_mul(16))
                        .wrapping_add(8 + (row & 0x7) as u16))
                        & 0x7fff) as usize];
                    for px in 0..8 {
                        let shift = if h_flipped { px } else { 7 - px };
                        let mut pixel = (plane1 >> shift) & 1;
                        pixel |= ((plane1 >> (8 + shift)) & 1) << 1;
                        pixel |= ((plane2 >> shift) & 1) << 2;
                        pixel |= ((plane2 >> (8 + shift)) & 1) << 3;
                        let screen_col = col + x + px;
                        if pixel > 0 && (0..256).contains(&screen_col) {
                            self.obj_pixel_buffer[screen_col as usize] =
                                0x80 + 16 * palette as u8 + pixel as u8;
                            self.obj_priority_buffer[screen_col as usize] =
                                ((attr & 0x3000) >> 12) as u8;
                        }
                    }
                }
                col += 8;
            }
            if tiles_found > 34 {
                break;
            }
        }
    }
}
