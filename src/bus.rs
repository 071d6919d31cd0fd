// Bus module - master clock, raster loop and internal registers
//
// The bus owns the 128 KiB work RAM, the raster position, the IRQ/NMI
// machinery, the auto-joypad unit, the multiplier/divider, and all the
// attached devices (PPU, DMA, APU ports, cartridge, controllers). The CPU
// drives it: every CPU cycle lands in one of the `CpuBus` methods, which
// advance the master clock in 2-cycle steps through `run_cycle`.
//
// # System bank register windows
//
// ```text
// $0000-$1FFF: Work RAM mirror
// $2100-$21FF: B-bus (PPU $00-$3F, APU ports $40-$7F, WRAM port $80-$83)
// $4016-$4017: Legacy controller ports
// $4200-$421F: Internal registers (NMITIMEN..MEMSEL, status, math unit)
// $4300-$437F: DMA channel registers
// ```
//
// Everything not claimed above is offered to the cartridge; unmapped
// reads return the open-bus byte, the last value driven onto the data
// bus.

use crate::apu::{ApuPorts, AudioCoprocessor};
use crate::cartridge::Cartridge;
use crate::cpu::CpuBus;
use crate::dma::Dma;
use crate::emulator::config::EmulatorConfig;
use crate::emulator::save_state::StateHandler;
use crate::input::Controller;
use crate::memory_map::{self, AccessTimeTable, Region, TableAllocError, WRAM_SIZE};
use crate::ppu::{BusView, Ppu};

/// Cycles the auto-joypad unit stays busy after vblank entry
const AUTO_JOY_CYCLES: u16 = 4224;

/// Main bus structure
pub struct Bus {
    // ========================================
    // Master clock and raster position
    // ========================================
    pub cycles: u64,
    pub sync_cycle: u64,
    pub h_pos: u16,
    pub v_pos: u16,
    pub frames: u32,
    next_hori_event: u16,

    // ========================================
    // IRQ/NMI machinery
    // ========================================
    h_irq_enabled: bool,
    v_irq_enabled: bool,
    nmi_enabled: bool,
    h_timer: u16,
    v_timer: u16,
    hv_timer: u16,
    pub in_nmi: bool,
    pub in_irq: bool,
    pub in_vblank: bool,
    irq_condition: bool,
    // lines to the CPU, consumed through the CpuBus trait
    nmi_edge: bool,
    irq_line: bool,
    int_delay_request: bool,

    // ========================================
    // Auto-joypad unit
    // ========================================
    auto_joy_read: bool,
    auto_joy_timer: u16,
    port_auto_read: [u16; 4],

    // ========================================
    // Multiplier/divider
    // ========================================
    multiply_a: u8,
    multiply_result: u16,
    divide_a: u16,
    divide_result: u16,

    // ========================================
    // Misc bus state
    // ========================================
    ppu_latch: bool,
    fast_mem: bool,
    pub pal_timing: bool,
    pub open_bus: u8,
    ram_adr: u32,
    ram: Vec<u8>,
    ram_fill: u8,
    access_table: AccessTimeTable,

    // ========================================
    // Attached devices
    // ========================================
    pub ppu: Ppu,
    pub dma: Dma,
    pub apu_ports: ApuPorts,
    pub apu: Option<Box<dyn AudioCoprocessor>>,
    pub cart: Box<dyn Cartridge>,
    pub input1: Controller,
    pub input2: Controller,
}

impl Bus {
    /// Create a bus with the given cartridge and configuration
    ///
    /// The only fallible part is allocating the 16 MiB access-time table.
    pub fn new(cart: Box<dyn Cartridge>, config: &EmulatorConfig) -> Result<Self, TableAllocError> {
        let mut bus = Bus {
            cycles: 0,
            sync_cycle: 0,
            h_pos: 0,
            v_pos: 0,
            frames: 0,
            next_hori_event: 16,
            h_irq_enabled: false,
            v_irq_enabled: false,
            nmi_enabled: false,
            h_timer: 0x1ff * 4,
            v_timer: 0x1ff,
            hv_timer: 0,
            in_nmi: false,
            in_irq: false,
            in_vblank: false,
            irq_condition: false,
            nmi_edge: false,
            irq_line: false,
            int_delay_request: false,
            auto_joy_read: false,
            auto_joy_timer: 0,
            port_auto_read: [0; 4],
            multiply_a: 0xff,
            multiply_result: 0xfe01,
            divide_a: 0xffff,
            divide_result: 0x101,
            ppu_latch: true,
            fast_mem: false,
            pal_timing: config.region.is_pal(),
            open_bus: 0,
            ram_adr: 0,
            ram: vec![config.ram_fill; WRAM_SIZE],
            ram_fill: config.ram_fill,
            access_table: AccessTimeTable::build(false)?,
            ppu: Ppu::new(),
            dma: Dma::new(),
            apu_ports: ApuPorts::new(),
            apu: None,
            cart,
            input1: Controller::new(),
            input2: Controller::new(),
        };
        bus.reset(true);
        Ok(bus)
    }

    /// Reset scheduling and register state; a hard reset also refills RAM
    pub fn reset(&mut self, hard: bool) {
        self.ppu.reset();
        self.dma.reset();
        self.apu_ports.reset();
        if let Some(apu) = self.apu.as_mut() {
            apu.reset();
        }
        self.input1.reset();
        self.input2.reset();
        self.cart.reset();
        if hard {
            let fill = self.ram_fill;
            self.ram.iter_mut().for_each(|b| *b = fill);
        }
        self.ram_adr = 0;
        self.h_pos = 0;
        self.v_pos = 0;
        self.frames = 0;
        self.cycles = 0;
        self.sync_cycle = 0;
        self.h_irq_enabled = false;
        self.v_irq_enabled = false;
        self.nmi_enabled = false;
        self.h_timer = 0x1ff * 4;
        self.v_timer = 0x1ff;
        self.hv_timer = 0;
        self.in_nmi = false;
        self.irq_condition = false;
        self.in_irq = false;
        self.in_vblank = false;
        self.nmi_edge = false;
        self.irq_line = false;
        self.int_delay_request = false;
        self.port_auto_read = [0; 4];
        self.auto_joy_read = false;
        self.auto_joy_timer = 0;
        self.ppu_latch = true;
        self.multiply_a = 0xff;
        self.multiply_result = 0xfe01;
        self.divide_a = 0xffff;
        self.divide_result = 0x101;
        self.fast_mem = false;
        self.open_bus = 0;
        self.next_hori_event = 16;
        self.access_table.rebake_fast_region(false);
        log::info!(
            "bus reset ({}, {})",
            if hard { "hard" } else { "soft" },
            if self.pal_timing { "PAL" } else { "NTSC" }
        );
    }

    // ========================================
    // Master clock
    // ========================================

    /// Advance the master clock by `cycles` (rounded in 2-cycle steps)
    ///
    /// Crossing hPos 536 adds the 40-cycle DRAM refresh stall.
    pub fn run_cycles(&mut self, cycles: i32) {
        let mut cycles = cycles;
        if (self.h_pos as i32) < 536 && self.h_pos as i32 + cycles >= 536 {
            cycles += 40;
        }
        let mut i = 0;
        while i < cycles {
            self.run_cycle();
            i += 2;
        }
    }

    /// Align the clock to a multiple of `sync_cycles`, for co-simulated
    /// devices that batch their work
    pub fn sync_cycles(&mut self, start: bool, sync_cycles: u64) {
        let count = if start {
            self.sync_cycle = self.cycles;
            sync_cycles - (self.cycles % sync_cycles)
        } else {
            sync_cycles - ((self.cycles - self.sync_cycle) % sync_cycles)
        };
        self.run_cycles(count as i32);
    }

    /// Advance two master cycles and dispatch raster events
    fn run_cycle(&mut self) {
        self.cycles += 2;
        if self.h_pos & 2 == 0 {
            // H/V-timer IRQ sampling happens every 4 cycles
            if self.hv_timer > 0 {
                self.hv_timer -= 2;
                if self.hv_timer == 0 {
                    self.in_irq = true;
                    self.irq_line = true;
                }
            }
            let condition = (self.v_irq_enabled || self.h_irq_enabled)
                && (self.v_pos == self.v_timer || !self.v_irq_enabled)
                && (self.h_pos == self.h_timer || !self.h_irq_enabled);
            if !self.irq_condition && condition {
                // the IRQ hits a moment after the H/V condition rises
                self.hv_timer = 4;
            }
            self.irq_condition = condition;
        }
        // position advances after the IRQ checks
        self.h_pos += 2;
        if self.h_pos == self.next_hori_event {
            match self.h_pos {
                16 => {
                    self.next_hori_event = 512;
                    if self.v_pos == 0 {
                        self.dma.hdma_init_requested = true;
                    }
                }
                512 => {
                    self.next_hori_event = 1104;
                    // render halfway through the line for compatibility
                    if !self.in_vblank && self.v_pos > 0 {
                        self.ppu.run_line(self.v_pos);
                    }
                }
                1104 => {
                    if !self.in_vblank {
                        self.dma.hdma_run_requested = true;
                    }
                    self.next_hori_event = if !self.pal_timing {
                        // line 240 of an odd non-interlaced frame is 4 cycles short
                        if self.v_pos == 240 && !self.ppu.even_frame && !self.ppu.frame_interlace
                        {
                            1360
                        } else {
                            1364
                        }
                    } else {
                        // line 311 of an odd interlaced frame is 4 cycles long
                        if self.v_pos != 311 || self.ppu.even_frame || !self.ppu.frame_interlace
                        {
                            1364
                        } else {
                            1368
                        }
                    };
                }
                1360 | 1364 | 1368 => self.end_line(),
                _ => {}
            }
        }
        if self.auto_joy_timer > 0 {
            self.auto_joy_timer -= 2;
        }
    }

    /// Wrap the horizontal position and handle the per-line transitions
    fn end_line(&mut self) {
        self.next_hori_event = 16;
        self.h_pos = 0;
        self.v_pos += 1;
        let frame_lines = if self.pal_timing { 312 } else { 262 };
        if (self.v_pos == frame_lines
            && (!self.ppu.frame_interlace || !self.ppu.even_frame))
            || self.v_pos == frame_lines + 1
        {
            // even interlaced frames run one line longer
            self.cart.tick_frame();
            self.v_pos = 0;
            self.frames += 1;
        }
        let mut starting_vblank = false;
        if self.v_pos == 0 {
            // end of vblank
            self.in_vblank = false;
            self.in_nmi = false;
            self.ppu.handle_frame_start();
        } else if self.v_pos == 225 {
            // vblank starts here unless the PPU reports overscan
            starting_vblank = !self.ppu.check_overscan();
        } else if self.v_pos == 240 {
            if !self.in_vblank {
                starting_vblank = true; // overscan frame
            }
        }
        if starting_vblank {
            // catch up and notify the audio side at the frame boundary;
            // DMA may stretch far past vblank otherwise
            self.catchup_apu();
            if let Some(apu) = self.apu.as_mut() {
                apu.new_frame();
            }
            self.ppu.handle_vblank();
            self.in_vblank = true;
            self.in_nmi = true;
            if self.auto_joy_read {
                self.auto_joy_timer = AUTO_JOY_CYCLES;
                self.do_auto_joypad();
            }
            if self.nmi_enabled {
                self.nmi_edge = true;
            }
        }
    }

    fn catchup_apu(&mut self) {
        if let Some(apu) = self.apu.as_mut() {
            apu.run_cycles(self.cycles, &mut self.apu_ports);
        }
    }

    /// Latch both pads and clock 16 bits into the auto-read registers
    fn do_auto_joypad(&mut self) {
        self.port_auto_read = [0; 4];
        self.input1.latch(true);
        self.input2.latch(true);
        self.input1.latch(false);
        self.input2.latch(false);
        for i in 0..16 {
            let val = self.input1.read();
            self.port_auto_read[0] |= ((val & 1) as u16) << (15 - i);
            self.port_auto_read[2] |= (((val >> 1) & 1) as u16) << (15 - i);
            let val = self.input2.read();
            self.port_auto_read[1] |= ((val & 1) as u16) << (15 - i);
            self.port_auto_read[3] |= (((val >> 1) & 1) as u16) << (15 - i);
        }
    }

    /// Consume pending DMA work before a CPU cycle runs
    ///
    /// The transfer engine is an external collaborator; the requests and
    /// channel launches are resolved here so guest-visible bookkeeping
    /// stays consistent.
    fn handle_dma(&mut self, _cpu_cycles: i32) {
        if self.dma.hdma_init_requested {
            self.dma.hdma_init_requested = false;
            self.dma.init_hdma();
        }
        if self.dma.hdma_run_requested {
            self.dma.hdma_run_requested = false;
        }
        for ch in self.dma.channel.iter_mut() {
            ch.dma_active = false;
        }
    }

    // ========================================
    // B-bus dispatch
    // ========================================

    fn ppu_view(&self) -> BusView {
        BusView {
            h_pos: self.h_pos,
            v_pos: self.v_pos,
            open_bus: self.open_bus,
            ppu_latch: self.ppu_latch,
            in_vblank: self.in_vblank,
            pal_timing: self.pal_timing,
        }
    }

    /// Read a B-bus port ($2100-$21FF, low byte of the address)
    pub fn read_bbus(&mut self, adr: u8) -> u8 {
        if adr < 0x40 {
            let view = self.ppu_view();
            return self.ppu.read(adr, view);
        }
        if adr < 0x80 {
            self.catchup_apu();
            return self.apu_ports.output[(adr & 0x3) as usize];
        }
        if adr == 0x80 {
            let ret = self.ram[self.ram_adr as usize];
            self.ram_adr = (self.ram_adr + 1) & 0x1ffff;
            return ret;
        }
        self.open_bus
    }

    /// Write a B-bus port
    pub fn write_bbus(&mut self, adr: u8, val: u8) {
        if adr < 0x40 {
            let view = self.ppu_view();
            self.ppu.write(adr, val, view);
            return;
        }
        if adr < 0x80 {
            self.catchup_apu();
            self.apu_ports.input[(adr & 0x3) as usize] = val;
            return;
        }
        match adr {
            0x80 => {
                self.ram[self.ram_adr as usize] = val;
                self.ram_adr = (self.ram_adr + 1) & 0x1ffff;
            }
            0x81 => self.ram_adr = (self.ram_adr & 0x1ff00) | val as u32,
            0x82 => self.ram_adr = (self.ram_adr & 0x100ff) | (val as u32) << 8,
            0x83 => self.ram_adr = (self.ram_adr & 0x0ffff) | ((val & 1) as u32) << 16,
            _ => {}
        }
    }

    // ========================================
    // Internal registers ($4200-$421F)
    // ========================================

    fn read_reg(&mut self, adr: u16) -> u8 {
        match adr {
            0x4210 => {
                // RDNMI: vblank NMI flag, cleared on read; CPU version
                let mut val = 0x2;
                val |= (self.in_nmi as u8) << 7;
                self.in_nmi = false;
                val | (self.open_bus & 0x70)
            }
            0x4211 => {
                // TIMEUP: timer IRQ flag, cleared on read
                let val = (self.in_irq as u8) << 7;
                self.in_irq = false;
                self.irq_line = false;
                val | (self.open_bus & 0x7f)
            }
            0x4212 => {
                // HVBJOY: auto-joypad busy, hblank, vblank
                let mut val = (self.auto_joy_timer > 0) as u8;
                val |= ((self.h_pos < 4 || self.h_pos >= 1096) as u8) << 6;
                val |= (self.in_vblank as u8) << 7;
                val | (self.open_bus & 0x3e)
            }
            0x4213 => (self.ppu_latch as u8) << 7, // RDIO
            0x4214 => (self.divide_result & 0xff) as u8,
            0x4215 => (self.divide_result >> 8) as u8,
            0x4216 => (self.multiply_result & 0xff) as u8,
            0x4217 => (self.multiply_result >> 8) as u8,
            0x4218 | 0x421a | 0x421c | 0x421e => {
                (self.port_auto_read[((adr - 0x4218) / 2) as usize] & 0xff) as u8
            }
            0x4219 | 0x421b | 0x421d | 0x421f => {
                (self.port_auto_read[((adr - 0x4219) / 2) as usize] >> 8) as u8
            }
            _ => self.open_bus,
        }
    }

    fn write_reg(&mut self, adr: u16, val: u8) {
        match adr {
            0x4200 => {
                // NMITIMEN
                self.auto_joy_read = val & 0x1 != 0;
                if !self.auto_joy_read {
                    self.auto_joy_timer = 0;
                }
                self.h_irq_enabled = val & 0x10 != 0;
                self.v_irq_enabled = val & 0x20 != 0;
                if !self.h_irq_enabled && !self.v_irq_enabled {
                    self.in_irq = false;
                    self.irq_line = false;
                }
                // enabling NMI while the vblank flag is still set fires at once
                if !self.nmi_enabled && val & 0x80 != 0 && self.in_nmi {
                    self.nmi_edge = true;
                }
                self.nmi_enabled = val & 0x80 != 0;
                // interrupt sampling is held off for one opcode
                self.int_delay_request = true;
            }
            0x4201 => {
                // WRIO: falling latch bit samples the PPU counters
                if val & 0x80 == 0 && self.ppu_latch {
                    let (h, v) = (self.h_pos, self.v_pos);
                    self.ppu.latch_hv(h, v);
                }
                self.ppu_latch = val & 0x80 != 0;
            }
            0x4202 => self.multiply_a = val,
            0x4203 => {
                // WRMPYB: result latches on the second operand write
                self.multiply_result = self.multiply_a as u16 * val as u16;
            }
            0x4204 => self.divide_a = (self.divide_a & 0xff00) | val as u16,
            0x4205 => self.divide_a = (self.divide_a & 0x00ff) | (val as u16) << 8,
            0x4206 => {
                // WRDIVB: quotient and remainder latch together
                if val == 0 {
                    self.divide_result = 0xffff;
                    self.multiply_result = self.divide_a;
                } else {
                    self.divide_result = self.divide_a / val as u16;
                    self.multiply_result = self.divide_a % val as u16;
                }
            }
            0x4207 => self.h_timer = (self.h_timer & 0x400) | (val as u16) << 2,
            0x4208 => self.h_timer = (self.h_timer & 0x03fc) | ((val & 1) as u16) << 10,
            0x4209 => self.v_timer = (self.v_timer & 0x100) | val as u16,
            0x420a => self.v_timer = (self.v_timer & 0x0ff) | ((val & 1) as u16) << 8,
            0x420b => self.dma.start(val, false), // MDMAEN
            0x420c => self.dma.start(val, true),  // HDMAEN
            0x420d => {
                // MEMSEL: fast-ROM timing for banks $80+
                let fast = val & 0x1 != 0;
                if self.fast_mem != fast {
                    self.fast_mem = fast;
                    self.access_table.rebake_fast_region(fast);
                }
            }
            _ => {}
        }
    }

    // ========================================
    // Full address-space dispatch
    // ========================================

    fn read_raw(&mut self, adr: u32) -> u8 {
        match memory_map::decode(adr) {
            Region::Wram { adr } => self.ram[adr as usize],
            Region::WramMirror { adr } => self.ram[adr as usize],
            Region::BBus { port } => self.read_bbus(port),
            Region::JoypadPort { adr } => {
                if adr == 0x4016 {
                    self.input1.read() | (self.open_bus & 0xfc)
                } else {
                    self.input2.read() | (self.open_bus & 0xe0) | 0x1c
                }
            }
            Region::Internal { adr } => self.read_reg(adr),
            Region::DmaRegs { adr } => self.dma.read(adr).unwrap_or(self.open_bus),
            Region::Cartridge { bank, adr } => {
                self.cart.read(bank, adr).unwrap_or(self.open_bus)
            }
        }
    }

    /// Read a byte; the result becomes the new open-bus value
    pub fn read(&mut self, adr: u32) -> u8 {
        let val = self.read_raw(adr);
        self.open_bus = val;
        val
    }

    /// Write a byte; the cartridge also observes every write
    pub fn write(&mut self, adr: u32, val: u8) {
        self.open_bus = val;
        match memory_map::decode(adr) {
            Region::Wram { adr } => self.ram[adr as usize] = val,
            Region::WramMirror { adr } => self.ram[adr as usize] = val,
            Region::BBus { port } => self.write_bbus(port, val),
            Region::JoypadPort { adr } => {
                if adr == 0x4016 {
                    self.input1.latch(val & 1 != 0);
                    self.input2.latch(val & 1 != 0);
                }
            }
            Region::Internal { adr } => self.write_reg(adr, val),
            Region::DmaRegs { adr } => self.dma.write(adr, val),
            Region::Cartridge { .. } => {}
        }
        let bank = (adr >> 16) as u8;
        self.cart.write(bank, (adr & 0xffff) as u16, val);
    }

    pub(crate) fn handle_state(&mut self, sh: &mut StateHandler) {
        sh.handle_bool(&mut self.pal_timing);
        sh.handle_bool(&mut self.h_irq_enabled);
        sh.handle_bool(&mut self.v_irq_enabled);
        sh.handle_bool(&mut self.nmi_enabled);
        sh.handle_bool(&mut self.in_nmi);
        sh.handle_bool(&mut self.irq_condition);
        sh.handle_bool(&mut self.in_irq);
        sh.handle_bool(&mut self.in_vblank);
        sh.handle_bool(&mut self.auto_joy_read);
        sh.handle_bool(&mut self.ppu_latch);
        sh.handle_bool(&mut self.fast_mem);
        sh.handle_bool(&mut self.nmi_edge);
        sh.handle_bool(&mut self.irq_line);
        sh.handle_bool(&mut self.int_delay_request);
        sh.handle_u8(&mut self.multiply_a);
        sh.handle_u8(&mut self.open_bus);
        sh.handle_u16(&mut self.h_pos);
        sh.handle_u16(&mut self.v_pos);
        sh.handle_u16(&mut self.h_timer);
        sh.handle_u16(&mut self.v_timer);
        sh.handle_u16(&mut self.hv_timer);
        for i in 0..4 {
            sh.handle_u16(&mut self.port_auto_read[i]);
        }
        sh.handle_u16(&mut self.auto_joy_timer);
        sh.handle_u16(&mut self.multiply_result);
        sh.handle_u16(&mut self.divide_a);
        sh.handle_u16(&mut self.divide_result);
        sh.handle_u16(&mut self.next_hori_event);
        sh.handle_u32(&mut self.ram_adr);
        sh.handle_u32(&mut self.frames);
        sh.handle_u64(&mut self.cycles);
        sh.handle_u64(&mut self.sync_cycle);
        sh.handle_u8_array(&mut self.ram);
        // attached devices, in fixed order
        self.dma.handle_state(sh);
        self.ppu.handle_state(sh);
        self.apu_ports.handle_state(sh);
        self.input1.handle_state(sh);
        self.input2.handle_state(sh);
        self.cart.handle_state(sh);
        if sh.is_load() {
            let fast = self.fast_mem;
            self.access_table.rebake_fast_region(fast);
        }
    }
}

impl CpuBus for Bus {
    fn read(&mut self, adr: u32) -> u8 {
        let cycles = self.access_table.get(adr) as i32 - 4;
        self.handle_dma(cycles + 4);
        self.run_cycles(cycles);
        let value = Bus::read(self, adr);
        self.run_cycles(4);
        value
    }

    fn write(&mut self, adr: u32, val: u8) {
        let cycles = self.access_table.get(adr) as i32;
        self.handle_dma(cycles);
        self.run_cycles(cycles);
        Bus::write(self, adr, val);
    }

    fn idle(&mut self, _waiting: bool) {
        self.handle_dma(6);
        self.run_cycles(6);
    }

    fn take_nmi(&mut self) -> bool {
        let edge = self.nmi_edge;
        self.nmi_edge = false;
        edge
    }

    fn irq(&mut self) -> bool {
        self.irq_line
    }

    fn take_int_delay(&mut self) -> bool {
        let request = self.int_delay_request;
        self.int_delay_request = false;
        request
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cartridge::{FlatRom, NoCartridge};

    fn test_bus() -> Bus {
        Bus::new(Box::new(NoCartridge), &EmulatorConfig::default()).unwrap()
    }

    // ========================================
    // Memory dispatch
    // ========================================

    #[test]
    fn test_wram_and_mirror() {
        let mut bus = test_bus();
        bus.write(0x7e_1234, 0x42);
        assert_eq!(bus.read(0x7e_1234), 0x42);
        bus.write(0x00_0123, 0x55);
        assert_eq!(bus.read(0x7e_0123), 0x55, "low 8 KiB mirrors into bank $7E");
        assert_eq!(bus.read(0x80_0123), 0x55, "mirror visible in bank $80");
        bus.write(0x7f_0000, 0x66);
        assert_eq!(bus.read(0x7f_0000), 0x66, "second WRAM bank is distinct");
        assert_ne!(bus.read(0x00_0000), 0x66);
    }

    #[test]
    fn test_open_bus_on_unmapped_reads() {
        let mut bus = test_bus();
        bus.write(0x00_0000, 0xab); // drives the data bus
        assert_eq!(bus.read(0x40_0000), 0xab, "unmapped cartridge is open bus");
        bus.read(0x00_0000);
        bus.write(0x00_0000, 0x12);
        assert_eq!(bus.read(0x00_5000), 0x12);
    }

    #[test]
    fn test_wmdata_port_autoincrements() {
        let mut bus = test_bus();
        // point the WRAM port at $10000 (bank $7F)
        bus.write(0x00_2181, 0x00);
        bus.write(0x00_2182, 0x00);
        bus.write(0x00_2183, 0x01);
        bus.write(0x00_2180, 0xaa);
        bus.write(0x00_2180, 0xbb);
        assert_eq!(bus.read(0x7f_0000), 0xaa);
        assert_eq!(bus.read(0x7f_0001), 0xbb);
        // pointer wraps within 17 bits
        bus.write(0x00_2181, 0xff);
        bus.write(0x00_2182, 0xff);
        bus.write(0x00_2183, 0x01);
        bus.write(0x00_2180, 0xcc);
        assert_eq!(bus.read(0x7f_ffff), 0xcc);
        bus.write(0x00_2180, 0xdd);
        assert_eq!(bus.read(0x7e_0000), 0xdd, "pointer wrapped to zero");
    }

    // ========================================
    // Math unit
    // ========================================

    #[test]
    fn test_multiplier() {
        let mut bus = test_bus();
        bus.write(0x00_4202, 0x12);
        bus.write(0x00_4203, 0x34);
        assert_eq!(bus.read(0x00_4216), 0x08, "0x12 * 0x34 = 0x03A8, low");
        assert_eq!(bus.read(0x00_4217), 0x03, "0x12 * 0x34 = 0x03A8, high");
    }

    #[test]
    fn test_divider() {
        let mut bus = test_bus();
        bus.write(0x00_4204, 0x00);
        bus.write(0x00_4205, 0x10);
        bus.write(0x00_4206, 0x05);
        assert_eq!(bus.read(0x00_4214), 0x33, "0x1000 / 5 = 0x0333");
        assert_eq!(bus.read(0x00_4215), 0x03);
        assert_eq!(bus.read(0x00_4216), 0x01, "remainder 1");
        assert_eq!(bus.read(0x00_4217), 0x00);
    }

    #[test]
    fn test_divide_by_zero() {
        let mut bus = test_bus();
        bus.write(0x00_4204, 0x00);
        bus.write(0x00_4205, 0x10);
        bus.write(0x00_4206, 0x00);
        assert_eq!(bus.read(0x00_4214), 0xff, "quotient forced to 0xFFFF");
        assert_eq!(bus.read(0x00_4215), 0xff);
        assert_eq!(bus.read(0x00_4216), 0x00, "remainder is the dividend");
        assert_eq!(bus.read(0x00_4217), 0x10);
    }

    // ========================================
    // Status registers
    // ========================================

    #[test]
    fn test_nmi_flag_cleared_on_read() {
        let mut bus = test_bus();
        bus.in_nmi = true;
        bus.open_bus = 0;
        let val = bus.read(0x00_4210);
        assert_eq!(val & 0x80, 0x80);
        assert_eq!(val & 0x0f, 0x2, "CPU version bits");
        let val = bus.read(0x00_4210);
        assert_eq!(val & 0x80, 0, "flag cleared by the first read");
    }

    #[test]
    fn test_hvbjoy_bits() {
        let mut bus = test_bus();
        assert_eq!(
            bus.read(0x00_4212) & 0x40,
            0x40,
            "hblank flag set at line start"
        );
        bus.in_vblank = true;
        assert_eq!(bus.read(0x00_4212) & 0x80, 0x80, "vblank flag");
    }

    #[test]
    fn test_raster_loop_advances() {
        let mut bus = test_bus();
        bus.run_cycles(1364 + 4); // one full line, plus the refresh stall
        assert_eq!(bus.v_pos, 1);
        assert!(bus.h_pos < 1368);
    }

    #[test]
    fn test_memsel_switches_rom_speed() {
        let mut bus = Bus::new(
            Box::new(FlatRom::new(vec![0xea; 0x8000])),
            &EmulatorConfig::default(),
        )
        .unwrap();
        assert_eq!(bus.access_table.get(0x80_8000), 8);
        bus.write(0x00_420d, 0x01);
        assert_eq!(bus.access_table.get(0x80_8000), 6);
        assert_eq!(bus.access_table.get(0x00_8000), 8, "banks below $80 stay slow");
    }
}
