// Emulator module - console facade
//
// Owns the CPU and the bus and exposes the frontend contract: reset,
// frame- and cycle-granular execution, input, frame readout and save
// states. The CPU drives the bus; everything else hangs off the bus.

pub mod config;
pub mod save_state;

use crate::bus::Bus;
use crate::cartridge::Cartridge;
use crate::cpu::Cpu;
use crate::memory_map::TableAllocError;
use config::EmulatorConfig;
use save_state::{SaveStateError, StateHandler, STATE_MAGIC, STATE_VERSION};

/// Console facade owning all components
pub struct Emulator {
    pub cpu: Cpu,
    pub bus: Bus,
}

impl Emulator {
    /// Create a console with the default (NTSC) configuration
    pub fn new(cart: Box<dyn Cartridge>) -> Result<Self, TableAllocError> {
        Self::with_config(cart, &EmulatorConfig::default())
    }

    pub fn with_config(
        cart: Box<dyn Cartridge>,
        config: &EmulatorConfig,
    ) -> Result<Self, TableAllocError> {
        Ok(Emulator {
            cpu: Cpu::new(),
            bus: Bus::new(cart, config)?,
        })
    }

    /// Reset the console; a hard reset clears RAM and the CPU registers
    pub fn reset(&mut self, hard: bool) {
        self.cpu.reset(hard);
        self.bus.reset(hard);
    }

    /// Run a single CPU opcode (or pending reset/interrupt sequence)
    pub fn step(&mut self) {
        self.cpu.step(&mut self.bus);
    }

    /// Run up to the next vblank-start transition
    pub fn run_frame(&mut self) {
        while self.bus.in_vblank {
            self.step();
        }
        let frame = self.bus.frames;
        while !self.bus.in_vblank && frame == self.bus.frames {
            self.step();
        }
    }

    /// Advance at least `cycles` master cycles
    pub fn run_cycles(&mut self, cycles: u64) {
        let target = self.bus.cycles + cycles;
        while self.bus.cycles < target {
            self.step();
        }
    }

    /// Compose the last finished frame into a 320x240 RGB565 buffer
    pub fn put_pixels(&self, dest: &mut [u8]) {
        self.bus.ppu.put_pixels(dest);
    }

    /// Update the button state of controller port 1 or 2
    pub fn set_buttons(&mut self, port: usize, state: u16) {
        if port == 0 {
            self.bus.input1.set_buttons(state);
        } else {
            self.bus.input2.set_buttons(state);
        }
    }

    /// Serialize the complete console state
    pub fn save_state(&mut self) -> Vec<u8> {
        let mut sh = StateHandler::for_save();
        self.handle_state(&mut sh);
        let mut data = Vec::from(STATE_MAGIC);
        data.extend_from_slice(&STATE_VERSION.to_le_bytes());
        data.extend_from_slice(&sh.finish_save());
        data
    }

    /// Restore a state produced by `save_state`
    pub fn load_state(&mut self, data: &[u8]) -> Result<(), SaveStateError> {
        if data.len() < 8 || data[0..4] != STATE_MAGIC {
            log::warn!("save state rejected: bad magic");
            return Err(SaveStateError::BadMagic);
        }
        let version = u32::from_le_bytes([data[4], data[5], data[6], data[7]]);
        if version != STATE_VERSION {
            log::warn!("save state rejected: version {}", version);
            return Err(SaveStateError::VersionMismatch {
                expected: STATE_VERSION,
                found: version,
            });
        }
        let mut sh = StateHandler::for_load(&data[8..]);
        self.handle_state(&mut sh);
        sh.finish_load()
    }

    fn handle_state(&mut self, sh: &mut StateHandler) {
        self.bus.handle_state(sh);
        self.cpu.handle_state(sh);
    }
}
