// SNES Emulator Library
// Cycle-accurate core: CPU, PPU and bus/timing co-simulation

// Public modules
pub mod apu;
pub mod bus;
pub mod cartridge;
pub mod cpu;
pub mod dma;
pub mod emulator;
pub mod input;
pub mod memory_map;
pub mod ppu;

// Re-export main types for convenience
pub use apu::{ApuPorts, AudioCoprocessor};
pub use bus::Bus;
pub use cartridge::{Cartridge, FlatRom, NoCartridge};
pub use cpu::{Cpu, CpuBus};
pub use dma::Dma;
pub use emulator::config::{ConfigError, EmulatorConfig, Region as VideoRegion};
pub use emulator::save_state::SaveStateError;
pub use emulator::Emulator;
pub use input::Controller;
pub use memory_map::{access_time, decode, AccessTimeTable, Region, TableAllocError};
pub use ppu::Ppu;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_library_components() {
        // Test that the core can be assembled from its parts
        let _cpu = Cpu::new();
        let _ppu = Ppu::new();
        let _dma = Dma::new();
        let _controller = Controller::new();
        let emulator = Emulator::new(Box::new(NoCartridge));
        assert!(emulator.is_ok());
    }
}
