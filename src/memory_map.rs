// Memory map decoder - 24-bit address decoding and access timing
//
// The CPU sees a 24-bit address space of 256 banks x 64 KiB. System banks
// ($00-$3F and $80-$BF) overlay work RAM, PPU/APU registers, internal
// registers and DMA registers on the low half; everything else belongs to
// the cartridge.
//
// # System bank layout ($00-$3F / $80-$BF)
//
// ```text
// $0000-$1FFF: Work RAM mirror (low 8 KiB)           8 cycles
// $2100-$21FF: PPU/APU "B-bus" registers             6 cycles
// $4016-$4017: Legacy controller ports               6 cycles
// $4200-$421F: Internal registers                    6 cycles
// $4300-$437F: DMA channel registers                 6 cycles
// $4000-$41FF: Slow I/O                             12 cycles
// $6000-$7FFF: Cartridge SRAM region                 8 cycles
// $8000-$FFFF: Cartridge ROM                       6/8 cycles
// ```
//
// Banks $7E-$7F map the full 128 KiB work RAM. Banks $40-$7D and $C0-$FF
// are cartridge-only; the mapper is authoritative there. ROM accesses in
// banks $80+ take 6 cycles instead of 8 when the MEMSEL fast-ROM bit is
// set.

use std::collections::TryReserveError;
use std::fmt;

/// Size of the work RAM in bytes (128 KiB)
pub const WRAM_SIZE: usize = 0x2_0000;

/// Decoded target of a 24-bit bus address
///
/// `decode` is a pure function; reading or writing the decoded region is
/// the bus controller's job.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Region {
    /// Banks $7E-$7F: work RAM, 17-bit offset
    Wram { adr: u32 },
    /// System banks $0000-$1FFF: mirror of the low 8 KiB of work RAM
    WramMirror { adr: u16 },
    /// System banks $2100-$21FF: B-bus port (low byte of the address)
    BBus { port: u8 },
    /// System banks $4016-$4017: legacy serial controller ports
    JoypadPort { adr: u16 },
    /// System banks $4200-$421F: internal bus registers
    Internal { adr: u16 },
    /// System banks $4300-$437F: DMA channel registers
    DmaRegs { adr: u16 },
    /// Everything else: the cartridge decides (or open bus)
    Cartridge { bank: u8, adr: u16 },
}

/// Decode a 24-bit address into the region it targets
///
/// Pure and side-effect free; callable from both the data path and the
/// timing path.
pub fn decode(adr: u32) -> Region {
    let bank = (adr >> 16) as u8;
    let offset = (adr & 0xffff) as u16;
    if bank == 0x7e || bank == 0x7f {
        return Region::Wram {
            adr: ((bank as u32 & 1) << 16) | offset as u32,
        };
    }
    if bank < 0x40 || (0x80..0xc0).contains(&bank) {
        if offset < 0x2000 {
            return Region::WramMirror { adr: offset };
        }
        if (0x2100..0x2200).contains(&offset) {
            return Region::BBus {
                port: (offset & 0xff) as u8,
            };
        }
        if offset == 0x4016 || offset == 0x4017 {
            return Region::JoypadPort { adr: offset };
        }
        if (0x4200..0x4220).contains(&offset) {
            return Region::Internal { adr: offset };
        }
        if (0x4300..0x4380).contains(&offset) {
            return Region::DmaRegs { adr: offset };
        }
    }
    Region::Cartridge { bank, adr: offset }
}

/// Master-cycle cost of one access to `adr`
///
/// Pure function; the pre-baked table below is observably equivalent.
pub fn access_time(adr: u32, fast_mem: bool) -> u8 {
    let bank = (adr >> 16) as u8;
    let offset = (adr & 0xffff) as u16;
    if (bank < 0x40 || (0x80..0xc0).contains(&bank)) && offset < 0x8000 {
        // $00-$3F,$80-$BF:$0000-$7FFF
        if offset < 0x2000 || offset >= 0x6000 {
            return 8; // WRAM mirror and SRAM region
        }
        if offset < 0x4000 || offset >= 0x4200 {
            return 6; // B-bus and internal registers
        }
        return 12; // $4000-$41FF slow I/O
    }
    // $40-$7F,$C0-$FF:$0000-$FFFF and $00-$3F,$80-$BF:$8000-$FFFF
    if fast_mem && bank >= 0x80 {
        6
    } else {
        8
    }
}

/// Failure to allocate the pre-baked access-time table
///
/// The only host-side allocation in the core that is surfaced to the
/// caller instead of aborting.
#[derive(Debug)]
pub struct TableAllocError(TryReserveError);

impl fmt::Display for TableAllocError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "failed to allocate access-time table: {}", self.0)
    }
}

impl std::error::Error for TableAllocError {}

impl From<TryReserveError> for TableAllocError {
    fn from(e: TryReserveError) -> Self {
        TableAllocError(e)
    }
}

/// Pre-baked per-address access times for the whole 16 MiB address space
///
/// Baked once at reset; only the fast-ROM half (banks $80-$FF) depends on
/// the MEMSEL bit, so that half is re-baked when the bit changes.
pub struct AccessTimeTable {
    table: Vec<u8>,
}

impl AccessTimeTable {
    /// Build the full table for the given MEMSEL state
    pub fn build(fast_mem: bool) -> Result<Self, TableAllocError> {
        let mut table = Vec::new();
        table.try_reserve_exact(0x100_0000)?;
        for adr in 0..0x100_0000u32 {
            table.push(access_time(adr, fast_mem));
        }
        Ok(AccessTimeTable { table })
    }

    /// Re-bake the MEMSEL-dependent half (banks $80-$FF)
    pub fn rebake_fast_region(&mut self, fast_mem: bool) {
        for adr in 0x80_0000..0x100_0000u32 {
            self.table[adr as usize] = access_time(adr, fast_mem);
        }
    }

    /// Look up the access time for a 24-bit address
    #[inline]
    pub fn get(&self, adr: u32) -> u8 {
        self.table[(adr & 0xff_ffff) as usize]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wram_banks_decode_directly() {
        assert_eq!(decode(0x7e_0000), Region::Wram { adr: 0x0_0000 });
        assert_eq!(decode(0x7f_ffff), Region::Wram { adr: 0x1_ffff });
        assert_eq!(decode(0x7e_2100), Region::Wram { adr: 0x0_2100 });
    }

    #[test]
    fn test_system_bank_regions() {
        assert_eq!(decode(0x00_0000), Region::WramMirror { adr: 0 });
        assert_eq!(decode(0x80_1fff), Region::WramMirror { adr: 0x1fff });
        assert_eq!(decode(0x00_2100), Region::BBus { port: 0x00 });
        assert_eq!(decode(0xbf_2180), Region::BBus { port: 0x80 });
        assert_eq!(decode(0x00_4016), Region::JoypadPort { adr: 0x4016 });
        assert_eq!(decode(0x00_4210), Region::Internal { adr: 0x4210 });
        assert_eq!(decode(0x00_4300), Region::DmaRegs { adr: 0x4300 });
        assert_eq!(
            decode(0x00_8000),
            Region::Cartridge {
                bank: 0,
                adr: 0x8000
            }
        );
        // unhandled system-bank offsets fall through to the cartridge
        assert_eq!(
            decode(0x00_3000),
            Region::Cartridge {
                bank: 0,
                adr: 0x3000
            }
        );
    }

    #[test]
    fn test_cartridge_only_banks() {
        assert_eq!(
            decode(0x40_0000),
            Region::Cartridge { bank: 0x40, adr: 0 }
        );
        assert_eq!(
            decode(0xc0_2100),
            Region::Cartridge {
                bank: 0xc0,
                adr: 0x2100
            }
        );
    }

    #[test]
    fn test_access_times() {
        assert_eq!(access_time(0x00_0000, false), 8, "WRAM mirror");
        assert_eq!(access_time(0x00_2100, false), 6, "B-bus");
        assert_eq!(access_time(0x00_4100, false), 12, "slow I/O");
        assert_eq!(access_time(0x00_4210, false), 6, "internal registers");
        assert_eq!(access_time(0x00_6000, false), 8, "SRAM region");
        assert_eq!(access_time(0x00_8000, false), 8, "ROM, slow");
        assert_eq!(access_time(0x7e_1234, false), 8, "WRAM");
        assert_eq!(access_time(0x40_0000, false), 8, "cartridge bank");
    }

    #[test]
    fn test_fast_rom_only_affects_upper_banks() {
        assert_eq!(access_time(0x80_8000, true), 6);
        assert_eq!(access_time(0x80_8000, false), 8);
        assert_eq!(access_time(0x00_8000, true), 8, "banks below $80 stay slow");
        assert_eq!(access_time(0xc0_0000, true), 6);
    }

    #[test]
    fn test_table_matches_pure_function() {
        let mut table = AccessTimeTable::build(false).unwrap();
        for &adr in &[0x00_0000, 0x00_2100, 0x00_4100, 0x00_8000, 0x7e_0000, 0xff_ffff] {
            assert_eq!(table.get(adr), access_time(adr, false), "adr {:06x}", adr);
        }
        table.rebake_fast_region(true);
        for &adr in &[0x80_8000, 0xc0_0000, 0xff_ffff] {
            assert_eq!(table.get(adr), access_time(adr, true), "adr {:06x}", adr);
        }
        // lower half untouched by the re-bake
        assert_eq!(table.get(0x00_8000), access_time(0x00_8000, false));
    }
}
