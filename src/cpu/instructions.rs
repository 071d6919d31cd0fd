// Width-sensitive memory operand executors
//
// Each executor receives the (low, high) address pair its addressing mode
// produced and performs the documented cycle sequence for the current
// accumulator or index width, including the interrupt sample point.
// Decimal-mode ADC/SBC adjust nibble by nibble after a binary add, with
// the overflow flag computed from the pre-adjust result.

use super::{Cpu, CpuBus};

impl Cpu {
    pub(crate) fn op_and<B: CpuBus>(&mut self, bus: &mut B, low: u32, high: u32) {
        if self.mf {
            self.check_int();
            let value = self.read(bus, low) as u16;
            self.a = (self.a & 0xff00) | ((self.a & value) & 0xff);
        } else {
            let value = self.read_word(bus, low, high, true);
            self.a &= value;
        }
        let a = self.a;
        self.set_zn(a, self.mf);
    }

    pub(crate) fn op_ora<B: CpuBus>(&mut self, bus: &mut B, low: u32, high: u32) {
        if self.mf {
            self.check_int();
            let value = self.read(bus, low) as u16;
            self.a = (self.a & 0xff00) | ((self.a | value) & 0xff);
        } else {
            let value = self.read_word(bus, low, high, true);
            self.a |= value;
        }
        let a = self.a;
        self.set_zn(a, self.mf);
    }

    pub(crate) fn op_eor<B: CpuBus>(&mut self, bus: &mut B, low: u32, high: u32) {
        if self.mf {
            self.check_int();
            let value = self.read(bus, low) as u16;
            self.a = (self.a & 0xff00) | ((self.a ^ value) & 0xff);
        } else {
            let value = self.read_word(bus, low, high, true);
            self.a ^= value;
        }
        let a = self.a;
        self.set_zn(a, self.mf);
    }

    pub(crate) fn op_adc<B: CpuBus>(&mut self, bus: &mut B, low: u32, high: u32) {
        if self.mf {
            self.check_int();
            let value = self.read(bus, low) as i32;
            let a = self.a as i32;
            let mut result;
            if self.d {
                result = (a & 0xf) + (value & 0xf) + self.c as i32;
                if result > 0x9 {
                    result = ((result + 0x6) & 0xf) + 0x10;
                }
                result += (a & 0xf0) + (value & 0xf0);
            } else {
                result = (a & 0xff) + value + self.c as i32;
            }
            self.v = (a & 0x80) == (value & 0x80) && (value & 0x80) != (result & 0x80);
            if self.d && result > 0x9f {
                result += 0x60;
            }
            self.c = result > 0xff;
            self.a = (self.a & 0xff00) | (result as u16 & 0xff);
        } else {
            let value = self.read_word(bus, low, high, true) as i32;
            let a = self.a as i32;
            let mut result;
            if self.d {
                result = (a & 0xf) + (value & 0xf) + self.c as i32;
                if result > 0x9 {
                    result = ((result + 0x6) & 0xf) + 0x10;
                }
                result += (a & 0xf0) + (value & 0xf0);
                if result > 0x9f {
                    result = ((result + 0x60) & 0xff) + 0x100;
                }
                result += (a & 0xf00) + (value & 0xf00);
                if result > 0x9ff {
                    result = ((result + 0x600) & 0xfff) + 0x1000;
                }
                result += (a & 0xf000) + (value & 0xf000);
            } else {
                result = a + value + self.c as i32;
            }
            self.v = (a & 0x8000) == (value & 0x8000) && (value & 0x8000) != (result & 0x8000);
            if self.d && result > 0x9fff {
                result += 0x6000;
            }
            self.c = result > 0xffff;
            self.a = result as u16;
        }
        let a = self.a;
        self.set_zn(a, self.mf);
    }

    pub(crate) fn op_sbc<B: CpuBus>(&mut self, bus: &mut B, low: u32, high: u32) {
        if self.mf {
            self.check_int();
            let value = (self.read(bus, low) ^ 0xff) as i32;
            let a = self.a as i32;
            let mut result;
            if self.d {
                result = (a & 0xf) + (value & 0xf) + self.c as i32;
                if result < 0x10 {
                    result = (result - 0x6) & if result - 0x6 < 0 { 0xf } else { 0x1f };
                }
                result += (a & 0xf0) + (value & 0xf0);
            } else {
                result = (a & 0xff) + value + self.c as i32;
            }
            self.v = (a & 0x80) == (value & 0x80) && (value & 0x80) != (result & 0x80);
            if self.d && result < 0x100 {
                result -= 0x60;
            }
            self.c = result > 0xff;
            self.a = (self.a & 0xff00) | (result as u16 & 0xff);
        } else {
            let value = (self.read_word(bus, low, high, true) ^ 0xffff) as i32;
            let a = self.a as i32;
            let mut result;
            if self.d {
                result = (a & 0xf) + (value & 0xf) + self.c as i32;
                if result < 0x10 {
                    result = (result - 0x6) & if result - 0x6 < 0 { 0xf } else { 0x1f };
                }
                result += (a & 0xf0) + (value & 0xf0);
                if result < 0x100 {
                    result = (result - 0x60) & if result - 0x60 < 0 { 0xff } else { 0x1ff };
                }
                result += (a & 0xf00) + (value & 0xf00);
                if result < 0x1000 {
                    result = (result - 0x600) & if result - 0x600 < 0 { 0xfff } else { 0x1fff };
                }
                result += (a & 0xf000) + (value & 0xf000);
            } else {
                result = a + value + self.c as i32;
            }
            self.v = (a & 0x8000) == (value & 0x8000) && (value & 0x8000) != (result & 0x8000);
            if self.d && result < 0x10000 {
                result -= 0x6000;
            }
            self.c = result > 0xffff;
            self.a = result as u16;
        }
        let a = self.a;
        self.set_zn(a, self.mf);
    }

    pub(crate) fn op_cmp<B: CpuBus>(&mut self, bus: &mut B, low: u32, high: u32) {
        let result;
        if self.mf {
            self.check_int();
            let value = (self.read(bus, low) ^ 0xff) as i32;
            result = (self.a as i32 & 0xff) + value + 1;
            self.c = result > 0xff;
        } else {
            let value = (self.read_word(bus, low, high, true) ^ 0xffff) as i32;
            result = self.a as i32 + value + 1;
            self.c = result > 0xffff;
        }
        self.set_zn(result as u16, self.mf);
    }

    pub(crate) fn op_cpx<B: CpuBus>(&mut self, bus: &mut B, low: u32, high: u32) {
        let result;
        if self.xf {
            self.check_int();
            let value = (self.read(bus, low) ^ 0xff) as i32;
            result = (self.x as i32 & 0xff) + value + 1;
            self.c = result > 0xff;
        } else {
            let value = (self.read_word(bus, low, high, true) ^ 0xffff) as i32;
            result = self.x as i32 + value + 1;
            self.c = result > 0xffff;
        }
        self.set_zn(result as u16, self.xf);
    }

    pub(crate) fn op_cpy<B: CpuBus>(&mut self, bus: &mut B, low: u32, high: u32) {
        let result;
        if self.xf {
            self.check_int();
            let value = (self.read(bus, low) ^ 0xff) as i32;
            result = (self.y as i32 & 0xff) + value + 1;
            self.c = result > 0xff;
        } else {
            let value = (self.read_word(bus, low, high, true) ^ 0xffff) as i32;
            result = self.y as i32 + value + 1;
            self.c = result > 0xffff;
        }
        self.set_zn(result as u16, self.xf);
    }

    pub(crate) fn op_bit<B: CpuBus>(&mut self, bus: &mut B, low: u32, high: u32) {
        if self.mf {
            self.check_int();
            let value = self.read(bus, low);
            let result = (self.a as u8) & value;
            self.z = result == 0;
            self.n = value & 0x80 != 0;
            self.v = value & 0x40 != 0;
        } else {
            let value = self.read_word(bus, low, high, true);
            let result = self.a & value;
            self.z = result == 0;
            self.n = value & 0x8000 != 0;
            self.v = value & 0x4000 != 0;
        }
    }

    pub(crate) fn op_lda<B: CpuBus>(&mut self, bus: &mut B, low: u32, high: u32) {
        if self.mf {
            self.check_int();
            self.a = (self.a & 0xff00) | self.read(bus, low) as u16;
        } else {
            self.a = self.read_word(bus, low, high, true);
        }
        let a = self.a;
        self.set_zn(a, self.mf);
    }

    pub(crate) fn op_ldx<B: CpuBus>(&mut self, bus: &mut B, low: u32, high: u32) {
        if self.xf {
            self.check_int();
            self.x = self.read(bus, low) as u16;
        } else {
            self.x = self.read_word(bus, low, high, true);
        }
        let x = self.x;
        self.set_zn(x, self.xf);
    }

    pub(crate) fn op_ldy<B: CpuBus>(&mut self, bus: &mut B, low: u32, high: u32) {
        if self.xf {
            self.check_int();
            self.y = self.read(bus, low) as u16;
        } else {
            self.y = self.read_word(bus, low, high, true);
        }
        let y = self.y;
        self.set_zn(y, self.xf);
    }

    pub(crate) fn op_sta<B: CpuBus>(&mut self, bus: &mut B, low: u32, high: u32) {
        if self.mf {
            self.check_int();
            let a = self.a as u8;
            self.write(bus, low, a);
        } else {
            let a = self.a;
            self.write_word(bus, low, high, a, false, true);
        }
    }

    pub(crate) fn op_stx<B: CpuBus>(&mut self, bus: &mut B, low: u32, high: u32) {
        if self.xf {
            self.check_int();
            let x = self.x as u8;
            self.write(bus, low, x);
        } else {
            let x = self.x;
            self.write_word(bus, low, high, x, false, true);
        }
    }

    pub(crate) fn op_sty<B: CpuBus>(&mut self, bus: &mut B, low: u32, high: u32) {
        if self.xf {
            self.check_int();
            let y = self.y as u8;
            self.write(bus, low, y);
        } else {
            let y = self.y;
            self.write_word(bus, low, high, y, false, true);
        }
    }

    pub(crate) fn op_stz<B: CpuBus>(&mut self, bus: &mut B, low: u32, high: u32) {
        if self.mf {
            self.check_int();
            self.write(bus, low, 0);
        } else {
            self.write_word(bus, low, high, 0, false, true);
        }
    }

    pub(crate) fn op_ror<B: CpuBus>(&mut self, bus: &mut B, low: u32, high: u32) {
        let carry;
        let result;
        if self.mf {
            let value = self.read(bus, low);
            self.idle(bus);
            carry = value & 1 != 0;
            result = ((value >> 1) | (self.c as u8) << 7) as u16;
            self.check_int();
            self.write(bus, low, result as u8);
        } else {
            let value = self.read_word(bus, low, high, false);
            self.idle(bus);
            carry = value & 1 != 0;
            result = (value >> 1) | (self.c as u16) << 15;
            self.write_word(bus, low, high, result, true, true);
        }
        self.set_zn(result, self.mf);
        self.c = carry;
    }

    pub(crate) fn op_rol<B: CpuBus>(&mut self, bus: &mut B, low: u32, high: u32) {
        let result;
        if self.mf {
            let value = ((self.read(bus, low) as u32) << 1) | self.c as u32;
            self.idle(bus);
            self.c = value & 0x100 != 0;
            result = value as u16 & 0xff;
            self.check_int();
            self.write(bus, low, result as u8);
        } else {
            let value = ((self.read_word(bus, low, high, false) as u32) << 1) | self.c as u32;
            self.idle(bus);
            self.c = value & 0x10000 != 0;
            result = value as u16;
            self.write_word(bus, low, high, result, true, true);
        }
        self.set_zn(result, self.mf);
    }

    pub(crate) fn op_lsr<B: CpuBus>(&mut self, bus: &mut B, low: u32, high: u32) {
        let result;
        if self.mf {
            let value = self.read(bus, low);
            self.idle(bus);
            self.c = value & 1 != 0;
            result = (value >> 1) as u16;
            self.check_int();
            self.write(bus, low, result as u8);
        } else {
            let value = self.read_word(bus, low, high, false);
            self.idle(bus);
            self.c = value & 1 != 0;
            result = value >> 1;
            self.write_word(bus, low, high, result, true, true);
        }
        self.set_zn(result, self.mf);
    }

    pub(crate) fn op_asl<B: CpuBus>(&mut self, bus: &mut B, low: u32, high: u32) {
        let result;
        if self.mf {
            let value = (self.read(bus, low) as u32) << 1;
            self.idle(bus);
            self.c = value & 0x100 != 0;
            result = value as u16 & 0xff;
            self.check_int();
            self.write(bus, low, result as u8);
        } else {
            let value = (self.read_word(bus, low, high, false) as u32) << 1;
            self.idle(bus);
            self.c = value & 0x10000 != 0;
            result = value as u16;
            self.write_word(bus, low, high, result, true, true);
        }
        self.set_zn(result, self.mf);
    }

    pub(crate) fn op_inc<B: CpuBus>(&mut self, bus: &mut B, low: u32, high: u32) {
        let result;
        if self.mf {
            result = (self.read(bus, low).wrapping_add(1)) as u16;
            self.idle(bus);
            self.check_int();
            self.write(bus, low, result as u8);
        } else {
            result = self.read_word(bus, low, high, false).wrapping_add(1);
            self.idle(bus);
            self.write_word(bus, low, high, result, true, true);
        }
        self.set_zn(result, self.mf);
    }

    pub(crate) fn op_dec<B: CpuBus>(&mut self, bus: &mut B, low: u32, high: u32) {
        let result;
        if self.mf {
            result = (self.read(bus, low).wrapping_sub(1)) as u16;
            self.idle(bus);
            self.check_int();
            self.write(bus, low, result as u8);
        } else {
            result = self.read_word(bus, low, high, false).wrapping_sub(1);
            self.idle(bus);
            self.write_word(bus, low, high, result, true, true);
        }
        self.set_zn(result, self.mf);
    }

    pub(crate) fn op_tsb<B: CpuBus>(&mut self, bus: &mut B, low: u32, high: u32) {
        if self.mf {
            let value = self.read(bus, low);
            self.idle(bus);
            self.z = (self.a as u8) & value == 0;
            self.check_int();
            let a = self.a as u8;
            self.write(bus, low, value | a);
        } else {
            let value = self.read_word(bus, low, high, false);
            self.idle(bus);
            self.z = self.a & value == 0;
            let a = self.a;
            self.write_word(bus, low, high, value | a, true, true);
        }
    }

    pub(crate) fn op_trb<B: CpuBus>(&mut self, bus: &mut B, low: u32, high: u32) {
        if self.mf {
            let value = self.read(bus, low);
            self.idle(bus);
            self.z = (self.a as u8) & value == 0;
            self.check_int();
            let a = self.a as u8;
            self.write(bus, low, value & !a);
        } else {
            let value = self.read_word(bus, low, high, false);
            self.idle(bus);
            self.z = self.a & value == 0;
            let a = self.a;
            self.write_word(bus, low, high, value & !a, true, true);
        }
    }
}
