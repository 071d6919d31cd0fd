// Opcode dispatch
//
// One match arm per opcode byte, fetching operands through the addressing
// helpers and delegating memory operands to the executors in
// `instructions`. Cycle sequences and `check_int` placement follow the
// documented behaviour of each opcode; transfers, flag operations and the
// accumulator variants of the shift group run inline.

use super::{vectors, Cpu, CpuBus};

impl Cpu {
    #[allow(clippy::too_many_lines)]
    pub(crate) fn do_opcode<B: CpuBus>(&mut self, bus: &mut B, opcode: u8) {
        match opcode {
            0x00 => {
                // brk imm(s)
                let vector = if self.e { vectors::EMU_IRQ } else { vectors::BRK };
                self.read_opcode(bus);
                if !self.e {
                    let k = self.k;
                    self.push_byte(bus, k);
                }
                let pc = self.pc;
                self.push_word(bus, pc, false);
                let flags = self.get_flags();
                self.push_byte(bus, flags);
                self.i = true;
                self.d = false;
                self.k = 0;
                self.pc = self.read_word(bus, vector, vector + 1, true);
            }
            0x01 => {
                // ora idx
                let (low, high) = self.adr_idx(bus);
                self.op_ora(bus, low, high);
            }
            0x02 => {
                // cop imm(s)
                let vector = if self.e { vectors::EMU_COP } else { vectors::COP };
                self.read_opcode(bus);
                if !self.e {
                    let k = self.k;
                    self.push_byte(bus, k);
                }
                let pc = self.pc;
                self.push_word(bus, pc, false);
                let flags = self.get_flags();
                self.push_byte(bus, flags);
                self.i = true;
                self.d = false;
                self.k = 0;
                self.pc = self.read_word(bus, vector, vector + 1, true);
            }
            0x03 => {
                // ora sr
                let (low, high) = self.adr_sr(bus);
                self.op_ora(bus, low, high);
            }
            0x04 => {
                // tsb dp
                let (low, high) = self.adr_dp(bus);
                self.op_tsb(bus, low, high);
            }
            0x05 => {
                // ora dp
                let (low, high) = self.adr_dp(bus);
                self.op_ora(bus, low, high);
            }
            0x06 => {
                // asl dp
                let (low, high) = self.adr_dp(bus);
                self.op_asl(bus, low, high);
            }
            0x07 => {
                // ora idl
                let (low, high) = self.adr_idl(bus);
                self.op_ora(bus, low, high);
            }
            0x08 => {
                // php imp
                self.idle(bus);
                self.check_int();
                let flags = self.get_flags();
                self.push_byte(bus, flags);
            }
            0x09 => {
                // ora imm(m)
                let (low, high) = self.adr_imm(false);
                self.op_ora(bus, low, high);
            }
            0x0a => {
                // asla imp
                self.adr_imp(bus);
                if self.mf {
                    self.c = self.a & 0x80 != 0;
                    self.a = (self.a & 0xff00) | ((self.a << 1) & 0xff);
                } else {
                    self.c = self.a & 0x8000 != 0;
                    self.a <<= 1;
                }
                let a = self.a;
                self.set_zn(a, self.mf);
            }
            0x0b => {
                // phd imp
                self.idle(bus);
                let dp = self.dp;
                self.push_word(bus, dp, true);
            }
            0x0c => {
                // tsb abs
                let (low, high) = self.adr_abs(bus);
                self.op_tsb(bus, low, high);
            }
            0x0d => {
                // ora abs
                let (low, high) = self.adr_abs(bus);
                self.op_ora(bus, low, high);
            }
            0x0e => {
                // asl abs
                let (low, high) = self.adr_abs(bus);
                self.op_asl(bus, low, high);
            }
            0x0f => {
                // ora abl
                let (low, high) = self.adr_abl(bus);
                self.op_ora(bus, low, high);
            }
            0x10 => {
                // bpl rel
                let cond = !self.n;
                self.do_branch(bus, cond);
            }
            0x11 => {
                // ora idy(r)
                let (low, high) = self.adr_idy(bus, false);
                self.op_ora(bus, low, high);
            }
            0x12 => {
                // ora idp
                let (low, high) = self.adr_idp(bus);
                self.op_ora(bus, low, high);
            }
            0x13 => {
                // ora isy
                let (low, high) = self.adr_isy(bus);
                self.op_ora(bus, low, high);
            }
            0x14 => {
                // trb dp
                let (low, high) = self.adr_dp(bus);
                self.op_trb(bus, low, high);
            }
            0x15 => {
                // ora dpx
                let (low, high) = self.adr_dpx(bus);
                self.op_ora(bus, low, high);
            }
            0x16 => {
                // asl dpx
                let (low, high) = self.adr_dpx(bus);
                self.op_asl(bus, low, high);
            }
            0x17 => {
                // ora ily
                let (low, high) = self.adr_ily(bus);
                self.op_ora(bus, low, high);
            }
            0x18 => {
                // clc imp
                self.adr_imp(bus);
                self.c = false;
            }
            0x19 => {
                // ora aby(r)
                let (low, high) = self.adr_aby(bus, false);
                self.op_ora(bus, low, high);
            }
            0x1a => {
                // inca imp
                self.adr_imp(bus);
                if self.mf {
                    self.a = (self.a & 0xff00) | (self.a.wrapping_add(1) & 0xff);
                } else {
                    self.a = self.a.wrapping_add(1);
                }
                let a = self.a;
                self.set_zn(a, self.mf);
            }
            0x1b => {
                // tcs imp
                self.adr_imp(bus);
                self.sp = if self.e { (self.a & 0xff) | 0x100 } else { self.a };
            }
            0x1c => {
                // trb abs
                let (low, high) = self.adr_abs(bus);
                self.op_trb(bus, low, high);
            }
            0x1d => {
                // ora abx(r)
                let (low, high) = self.adr_abx(bus, false);
                self.op_ora(bus, low, high);
            }
            0x1e => {
                // asl abx
                let (low, high) = self.adr_abx(bus, true);
                self.op_asl(bus, low, high);
            }
            0x1f => {
                // ora alx
                let (low, high) = self.adr_alx(bus);
                self.op_ora(bus, low, high);
            }
            0x20 => {
                // jsr abs
                let value = self.read_opcode_word(bus, false);
                self.idle(bus);
                let ret = self.pc.wrapping_sub(1);
                self.push_word(bus, ret, true);
                self.pc = value;
            }
            0x21 => {
                // and idx
                let (low, high) = self.adr_idx(bus);
                self.op_and(bus, low, high);
            }
            0x22 => {
                // jsl abl
                let value = self.read_opcode_word(bus, false);
                let k = self.k;
                self.push_byte(bus, k);
                self.idle(bus);
                let new_k = self.read_opcode(bus);
                let ret = self.pc.wrapping_sub(1);
                self.push_word(bus, ret, true);
                self.pc = value;
                self.k = new_k;
            }
            0x23 => {
                // and sr
                let (low, high) = self.adr_sr(bus);
                self.op_and(bus, low, high);
            }
            0x24 => {
                // bit dp
                let (low, high) = self.adr_dp(bus);
                self.op_bit(bus, low, high);
            }
            0x25 => {
                // and dp
                let (low, high) = self.adr_dp(bus);
                self.op_and(bus, low, high);
            }
            0x26 => {
                // rol dp
                let (low, high) = self.adr_dp(bus);
                self.op_rol(bus, low, high);
            }
            0x27 => {
                // and idl
                let (low, high) = self.adr_idl(bus);
                self.op_and(bus, low, high);
            }
            0x28 => {
                // plp imp
                self.idle(bus);
                self.idle(bus);
                self.check_int();
                let flags = self.pull_byte(bus);
                self.set_flags(flags);
            }
            0x29 => {
                // and imm(m)
                let (low, high) = self.adr_imm(false);
                self.op_and(bus, low, high);
            }
            0x2a => {
                // rola imp
                self.adr_imp(bus);
                let result = ((self.a as u32) << 1) | self.c as u32;
                if self.mf {
                    self.c = result & 0x100 != 0;
                    self.a = (self.a & 0xff00) | (result as u16 & 0xff);
                } else {
                    self.c = result & 0x10000 != 0;
                    self.a = result as u16;
                }
                let a = self.a;
                self.set_zn(a, self.mf);
            }
            0x2b => {
                // pld imp
                self.idle(bus);
                self.idle(bus);
                self.dp = self.pull_word(bus, true);
                let dp = self.dp;
                self.set_zn(dp, false);
            }
            0x2c => {
                // bit abs
                let (low, high) = self.adr_abs(bus);
                self.op_bit(bus, low, high);
            }
            0x2d => {
                // and abs
                let (low, high) = self.adr_abs(bus);
                self.op_and(bus, low, high);
            }
            0x2e => {
                // rol abs
                let (low, high) = self.adr_abs(bus);
                self.op_rol(bus, low, high);
            }
            0x2f => {
                // and abl
                let (low, high) = self.adr_abl(bus);
                self.op_and(bus, low, high);
            }
            0x30 => {
                // bmi rel
                let cond = self.n;
                self.do_branch(bus, cond);
            }
            0x31 => {
                // and idy(r)
                let (low, high) = self.adr_idy(bus, false);
                self.op_and(bus, low, high);
            }
            0x32 => {
                // and idp
                let (low, high) = self.adr_idp(bus);
                self.op_and(bus, low, high);
            }
            0x33 => {
                // and isy
                let (low, high) = self.adr_isy(bus);
                self.op_and(bus, low, high);
            }
            0x34 => {
                // bit dpx
                let (low, high) = self.adr_dpx(bus);
                self.op_bit(bus, low, high);
            }
            0x35 => {
                // and dpx
                let (low, high) = self.adr_dpx(bus);
                self.op_and(bus, low, high);
            }
            0x36 => {
                // rol dpx
                let (low, high) = self.adr_dpx(bus);
                self.op_rol(bus, low, high);
            }
            0x37 => {
                // and ily
                let (low, high) = self.adr_ily(bus);
                self.op_and(bus, low, high);
            }
            0x38 => {
                // sec imp
                self.adr_imp(bus);
                self.c = true;
            }
            0x39 => {
                // and aby(r)
                let (low, high) = self.adr_aby(bus, false);
                self.op_and(bus, low, high);
            }
            0x3a => {
                // deca imp
                self.adr_imp(bus);
                if self.mf {
                    self.a = (self.a & 0xff00) | (self.a.wrapping_sub(1) & 0xff);
                } else {
                    self.a = self.a.wrapping_sub(1);
                }
                let a = self.a;
                self.set_zn(a, self.mf);
            }
            0x3b => {
                // tsc imp
                self.adr_imp(bus);
                self.a = self.sp;
                let a = self.a;
                self.set_zn(a, false);
            }
            0x3c => {
                // bit abx(r)
                let (low, high) = self.adr_abx(bus, false);
                self.op_bit(bus, low, high);
            }
            0x3d => {
                // and abx(r)
                let (low, high) = self.adr_abx(bus, false);
                self.op_and(bus, low, high);
            }
            0x3e => {
                // rol abx
                let (low, high) = self.adr_abx(bus, true);
                self.op_rol(bus, low, high);
            }
            0x3f => {
                // and alx
                let (low, high) = self.adr_alx(bus);
                self.op_and(bus, low, high);
            }
            0x40 => {
                // rti imp
                self.idle(bus);
                self.idle(bus);
                let flags = self.pull_byte(bus);
                self.set_flags(flags);
                if self.e {
                    self.pc = self.pull_word(bus, true);
                } else {
                    self.pc = self.pull_word(bus, false);
                    self.check_int();
                    self.k = self.pull_byte(bus);
                }
            }
            0x41 => {
                // eor idx
                let (low, high) = self.adr_idx(bus);
                self.op_eor(bus, low, high);
            }
            0x42 => {
                // wdm imm(s)
                self.check_int();
                self.read_opcode(bus);
            }
            0x43 => {
                // eor sr
                let (low, high) = self.adr_sr(bus);
                self.op_eor(bus, low, high);
            }
            0x44 => {
                // mvp bm
                let dest = self.read_opcode(bus);
                let src = self.read_opcode(bus);
                self.db = dest;
                let value = self.read(bus, (src as u32) << 16 | self.x as u32);
                self.write(bus, (dest as u32) << 16 | self.y as u32, value);
                self.a = self.a.wrapping_sub(1);
                self.x = self.x.wrapping_sub(1);
                self.y = self.y.wrapping_sub(1);
                if self.a != 0xffff {
                    self.pc = self.pc.wrapping_sub(3);
                }
                if self.xf {
                    self.x &= 0xff;
                    self.y &= 0xff;
                }
                self.idle(bus);
                self.check_int();
                self.idle(bus);
            }
            0x45 => {
                // eor dp
                let (low, high) = self.adr_dp(bus);
                self.op_eor(bus, low, high);
            }
            0x46 => {
                // lsr dp
                let (low, high) = self.adr_dp(bus);
                self.op_lsr(bus, low, high);
            }
            0x47 => {
                // eor idl
                let (low, high) = self.adr_idl(bus);
                self.op_eor(bus, low, high);
            }
            0x48 => {
                // pha imp
                self.idle(bus);
                if self.mf {
                    self.check_int();
                    let a = self.a as u8;
                    self.push_byte(bus, a);
                } else {
                    let a = self.a;
                    self.push_word(bus, a, true);
                }
            }
            0x49 => {
                // eor imm(m)
                let (low, high) = self.adr_imm(false);
                self.op_eor(bus, low, high);
            }
            0x4a => {
                // lsra imp
                self.adr_imp(bus);
                self.c = self.a & 1 != 0;
                if self.mf {
                    self.a = (self.a & 0xff00) | ((self.a >> 1) & 0x7f);
                } else {
                    self.a >>= 1;
                }
                let a = self.a;
                self.set_zn(a, self.mf);
            }
            0x4b => {
                // phk imp
                self.idle(bus);
                self.check_int();
                let k = self.k;
                self.push_byte(bus, k);
            }
            0x4c => {
                // jmp abs
                self.pc = self.read_opcode_word(bus, true);
            }
            0x4d => {
                // eor abs
                let (low, high) = self.adr_abs(bus);
                self.op_eor(bus, low, high);
            }
            0x4e => {
                // lsr abs
                let (low, high) = self.adr_abs(bus);
                self.op_lsr(bus, low, high);
            }
            0x4f => {
                // eor abl
                let (low, high) = self.adr_abl(bus);
                self.op_eor(bus, low, high);
            }
            0x50 => {
                // bvc rel
                let cond = !self.v;
                self.do_branch(bus, cond);
            }
            0x51 => {
                // eor idy(r)
                let (low, high) = self.adr_idy(bus, false);
                self.op_eor(bus, low, high);
            }
            0x52 => {
                // eor idp
                let (low, high) = self.adr_idp(bus);
                self.op_eor(bus, low, high);
            }
            0x53 => {
                // eor isy
                let (low, high) = self.adr_isy(bus);
                self.op_eor(bus, low, high);
            }
            0x54 => {
                // mvn bm
                let dest = self.read_opcode(bus);
                let src = self.read_opcode(bus);
                self.db = dest;
                let value = self.read(bus, (src as u32) << 16 | self.x as u32);
                self.write(bus, (dest as u32) << 16 | self.y as u32, value);
                self.a = self.a.wrapping_sub(1);
                self.x = self.x.wrapping_add(1);
                self.y = self.y.wrapping_add(1);
                if self.a != 0xffff {
                    self.pc = self.pc.wrapping_sub(3);
                }
                if self.xf {
                    self.x &= 0xff;
                    self.y &= 0xff;
                }
                self.idle(bus);
                self.check_int();
                self.idle(bus);
            }
            0x55 => {
                // eor dpx
                let (low, high) = self.adr_dpx(bus);
                self.op_eor(bus, low, high);
            }
            0x56 => {
                // lsr dpx
                let (low, high) = self.adr_dpx(bus);
                self.op_lsr(bus, low, high);
            }
            0x57 => {
                // eor ily
                let (low, high) = self.adr_ily(bus);
                self.op_eor(bus, low, high);
            }
            0x58 => {
                // cli imp
                self.adr_imp(bus);
                self.i = false;
            }
            0x59 => {
                // eor aby(r)
                let (low, high) = self.adr_aby(bus, false);
                self.op_eor(bus, low, high);
            }
            0x5a => {
                // phy imp
                self.idle(bus);
                if self.xf {
                    self.check_int();
                    let y = self.y as u8;
                    self.push_byte(bus, y);
                } else {
                    let y = self.y;
                    self.push_word(bus, y, true);
                }
            }
            0x5b => {
                // tcd imp
                self.adr_imp(bus);
                self.dp = self.a;
                let dp = self.dp;
                self.set_zn(dp, false);
            }
            0x5c => {
                // jml abl
                let value = self.read_opcode_word(bus, false);
                self.check_int();
                self.k = self.read_opcode(bus);
                self.pc = value;
            }
            0x5d => {
                // eor abx(r)
                let (low, high) = self.adr_abx(bus, false);
                self.op_eor(bus, low, high);
            }
            0x5e => {
                // lsr abx
                let (low, high) = self.adr_abx(bus, true);
                self.op_lsr(bus, low, high);
            }
            0x5f => {
                // eor alx
                let (low, high) = self.adr_alx(bus);
                self.op_eor(bus, low, high);
            }
            0x60 => {
                // rts imp
                self.idle(bus);
                self.idle(bus);
                self.pc = self.pull_word(bus, false).wrapping_add(1);
                self.check_int();
                self.idle(bus);
            }
            0x61 => {
                // adc idx
                let (low, high) = self.adr_idx(bus);
                self.op_adc(bus, low, high);
            }
            0x62 => {
                // per rll
                let value = self.read_opcode_word(bus, false);
                self.idle(bus);
                let target = self.pc.wrapping_add(value);
                self.push_word(bus, target, true);
            }
            0x63 => {
                // adc sr
                let (low, high) = self.adr_sr(bus);
                self.op_adc(bus, low, high);
            }
            0x64 => {
                // stz dp
                let (low, high) = self.adr_dp(bus);
                self.op_stz(bus, low, high);
            }
            0x65 => {
                // adc dp
                let (low, high) = self.adr_dp(bus);
                self.op_adc(bus, low, high);
            }
            0x66 => {
                // ror dp
                let (low, high) = self.adr_dp(bus);
                self.op_ror(bus, low, high);
            }
            0x67 => {
                // adc idl
                let (low, high) = self.adr_idl(bus);
                self.op_adc(bus, low, high);
            }
            0x68 => {
                // pla imp
                self.idle(bus);
                self.idle(bus);
                if self.mf {
                    self.check_int();
                    let value = self.pull_byte(bus) as u16;
                    self.a = (self.a & 0xff00) | value;
                } else {
                    self.a = self.pull_word(bus, true);
                }
                let a = self.a;
                self.set_zn(a, self.mf);
            }
            0x69 => {
                // adc imm(m)
                let (low, high) = self.adr_imm(false);
                self.op_adc(bus, low, high);
            }
            0x6a => {
                // rora imp
                self.adr_imp(bus);
                let carry = self.a & 1 != 0;
                if self.mf {
                    self.a = (self.a & 0xff00) | ((self.a >> 1) & 0x7f) | (self.c as u16) << 7;
                } else {
                    self.a = (self.a >> 1) | (self.c as u16) << 15;
                }
                self.c = carry;
                let a = self.a;
                self.set_zn(a, self.mf);
            }
            0x6b => {
                // rtl imp
                self.idle(bus);
                self.idle(bus);
                self.pc = self.pull_word(bus, false).wrapping_add(1);
                self.check_int();
                self.k = self.pull_byte(bus);
            }
            0x6c => {
                // jmp ind
                let adr = self.read_opcode_word(bus, false) as u32;
                self.pc = self.read_word(bus, adr, (adr + 1) & 0xffff, true);
            }
            0x6d => {
                // adc abs
                let (low, high) = self.adr_abs(bus);
                self.op_adc(bus, low, high);
            }
            0x6e => {
                // ror abs
                let (low, high) = self.adr_abs(bus);
                self.op_ror(bus, low, high);
            }
            0x6f => {
                // adc abl
                let (low, high) = self.adr_abl(bus);
                self.op_adc(bus, low, high);
            }
            0x70 => {
                // bvs rel
                let cond = self.v;
                self.do_branch(bus, cond);
            }
            0x71 => {
                // adc idy(r)
                let (low, high) = self.adr_idy(bus, false);
                self.op_adc(bus, low, high);
            }
            0x72 => {
                // adc idp
                let (low, high) = self.adr_idp(bus);
                self.op_adc(bus, low, high);
            }
            0x73 => {
                // adc isy
                let (low, high) = self.adr_isy(bus);
                self.op_adc(bus, low, high);
            }
            0x74 => {
                // stz dpx
                let (low, high) = self.adr_dpx(bus);
                self.op_stz(bus, low, high);
            }
            0x75 => {
                // adc dpx
                let (low, high) = self.adr_dpx(bus);
                self.op_adc(bus, low, high);
            }
            0x76 => {
                // ror dpx
                let (low, high) = self.adr_dpx(bus);
                self.op_ror(bus, low, high);
            }
            0x77 => {
                // adc ily
                let (low, high) = self.adr_ily(bus);
                self.op_adc(bus, low, high);
            }
            0x78 => {
                // sei imp
                self.adr_imp(bus);
                self.i = true;
            }
            0x79 => {
                // adc aby(r)
                let (low, high) = self.adr_aby(bus, false);
                self.op_adc(bus, low, high);
            }
            0x7a => {
                // ply imp
                self.idle(bus);
                self.idle(bus);
                if self.xf {
                    self.check_int();
                    self.y = self.pull_byte(bus) as u16;
                } else {
                    self.y = self.pull_word(bus, true);
                }
                let y = self.y;
                self.set_zn(y, self.xf);
            }
            0x7b => {
                // tdc imp
                self.adr_imp(bus);
                self.a = self.dp;
                let a = self.a;
                self.set_zn(a, false);
            }
            0x7c => {
                // jmp iax
                let adr = self.read_opcode_word(bus, false) as u32;
                self.idle(bus);
                let k = (self.k as u32) << 16;
                self.pc = self.read_word(
                    bus,
                    k | ((adr + self.x as u32) & 0xffff),
                    k | ((adr + self.x as u32 + 1) & 0xffff),
                    true,
                );
            }
            0x7d => {
                // adc abx(r)
                let (low, high) = self.adr_abx(bus, false);
                self.op_adc(bus, low, high);
            }
            0x7e => {
                // ror abx
                let (low, high) = self.adr_abx(bus, true);
                self.op_ror(bus, low, high);
            }
            0x7f => {
                // adc alx
                let (low, high) = self.adr_alx(bus);
                self.op_adc(bus, low, high);
            }
            0x80 => {
                // bra rel
                self.do_branch(bus, true);
            }
            0x81 => {
                // sta idx
                let (low, high) = self.adr_idx(bus);
                self.op_sta(bus, low, high);
            }
            0x82 => {
                // brl rll
                let offset = self.read_opcode_word(bus, false);
                self.pc = self.pc.wrapping_add(offset);
                self.check_int();
                self.idle(bus);
            }
            0x83 => {
                // sta sr
                let (low, high) = self.adr_sr(bus);
                self.op_sta(bus, low, high);
            }
            0x84 => {
                // sty dp
                let (low, high) = self.adr_dp(bus);
                self.op_sty(bus, low, high);
            }
            0x85 => {
                // sta dp
                let (low, high) = self.adr_dp(bus);
                self.op_sta(bus, low, high);
            }
            0x86 => {
                // stx dp
                let (low, high) = self.adr_dp(bus);
                self.op_stx(bus, low, high);
            }
            0x87 => {
                // sta idl
                let (low, high) = self.adr_idl(bus);
                self.op_sta(bus, low, high);
            }
            0x88 => {
                // dey imp
                self.adr_imp(bus);
                if self.xf {
                    self.y = self.y.wrapping_sub(1) & 0xff;
                } else {
                    self.y = self.y.wrapping_sub(1);
                }
                let y = self.y;
                self.set_zn(y, self.xf);
            }
            0x89 => {
                // biti imm(m)
                if self.mf {
                    self.check_int();
                    let value = self.read_opcode(bus);
                    let result = (self.a as u8) & value;
                    self.z = result == 0;
                } else {
                    let value = self.read_opcode_word(bus, true);
                    let result = self.a & value;
                    self.z = result == 0;
                }
            }
            0x8a => {
                // txa imp
                self.adr_imp(bus);
                if self.mf {
                    self.a = (self.a & 0xff00) | (self.x & 0xff);
                } else {
                    self.a = self.x;
                }
                let a = self.a;
                self.set_zn(a, self.mf);
            }
            0x8b => {
                // phb imp
                self.idle(bus);
                self.check_int();
                let db = self.db;
                self.push_byte(bus, db);
            }
            0x8c => {
                // sty abs
                let (low, high) = self.adr_abs(bus);
                self.op_sty(bus, low, high);
            }
            0x8d => {
                // sta abs
                let (low, high) = self.adr_abs(bus);
                self.op_sta(bus, low, high);
            }
            0x8e => {
                // stx abs
                let (low, high) = self.adr_abs(bus);
                self.op_stx(bus, low, high);
            }
            0x8f => {
                // sta abl
                let (low, high) = self.adr_abl(bus);
                self.op_sta(bus, low, high);
            }
            0x90 => {
                // bcc rel
                let cond = !self.c;
                self.do_branch(bus, cond);
            }
            0x91 => {
                // sta idy
                let (low, high) = self.adr_idy(bus, true);
                self.op_sta(bus, low, high);
            }
            0x92 => {
                // sta idp
                let (low, high) = self.adr_idp(bus);
                self.op_sta(bus, low, high);
            }
            0x93 => {
                // sta isy
                let (low, high) = self.adr_isy(bus);
                self.op_sta(bus, low, high);
            }
            0x94 => {
                // sty dpx
                let (low, high) = self.adr_dpx(bus);
                self.op_sty(bus, low, high);
            }
            0x95 => {
                // sta dpx
                let (low, high) = self.adr_dpx(bus);
                self.op_sta(bus, low, high);
            }
            0x96 => {
                // stx dpy
                let (low, high) = self.adr_dpy(bus);
                self.op_stx(bus, low, high);
            }
            0x97 => {
                // sta ily
                let (low, high) = self.adr_ily(bus);
                self.op_sta(bus, low, high);
            }
            0x98 => {
                // tya imp
                self.adr_imp(bus);
                if self.mf {
                    self.a = (self.a & 0xff00) | (self.y & 0xff);
                } else {
                    self.a = self.y;
                }
                let a = self.a;
                self.set_zn(a, self.mf);
            }
            0x99 => {
                // sta aby
                let (low, high) = self.adr_aby(bus, true);
                self.op_sta(bus, low, high);
            }
            0x9a => {
                // txs imp
                self.adr_imp(bus);
                self.sp = if self.e { (self.x & 0xff) | 0x100 } else { self.x };
            }
            0x9b => {
                // txy imp
                self.adr_imp(bus);
                if self.xf {
                    self.y = self.x & 0xff;
                } else {
                    self.y = self.x;
                }
                let y = self.y;
                self.set_zn(y, self.xf);
            }
            0x9c => {
                // stz abs
                let (low, high) = self.adr_abs(bus);
                self.op_stz(bus, low, high);
            }
            0x9d => {
                // sta abx
                let (low, high) = self.adr_abx(bus, true);
                self.op_sta(bus, low, high);
            }
            0x9e => {
                // stz abx
                let (low, high) = self.adr_abx(bus, true);
                self.op_stz(bus, low, high);
            }
            0x9f => {
                // sta alx
                let (low, high) = self.adr_alx(bus);
                self.op_sta(bus, low, high);
            }
            0xa0 => {
                // ldy imm(x)
                let (low, high) = self.adr_imm(true);
                self.op_ldy(bus, low, high);
            }
            0xa1 => {
                // lda idx
                let (low, high) = self.adr_idx(bus);
                self.op_lda(bus, low, high);
            }
            0xa2 => {
                // ldx imm(x)
                let (low, high) = self.adr_imm(true);
                self.op_ldx(bus, low, high);
            }
            0xa3 => {
                // lda sr
                let (low, high) = self.adr_sr(bus);
                self.op_lda(bus, low, high);
            }
            0xa4 => {
                // ldy dp
                let (low, high) = self.adr_dp(bus);
                self.op_ldy(bus, low, high);
            }
            0xa5 => {
                // lda dp
                let (low, high) = self.adr_dp(bus);
                self.op_lda(bus, low, high);
            }
            0xa6 => {
                // ldx dp
                let (low, high) = self.adr_dp(bus);
                self.op_ldx(bus, low, high);
            }
            0xa7 => {
                // lda idl
                let (low, high) = self.adr_idl(bus);
                self.op_lda(bus, low, high);
            }
            0xa8 => {
                // tay imp
                self.adr_imp(bus);
                if self.xf {
                    self.y = self.a & 0xff;
                } else {
                    self.y = self.a;
                }
                let y = self.y;
                self.set_zn(y, self.xf);
            }
            0xa9 => {
                // lda imm(m)
                let (low, high) = self.adr_imm(false);
                self.op_lda(bus, low, high);
            }
            0xaa => {
                // tax imp
                self.adr_imp(bus);
                if self.xf {
                    self.x = self.a & 0xff;
                } else {
                    self.x = self.a;
                }
                let x = self.x;
                self.set_zn(x, self.xf);
            }
            0xab => {
                // plb imp
                self.idle(bus);
                self.idle(bus);
                self.check_int();
                self.db = self.pull_byte(bus);
                let db = self.db as u16;
                self.set_zn(db, true);
            }
            0xac => {
                // ldy abs
                let (low, high) = self.adr_abs(bus);
                self.op_ldy(bus, low, high);
            }
            0xad => {
                // lda abs
                let (low, high) = self.adr_abs(bus);
                self.op_lda(bus, low, high);
            }
            0xae => {
                // ldx abs
                let (low, high) = self.adr_abs(bus);
                self.op_ldx(bus, low, high);
            }
            0xaf => {
                // lda abl
                let (low, high) = self.adr_abl(bus);
                self.op_lda(bus, low, high);
            }
            0xb0 => {
                // bcs rel
                let cond = self.c;
                self.do_branch(bus, cond);
            }
            0xb1 => {
                // lda idy(r)
                let (low, high) = self.adr_idy(bus, false);
                self.op_lda(bus, low, high);
            }
            0xb2 => {
                // lda idp
                let (low, high) = self.adr_idp(bus);
                self.op_lda(bus, low, high);
            }
            0xb3 => {
                // lda isy
                let (low, high) = self.adr_isy(bus);
                self.op_lda(bus, low, high);
            }
            0xb4 => {
                // ldy dpx
                let (low, high) = self.adr_dpx(bus);
                self.op_ldy(bus, low, high);
            }
            0xb5 => {
                // lda dpx
                let (low, high) = self.adr_dpx(bus);
                self.op_lda(bus, low, high);
            }
            0xb6 => {
                // ldx dpy
                let (low, high) = self.adr_dpy(bus);
                self.op_ldx(bus, low, high);
            }
            0xb7 => {
                // lda ily
                let (low, high) = self.adr_ily(bus);
                self.op_lda(bus, low, high);
            }
            0xb8 => {
                // clv imp
                self.adr_imp(bus);
                self.v = false;
            }
            0xb9 => {
                // lda aby(r)
                let (low, high) = self.adr_aby(bus, false);
                self.op_lda(bus, low, high);
            }
            0xba => {
                // tsx imp
                self.adr_imp(bus);
                if self.xf {
                    self.x = self.sp & 0xff;
                } else {
                    self.x = self.sp;
                }
                let x = self.x;
                self.set_zn(x, self.xf);
            }
            0xbb => {
                // tyx imp
                self.adr_imp(bus);
                if self.xf {
                    self.x = self.y & 0xff;
                } else {
                    self.x = self.y;
                }
                let x = self.x;
                self.set_zn(x, self.xf);
            }
            0xbc => {
                // ldy abx(r)
                let (low, high) = self.adr_abx(bus, false);
                self.op_ldy(bus, low, high);
            }
            0xbd => {
                // lda abx(r)
                let (low, high) = self.adr_abx(bus, false);
                self.op_lda(bus, low, high);
            }
            0xbe => {
                // ldx aby(r)
                let (low, high) = self.adr_aby(bus, false);
                self.op_ldx(bus, low, high);
            }
            0xbf => {
                // lda alx
                let (low, high) = self.adr_alx(bus);
                self.op_lda(bus, low, high);
            }
            0xc0 => {
                // cpy imm(x)
                let (low, high) = self.adr_imm(true);
                self.op_cpy(bus, low, high);
            }
            0xc1 => {
                // cmp idx
                let (low, high) = self.adr_idx(bus);
                self.op_cmp(bus, low, high);
            }
            0xc2 => {
                // rep imm(s)
                let value = self.read_opcode(bus);
                self.check_int();
                let flags = self.get_flags() & !value;
                self.set_flags(flags);
                self.idle(bus);
            }
            0xc3 => {
                // cmp sr
                let (low, high) = self.adr_sr(bus);
                self.op_cmp(bus, low, high);
            }
            0xc4 => {
                // cpy dp
                let (low, high) = self.adr_dp(bus);
                self.op_cpy(bus, low, high);
            }
            0xc5 => {
                // cmp dp
                let (low, high) = self.adr_dp(bus);
                self.op_cmp(bus, low, high);
            }
            0xc6 => {
                // dec dp
                let (low, high) = self.adr_dp(bus);
                self.op_dec(bus, low, high);
            }
            0xc7 => {
                // cmp idl
                let (low, high) = self.adr_idl(bus);
                self.op_cmp(bus, low, high);
            }
            0xc8 => {
                // iny imp
                self.adr_imp(bus);
                if self.xf {
                    self.y = self.y.wrapping_add(1) & 0xff;
                } else {
                    self.y = self.y.wrapping_add(1);
                }
                let y = self.y;
                self.set_zn(y, self.xf);
            }
            0xc9 => {
                // cmp imm(m)
                let (low, high) = self.adr_imm(false);
                self.op_cmp(bus, low, high);
            }
            0xca => {
                // dex imp
                self.adr_imp(bus);
                if self.xf {
                    self.x = self.x.wrapping_sub(1) & 0xff;
                } else {
                    self.x = self.x.wrapping_sub(1);
                }
                let x = self.x;
                self.set_zn(x, self.xf);
            }
            0xcb => {
                // wai imp
                self.waiting = true;
                self.idle(bus);
                self.idle(bus);
            }
            0xcc => {
                // cpy abs
                let (low, high) = self.adr_abs(bus);
                self.op_cpy(bus, low, high);
            }
            0xcd => {
                // cmp abs
                let (low, high) = self.adr_abs(bus);
                self.op_cmp(bus, low, high);
            }
            0xce => {
                // dec abs
                let (low, high) = self.adr_abs(bus);
                self.op_dec(bus, low, high);
            }
            0xcf => {
                // cmp abl
                let (low, high) = self.adr_abl(bus);
                self.op_cmp(bus, low, high);
            }
            0xd0 => {
                // bne rel
                let cond = !self.z;
                self.do_branch(bus, cond);
            }
            0xd1 => {
                // cmp idy(r)
                let (low, high) = self.adr_idy(bus, false);
                self.op_cmp(bus, low, high);
            }
            0xd2 => {
                // cmp idp
                let (low, high) = self.adr_idp(bus);
                self.op_cmp(bus, low, high);
            }
            0xd3 => {
                // cmp isy
                let (low, high) = self.adr_isy(bus);
                self.op_cmp(bus, low, high);
            }
            0xd4 => {
                // pei dp
                let (low, high) = self.adr_dp(bus);
                let value = self.read_word(bus, low, high, false);
                self.push_word(bus, value, true);
            }
            0xd5 => {
                // cmp dpx
                let (low, high) = self.adr_dpx(bus);
                self.op_cmp(bus, low, high);
            }
            0xd6 => {
                // dec dpx
                let (low, high) = self.adr_dpx(bus);
                self.op_dec(bus, low, high);
            }
            0xd7 => {
                // cmp ily
                let (low, high) = self.adr_ily(bus);
                self.op_cmp(bus, low, high);
            }
            0xd8 => {
                // cld imp
                self.adr_imp(bus);
                self.d = false;
            }
            0xd9 => {
                // cmp aby(r)
                let (low, high) = self.adr_aby(bus, false);
                self.op_cmp(bus, low, high);
            }
            0xda => {
                // phx imp
                self.idle(bus);
                if self.xf {
                    self.check_int();
                    let x = self.x as u8;
                    self.push_byte(bus, x);
                } else {
                    let x = self.x;
                    self.push_word(bus, x, true);
                }
            }
            0xdb => {
                // stp imp
                self.stopped = true;
                self.idle(bus);
                self.idle(bus);
            }
            0xdc => {
                // jml ial
                let adr = self.read_opcode_word(bus, false) as u32;
                self.pc = self.read_word(bus, adr, (adr + 1) & 0xffff, false);
                self.check_int();
                self.k = self.read(bus, (adr + 2) & 0xffff);
            }
            0xdd => {
                // cmp abx(r)
                let (low, high) = self.adr_abx(bus, false);
                self.op_cmp(bus, low, high);
            }
            0xde => {
                // dec abx
                let (low, high) = self.adr_abx(bus, true);
                self.op_dec(bus, low, high);
            }
            0xdf => {
                // cmp alx
                let (low, high) = self.adr_alx(bus);
                self.op_cmp(bus, low, high);
            }
            0xe0 => {
                // cpx imm(x)
                let (low, high) = self.adr_imm(true);
                self.op_cpx(bus, low, high);
            }
            0xe1 => {
                // sbc idx
                let (low, high) = self.adr_idx(bus);
                self.op_sbc(bus, low, high);
            }
            0xe2 => {
                // sep imm(s)
                let value = self.read_opcode(bus);
                self.check_int();
                let flags = self.get_flags() | value;
                self.set_flags(flags);
                self.idle(bus);
            }
            0xe3 => {
                // sbc sr
                let (low, high) = self.adr_sr(bus);
                self.op_sbc(bus, low, high);
            }
            0xe4 => {
                // cpx dp
                let (low, high) = self.adr_dp(bus);
                self.op_cpx(bus, low, high);
            }
            0xe5 => {
                // sbc dp
                let (low, high) = self.adr_dp(bus);
                self.op_sbc(bus, low, high);
            }
            0xe6 => {
                // inc dp
                let (low, high) = self.adr_dp(bus);
                self.op_inc(bus, low, high);
            }
            0xe7 => {
                // sbc idl
                let (low, high) = self.adr_idl(bus);
                self.op_sbc(bus, low, high);
            }
            0xe8 => {
                // inx imp
                self.adr_imp(bus);
                if self.xf {
                    self.x = self.x.wrapping_add(1) & 0xff;
                } else {
                    self.x = self.x.wrapping_add(1);
                }
                let x = self.x;
                self.set_zn(x, self.xf);
            }
            0xe9 => {
                // sbc imm(m)
                let (low, high) = self.adr_imm(false);
                self.op_sbc(bus, low, high);
            }
            0xea => {
                // nop imp
                self.adr_imp(bus);
            }
            0xeb => {
                // xba imp
                let low = self.a & 0xff;
                let high = self.a >> 8;
                self.a = (low << 8) | high;
                self.set_zn(high, true);
                self.idle(bus);
                self.check_int();
                self.idle(bus);
            }
            0xec => {
                // cpx abs
                let (low, high) = self.adr_abs(bus);
                self.op_cpx(bus, low, high);
            }
            0xed => {
                // sbc abs
                let (low, high) = self.adr_abs(bus);
                self.op_sbc(bus, low, high);
            }
            0xee => {
                // inc abs
                let (low, high) = self.adr_abs(bus);
                self.op_inc(bus, low, high);
            }
            0xef => {
                // sbc abl
                let (low, high) = self.adr_abl(bus);
                self.op_sbc(bus, low, high);
            }
            0xf0 => {
                // beq rel
                let cond = self.z;
                self.do_branch(bus, cond);
            }
            0xf1 => {
                // sbc idy(r)
                let (low, high) = self.adr_idy(bus, false);
                self.op_sbc(bus, low, high);
            }
            0xf2 => {
                // sbc idp
                let (low, high) = self.adr_idp(bus);
                self.op_sbc(bus, low, high);
            }
            0xf3 => {
                // sbc isy
                let (low, high) = self.adr_isy(bus);
                self.op_sbc(bus, low, high);
            }
            0xf4 => {
                // pea imm(l)
                let value = self.read_opcode_word(bus, false);
                self.push_word(bus, value, true);
            }
            0xf5 => {
                // sbc dpx
                let (low, high) = self.adr_dpx(bus);
                self.op_sbc(bus, low, high);
            }
            0xf6 => {
                // inc dpx
                let (low, high) = self.adr_dpx(bus);
                self.op_inc(bus, low, high);
            }
            0xf7 => {
                // sbc ily
                let (low, high) = self.adr_ily(bus);
                self.op_sbc(bus, low, high);
            }
            0xf8 => {
                // sed imp
                self.adr_imp(bus);
                self.d = true;
            }
            0xf9 => {
                // sbc aby(r)
                let (low, high) = self.adr_aby(bus, false);
                self.op_sbc(bus, low, high);
            }
            0xfa => {
                // plx imp
                self.idle(bus);
                self.idle(bus);
                if self.xf {
                    self.check_int();
                    self.x = self.pull_byte(bus) as u16;
                } else {
                    self.x = self.pull_word(bus, true);
                }
                let x = self.x;
                self.set_zn(x, self.xf);
            }
            0xfb => {
                // xce imp
                self.adr_imp(bus);
                let temp = self.c;
                self.c = self.e;
                self.e = temp;
                let flags = self.get_flags();
                self.set_flags(flags); // re-applies width and stack invariants
            }
            0xfc => {
                // jsr iax
                let adr_l = self.read_opcode(bus) as u32;
                let pc = self.pc;
                self.push_word(bus, pc, false);
                let adr = adr_l | (self.read_opcode(bus) as u32) << 8;
                self.idle(bus);
                let k = (self.k as u32) << 16;
                let value = self.read_word(
                    bus,
                    k | ((adr + self.x as u32) & 0xffff),
                    k | ((adr + self.x as u32 + 1) & 0xffff),
                    true,
                );
                self.pc = value;
            }
            0xfd => {
                // sbc abx(r)
                let (low, high) = self.adr_abx(bus, false);
                self.op_sbc(bus, low, high);
            }
            0xfe => {
                // inc abx
                let (low, high) = self.adr_abx(bus, true);
                self.op_inc(bus, low, high);
            }
            0xff => {
                // sbc alx
                let (low, high) = self.adr_alx(bus);
                self.op_sbc(bus, low, high);
            }
        }
    }
}
