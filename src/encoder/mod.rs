/*
Copyright 2025 Connor Nolan

Licensed under the Apache License, Version 2.0 (the "License");
you may not use this file except in compliance with the License.
You may obtain a copy of the License at

    http://www.apache.org/licenses/LICENSE-2.0

Unless required by applicable law or agreed to in writing, software
distributed under the License is distributed on an "AS IS" BASIS,
WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
See the License for the specific language governing permissions and
limitations under the License.
*/

pub mod constants;
pub mod operand_validators;
mod pseudo;


use crate::ast::{Instruction, Mnemonic, Operand};
use crate::errors::AssemblyError;
use constants::*;
use operand_validators::{Encoder, RegOrImm};

/// Packs `opcode` into the low 6 bits and ORs in each `(offset, mask,
/// value)` field, masking before shifting (section 4.4).
fn pack(opcode: u8, fields: &[(u32, u32, i64)]) -> u32 {
    let mut word = opcode as u32;
    for (offset, mask, value) in fields {
        word |= (*value as i32 as u32 & mask) << offset;
    }
    word
}

/// One register at field 6, a 21-bit immediate/diff at field 11: the
/// `load_ri` / `load_pc` / `stor_ri` / `stor_pc` family, reachable only
/// through `mov`/`ldr`/`str` lowering, and the conditional jumps.
pub(super) fn reg1_imm21(opcode: u8, reg: u8, imm: i64) -> u32 {
    pack(opcode, &[(FIELD_6, MASK_5, reg as i64), (FIELD_11, MASK_21, imm)])
}

/// Two registers at fields 6 and 11, a 16-bit immediate/register at field
/// 16.
pub(super) fn reg2_imm16(opcode: u8, reg1: u8, reg2: u8, imm: i64) -> u32 {
    pack(opcode, &[(FIELD_6, MASK_5, reg1 as i64), (FIELD_11, MASK_5, reg2 as i64), (FIELD_16, MASK_16, imm)])
}

/// The 16-bit-field group (section 4.4) always carries exactly two
/// register operands and one flexible register-or-immediate operand,
/// but which source position holds which varies by mnemonic (`stri`'s
/// immediate sits between its two registers). Registers fill fields 6
/// and 11 in the order they're encountered; whatever's left — a third
/// register or the one immediate — goes to field 16.
fn sixteen_bit_family(opcode: u8, ops: &[Operand], line: usize) -> Result<u32, AssemblyError> {
    let mut regs = [0u8; 2];
    let mut reg_count = 0;
    let mut field16 = 0i64;

    for op in ops {
        match op {
            Operand::Reg(r) => {
                if reg_count < 2 {
                    regs[reg_count] = *r;
                    reg_count += 1;
                } else {
                    field16 = *r as i64;
                }
            }
            Operand::Immediate(v) | Operand::Diff(v) => field16 = *v as i64,
            Operand::Label(_) | Operand::External(_) => {
                return Err(AssemblyError::resolution(line, "label substitution was not performed"))
            }
        }
    }
    if reg_count < 2 {
        return Err(AssemblyError::shape(line, "expected two register operands"));
    }
    Ok(reg2_imm16(opcode, regs[0], regs[1], field16))
}

/// `add`/`sub`/.../`div`: register-register and register-immediate forms
/// share shape, differing only in which opcode the third operand selects.
fn arithmetic(opcode_rr: u8, opcode_ri: u8, ops: &[Operand], line: usize) -> Result<u32, AssemblyError> {
    match ops.get(2) {
        Some(Operand::Reg(_)) => sixteen_bit_family(opcode_rr, ops, line),
        Some(Operand::Immediate(_)) | Some(Operand::Diff(_)) => sixteen_bit_family(opcode_ri, ops, line),
        _ => Err(AssemblyError::shape(line, "expected a register or immediate third operand")),
    }
}

/// Pair load/store: four operands, registers filling fields 6/11/16 in
/// order, the step/offset as an 11-bit field at 21. The pair
/// instructions were only partially specified upstream; this field
/// layout is an implementer's choice recorded alongside the other open
/// questions.
fn pair(opcode: u8, ops: &[Operand], line: usize) -> Result<u32, AssemblyError> {
    let enc = Encoder::new(line);
    let reg1 = enc.expect_reg(&ops[0])?;
    let reg2 = enc.expect_reg(&ops[1])?;
    let base = enc.expect_reg(&ops[2])?;
    let step = match enc.expect_reg_or_immediate(&ops[3])? {
        RegOrImm::Reg(r) => r as i64,
        RegOrImm::Imm(v) => v,
    };
    Ok(pack(
        opcode,
        &[
            (FIELD_6, MASK_5, reg1 as i64),
            (FIELD_11, MASK_5, reg2 as i64),
            (FIELD_16, MASK_16, base as i64),
            (FIELD_21, MASK_11, step),
        ],
    ))
}

/// Encodes one resolved instruction into its 32-bit little-endian word
/// (the byte order itself is the emitter's concern; this returns the
/// word as a plain `u32`). Every operand must already be in its final
/// `Reg`/`Immediate`/`Diff` form — the resolver guarantees this for
/// everything except a dangling external reference, which is rejected
/// before the encoder ever runs.
pub fn encode_instruction(instruction: &Instruction, line: usize) -> Result<u32, AssemblyError> {
    let enc = Encoder::new(line);
    let ops = &instruction.operands;

    match instruction.mnemonic {
        Mnemonic::Nop => Ok(pack(NOP, &[])),
        Mnemonic::Ret => Ok(pack(RET, &[])),
        Mnemonic::Halt => Ok(pack(HALT, &[])),
        Mnemonic::Wfi => Ok(pack(WFI, &[])),

        Mnemonic::Jmp => {
            let imm = enc.expect_immediate(&ops[0])?;
            Ok(pack(JMP, &[(FIELD_6, MASK_26, imm)]))
        }
        Mnemonic::Call => match enc.expect_reg_or_immediate(&ops[0])? {
            RegOrImm::Reg(r) => Ok(pack(CALL_R, &[(FIELD_6, MASK_5, r as i64)])),
            RegOrImm::Imm(v) => Ok(pack(CALL_I, &[(FIELD_6, MASK_26, v)])),
        },

        Mnemonic::Jeq | Mnemonic::Jne | Mnemonic::Jgt | Mnemonic::Jge | Mnemonic::Jlt | Mnemonic::Jle => {
            let opcode = match instruction.mnemonic {
                Mnemonic::Jeq => JEQ,
                Mnemonic::Jne => JNE,
                Mnemonic::Jgt => JGT,
                Mnemonic::Jge => JGE,
                Mnemonic::Jlt => JLT,
                Mnemonic::Jle => JLE,
                _ => unreachable!(),
            };
            let reg = enc.expect_reg(&ops[0])?;
            let imm = enc.expect_immediate(&ops[1])?;
            Ok(reg1_imm21(opcode, reg, imm))
        }

        Mnemonic::Mov => pseudo::lower_mov(ops, line),
        Mnemonic::Ldr => pseudo::lower_ldr(ops, line),
        Mnemonic::Str => pseudo::lower_str(ops, line),

        Mnemonic::Add => arithmetic(ADD_RR, ADD_RI, ops, line),
        Mnemonic::Sub => arithmetic(SUB_RR, SUB_RI, ops, line),
        Mnemonic::And => arithmetic(AND_RR, AND_RI, ops, line),
        Mnemonic::Orr => arithmetic(ORR_RR, ORR_RI, ops, line),
        Mnemonic::Xor => arithmetic(XOR_RR, XOR_RI, ops, line),
        Mnemonic::Lsl => arithmetic(LSL_RR, LSL_RI, ops, line),
        Mnemonic::Lsr => arithmetic(LSR_RR, LSR_RI, ops, line),
        Mnemonic::Asr => arithmetic(ASR_RR, ASR_RI, ops, line),
        Mnemonic::Mul => arithmetic(MUL_RR, MUL_RI, ops, line),
        Mnemonic::Div => arithmetic(DIV_RR, DIV_RI, ops, line),

        Mnemonic::Ldri => sixteen_bit_family(LOAD_IXR, ops, line),
        Mnemonic::Ldrpi => sixteen_bit_family(LOAD_PI, ops, line),
        Mnemonic::Ldrip => sixteen_bit_family(LOAD_IP, ops, line),
        Mnemonic::Stri => sixteen_bit_family(STOR_IX, ops, line),
        Mnemonic::Strpi => sixteen_bit_family(STOR_PI, ops, line),
        Mnemonic::Strip => sixteen_bit_family(STOR_IP, ops, line),

        Mnemonic::Ldppi => pair(LDP_PI, ops, line),
        Mnemonic::Ldpip => pair(LDP_IP, ops, line),
        Mnemonic::Stppi => pair(STP_PI, ops, line),
        Mnemonic::Stpip => pair(STP_IP, ops, line),
    }
}
