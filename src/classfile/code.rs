//! Instruction scanning for method bodies.
//!
//! Only the reference-bearing opcodes are decoded; everything else is stepped
//! over using the fixed operand widths of the JVM instruction set.

use super::constant_pool::ConstantPool;
use super::error::ClassFormatError;
use super::reader::ByteReader;

pub const GETSTATIC: u8 = 0xb2;
pub const PUTSTATIC: u8 = 0xb3;
pub const GETFIELD: u8 = 0xb4;
pub const PUTFIELD: u8 = 0xb5;
pub const INVOKEVIRTUAL: u8 = 0xb6;
pub const INVOKESPECIAL: u8 = 0xb7;
pub const INVOKESTATIC: u8 = 0xb8;
pub const INVOKEINTERFACE: u8 = 0xb9;
pub const INVOKEDYNAMIC: u8 = 0xba;
pub const NEW: u8 = 0xbb;
pub const ANEWARRAY: u8 = 0xbd;
pub const CHECKCAST: u8 = 0xc0;
pub const INSTANCEOF: u8 = 0xc1;
pub const WIDE: u8 = 0xc4;
pub const MULTIANEWARRAY: u8 = 0xc5;
pub const JSR: u8 = 0xa8;
pub const RET: u8 = 0xa9;
pub const JSR_W: u8 = 0xc9;
const TABLESWITCH: u8 = 0xaa;
const LOOKUPSWITCH: u8 = 0xab;
const IINC: u8 = 0x84;

/// A reference-bearing instruction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Instruction {
    /// `getstatic`, `putstatic`, `getfield`, `putfield`.
    Field {
        opcode: u8,
        owner: String,
        name: String,
        descriptor: String,
    },
    /// `invokevirtual`, `invokespecial`, `invokestatic`, `invokeinterface`.
    Method {
        opcode: u8,
        owner: String,
        name: String,
        descriptor: String,
    },
    /// `new`, `anewarray`, `checkcast`, `instanceof`. The operand is an internal
    /// name or, for array classes, an array descriptor.
    Type { opcode: u8, operand: String },
    MultiANewArray { descriptor: String, dimensions: u8 },
}

/// Decoded contents of a `Code` attribute.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Code {
    pub instructions: Vec<Instruction>,
    /// One entry per exception table row; `None` marks a catch-all handler.
    pub catch_types: Vec<Option<String>>,
    pub local_variables: Vec<LocalVariable>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalVariable {
    pub name: String,
    pub descriptor: String,
}

pub(crate) fn read_code(
    reader: &mut ByteReader<'_>,
    pool: &ConstantPool,
    debug_info: bool,
) -> Result<Code, ClassFormatError> {
    reader.skip(4)?; // max_stack, max_locals
    let code_length = reader.read_u4()? as usize;
    let bytecode = reader.read_slice(code_length)?;
    let instructions = scan_instructions(bytecode, pool)?;

    let handlers = reader.read_u2()?;
    let mut catch_types = Vec::with_capacity(handlers as usize);
    for _ in 0..handlers {
        reader.skip(6)?;
        let catch_type = pool.optional_class_name(reader.read_u2()?)?;
        catch_types.push(catch_type.map(str::to_string));
    }

    let mut local_variables = Vec::new();
    let attributes = reader.read_u2()?;
    for _ in 0..attributes {
        let name = pool.utf8(reader.read_u2()?)?;
        let len = reader.read_u4()? as usize;
        let body = reader.read_slice(len)?;
        if debug_info && name == "LocalVariableTable" {
            let mut table = ByteReader::new(body);
            let count = table.read_u2()?;
            for _ in 0..count {
                table.skip(4)?;
                let name = pool.utf8(table.read_u2()?)?.to_string();
                let descriptor = pool.utf8(table.read_u2()?)?.to_string();
                table.skip(2)?;
                local_variables.push(LocalVariable { name, descriptor });
            }
        }
    }

    Ok(Code {
        instructions,
        catch_types,
        local_variables,
    })
}

/// Walks a bytecode array and returns its reference-bearing instructions.
pub(crate) fn scan_instructions(
    bytecode: &[u8],
    pool: &ConstantPool,
) -> Result<Vec<Instruction>, ClassFormatError> {
    let mut instructions = Vec::new();
    let mut reader = ByteReader::new(bytecode);

    while !reader.is_empty() {
        let offset = reader.position();
        let opcode = reader.read_u1()?;
        match opcode {
            GETSTATIC..=PUTFIELD => {
                let (owner, name, descriptor) = pool.member_ref(reader.read_u2()?)?;
                instructions.push(Instruction::Field {
                    opcode,
                    owner: owner.to_string(),
                    name: name.to_string(),
                    descriptor: descriptor.to_string(),
                });
            }
            INVOKEVIRTUAL..=INVOKEINTERFACE => {
                let (owner, name, descriptor) = pool.member_ref(reader.read_u2()?)?;
                if opcode == INVOKEINTERFACE {
                    reader.skip(2)?;
                }
                instructions.push(Instruction::Method {
                    opcode,
                    owner: owner.to_string(),
                    name: name.to_string(),
                    descriptor: descriptor.to_string(),
                });
            }
            NEW | ANEWARRAY | CHECKCAST | INSTANCEOF => {
                let operand = pool.class_name(reader.read_u2()?)?.to_string();
                instructions.push(Instruction::Type { opcode, operand });
            }
            MULTIANEWARRAY => {
                let descriptor = pool.class_name(reader.read_u2()?)?.to_string();
                let dimensions = reader.read_u1()?;
                instructions.push(Instruction::MultiANewArray {
                    descriptor,
                    dimensions,
                });
            }
            TABLESWITCH => {
                reader.skip(switch_padding(offset))?;
                reader.skip(4)?;
                let low = reader.read_i4()? as i64;
                let high = reader.read_i4()? as i64;
                let entries = (high - low + 1).max(0) as usize;
                reader.skip(entries * 4)?;
            }
            LOOKUPSWITCH => {
                reader.skip(switch_padding(offset))?;
                reader.skip(4)?;
                let pairs = reader.read_i4()?.max(0) as usize;
                reader.skip(pairs * 8)?;
            }
            WIDE => {
                let widened = reader.read_u1()?;
                reader.skip(if widened == IINC { 4 } else { 2 })?;
            }
            _ => {
                let len = instruction_length(opcode)
                    .ok_or(ClassFormatError::UnknownOpcode { opcode, offset })?;
                reader.skip(len - 1)?;
            }
        }
    }

    Ok(instructions)
}

/// Switch operands start at the next four-byte boundary of the code array.
fn switch_padding(opcode_offset: usize) -> usize {
    (4 - (opcode_offset + 1) % 4) % 4
}

/// Total length, opcode included, of fixed-width instructions.
fn instruction_length(opcode: u8) -> Option<usize> {
    let len = match opcode {
        0x00..=0x0f => 1,
        0x10 => 2,
        0x11 => 3,
        0x12 => 2,
        0x13 | 0x14 => 3,
        0x15..=0x19 => 2,
        0x1a..=0x35 => 1,
        0x36..=0x3a => 2,
        0x3b..=0x83 => 1,
        IINC => 3,
        0x85..=0x98 => 1,
        0x99..=JSR => 3,
        RET => 2,
        0xac..=0xb1 => 1,
        INVOKEDYNAMIC => 5,
        0xbc => 2,
        0xbe | 0xbf => 1,
        0xc2 | 0xc3 => 1,
        0xc6 | 0xc7 => 3,
        0xc8 | JSR_W => 5,
        _ => return None,
    };
    Some(len)
}
