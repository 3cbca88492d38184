use super::error::ClassFormatError;
use super::reader::ByteReader;

/// A decoded constant pool entry.
///
/// Only the entries the decoder interprets keep their payload; the rest are
/// retained as markers so indices stay aligned.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Constant {
    Utf8(String),
    Integer(i32),
    Float(f32),
    Long(i64),
    Double(f64),
    Class { name: u16 },
    String { value: u16 },
    MemberRef { class: u16, name_and_type: u16 },
    NameAndType { name: u16, descriptor: u16 },
    MethodHandle,
    MethodType,
    Dynamic,
    Module,
    Package,
}

#[derive(Debug, Clone, Default)]
pub(crate) struct ConstantPool {
    entries: Vec<Option<Constant>>,
}

impl ConstantPool {
    pub(crate) fn parse(reader: &mut ByteReader<'_>) -> Result<Self, ClassFormatError> {
        let count = reader.read_u2()? as usize;
        let mut entries = vec![None; count.max(1)];
        let mut index = 1;
        while index < count {
            let tag = reader.read_u1()?;
            let constant = match tag {
                1 => {
                    let len = reader.read_u2()? as usize;
                    Constant::Utf8(decode_modified_utf8(reader.read_slice(len)?))
                }
                3 => Constant::Integer(reader.read_i4()?),
                4 => Constant::Float(f32::from_bits(reader.read_u4()?)),
                5 => {
                    let high = reader.read_u4()? as u64;
                    let low = reader.read_u4()? as u64;
                    Constant::Long(((high << 32) | low) as i64)
                }
                6 => {
                    let high = reader.read_u4()? as u64;
                    let low = reader.read_u4()? as u64;
                    Constant::Double(f64::from_bits((high << 32) | low))
                }
                7 => Constant::Class {
                    name: reader.read_u2()?,
                },
                8 => Constant::String {
                    value: reader.read_u2()?,
                },
                9..=11 => Constant::MemberRef {
                    class: reader.read_u2()?,
                    name_and_type: reader.read_u2()?,
                },
                12 => Constant::NameAndType {
                    name: reader.read_u2()?,
                    descriptor: reader.read_u2()?,
                },
                15 => {
                    reader.skip(3)?;
                    Constant::MethodHandle
                }
                16 => {
                    reader.skip(2)?;
                    Constant::MethodType
                }
                17 | 18 => {
                    reader.skip(4)?;
                    Constant::Dynamic
                }
                19 => {
                    reader.skip(2)?;
                    Constant::Module
                }
                20 => {
                    reader.skip(2)?;
                    Constant::Package
                }
                _ => return Err(ClassFormatError::UnsupportedConstant { tag }),
            };

            // Long and Double take up two slots
            let width = if matches!(constant, Constant::Long(_) | Constant::Double(_)) {
                2
            } else {
                1
            };
            entries[index] = Some(constant);
            index += width;
        }
        Ok(Self { entries })
    }

    pub(crate) fn get(&self, index: u16) -> Result<&Constant, ClassFormatError> {
        self.entries
            .get(index as usize)
            .and_then(Option::as_ref)
            .ok_or(ClassFormatError::InvalidConstantIndex { index })
    }

    pub(crate) fn utf8(&self, index: u16) -> Result<&str, ClassFormatError> {
        match self.get(index)? {
            Constant::Utf8(value) => Ok(value),
            _ => Err(ClassFormatError::UnexpectedConstant {
                index,
                expected: "Utf8",
            }),
        }
    }

    pub(crate) fn class_name(&self, index: u16) -> Result<&str, ClassFormatError> {
        match self.get(index)? {
            Constant::Class { name } => self.utf8(*name),
            _ => Err(ClassFormatError::UnexpectedConstant {
                index,
                expected: "Class",
            }),
        }
    }

    /// Index zero stands for "absent" in super class, outer class and catch type slots.
    pub(crate) fn optional_class_name(&self, index: u16) -> Result<Option<&str>, ClassFormatError> {
        if index == 0 {
            Ok(None)
        } else {
            self.class_name(index).map(Some)
        }
    }

    pub(crate) fn optional_utf8(&self, index: u16) -> Result<Option<&str>, ClassFormatError> {
        if index == 0 {
            Ok(None)
        } else {
            self.utf8(index).map(Some)
        }
    }

    pub(crate) fn name_and_type(&self, index: u16) -> Result<(&str, &str), ClassFormatError> {
        match self.get(index)? {
            Constant::NameAndType { name, descriptor } => {
                Ok((self.utf8(*name)?, self.utf8(*descriptor)?))
            }
            _ => Err(ClassFormatError::UnexpectedConstant {
                index,
                expected: "NameAndType",
            }),
        }
    }

    /// Resolves a field, method or interface method reference to `(owner, name, descriptor)`.
    pub(crate) fn member_ref(&self, index: u16) -> Result<(&str, &str, &str), ClassFormatError> {
        match self.get(index)? {
            Constant::MemberRef {
                class,
                name_and_type,
            } => {
                let owner = self.class_name(*class)?;
                let (name, descriptor) = self.name_and_type(*name_and_type)?;
                Ok((owner, name, descriptor))
            }
            _ => Err(ClassFormatError::UnexpectedConstant {
                index,
                expected: "member reference",
            }),
        }
    }
}

/// Decodes the JVM's modified UTF-8: `0xC0 0x80` for NUL and surrogate pairs
/// encoded as two three-byte sequences. Malformed input decodes lossily.
pub(crate) fn decode_modified_utf8(bytes: &[u8]) -> String {
    if let Ok(plain) = std::str::from_utf8(bytes) {
        if !plain.contains('\u{0}') && !bytes.contains(&0xED) {
            return plain.to_string();
        }
    }

    let mut units = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        let b = bytes[i];
        if b & 0x80 == 0 {
            units.push(b as u16);
            i += 1;
        } else if b & 0xE0 == 0xC0 && i + 1 < bytes.len() {
            units.push((((b & 0x1F) as u16) << 6) | (bytes[i + 1] & 0x3F) as u16);
            i += 2;
        } else if b & 0xF0 == 0xE0 && i + 2 < bytes.len() {
            units.push(
                (((b & 0x0F) as u16) << 12)
                    | (((bytes[i + 1] & 0x3F) as u16) << 6)
                    | (bytes[i + 2] & 0x3F) as u16,
            );
            i += 3;
        } else {
            units.push(0xFFFD);
            i += 1;
        }
    }
    String::from_utf16_lossy(&units)
}
