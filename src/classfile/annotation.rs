use std::fmt;

use super::constant_pool::{Constant, ConstantPool};
use super::error::ClassFormatError;
use super::reader::ByteReader;

/// An annotation as it appears on a class or member.
#[derive(Debug, Clone, PartialEq)]
pub struct Annotation {
    /// Field descriptor of the annotation type, e.g. `Lp/Marker;`.
    pub descriptor: String,
    /// Element values in declaration order. Nested annotation values are dropped.
    pub elements: Vec<(String, AnnotationValue)>,
}

/// A constant value carried by an annotation element.
#[derive(Debug, Clone, PartialEq)]
pub enum AnnotationValue {
    Byte(i8),
    Char(char),
    Short(i16),
    Int(i32),
    Long(i64),
    Float(f32),
    Double(f64),
    Boolean(bool),
    String(String),
    /// Enum constant; displays as the constant name.
    Enum { descriptor: String, name: String },
    /// Class literal; displays as the class descriptor.
    Class(String),
    Array(Vec<AnnotationValue>),
}

impl AnnotationValue {
    /// A scalar matches when its display form equals `text`; an array matches when any
    /// of its elements does.
    pub fn matches(&self, text: &str) -> bool {
        match self {
            AnnotationValue::Array(values) => values
                .iter()
                .any(|value| !matches!(value, AnnotationValue::Array(_)) && value.matches(text)),
            scalar => scalar.to_string() == text,
        }
    }
}

impl fmt::Display for AnnotationValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnnotationValue::Byte(v) => write!(f, "{v}"),
            AnnotationValue::Char(v) => write!(f, "{v}"),
            AnnotationValue::Short(v) => write!(f, "{v}"),
            AnnotationValue::Int(v) => write!(f, "{v}"),
            AnnotationValue::Long(v) => write!(f, "{v}"),
            AnnotationValue::Float(v) if is_whole(*v as f64) => write!(f, "{v:.1}"),
            AnnotationValue::Float(v) => write!(f, "{v}"),
            AnnotationValue::Double(v) if is_whole(*v) => write!(f, "{v:.1}"),
            AnnotationValue::Double(v) => write!(f, "{v}"),
            AnnotationValue::Boolean(v) => write!(f, "{v}"),
            AnnotationValue::String(v) => f.write_str(v),
            AnnotationValue::Enum { name, .. } => f.write_str(name),
            AnnotationValue::Class(descriptor) => f.write_str(descriptor),
            AnnotationValue::Array(values) => {
                f.write_str("{")?;
                for (i, value) in values.iter().enumerate() {
                    if i > 0 {
                        f.write_str(",")?;
                    }
                    write!(f, " {value}")?;
                }
                f.write_str(if values.is_empty() { "}" } else { " }" })
            }
        }
    }
}

/// Whole numbers keep a trailing `.0` so `1.0f` reads the same as in source.
fn is_whole(value: f64) -> bool {
    value.is_finite() && value.fract() == 0.0 && value.abs() < 1e16
}

pub(crate) fn read_annotations(
    reader: &mut ByteReader<'_>,
    pool: &ConstantPool,
) -> Result<Vec<Annotation>, ClassFormatError> {
    let count = reader.read_u2()?;
    let mut annotations = Vec::with_capacity(count as usize);
    for _ in 0..count {
        annotations.push(read_annotation(reader, pool)?);
    }
    Ok(annotations)
}

fn read_annotation(
    reader: &mut ByteReader<'_>,
    pool: &ConstantPool,
) -> Result<Annotation, ClassFormatError> {
    let descriptor = pool.utf8(reader.read_u2()?)?.to_string();
    let pairs = reader.read_u2()?;
    let mut elements = Vec::with_capacity(pairs as usize);
    for _ in 0..pairs {
        let name = pool.utf8(reader.read_u2()?)?.to_string();
        if let Some(value) = read_element_value(reader, pool)? {
            elements.push((name, value));
        }
    }
    Ok(Annotation {
        descriptor,
        elements,
    })
}

fn read_element_value(
    reader: &mut ByteReader<'_>,
    pool: &ConstantPool,
) -> Result<Option<AnnotationValue>, ClassFormatError> {
    let tag = reader.read_u1()? as char;
    let value = match tag {
        'B' => AnnotationValue::Byte(int_constant(pool, reader.read_u2()?)? as i8),
        'C' => {
            let code = int_constant(pool, reader.read_u2()?)? as u32;
            AnnotationValue::Char(char::from_u32(code).unwrap_or(char::REPLACEMENT_CHARACTER))
        }
        'S' => AnnotationValue::Short(int_constant(pool, reader.read_u2()?)? as i16),
        'Z' => AnnotationValue::Boolean(int_constant(pool, reader.read_u2()?)? != 0),
        'I' => AnnotationValue::Int(int_constant(pool, reader.read_u2()?)?),
        'J' => {
            let index = reader.read_u2()?;
            match pool.get(index)? {
                Constant::Long(v) => AnnotationValue::Long(*v),
                _ => return Err(unexpected(index, "Long")),
            }
        }
        'F' => {
            let index = reader.read_u2()?;
            match pool.get(index)? {
                Constant::Float(v) => AnnotationValue::Float(*v),
                _ => return Err(unexpected(index, "Float")),
            }
        }
        'D' => {
            let index = reader.read_u2()?;
            match pool.get(index)? {
                Constant::Double(v) => AnnotationValue::Double(*v),
                _ => return Err(unexpected(index, "Double")),
            }
        }
        's' => AnnotationValue::String(pool.utf8(reader.read_u2()?)?.to_string()),
        'e' => {
            let descriptor = pool.utf8(reader.read_u2()?)?.to_string();
            let name = pool.utf8(reader.read_u2()?)?.to_string();
            AnnotationValue::Enum { descriptor, name }
        }
        'c' => AnnotationValue::Class(pool.utf8(reader.read_u2()?)?.to_string()),
        '@' => {
            read_annotation(reader, pool)?;
            return Ok(None);
        }
        '[' => {
            let count = reader.read_u2()?;
            let mut values = Vec::with_capacity(count as usize);
            for _ in 0..count {
                if let Some(value) = read_element_value(reader, pool)? {
                    values.push(value);
                }
            }
            AnnotationValue::Array(values)
        }
        other => return Err(ClassFormatError::InvalidElementTag(other)),
    };
    Ok(Some(value))
}

fn int_constant(pool: &ConstantPool, index: u16) -> Result<i32, ClassFormatError> {
    match pool.get(index)? {
        Constant::Integer(v) => Ok(*v),
        _ => Err(unexpected(index, "Integer")),
    }
}

fn unexpected(index: u16, expected: &'static str) -> ClassFormatError {
    ClassFormatError::UnexpectedConstant { index, expected }
}
