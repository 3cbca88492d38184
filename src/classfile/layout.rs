use std::ops::Range;

use super::constant_pool::ConstantPool;
use super::error::ClassFormatError;
use super::reader::ByteReader;

/// Byte layout of the member tables of a class file.
///
/// Used to drop fields and methods from a class while keeping every other byte
/// (constant pool, attributes, method bodies) as it was.
#[derive(Debug, Clone)]
pub struct ClassLayout {
    pub name: String,
    fields: Vec<MemberSpan>,
    methods: Vec<MemberSpan>,
    fields_start: usize,
    methods_start: usize,
    methods_end: usize,
}

/// Location and identity of one `field_info` or `method_info` structure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemberSpan {
    pub name: String,
    pub descriptor: String,
    range: Range<usize>,
}

impl ClassLayout {
    pub fn parse(data: &[u8]) -> Result<Self, ClassFormatError> {
        let mut reader = ByteReader::new(data);
        reader.expect_magic()?;
        reader.skip(4)?;
        let pool = ConstantPool::parse(&mut reader)?;
        reader.skip(2)?;
        let name = pool.class_name(reader.read_u2()?)?.to_string();
        reader.skip(2)?;
        let interfaces = reader.read_u2()? as usize;
        reader.skip(interfaces * 2)?;

        let fields_start = reader.position();
        let fields = member_spans(&mut reader, &pool)?;
        let methods_start = reader.position();
        let methods = member_spans(&mut reader, &pool)?;
        let methods_end = reader.position();

        Ok(Self {
            name,
            fields,
            methods,
            fields_start,
            methods_start,
            methods_end,
        })
    }

    pub fn fields(&self) -> &[MemberSpan] {
        &self.fields
    }

    pub fn methods(&self) -> &[MemberSpan] {
        &self.methods
    }

    /// Re-assembles `data` keeping only the members accepted by the predicates.
    pub fn retain(
        &self,
        data: &[u8],
        mut keep_field: impl FnMut(&MemberSpan) -> bool,
        mut keep_method: impl FnMut(&MemberSpan) -> bool,
    ) -> Vec<u8> {
        let mut out = Vec::with_capacity(data.len());
        out.extend_from_slice(&data[..self.fields_start]);
        write_members(&mut out, data, &self.fields, &mut keep_field);
        write_members(&mut out, data, &self.methods, &mut keep_method);
        out.extend_from_slice(&data[self.methods_end..]);
        out
    }
}

fn member_spans(
    reader: &mut ByteReader<'_>,
    pool: &ConstantPool,
) -> Result<Vec<MemberSpan>, ClassFormatError> {
    let count = reader.read_u2()?;
    let mut spans = Vec::with_capacity(count as usize);
    for _ in 0..count {
        let start = reader.position();
        reader.skip(2)?;
        let name = pool.utf8(reader.read_u2()?)?.to_string();
        let descriptor = pool.utf8(reader.read_u2()?)?.to_string();
        reader.skip_attributes()?;
        spans.push(MemberSpan {
            name,
            descriptor,
            range: start..reader.position(),
        });
    }
    Ok(spans)
}

fn write_members(
    out: &mut Vec<u8>,
    data: &[u8],
    spans: &[MemberSpan],
    keep: &mut impl FnMut(&MemberSpan) -> bool,
) {
    let kept: Vec<&MemberSpan> = spans.iter().filter(|span| keep(span)).collect();
    out.extend_from_slice(&(kept.len() as u16).to_be_bytes());
    for span in kept {
        out.extend_from_slice(&data[span.range.clone()]);
    }
}
