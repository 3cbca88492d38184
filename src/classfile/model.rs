use super::annotation::{Annotation, read_annotations};
use super::code::{Code, read_code};
use super::constant_pool::ConstantPool;
use super::error::ClassFormatError;
use super::reader::ByteReader;

/// `ACC_SYNTHETIC`; also implied by a legacy `Synthetic` attribute.
const ACC_SYNTHETIC: u16 = 0x1000;

/// Controls how much of a class file is decoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecodeOptions {
    /// Decode `Code` attributes (instructions, handlers, local variables).
    pub code: bool,
    /// Decode `LocalVariableTable` entries inside `Code`.
    pub debug_info: bool,
}

impl Default for DecodeOptions {
    fn default() -> Self {
        Self {
            code: true,
            debug_info: true,
        }
    }
}

impl DecodeOptions {
    /// Header, members and annotations only.
    pub fn declarations() -> Self {
        Self {
            code: false,
            debug_info: false,
        }
    }
}

/// A decoded class file.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassFile {
    pub minor_version: u16,
    pub major_version: u16,
    pub access: u16,
    /// Internal name, e.g. `java/util/Map$Entry`.
    pub name: String,
    pub signature: Option<String>,
    pub super_name: Option<String>,
    pub interfaces: Vec<String>,
    pub annotations: Vec<Annotation>,
    pub outer_class: Option<OuterClass>,
    pub inner_classes: Vec<InnerClass>,
    pub fields: Vec<Member>,
    pub methods: Vec<Member>,
}

/// Contents of an `EnclosingMethod` attribute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OuterClass {
    pub owner: String,
    pub method_name: Option<String>,
    pub method_descriptor: Option<String>,
}

/// One row of an `InnerClasses` attribute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InnerClass {
    pub name: String,
    /// Absent for local and anonymous classes.
    pub outer_name: Option<String>,
    pub inner_name: Option<String>,
    pub access: u16,
}

/// A field or method.
#[derive(Debug, Clone, PartialEq)]
pub struct Member {
    pub access: u16,
    pub name: String,
    pub descriptor: String,
    pub signature: Option<String>,
    /// Declared exception types (methods only).
    pub exceptions: Vec<String>,
    pub annotations: Vec<Annotation>,
    pub code: Option<Code>,
}

impl ClassFile {
    pub fn parse(data: &[u8], options: DecodeOptions) -> Result<Self, ClassFormatError> {
        let mut reader = ByteReader::new(data);
        reader.expect_magic()?;
        let minor_version = reader.read_u2()?;
        let major_version = reader.read_u2()?;
        let pool = ConstantPool::parse(&mut reader)?;

        let mut access = reader.read_u2()?;
        let name = pool.class_name(reader.read_u2()?)?.to_string();
        let super_name = pool
            .optional_class_name(reader.read_u2()?)?
            .map(str::to_string);
        let interface_count = reader.read_u2()?;
        let mut interfaces = Vec::with_capacity(interface_count as usize);
        for _ in 0..interface_count {
            interfaces.push(pool.class_name(reader.read_u2()?)?.to_string());
        }

        let fields = read_members(&mut reader, &pool, options)?;
        let methods = read_members(&mut reader, &pool, options)?;

        let mut signature = None;
        let mut annotations = Vec::new();
        let mut outer_class = None;
        let mut inner_classes = Vec::new();

        let attributes = reader.read_u2()?;
        for _ in 0..attributes {
            let attribute = pool.utf8(reader.read_u2()?)?;
            let len = reader.read_u4()? as usize;
            let mut body = ByteReader::new(reader.read_slice(len)?);
            match attribute {
                "Signature" => signature = Some(pool.utf8(body.read_u2()?)?.to_string()),
                "RuntimeVisibleAnnotations" | "RuntimeInvisibleAnnotations" => {
                    annotations.extend(read_annotations(&mut body, &pool)?)
                }
                "InnerClasses" => {
                    let count = body.read_u2()?;
                    for _ in 0..count {
                        let name = pool.class_name(body.read_u2()?)?.to_string();
                        let outer_name = pool
                            .optional_class_name(body.read_u2()?)?
                            .map(str::to_string);
                        let inner_name = pool.optional_utf8(body.read_u2()?)?.map(str::to_string);
                        let access = body.read_u2()?;
                        inner_classes.push(InnerClass {
                            name,
                            outer_name,
                            inner_name,
                            access,
                        });
                    }
                }
                "EnclosingMethod" => {
                    let owner = pool.class_name(body.read_u2()?)?.to_string();
                    let method = body.read_u2()?;
                    let (method_name, method_descriptor) = if method == 0 {
                        (None, None)
                    } else {
                        let (name, descriptor) = pool.name_and_type(method)?;
                        (Some(name.to_string()), Some(descriptor.to_string()))
                    };
                    outer_class = Some(OuterClass {
                        owner,
                        method_name,
                        method_descriptor,
                    });
                }
                "Synthetic" => access |= ACC_SYNTHETIC,
                _ => {}
            }
        }

        Ok(Self {
            minor_version,
            major_version,
            access,
            name,
            signature,
            super_name,
            interfaces,
            annotations,
            outer_class,
            inner_classes,
            fields,
            methods,
        })
    }
}

fn read_members(
    reader: &mut ByteReader<'_>,
    pool: &ConstantPool,
    options: DecodeOptions,
) -> Result<Vec<Member>, ClassFormatError> {
    let count = reader.read_u2()?;
    let mut members = Vec::with_capacity(count as usize);
    for _ in 0..count {
        let mut access = reader.read_u2()?;
        let name = pool.utf8(reader.read_u2()?)?.to_string();
        let descriptor = pool.utf8(reader.read_u2()?)?.to_string();
        let mut member = Member {
            access,
            name,
            descriptor,
            signature: None,
            exceptions: Vec::new(),
            annotations: Vec::new(),
            code: None,
        };

        let attributes = reader.read_u2()?;
        for _ in 0..attributes {
            let attribute = pool.utf8(reader.read_u2()?)?;
            let len = reader.read_u4()? as usize;
            let mut body = ByteReader::new(reader.read_slice(len)?);
            match attribute {
                "Signature" => member.signature = Some(pool.utf8(body.read_u2()?)?.to_string()),
                "Exceptions" => {
                    let count = body.read_u2()?;
                    for _ in 0..count {
                        member
                            .exceptions
                            .push(pool.class_name(body.read_u2()?)?.to_string());
                    }
                }
                "Code" if options.code => {
                    member.code = Some(read_code(&mut body, pool, options.debug_info)?)
                }
                "RuntimeVisibleAnnotations" | "RuntimeInvisibleAnnotations" => {
                    member
                        .annotations
                        .extend(read_annotations(&mut body, pool)?)
                }
                "Synthetic" => access |= ACC_SYNTHETIC,
                _ => {}
            }
        }
        member.access = access;
        members.push(member);
    }
    Ok(members)
}
