//! JVM descriptor parsing.
//!
//! Descriptors are kept as borrowed slices of the original string; nothing here
//! allocates except the argument list of a method descriptor.

use thiserror::Error;

/// A descriptor that does not follow the JVM grammar.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("malformed descriptor '{0}'")]
pub struct DescriptorError(pub String);

/// A method descriptor split into its argument and return field descriptors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodDescriptor<'a> {
    pub arguments: Vec<&'a str>,
    /// `V` for void methods.
    pub return_type: &'a str,
}

/// Returns true when `descriptor` describes a method rather than a field.
pub fn is_method_descriptor(descriptor: &str) -> bool {
    descriptor.starts_with('(')
}

/// Returns the internal name of the class a field descriptor refers to.
///
/// Arrays resolve to their element type; primitives (and `V`) yield `None`.
///
/// # Examples
///
/// ```
/// use codecleaver::base::descriptor::element_type_name;
///
/// assert_eq!(element_type_name("[[Ljava/lang/String;").unwrap(), Some("java/lang/String"));
/// assert_eq!(element_type_name("[I").unwrap(), None);
/// ```
pub fn element_type_name(descriptor: &str) -> Result<Option<&str>, DescriptorError> {
    if descriptor == "V" {
        return Ok(None);
    }
    let end = field_type_end(descriptor, 0)?;
    if end != descriptor.len() {
        return Err(DescriptorError(descriptor.to_string()));
    }
    let element = descriptor.trim_start_matches('[');
    match element.as_bytes().first() {
        Some(b'L') => Ok(Some(&element[1..element.len() - 1])),
        _ => Ok(None),
    }
}

/// Splits a method descriptor such as `(I[Ljava/lang/String;)V`.
pub fn method_parts(descriptor: &str) -> Result<MethodDescriptor<'_>, DescriptorError> {
    let malformed = || DescriptorError(descriptor.to_string());
    if !is_method_descriptor(descriptor) {
        return Err(malformed());
    }

    let mut arguments = Vec::new();
    let mut pos = 1;
    loop {
        match descriptor.as_bytes().get(pos) {
            Some(b')') => break,
            Some(_) => {
                let end = field_type_end(descriptor, pos)?;
                arguments.push(&descriptor[pos..end]);
                pos = end;
            }
            None => return Err(malformed()),
        }
    }

    let return_type = &descriptor[pos + 1..];
    if return_type != "V" && field_type_end(descriptor, pos + 1)? != descriptor.len() {
        return Err(malformed());
    }

    Ok(MethodDescriptor {
        arguments,
        return_type,
    })
}

/// Returns the byte offset one past the field type starting at `start`.
fn field_type_end(descriptor: &str, start: usize) -> Result<usize, DescriptorError> {
    let bytes = descriptor.as_bytes();
    let mut pos = start;
    while bytes.get(pos) == Some(&b'[') {
        pos += 1;
    }
    match bytes.get(pos) {
        Some(b'B' | b'C' | b'D' | b'F' | b'I' | b'J' | b'S' | b'Z') => Ok(pos + 1),
        Some(b'L') => match descriptor[pos..].find(';') {
            Some(semi) if semi > 1 => Ok(pos + semi + 1),
            _ => Err(DescriptorError(descriptor.to_string())),
        },
        _ => Err(DescriptorError(descriptor.to_string())),
    }
}
