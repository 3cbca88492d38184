//! Assembles minimal, valid class files.

use std::collections::HashMap;

pub const ACC_PUBLIC: u16 = 0x0001;
pub const ACC_STATIC: u16 = 0x0008;
pub const ACC_INTERFACE: u16 = 0x0200;
pub const ACC_ABSTRACT: u16 = 0x0400;
pub const ACC_ANNOTATION: u16 = 0x2000;

const INVOKESPECIAL: u8 = 0xb7;
const INVOKESTATIC: u8 = 0xb8;
const RETURN: u8 = 0xb1;

/// A method call compiled into a body: opcode, owner, name, descriptor.
pub struct Call<'a>(pub u8, pub &'a str, pub &'a str, pub &'a str);

impl<'a> Call<'a> {
    pub fn special(owner: &'a str, name: &'a str, descriptor: &'a str) -> Self {
        Call(INVOKESPECIAL, owner, name, descriptor)
    }

    pub fn invoke_static(owner: &'a str, name: &'a str, descriptor: &'a str) -> Self {
        Call(INVOKESTATIC, owner, name, descriptor)
    }
}

/// Builds one class with a constant pool shared by all its parts.
pub struct ClassBuilder {
    pool: Vec<u8>,
    pool_count: u16,
    utf8: HashMap<String, u16>,
    access: u16,
    this_class: u16,
    super_class: u16,
    interfaces: Vec<u16>,
    fields: Vec<Vec<u8>>,
    methods: Vec<Vec<u8>>,
    attributes: Vec<Vec<u8>>,
}

impl ClassBuilder {
    pub fn new(name: &str, super_name: Option<&str>) -> Self {
        let mut builder = Self {
            pool: Vec::new(),
            pool_count: 1,
            utf8: HashMap::new(),
            access: ACC_PUBLIC | 0x0020,
            this_class: 0,
            super_class: 0,
            interfaces: Vec::new(),
            fields: Vec::new(),
            methods: Vec::new(),
            attributes: Vec::new(),
        };
        builder.this_class = builder.class(name);
        if let Some(super_name) = super_name {
            builder.super_class = builder.class(super_name);
        }
        builder
    }

    /// A public interface extending `java/lang/Object`.
    pub fn interface(name: &str) -> Self {
        Self::new(name, Some("java/lang/Object")).access(ACC_PUBLIC | ACC_INTERFACE | ACC_ABSTRACT)
    }

    pub fn access(mut self, access: u16) -> Self {
        self.access = access;
        self
    }

    pub fn implements(mut self, interface: &str) -> Self {
        let index = self.class(interface);
        self.interfaces.push(index);
        self
    }

    pub fn field(mut self, access: u16, name: &str, descriptor: &str) -> Self {
        let member = self.member(access, name, descriptor, Vec::new());
        self.fields.push(member);
        self
    }

    /// An abstract or native method without a body.
    pub fn abstract_method(mut self, access: u16, name: &str, descriptor: &str) -> Self {
        let member = self.member(access, name, descriptor, Vec::new());
        self.methods.push(member);
        self
    }

    /// A method whose body performs `calls` and returns.
    pub fn method(mut self, access: u16, name: &str, descriptor: &str, calls: &[Call<'_>]) -> Self {
        let mut code = Vec::new();
        for Call(opcode, owner, name, descriptor) in calls {
            let index = self.method_ref(owner, name, descriptor);
            code.push(*opcode);
            code.extend(index.to_be_bytes());
        }
        code.push(RETURN);

        let mut body = Vec::new();
        body.extend(4u16.to_be_bytes()); // max_stack
        body.extend(4u16.to_be_bytes()); // max_locals
        body.extend((code.len() as u32).to_be_bytes());
        body.extend(code);
        body.extend(0u16.to_be_bytes()); // exception table
        body.extend(0u16.to_be_bytes()); // attributes
        let attribute = self.attribute("Code", body);

        let member = self.member(access, name, descriptor, vec![attribute]);
        self.methods.push(member);
        self
    }

    /// A runtime-visible class annotation with string elements.
    pub fn annotation(mut self, type_name: &str, elements: &[(&str, &str)]) -> Self {
        let mut body = Vec::new();
        body.extend(1u16.to_be_bytes());
        let descriptor = self.utf8(&format!("L{type_name};"));
        body.extend(descriptor.to_be_bytes());
        body.extend((elements.len() as u16).to_be_bytes());
        for (name, value) in elements {
            let name = self.utf8(name);
            let value = self.utf8(value);
            body.extend(name.to_be_bytes());
            body.push(b's');
            body.extend(value.to_be_bytes());
        }
        let attribute = self.attribute("RuntimeVisibleAnnotations", body);
        self.attributes.push(attribute);
        self
    }

    pub fn build(self) -> Vec<u8> {
        let mut out = Vec::new();
        out.extend(0xCAFEBABEu32.to_be_bytes());
        out.extend(0u16.to_be_bytes());
        out.extend(50u16.to_be_bytes());
        out.extend(self.pool_count.to_be_bytes());
        out.extend(&self.pool);
        out.extend(self.access.to_be_bytes());
        out.extend(self.this_class.to_be_bytes());
        out.extend(self.super_class.to_be_bytes());
        out.extend((self.interfaces.len() as u16).to_be_bytes());
        for interface in &self.interfaces {
            out.extend(interface.to_be_bytes());
        }
        for table in [&self.fields, &self.methods, &self.attributes] {
            out.extend((table.len() as u16).to_be_bytes());
            for entry in table {
                out.extend(entry);
            }
        }
        out
    }

    // =========================================================================
    // Constant pool
    // =========================================================================

    fn push_constant(&mut self, bytes: &[u8]) -> u16 {
        let index = self.pool_count;
        self.pool.extend(bytes);
        self.pool_count += 1;
        index
    }

    fn utf8(&mut self, text: &str) -> u16 {
        if let Some(index) = self.utf8.get(text) {
            return *index;
        }
        let mut bytes = vec![1];
        bytes.extend((text.len() as u16).to_be_bytes());
        bytes.extend(text.as_bytes());
        let index = self.push_constant(&bytes);
        self.utf8.insert(text.to_string(), index);
        index
    }

    fn class(&mut self, name: &str) -> u16 {
        let name = self.utf8(name);
        let mut bytes = vec![7];
        bytes.extend(name.to_be_bytes());
        self.push_constant(&bytes)
    }

    fn method_ref(&mut self, owner: &str, name: &str, descriptor: &str) -> u16 {
        let class = self.class(owner);
        let name = self.utf8(name);
        let descriptor = self.utf8(descriptor);
        let mut name_and_type = vec![12];
        name_and_type.extend(name.to_be_bytes());
        name_and_type.extend(descriptor.to_be_bytes());
        let name_and_type = self.push_constant(&name_and_type);
        let mut bytes = vec![10];
        bytes.extend(class.to_be_bytes());
        bytes.extend(name_and_type.to_be_bytes());
        self.push_constant(&bytes)
    }

    fn attribute(&mut self, name: &str, body: Vec<u8>) -> Vec<u8> {
        let mut bytes = Vec::new();
        bytes.extend(self.utf8(name).to_be_bytes());
        bytes.extend((body.len() as u32).to_be_bytes());
        bytes.extend(body);
        bytes
    }

    fn member(
        &mut self,
        access: u16,
        name: &str,
        descriptor: &str,
        attributes: Vec<Vec<u8>>,
    ) -> Vec<u8> {
        let mut bytes = Vec::new();
        bytes.extend(access.to_be_bytes());
        bytes.extend(self.utf8(name).to_be_bytes());
        bytes.extend(self.utf8(descriptor).to_be_bytes());
        bytes.extend((attributes.len() as u16).to_be_bytes());
        for attribute in attributes {
            bytes.extend(attribute);
        }
        bytes
    }
}
