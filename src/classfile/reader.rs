use super::error::ClassFormatError;

const CLASS_MAGIC: u32 = 0xCAFE_BABE;

/// Big-endian cursor over class file bytes.
pub(crate) struct ByteReader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> ByteReader<'a> {
    pub(crate) fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    pub(crate) fn position(&self) -> usize {
        self.pos
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.pos >= self.data.len()
    }

    pub(crate) fn expect_magic(&mut self) -> Result<(), ClassFormatError> {
        let magic = self.read_u4()?;
        if magic != CLASS_MAGIC {
            return Err(ClassFormatError::InvalidMagic(magic));
        }
        Ok(())
    }

    pub(crate) fn read_u1(&mut self) -> Result<u8, ClassFormatError> {
        let byte = *self
            .data
            .get(self.pos)
            .ok_or(ClassFormatError::UnexpectedEof)?;
        self.pos += 1;
        Ok(byte)
    }

    pub(crate) fn read_u2(&mut self) -> Result<u16, ClassFormatError> {
        let bytes = self.read_slice(2)?;
        Ok(u16::from_be_bytes([bytes[0], bytes[1]]))
    }

    pub(crate) fn read_u4(&mut self) -> Result<u32, ClassFormatError> {
        let bytes = self.read_slice(4)?;
        Ok(u32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
    }

    pub(crate) fn read_i4(&mut self) -> Result<i32, ClassFormatError> {
        Ok(self.read_u4()? as i32)
    }

    pub(crate) fn read_slice(&mut self, len: usize) -> Result<&'a [u8], ClassFormatError> {
        let end = self
            .pos
            .checked_add(len)
            .ok_or(ClassFormatError::UnexpectedEof)?;
        let slice = self
            .data
            .get(self.pos..end)
            .ok_or(ClassFormatError::UnexpectedEof)?;
        self.pos = end;
        Ok(slice)
    }

    pub(crate) fn skip(&mut self, len: usize) -> Result<(), ClassFormatError> {
        self.read_slice(len).map(|_| ())
    }

    /// Skips an `attributes_count` table without interpreting it.
    pub(crate) fn skip_attributes(&mut self) -> Result<(), ClassFormatError> {
        let count = self.read_u2()?;
        for _ in 0..count {
            self.skip(2)?;
            let len = self.read_u4()? as usize;
            self.skip(len)?;
        }
        Ok(())
    }
}
