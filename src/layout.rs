//! Declarative field layouts for the fixed-size records of a save file.
//!
//! Most records are laid out back to back, but a handful of fields live at a
//! fixed offset inside an otherwise sequential record. A [`Layout`] lists the
//! fields in order; fields with an explicit offset move the cursor there and
//! the fields after them continue sequentially.

use std::collections::HashMap;

use crate::{codec, DecodeError, Result};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FieldKind {
    U8,
    U16,
    U32,
    Bytes(usize),
    Text(usize),
}

impl FieldKind {
    pub const fn size(&self) -> usize {
        match *self {
            FieldKind::U8 => 1,
            FieldKind::U16 => 2,
            FieldKind::U32 => 4,
            FieldKind::Bytes(len) | FieldKind::Text(len) => len,
        }
    }
}

#[derive(Clone, Copy, Debug)]
pub struct Field {
    pub name: &'static str,
    pub kind: FieldKind,
    pub offset: Option<usize>,
}

impl Field {
    pub const fn new(name: &'static str, kind: FieldKind) -> Self {
        Field {
            name,
            kind,
            offset: None,
        }
    }

    pub const fn at(name: &'static str, kind: FieldKind, offset: usize) -> Self {
        Field {
            name,
            kind,
            offset: Some(offset),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Value {
    Unsigned(u32),
    Bytes(Vec<u8>),
    Text(String),
}

#[derive(Clone, Copy, Debug)]
pub struct Layout {
    fields: &'static [Field],
}

impl Layout {
    pub const fn new(fields: &'static [Field]) -> Self {
        Layout { fields }
    }

    /// Offset just past the last field.
    pub fn size(&self) -> usize {
        self.fields.iter().fold(0, |offset, field| {
            field.offset.unwrap_or(offset) + field.kind.size()
        })
    }

    pub fn decode(&self, buf: &[u8]) -> Result<Record> {
        let mut values = HashMap::with_capacity(self.fields.len());
        let mut offset = 0;

        for field in self.fields {
            offset = field.offset.unwrap_or(offset);
            let value = match field.kind {
                FieldKind::U8 | FieldKind::U16 | FieldKind::U32 => {
                    Value::Unsigned(codec::read_uint(buf, offset, field.kind.size())?)
                }
                FieldKind::Bytes(len) => {
                    Value::Bytes(codec::read_bytes(buf, offset, len)?.to_vec())
                }
                FieldKind::Text(len) => Value::Text(codec::read_text(buf, offset, len)?),
            };
            if values.insert(field.name, value).is_some() {
                return Err(DecodeError::DuplicateField(field.name));
            }
            offset += field.kind.size();
        }

        Ok(Record {
            values,
            size: offset,
        })
    }
}

#[derive(Clone, Debug)]
pub struct Record {
    values: HashMap<&'static str, Value>,
    size: usize,
}

impl Record {
    /// Number of bytes consumed, i.e. the end of the last decoded field.
    pub fn size(&self) -> usize {
        self.size
    }

    pub fn get(&self, name: &'static str) -> Result<&Value> {
        self.values.get(name).ok_or(DecodeError::MissingField(name))
    }

    fn unsigned(&self, name: &'static str) -> Result<u32> {
        match self.get(name)? {
            Value::Unsigned(value) => Ok(*value),
            _ => Err(DecodeError::FieldType {
                name,
                expected: "unsigned integer",
            }),
        }
    }

    // Narrowing below cannot truncate: a field is read with the width its kind declares.
    pub fn u8(&self, name: &'static str) -> Result<u8> {
        self.unsigned(name).map(|value| value as u8)
    }

    pub fn u16(&self, name: &'static str) -> Result<u16> {
        self.unsigned(name).map(|value| value as u16)
    }

    pub fn u32(&self, name: &'static str) -> Result<u32> {
        self.unsigned(name)
    }

    pub fn bytes(&self, name: &'static str) -> Result<&[u8]> {
        match self.get(name)? {
            Value::Bytes(bytes) => Ok(bytes),
            _ => Err(DecodeError::FieldType {
                name,
                expected: "byte run",
            }),
        }
    }

    pub fn text(&self, name: &'static str) -> Result<&str> {
        match self.get(name)? {
            Value::Text(text) => Ok(text),
            _ => Err(DecodeError::FieldType {
                name,
                expected: "text run",
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MIXED: Layout = Layout::new(&[
        Field::new("head", FieldKind::U16),
        Field::new("body", FieldKind::Bytes(3)),
        Field::at("tag", FieldKind::U8, 8),
        Field::new("tail", FieldKind::U32),
    ]);

    #[test]
    fn test_sequential_and_explicit_offsets() {
        let buf = [
            0x34, 0x12, 0xaa, 0xbb, 0xcc, 0x00, 0x00, 0x00, 0x7f, 0x01, 0x00, 0x00, 0x80,
        ];
        let record = MIXED.decode(&buf).unwrap();
        assert_eq!(record.u16("head").unwrap(), 0x1234);
        assert_eq!(record.bytes("body").unwrap(), &[0xaa, 0xbb, 0xcc]);
        assert_eq!(record.u8("tag").unwrap(), 0x7f);
        assert_eq!(record.u32("tail").unwrap(), 0x8000_0001);
        assert_eq!(record.size(), 13);
        assert_eq!(MIXED.size(), 13);
    }

    #[test]
    fn test_short_buffer_is_malformed() {
        let buf = [0u8; 12];
        assert!(matches!(
            MIXED.decode(&buf),
            Err(DecodeError::MalformedInput { offset: 9, .. })
        ));
    }

    #[test]
    fn test_duplicate_names_rejected() {
        const DUPLICATE: Layout = Layout::new(&[
            Field::new("value", FieldKind::U8),
            Field::new("value", FieldKind::U8),
        ]);
        assert!(matches!(
            DUPLICATE.decode(&[0, 0]),
            Err(DecodeError::DuplicateField("value"))
        ));
    }

    #[test]
    fn test_typed_getters() {
        const TEXT: Layout = Layout::new(&[Field::new("name", FieldKind::Text(3))]);
        let record = TEXT.decode(&[0xbb, 0xbc, 0xff]).unwrap();
        assert_eq!(record.text("name").unwrap(), "AB");
        assert!(matches!(
            record.u8("name"),
            Err(DecodeError::FieldType { name: "name", .. })
        ));
        assert!(matches!(
            record.bytes("missing"),
            Err(DecodeError::MissingField("missing"))
        ));
    }
}
