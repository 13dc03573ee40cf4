//! Bounds-checked little-endian reads over a byte buffer.

use byteorder::{ByteOrder, LittleEndian};

use crate::{text::decode_text, DecodeError, Result};

pub fn read_bytes(buf: &[u8], offset: usize, len: usize) -> Result<&[u8]> {
    offset
        .checked_add(len)
        .and_then(|end| buf.get(offset..end))
        .ok_or(DecodeError::MalformedInput {
            offset,
            len,
            available: buf.len(),
        })
}

pub fn read_u8(buf: &[u8], offset: usize) -> Result<u8> {
    Ok(read_bytes(buf, offset, 1)?[0])
}

pub fn read_u16(buf: &[u8], offset: usize) -> Result<u16> {
    Ok(LittleEndian::read_u16(read_bytes(buf, offset, 2)?))
}

pub fn read_u32(buf: &[u8], offset: usize) -> Result<u32> {
    Ok(LittleEndian::read_u32(read_bytes(buf, offset, 4)?))
}

/// Reads an unsigned integer of `width` bytes (1, 2 or 4).
pub(crate) fn read_uint(buf: &[u8], offset: usize, width: usize) -> Result<u32> {
    match width {
        1 => read_u8(buf, offset).map(u32::from),
        2 => read_u16(buf, offset).map(u32::from),
        4 => read_u32(buf, offset),
        _ => unreachable!("unsupported integer width {width}"),
    }
}

pub fn read_text(buf: &[u8], offset: usize, len: usize) -> Result<String> {
    Ok(decode_text(read_bytes(buf, offset, len)?))
}
