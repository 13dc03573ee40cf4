use byteorder::{ByteOrder, LittleEndian};

use crate::{
    layout::{Field, FieldKind, Layout},
    Result,
};

pub const SECTION_SIZE: usize = 0x1000;
pub const SECTION_DATA_SIZE: usize = 3968;
pub const SECTION_ID_OFFSET: usize = 0x0ff4;

pub const SECTION_LAYOUT: Layout = Layout::new(&[
    Field::new("data", FieldKind::Bytes(SECTION_DATA_SIZE)),
    Field::at("section_id", FieldKind::U16, SECTION_ID_OFFSET),
    Field::new("checksum", FieldKind::U16),
    Field::new("signature", FieldKind::U32),
    Field::new("save_index", FieldKind::U32),
]);

#[derive(Clone, Debug)]
pub struct Section {
    pub data: Vec<u8>,
    pub section_id: u16,
    pub checksum: u16,
    pub signature: u32,
    pub save_index: u32,
}

impl Section {
    pub fn from_bytes(section_data: &[u8]) -> Result<Self> {
        let record = SECTION_LAYOUT.decode(section_data)?;
        Ok(Section {
            data: record.bytes("data")?.to_vec(),
            section_id: record.u16("section_id")?,
            checksum: record.u16("checksum")?,
            signature: record.u32("signature")?,
            save_index: record.u32("save_index")?,
        })
    }

    /// Whether the stored checksum matches the payload. Never used to reject a section.
    pub fn checksum_valid(&self) -> bool {
        compute_section_checksum(&self.data) == self.checksum
    }
}

pub fn compute_section_checksum(data: &[u8]) -> u16 {
    let checksum = data
        .chunks_exact(4)
        .map(LittleEndian::read_u32)
        .fold(0u32, |sum, dword| sum.wrapping_add(dword));

    let checksum_lower = (checksum & 0xffff) as u16;
    let checksum_upper = (checksum >> 16) as u16;
    checksum_upper.wrapping_add(checksum_lower)
}
