use thiserror::Error;

pub type Result<T> = std::result::Result<T, DecodeError>;

#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("Malformed input: {len} bytes at 0x{offset:x} exceed buffer of {available} bytes")]
    MalformedInput {
        offset: usize,
        len: usize,
        available: usize,
    },

    #[error("Save slot at 0x{slot_offset:x} has no section with id {section_id}")]
    MissingSection {
        slot_offset: usize,
        section_id: u16,
    },

    #[error("Save data ends before the slot at 0x{slot_offset:x}")]
    MissingSlot { slot_offset: usize },

    #[error("Field `{0}` appears more than once in a layout")]
    DuplicateField(&'static str),

    #[error("Field `{0}` is not part of the decoded record")]
    MissingField(&'static str),

    #[error("Field `{name}` is not a {expected}")]
    FieldType {
        name: &'static str,
        expected: &'static str,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid game data: {0}")]
    Data(#[from] serde_json::Error),
}

impl DecodeError {
    /// Errors which only disqualify the save slot they came from.
    pub fn is_slot_local(&self) -> bool {
        matches!(
            self,
            DecodeError::MissingSection { .. } | DecodeError::MissingSlot { .. }
        )
    }
}
