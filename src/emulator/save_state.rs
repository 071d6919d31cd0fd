// Save state functionality
//
// One visitor walks every persistent field in a fixed, documented order:
// bools and bytes as single bytes, wider integers little-endian, arrays
// element-wise. The same walk serves saving and loading, so the layout
// can never diverge between the two directions. A short magic/version
// header guards against loading foreign or stale data.

use std::fmt;

/// Magic bytes at the start of every save state
pub(crate) const STATE_MAGIC: [u8; 4] = *b"SNRS";

/// Current save state format version
pub(crate) const STATE_VERSION: u32 = 1;

/// Errors that can occur during save state operations
#[derive(Debug)]
pub enum SaveStateError {
    /// Data does not start with the save state magic
    BadMagic,

    /// Save state version mismatch
    VersionMismatch { expected: u32, found: u32 },

    /// Data ran out, or bytes were left over after the state walk
    LengthMismatch,
}

impl fmt::Display for SaveStateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SaveStateError::BadMagic => write!(f, "not a save state"),
            SaveStateError::VersionMismatch { expected, found } => {
                write!(f, "version mismatch: expected {}, found {}", expected, found)
            }
            SaveStateError::LengthMismatch => write!(f, "save state length mismatch"),
        }
    }
}

impl std::error::Error for SaveStateError {}

enum Mode {
    Save,
    Load,
}

/// Field-order state visitor
///
/// In save mode every `handle_*` call appends the field to the buffer; in
/// load mode it overwrites the field from the buffer. Errors are sticky
/// and reported once by `finish_load`.
pub struct StateHandler {
    mode: Mode,
    data: Vec<u8>,
    pos: usize,
    short: bool,
}

impl StateHandler {
    pub(crate) fn for_save() -> Self {
        StateHandler {
            mode: Mode::Save,
            data: Vec::new(),
            pos: 0,
            short: false,
        }
    }

    pub(crate) fn for_load(data: &[u8]) -> Self {
        StateHandler {
            mode: Mode::Load,
            data: data.to_vec(),
            pos: 0,
            short: false,
        }
    }

    pub(crate) fn is_load(&self) -> bool {
        matches!(self.mode, Mode::Load)
    }

    pub(crate) fn finish_save(self) -> Vec<u8> {
        self.data
    }

    pub(crate) fn finish_load(self) -> Result<(), SaveStateError> {
        if self.short || self.pos != self.data.len() {
            Err(SaveStateError::LengthMismatch)
        } else {
            Ok(())
        }
    }

    fn byte(&mut self, field: &mut u8) {
        match self.mode {
            Mode::Save => self.data.push(*field),
            Mode::Load => {
                if let Some(&b) = self.data.get(self.pos) {
                    *field = b;
                    self.pos += 1;
                } else {
                    self.short = true;
                }
            }
        }
    }

    pub fn handle_bool(&mut self, field: &mut bool) {
        let mut b = *field as u8;
        self.byte(&mut b);
        *field = b != 0;
    }

    pub fn handle_u8(&mut self, field: &mut u8) {
        self.byte(field);
    }

    pub fn handle_u16(&mut self, field: &mut u16) {
        let mut bytes = field.to_le_bytes();
        for b in bytes.iter_mut() {
            self.byte(b);
        }
        *field = u16::from_le_bytes(bytes);
    }

    pub fn handle_i16(&mut self, field: &mut i16) {
        let mut bytes = field.to_le_bytes();
        for b in bytes.iter_mut() {
            self.byte(b);
        }
        *field = i16::from_le_bytes(bytes);
    }

    pub fn handle_u32(&mut self, field: &mut u32) {
        let mut bytes = field.to_le_bytes();
        for b in bytes.iter_mut() {
            self.byte(b);
        }
        *field = u32::from_le_bytes(bytes);
    }

    pub fn handle_i32(&mut self, field: &mut i32) {
        let mut bytes = field.to_le_bytes();
        for b in bytes.iter_mut() {
            self.byte(b);
        }
        *field = i32::from_le_bytes(bytes);
    }

    pub fn handle_u64(&mut self, field: &mut u64) {
        let mut bytes = field.to_le_bytes();
        for b in bytes.iter_mut() {
            self.byte(b);
        }
        *field = u64::from_le_bytes(bytes);
    }

    pub fn handle_u8_array(&mut self, fields: &mut [u8]) {
        for field in fields.iter_mut() {
            self.byte(field);
        }
    }

    pub fn handle_u16_slice(&mut self, fields: &mut [u16]) {
        for field in fields.iter_mut() {
            self.handle_u16(field);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip_preserves_fields() {
        let mut flag = true;
        let mut word = 0x1234u16;
        let mut long = 0xdead_beef_cafe_f00du64;
        let mut arr = [1u8, 2, 3];

        let mut sh = StateHandler::for_save();
        sh.handle_bool(&mut flag);
        sh.handle_u16(&mut word);
        sh.handle_u64(&mut long);
        sh.handle_u8_array(&mut arr);
        let data = sh.finish_save();

        let mut flag2 = false;
        let mut word2 = 0u16;
        let mut long2 = 0u64;
        let mut arr2 = [0u8; 3];
        let mut sh = StateHandler::for_load(&data);
        sh.handle_bool(&mut flag2);
        sh.handle_u16(&mut word2);
        sh.handle_u64(&mut long2);
        sh.handle_u8_array(&mut arr2);
        sh.finish_load().unwrap();

        assert!(flag2);
        assert_eq!(word2, 0x1234);
        assert_eq!(long2, 0xdead_beef_cafe_f00d);
        assert_eq!(arr2, [1, 2, 3]);
    }

    #[test]
    fn test_short_data_is_rejected() {
        let mut sh = StateHandler::for_load(&[0x01]);
        let mut word = 0u16;
        sh.handle_u16(&mut word);
        assert!(sh.finish_load().is_err());
    }

    #[test]
    fn test_trailing_data_is_rejected() {
        let mut sh = StateHandler::for_load(&[0x01, 0x02, 0x03]);
        let mut byte = 0u8;
        sh.handle_u8(&mut byte);
        assert!(sh.finish_load().is_err());
    }
}
