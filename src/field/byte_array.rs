// gfaedit: Reading, validating, editing and rewriting GFA assembly graphs.
//
// Copyright 2025 Tommi Mäklin [tommi@maklin.fi].
//
// Copyrights in this project are retained by contributors. No copyright assignment
// is required to contribute to this project.
//
// Except as otherwise noted (below and/or in individual files), this
// project is licensed under the Apache License, Version 2.0
// <LICENSE-APACHE> or <http://www.apache.org/licenses/LICENSE-2.0> or
// the MIT license, <LICENSE-MIT> or <http://opensource.org/licenses/MIT>,
// at your option.
//
use crate::error::GfaError;

/// Bytes stored in `H` tags as hexadecimal text.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct ByteArray(Vec<u8>);

impl ByteArray {
    pub fn new(bytes: Vec<u8>) -> Self {
        ByteArray(bytes)
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.0
    }

    pub fn get(&self, index: usize) -> Option<u8> {
        self.0.get(index).copied()
    }

    pub fn push(&mut self, byte: u8) {
        self.0.push(byte);
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, u8> {
        self.0.iter()
    }
}

pub fn validate_encoded(text: &str) -> Result<(), GfaError> {
    if text.is_empty() || text.len() % 2 != 0 {
        return Err(GfaError::Format(format!("byte array '{}' must have an even, positive length", text)))
    }
    if !text.bytes().all(|x| x.is_ascii_hexdigit()) {
        return Err(GfaError::Format(format!("byte array '{}' contains non-hexadecimal characters", text)))
    }
    Ok(())
}

pub fn validate(bytes: &ByteArray) -> Result<(), GfaError> {
    if bytes.is_empty() {
        return Err(GfaError::Value("byte array is empty".to_string()))
    }
    Ok(())
}

/// Decode pairs of hex digits into bytes.
pub fn decode(text: &str) -> Result<ByteArray, GfaError> {
    if text.len() % 2 != 0 || !text.is_ascii() {
        return Err(GfaError::Format(format!("byte array '{}' must have an even length", text)))
    }
    let bytes = (0..text.len()).step_by(2).map(|start| {
        u8::from_str_radix(&text[start..(start + 2)], 16)
            .map_err(|_| GfaError::Format(format!("'{}' is not a hex byte in '{}'", &text[start..(start + 2)], text)))
    }).collect::<Result<Vec<u8>, GfaError>>()?;
    Ok(ByteArray(bytes))
}

/// Encode as uppercase 2-digit hex per byte.
pub fn encode(bytes: &ByteArray) -> String {
    bytes.iter().map(|x| format!("{:02X}", x)).collect::<String>()
}

// Tests
#[cfg(test)]
mod tests {

    #[test]
    fn decode_and_encode_hex() {
        use super::{decode, encode, ByteArray};

        let got = decode("0aff1B").unwrap();
        assert_eq!(got, ByteArray::new(vec![10, 255, 27]));
        assert_eq!(encode(&got), "0AFF1B");
    }

    #[test]
    fn reject_odd_or_empty_text() {
        use super::validate_encoded;

        assert!(validate_encoded("").is_err());
        assert!(validate_encoded("ABC").is_err());
        assert!(validate_encoded("GG").is_err());
        assert!(validate_encoded("12AB").is_ok());
    }
}
