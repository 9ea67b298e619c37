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

//! Numeric arrays stored in `B` tags.
//!
//! The encoded form is the subtype letter followed by the comma separated
//! values, e.g. `C,18,72,244`. Encoding always picks the narrowest subtype
//! that covers the values, so re-encoding a decoded array gives its
//! canonical form.
//!
//! ## Usage
//!
//! ```rust
//! use gfaedit::field::numeric_array::{encode, NumericArray, NumericSubtype};
//!
//! let mut values = NumericArray::from_integers(vec![18, 72, 244, 70, 96, 38, 31]);
//! assert_eq!(values.subtype().unwrap(), NumericSubtype::UInt8);
//! assert_eq!(encode(&values).unwrap(), "C,18,72,244,70,96,38,31");
//!
//! values.set_integer(2, -2).unwrap();
//! assert_eq!(values.subtype().unwrap(), NumericSubtype::Int8);
//! ```
//!

use crate::error::GfaError;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum NumericSubtype {
    Int8,
    UInt8,
    Int16,
    UInt16,
    Int32,
    UInt32,
    Float,
}

impl NumericSubtype {
    pub fn from_char(c: char) -> Result<Self, GfaError> {
        match c {
            'c' => Ok(NumericSubtype::Int8),
            'C' => Ok(NumericSubtype::UInt8),
            's' => Ok(NumericSubtype::Int16),
            'S' => Ok(NumericSubtype::UInt16),
            'i' => Ok(NumericSubtype::Int32),
            'I' => Ok(NumericSubtype::UInt32),
            'f' => Ok(NumericSubtype::Float),
            _ => Err(GfaError::Type(format!("'{}' is not a numeric array subtype", c))),
        }
    }

    pub fn as_char(self) -> char {
        match self {
            NumericSubtype::Int8 => 'c',
            NumericSubtype::UInt8 => 'C',
            NumericSubtype::Int16 => 's',
            NumericSubtype::UInt16 => 'S',
            NumericSubtype::Int32 => 'i',
            NumericSubtype::UInt32 => 'I',
            NumericSubtype::Float => 'f',
        }
    }

    /// Inclusive range of an integer subtype.
    pub fn range(self) -> Option<(i64, i64)> {
        match self {
            NumericSubtype::Int8 => Some((i8::MIN as i64, i8::MAX as i64)),
            NumericSubtype::UInt8 => Some((0, u8::MAX as i64)),
            NumericSubtype::Int16 => Some((i16::MIN as i64, i16::MAX as i64)),
            NumericSubtype::UInt16 => Some((0, u16::MAX as i64)),
            NumericSubtype::Int32 => Some((i32::MIN as i64, i32::MAX as i64)),
            NumericSubtype::UInt32 => Some((0, u32::MAX as i64)),
            NumericSubtype::Float => None,
        }
    }

    /// Narrowest integer subtype covering `[min, max]`.
    pub fn covering(
        min: i64,
        max: i64,
    ) -> Result<Self, GfaError> {
        let candidates = if min >= 0 {
            [NumericSubtype::UInt8, NumericSubtype::UInt16, NumericSubtype::UInt32]
        } else {
            [NumericSubtype::Int8, NumericSubtype::Int16, NumericSubtype::Int32]
        };
        candidates.into_iter().find(|subtype| {
            let (lo, hi) = subtype.range().unwrap_or((0, 0));
            min >= lo && max <= hi
        }).ok_or_else(|| GfaError::Value(format!("values in [{}, {}] do not fit a numeric array subtype", min, max)))
    }
}

/// Homogeneous array of integers or floats.
#[derive(Clone, Debug, PartialEq)]
pub enum NumericArray {
    Integers(Vec<i64>),
    Floats(Vec<f64>),
}

impl Default for NumericArray {
    fn default() -> Self {
        NumericArray::Integers(Vec::new())
    }
}

impl NumericArray {
    pub fn from_integers(values: Vec<i64>) -> Self {
        NumericArray::Integers(values)
    }

    pub fn from_floats(values: Vec<f64>) -> Self {
        NumericArray::Floats(values)
    }

    /// Build an array from JSON numbers, failing on mixed content.
    pub fn from_json(values: &[serde_json::Value]) -> Result<Self, GfaError> {
        if values.iter().all(|x| x.is_i64()) {
            Ok(NumericArray::Integers(values.iter().filter_map(|x| x.as_i64()).collect()))
        } else if values.iter().all(|x| x.is_f64()) {
            Ok(NumericArray::Floats(values.iter().filter_map(|x| x.as_f64()).collect()))
        } else {
            Err(GfaError::Value("numeric array values must be all integers or all floats".to_string()))
        }
    }

    pub fn len(&self) -> usize {
        match self {
            NumericArray::Integers(values) => values.len(),
            NumericArray::Floats(values) => values.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn integers(&self) -> Option<&[i64]> {
        match self {
            NumericArray::Integers(values) => Some(values),
            NumericArray::Floats(_) => None,
        }
    }

    pub fn floats(&self) -> Option<&[f64]> {
        match self {
            NumericArray::Floats(values) => Some(values),
            NumericArray::Integers(_) => None,
        }
    }

    pub fn push_integer(&mut self, value: i64) -> Result<(), GfaError> {
        match self {
            NumericArray::Integers(values) => { values.push(value); Ok(()) },
            NumericArray::Floats(_) => Err(GfaError::Type("can not add an integer to a float array".to_string())),
        }
    }

    pub fn push_float(&mut self, value: f64) -> Result<(), GfaError> {
        match self {
            NumericArray::Floats(values) => { values.push(value); Ok(()) },
            NumericArray::Integers(_) => Err(GfaError::Type("can not add a float to an integer array".to_string())),
        }
    }

    pub fn set_integer(
        &mut self,
        index: usize,
        value: i64,
    ) -> Result<(), GfaError> {
        match self {
            NumericArray::Integers(values) => {
                let slot = values.get_mut(index)
                    .ok_or_else(|| GfaError::NotFound(format!("no element {} in numeric array", index)))?;
                *slot = value;
                Ok(())
            },
            NumericArray::Floats(_) => Err(GfaError::Type("can not store an integer in a float array".to_string())),
        }
    }

    /// Narrowest subtype covering the values.
    pub fn subtype(&self) -> Result<NumericSubtype, GfaError> {
        match self {
            NumericArray::Floats(_) => Ok(NumericSubtype::Float),
            NumericArray::Integers(values) => {
                let min = values.iter().copied().min().unwrap_or(0);
                let max = values.iter().copied().max().unwrap_or(0);
                NumericSubtype::covering(min, max)
            },
        }
    }
}

pub fn validate(values: &NumericArray) -> Result<(), GfaError> {
    values.subtype()?;
    if let NumericArray::Floats(floats) = values {
        if floats.iter().any(|x| !x.is_finite()) {
            return Err(GfaError::Value("numeric array contains a non-finite value".to_string()))
        }
    }
    Ok(())
}

/// Decode `<subtype>,<v1>,<v2>,...`.
///
/// If `validate_range` is set, integer values must fit the declared subtype.
pub fn decode(
    text: &str,
    validate_range: bool,
) -> Result<NumericArray, GfaError> {
    let mut fields = text.split(',');
    let code = fields.next().unwrap_or_default();
    let mut chars = code.chars();
    let subtype = match (chars.next(), chars.next()) {
        (Some(c), None) => NumericSubtype::from_char(c)?,
        _ => return Err(GfaError::Format(format!("'{}' does not start with a numeric array subtype", text))),
    };
    match subtype.range() {
        None => {
            let values = fields.map(|x| x.parse::<f64>()).collect::<Result<Vec<f64>, _>>()?;
            Ok(NumericArray::Floats(values))
        },
        Some((lo, hi)) => {
            let values = fields.map(|x| x.parse::<i64>()).collect::<Result<Vec<i64>, _>>()?;
            if validate_range {
                if let Some(x) = values.iter().find(|x| **x < lo || **x > hi) {
                    return Err(GfaError::Value(format!("value {} out of range for numeric array subtype '{}'", x, subtype.as_char())))
                }
            }
            Ok(NumericArray::Integers(values))
        },
    }
}

pub fn encode(values: &NumericArray) -> Result<String, GfaError> {
    let subtype = values.subtype()?;
    let mut out = subtype.as_char().to_string();
    match values {
        NumericArray::Integers(ints) => ints.iter().for_each(|x| { out.push(','); out.push_str(&x.to_string()) }),
        NumericArray::Floats(floats) => floats.iter().for_each(|x| { out.push(','); out.push_str(&x.to_string()) }),
    }
    Ok(out)
}

// Tests
#[cfg(test)]
mod tests {

    #[test]
    fn subtype_is_minimal() {
        use super::{NumericArray, NumericSubtype};

        assert_eq!(NumericArray::from_integers(vec![0, 255]).subtype().unwrap(), NumericSubtype::UInt8);
        assert_eq!(NumericArray::from_integers(vec![0, 256]).subtype().unwrap(), NumericSubtype::UInt16);
        assert_eq!(NumericArray::from_integers(vec![70000]).subtype().unwrap(), NumericSubtype::UInt32);
        assert_eq!(NumericArray::from_integers(vec![-128, 127]).subtype().unwrap(), NumericSubtype::Int8);
        assert_eq!(NumericArray::from_integers(vec![-129, 12]).subtype().unwrap(), NumericSubtype::Int16);
        assert_eq!(NumericArray::from_integers(vec![-1, 40000]).subtype().unwrap(), NumericSubtype::Int32);
        assert_eq!(NumericArray::from_floats(vec![1.5]).subtype().unwrap(), NumericSubtype::Float);
    }

    #[test]
    fn out_of_range_values_fail() {
        use super::NumericArray;

        assert!(NumericArray::from_integers(vec![-1, u32::MAX as i64]).subtype().is_err());
        assert!(NumericArray::from_integers(vec![u32::MAX as i64 + 1]).subtype().is_err());
    }

    #[test]
    fn encode_example_array() {
        use super::{encode, NumericArray};

        let mut values = NumericArray::from_integers(vec![18, 72, 244, 70, 96, 38, 31]);
        assert_eq!(encode(&values).unwrap(), "C,18,72,244,70,96,38,31");

        values.set_integer(2, -2).unwrap();
        assert_eq!(encode(&values).unwrap(), "c,18,72,-2,70,96,38,31");

        values.set_integer(0, 200).unwrap();
        assert_eq!(encode(&values).unwrap(), "s,200,72,-2,70,96,38,31");
    }

    #[test]
    fn decode_uses_declared_subtype() {
        use super::{decode, encode, NumericArray};

        let got = decode("i,1,2,3", true).unwrap();
        assert_eq!(got, NumericArray::from_integers(vec![1, 2, 3]));
        assert_eq!(encode(&got).unwrap(), "C,1,2,3");

        assert!(decode("c,300", true).is_err());
        assert!(decode("c,300", false).is_ok());
        assert!(decode("q,1", true).is_err());
        assert!(decode("C,1.5", true).is_err());
    }

    #[test]
    fn decode_float_array() {
        use super::{decode, NumericArray};

        assert_eq!(decode("f,1.5,-2.25", true).unwrap(), NumericArray::from_floats(vec![1.5, -2.25]));
    }

    #[test]
    fn mixed_json_numbers_fail() {
        use super::NumericArray;

        let mixed = vec![serde_json::json!(1), serde_json::json!(2.5)];
        assert!(NumericArray::from_json(&mixed).is_err());
        let ints = vec![serde_json::json!(1), serde_json::json!(2)];
        assert_eq!(NumericArray::from_json(&ints).unwrap(), NumericArray::from_integers(vec![1, 2]));
    }
}
