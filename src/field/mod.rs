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

//! Field datatypes and their codecs.
//!
//! Every field of a record, positional or tag, has a [Datatype]. The
//! datatype decides how the text of the field is validated, decoded into a
//! [Value] and encoded back to text.
//!
//! Each datatype provides:
//!   - [decode](Datatype::decode): validate the text, then convert it.
//!   - [unsafe_decode](Datatype::unsafe_decode): convert assuming the text is valid.
//!   - [encode](Datatype::encode): validate the value, then convert it to text.
//!   - [unsafe_encode](Datatype::unsafe_encode): convert assuming the value is valid.
//!   - [validate_encoded](Datatype::validate_encoded) and
//!     [validate_decoded](Datatype::validate_decoded).
//!
//! The unsafe variants are used by records whose validation level allows
//! skipping the checks. They still fail if the text can not be converted at
//! all, eg. a non-numeric integer.
//!
//! ## Usage
//!
//! ```rust
//! use gfaedit::field::{Datatype, Value};
//!
//! let value = Datatype::NumericArray.decode("S,300,12").unwrap();
//! assert_eq!(Datatype::NumericArray.encode(&value).unwrap(), "S,300,12");
//!
//! assert!(Datatype::Integer.decode("12a").is_err());
//! assert_eq!(Datatype::Integer.decode("-12").unwrap(), Value::Integer(-12));
//! ```
//!

pub mod alignment;
pub mod byte_array;
pub mod numeric_array;
pub mod oriented;
pub mod position;
pub mod sequence;
pub mod text;

use alignment::Alignment;
use byte_array::ByteArray;
use numeric_array::NumericArray;
use oriented::{Orientation, OrientedLine};
use position::Position;

use crate::error::GfaError;
use crate::line::Version;

/// Datatypes of positional fields and tags.
#[non_exhaustive]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Datatype {
    /// `A` tags: a single printable character.
    Char,
    /// `i` tags: signed integer.
    Integer,
    /// `f` tags: floating point number.
    Float,
    /// `Z` tags: printable string, spaces allowed.
    String,
    /// `J` tags: JSON without tabs or newlines.
    Json,
    /// `H` tags: hexadecimal byte array.
    ByteArray,
    /// `B` tags: integer or float array.
    NumericArray,
    SegmentNameGfa1,
    PathNameGfa1,
    IdentifierGfa2,
    OptionalIdentifierGfa2,
    OrientedIdentifierGfa2,
    OrientedIdentifierListGfa1,
    OrientedIdentifierListGfa2,
    IdentifierListGfa2,
    Orientation,
    SequenceGfa1,
    SequenceGfa2,
    PositionGfa1,
    PositionGfa2,
    AlignmentGfa1,
    AlignmentGfa2,
    AlignmentListGfa1,
    OptionalInteger,
    CustomRecordType,
    /// Free-form field of a custom record.
    Generic,
    Comment,
}

impl Datatype {
    /// Datatype of a tag type letter.
    pub fn from_tag_letter(letter: &str) -> Result<Self, GfaError> {
        match letter {
            "A" => Ok(Datatype::Char),
            "i" => Ok(Datatype::Integer),
            "f" => Ok(Datatype::Float),
            "Z" => Ok(Datatype::String),
            "J" => Ok(Datatype::Json),
            "H" => Ok(Datatype::ByteArray),
            "B" => Ok(Datatype::NumericArray),
            _ => Err(GfaError::Type(format!("'{}' is not a tag datatype", letter))),
        }
    }

    /// Type letter of a tag datatype.
    pub fn tag_letter(self) -> Option<char> {
        match self {
            Datatype::Char => Some('A'),
            Datatype::Integer => Some('i'),
            Datatype::Float => Some('f'),
            Datatype::String => Some('Z'),
            Datatype::Json => Some('J'),
            Datatype::ByteArray => Some('H'),
            Datatype::NumericArray => Some('B'),
            _ => None,
        }
    }

    /// Datatypes whose decoding is delayed until the field is first read.
    pub fn is_lazy(self) -> bool {
        matches!(self,
            Datatype::Json
            | Datatype::ByteArray
            | Datatype::NumericArray
            | Datatype::AlignmentListGfa1
            | Datatype::OrientedIdentifierListGfa1
            | Datatype::OrientedIdentifierListGfa2
            | Datatype::IdentifierListGfa2
        )
    }

    /// Tag datatype matching the kind of `value`.
    ///
    /// Integers become `i`, floats `f`, strings `Z`, homogeneous numeric
    /// JSON lists `B` and any other JSON `J`.
    pub fn infer(value: &Value) -> Result<Self, GfaError> {
        match value {
            Value::Integer(_) => Ok(Datatype::Integer),
            Value::Float(_) => Ok(Datatype::Float),
            Value::Char(_) => Ok(Datatype::Char),
            Value::String(_) | Value::Identifier(_) => Ok(Datatype::String),
            Value::ByteArray(_) => Ok(Datatype::ByteArray),
            Value::NumericArray(_) => Ok(Datatype::NumericArray),
            Value::Json(serde_json::Value::Array(items)) if !items.is_empty() && NumericArray::from_json(items).is_ok() => Ok(Datatype::NumericArray),
            Value::Json(_) => Ok(Datatype::Json),
            other => Err(GfaError::Type(format!("can not store {} in a tag", other.kind()))),
        }
    }

    /// Convert `value` to the representation this datatype stores.
    ///
    /// Used for values whose kind differs from the stored one but can be
    /// converted without loss, eg. a numeric JSON list stored in a `B` tag.
    pub fn coerce(
        self,
        value: Value,
    ) -> Result<Value, GfaError> {
        let coerced = match (self, value) {
            (Datatype::NumericArray, Value::Json(serde_json::Value::Array(items))) => Value::NumericArray(NumericArray::from_json(&items)?),
            (Datatype::Float, Value::Integer(x)) => Value::Float(x as f64),
            (Datatype::PositionGfa2, Value::Integer(x)) => Value::Position(Position::new_trusted(x, false)),
            (Datatype::String | Datatype::Generic | Datatype::Comment | Datatype::CustomRecordType, Value::Identifier(x)) => Value::String(x),
            (
                Datatype::SegmentNameGfa1 | Datatype::PathNameGfa1 | Datatype::IdentifierGfa2 | Datatype::OptionalIdentifierGfa2,
                Value::String(x)
            ) => Value::Identifier(x),
            (Datatype::AlignmentGfa1 | Datatype::AlignmentGfa2, Value::Placeholder) => Value::Alignment(Alignment::Placeholder),
            (Datatype::AlignmentListGfa1, Value::Placeholder) => Value::AlignmentList(Vec::new()),
            (_, value) => value,
        };
        if !self.accepts(&coerced) {
            return Err(GfaError::Type(format!("a {} can not be stored in a {:?} field", coerced.kind(), self)))
        }
        Ok(coerced)
    }

    /// True if values of this kind can be stored with this datatype.
    pub fn accepts(
        self,
        value: &Value,
    ) -> bool {
        match self {
            Datatype::Char => matches!(value, Value::Char(_)),
            Datatype::Integer | Datatype::PositionGfa1 => matches!(value, Value::Integer(_)),
            Datatype::Float => matches!(value, Value::Float(_)),
            Datatype::String | Datatype::Generic | Datatype::Comment | Datatype::CustomRecordType => matches!(value, Value::String(_)),
            Datatype::Json => matches!(value, Value::Json(_)),
            Datatype::ByteArray => matches!(value, Value::ByteArray(_)),
            Datatype::NumericArray => matches!(value, Value::NumericArray(_)),
            Datatype::SegmentNameGfa1 | Datatype::PathNameGfa1 | Datatype::IdentifierGfa2 => matches!(value, Value::Identifier(_)),
            Datatype::OptionalIdentifierGfa2 => matches!(value, Value::Identifier(_) | Value::Placeholder),
            Datatype::OrientedIdentifierGfa2 => matches!(value, Value::OrientedIdentifier(_)),
            Datatype::OrientedIdentifierListGfa1 | Datatype::OrientedIdentifierListGfa2 => matches!(value, Value::OrientedIdentifierList(_)),
            Datatype::IdentifierListGfa2 => matches!(value, Value::IdentifierList(_)),
            Datatype::Orientation => matches!(value, Value::Orientation(_)),
            Datatype::SequenceGfa1 | Datatype::SequenceGfa2 => matches!(value, Value::String(_) | Value::Placeholder),
            Datatype::PositionGfa2 => matches!(value, Value::Position(_)),
            Datatype::AlignmentGfa1 | Datatype::AlignmentGfa2 => matches!(value, Value::Alignment(_)),
            Datatype::AlignmentListGfa1 => matches!(value, Value::AlignmentList(_)),
            Datatype::OptionalInteger => matches!(value, Value::Integer(_) | Value::Placeholder),
        }
    }

    /// Check the syntax of encoded text.
    pub fn validate_encoded(
        self,
        text: &str,
    ) -> Result<(), GfaError> {
        use text::check;
        match self {
            Datatype::Char => check(&text::CHAR, text, "character"),
            Datatype::Integer => check(&text::INTEGER, text, "integer"),
            Datatype::Float => check(&text::FLOAT_NUMBER, text, "float"),
            Datatype::String => check(&text::STRING, text, "string"),
            Datatype::Json => {
                check(&text::STRING, text, "JSON string")?;
                serde_json::from_str::<serde_json::Value>(text)?;
                Ok(())
            },
            Datatype::ByteArray => byte_array::validate_encoded(text),
            Datatype::NumericArray => check(&text::NUMERIC_ARRAY, text, "numeric array"),
            Datatype::SegmentNameGfa1 | Datatype::PathNameGfa1 => text::check_segment_name(text),
            Datatype::IdentifierGfa2 => check(&text::IDENTIFIER, text, "identifier"),
            Datatype::OptionalIdentifierGfa2 => check(&text::OPTIONAL_IDENTIFIER, text, "optional identifier"),
            Datatype::OrientedIdentifierGfa2 => check(&text::ORIENTED_IDENTIFIER, text, "oriented identifier"),
            Datatype::OrientedIdentifierListGfa1 => {
                check(&text::ORIENTED_IDENTIFIER_LIST_GFA1, text, "GFA1 list of oriented segment names")?;
                text::split_oriented_list_gfa1(text).into_iter()
                    .try_for_each(|item| text::check_segment_name(&item[..item.len().saturating_sub(1)]))
            },
            Datatype::OrientedIdentifierListGfa2 => check(&text::ORIENTED_IDENTIFIER_LIST_GFA2, text, "GFA2 list of oriented identifiers"),
            Datatype::IdentifierListGfa2 => check(&text::IDENTIFIER_LIST_GFA2, text, "GFA2 list of identifiers"),
            Datatype::Orientation => check(&text::ORIENTATION, text, "orientation"),
            Datatype::SequenceGfa1 => check(&text::SEQUENCE_GFA1, text, "GFA1 sequence"),
            Datatype::SequenceGfa2 => check(&text::SEQUENCE_GFA2, text, "GFA2 sequence"),
            Datatype::PositionGfa1 => check(&text::POSITION_GFA1, text, "GFA1 position"),
            Datatype::PositionGfa2 => check(&text::POSITION_GFA2, text, "GFA2 position"),
            Datatype::AlignmentGfa1 => check(&text::ALIGNMENT_GFA1, text, "GFA1 alignment"),
            Datatype::AlignmentGfa2 => check(&text::ALIGNMENT_GFA2, text, "GFA2 alignment"),
            Datatype::AlignmentListGfa1 => check(&text::ALIGNMENT_LIST_GFA1, text, "GFA1 list of alignments"),
            Datatype::OptionalInteger => check(&text::OPTIONAL_INTEGER, text, "optional integer"),
            Datatype::CustomRecordType => check(&text::CUSTOM_RECORD_TYPE, text, "record type"),
            Datatype::Generic => check(&text::GENERIC, text, "field"),
            Datatype::Comment => check(&text::COMMENT, text, "comment"),
        }
    }

    /// Convert text to a value assuming the text is valid.
    pub fn unsafe_decode(
        self,
        text: &str,
    ) -> Result<Value, GfaError> {
        let value = match self {
            Datatype::Char => Value::Char(text.chars().next().ok_or_else(|| GfaError::Format("empty character field".to_string()))?),
            Datatype::Integer | Datatype::PositionGfa1 => Value::Integer(text.parse::<i64>()?),
            Datatype::Float => Value::Float(text.parse::<f64>()?),
            Datatype::String | Datatype::Generic | Datatype::Comment | Datatype::CustomRecordType => Value::String(text.to_string()),
            Datatype::Json => Value::Json(serde_json::from_str(text)?),
            Datatype::ByteArray => Value::ByteArray(byte_array::decode(text)?),
            Datatype::NumericArray => Value::NumericArray(numeric_array::decode(text, false)?),
            Datatype::SegmentNameGfa1 | Datatype::PathNameGfa1 | Datatype::IdentifierGfa2 => Value::Identifier(text.to_string()),
            Datatype::OptionalIdentifierGfa2 => {
                if text == "*" { Value::Placeholder } else { Value::Identifier(text.to_string()) }
            },
            Datatype::OrientedIdentifierGfa2 => Value::OrientedIdentifier(text.parse()?),
            Datatype::OrientedIdentifierListGfa1 => Value::OrientedIdentifierList(
                text::split_oriented_list_gfa1(text).into_iter().map(|item| item.parse::<OrientedLine>()).collect::<Result<Vec<OrientedLine>, GfaError>>()?
            ),
            Datatype::OrientedIdentifierListGfa2 => Value::OrientedIdentifierList(
                text.split(' ').map(|item| item.parse::<OrientedLine>()).collect::<Result<Vec<OrientedLine>, GfaError>>()?
            ),
            Datatype::IdentifierListGfa2 => Value::IdentifierList(text.split(' ').map(|item| item.to_string()).collect()),
            Datatype::Orientation => Value::Orientation(text.parse()?),
            Datatype::SequenceGfa1 | Datatype::SequenceGfa2 => {
                if text == "*" { Value::Placeholder } else { Value::String(text.to_string()) }
            },
            Datatype::PositionGfa2 => Value::Position(position::decode(text, true)?),
            Datatype::AlignmentGfa1 | Datatype::AlignmentGfa2 => Value::Alignment(alignment::parse_alignment_unchecked(text)?),
            Datatype::AlignmentListGfa1 => {
                if text == "*" {
                    Value::AlignmentList(Vec::new())
                } else {
                    Value::AlignmentList(text.split(',').map(alignment::parse_alignment_unchecked).collect::<Result<Vec<Alignment>, GfaError>>()?)
                }
            },
            Datatype::OptionalInteger => {
                if text == "*" { Value::Placeholder } else { Value::Integer(text.parse::<i64>()?) }
            },
        };
        Ok(value)
    }

    /// Validate and convert text to a value.
    pub fn decode(
        self,
        text: &str,
    ) -> Result<Value, GfaError> {
        self.validate_encoded(text)?;
        let value = match self {
            Datatype::NumericArray => Value::NumericArray(numeric_array::decode(text, true)?),
            _ => self.unsafe_decode(text)?,
        };
        self.validate_decoded(&value)?;
        Ok(value)
    }

    /// Check a decoded value.
    pub fn validate_decoded(
        self,
        value: &Value,
    ) -> Result<(), GfaError> {
        use text::check;
        if !self.accepts(value) {
            return Err(GfaError::Type(format!("a {} can not be stored in a {:?} field", value.kind(), self)))
        }
        match (self, value) {
            (Datatype::Char, Value::Char(c)) => {
                if !c.is_ascii_graphic() {
                    return Err(GfaError::Value(format!("'{}' is not a printable character", c)))
                }
                Ok(())
            },
            (Datatype::Float, Value::Float(x)) => {
                if !x.is_finite() {
                    return Err(GfaError::Value(format!("{} is not a finite number", x)))
                }
                Ok(())
            },
            (Datatype::PositionGfa1, Value::Integer(x)) => {
                if *x < 0 {
                    return Err(GfaError::Value(format!("position {} is negative", x)))
                }
                Ok(())
            },
            (Datatype::Json, Value::Json(json)) => check(&text::STRING, &json.to_string(), "JSON string"),
            (Datatype::ByteArray, Value::ByteArray(bytes)) => byte_array::validate(bytes),
            (Datatype::NumericArray, Value::NumericArray(values)) => numeric_array::validate(values),
            (Datatype::PositionGfa2, Value::Position(pos)) => pos.validate(),
            (Datatype::AlignmentGfa1, Value::Alignment(aln)) => aln.validate(Version::Gfa1),
            (Datatype::AlignmentGfa2, Value::Alignment(aln)) => aln.validate(Version::Gfa2),
            (Datatype::AlignmentListGfa1, Value::AlignmentList(alns)) => alns.iter().try_for_each(|aln| aln.validate(Version::Gfa1)),
            (Datatype::OrientedIdentifierGfa2, Value::OrientedIdentifier(item)) => check(&text::IDENTIFIER, &item.name, "identifier"),
            (Datatype::OrientedIdentifierListGfa1, Value::OrientedIdentifierList(items)) => {
                if items.is_empty() {
                    return Err(GfaError::Value("empty list of segment names".to_string()))
                }
                items.iter().try_for_each(|item| text::check_segment_name(&item.name))
            },
            (Datatype::OrientedIdentifierListGfa2, Value::OrientedIdentifierList(items)) => {
                if items.is_empty() {
                    return Err(GfaError::Value("empty list of identifiers".to_string()))
                }
                items.iter().try_for_each(|item| check(&text::IDENTIFIER, &item.name, "identifier"))
            },
            (Datatype::IdentifierListGfa2, Value::IdentifierList(items)) => {
                if items.is_empty() {
                    return Err(GfaError::Value("empty list of identifiers".to_string()))
                }
                items.iter().try_for_each(|item| check(&text::IDENTIFIER, item, "identifier"))
            },
            // The remaining kinds are plain text: check their encoding.
            (Datatype::Integer | Datatype::OptionalInteger, _) | (_, Value::Placeholder) => Ok(()),
            (_, value) => self.validate_encoded(&self.unsafe_encode(value)?),
        }
    }

    /// Convert a value to text assuming it is valid.
    pub fn unsafe_encode(
        self,
        value: &Value,
    ) -> Result<String, GfaError> {
        if !self.accepts(value) {
            return Err(GfaError::Type(format!("a {} can not be stored in a {:?} field", value.kind(), self)))
        }
        let text = match value {
            Value::Placeholder => "*".to_string(),
            Value::Char(c) => c.to_string(),
            Value::Integer(x) => x.to_string(),
            Value::Float(x) => x.to_string(),
            Value::String(x) | Value::Identifier(x) => x.clone(),
            Value::Json(json) => json.to_string(),
            Value::ByteArray(bytes) => byte_array::encode(bytes),
            Value::NumericArray(values) => numeric_array::encode(values)?,
            Value::OrientedIdentifier(item) => item.to_string(),
            Value::OrientedIdentifierList(items) => {
                let separator = if self == Datatype::OrientedIdentifierListGfa1 { "," } else { " " };
                // Names that would split differently when read back.
                let ambiguous = |name: &str| match self {
                    Datatype::OrientedIdentifierListGfa1 => name.contains("+,") || name.contains("-,"),
                    _ => name.contains(' '),
                };
                if let Some(item) = items.iter().find(|item| ambiguous(item.name.as_str())) {
                    return Err(GfaError::Value(format!("name '{}' can not be written in a {:?} list", item.name, self)))
                }
                items.iter().map(|x| x.to_string()).collect::<Vec<String>>().join(separator)
            },
            Value::IdentifierList(items) => items.join(" "),
            Value::Orientation(orient) => orient.to_string(),
            Value::Position(pos) => pos.to_string(),
            Value::Alignment(aln) => aln.to_string(),
            Value::AlignmentList(alns) => {
                if alns.is_empty() {
                    "*".to_string()
                } else {
                    alns.iter().map(|x| x.to_string()).collect::<Vec<String>>().join(",")
                }
            },
        };
        Ok(text)
    }

    /// Validate and convert a value to text.
    pub fn encode(
        self,
        value: &Value,
    ) -> Result<String, GfaError> {
        self.validate_decoded(value)?;
        self.unsafe_encode(value)
    }
}

/// Decoded content of a field.
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    /// The `*` placeholder for a missing sequence, identifier or integer.
    Placeholder,
    Char(char),
    Integer(i64),
    Float(f64),
    String(String),
    Json(serde_json::Value),
    ByteArray(ByteArray),
    NumericArray(NumericArray),
    Identifier(String),
    OrientedIdentifier(OrientedLine),
    IdentifierList(Vec<String>),
    OrientedIdentifierList(Vec<OrientedLine>),
    Orientation(Orientation),
    Position(Position),
    Alignment(Alignment),
    AlignmentList(Vec<Alignment>),
}

impl Value {
    /// Name of the kind of value, used in error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Placeholder => "placeholder",
            Value::Char(_) => "character",
            Value::Integer(_) => "integer",
            Value::Float(_) => "float",
            Value::String(_) => "string",
            Value::Json(_) => "JSON value",
            Value::ByteArray(_) => "byte array",
            Value::NumericArray(_) => "numeric array",
            Value::Identifier(_) => "identifier",
            Value::OrientedIdentifier(_) => "oriented identifier",
            Value::IdentifierList(_) => "identifier list",
            Value::OrientedIdentifierList(_) => "oriented identifier list",
            Value::Orientation(_) => "orientation",
            Value::Position(_) => "position",
            Value::Alignment(_) => "alignment",
            Value::AlignmentList(_) => "alignment list",
        }
    }

    /// True for `*` placeholders, including placeholder alignments.
    pub fn is_placeholder(&self) -> bool {
        matches!(self, Value::Placeholder | Value::Alignment(Alignment::Placeholder))
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(x) | Value::Identifier(x) => Some(x),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Integer(x) => Some(*x),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Float(x) => Some(*x),
            Value::Integer(x) => Some(*x as f64),
            _ => None,
        }
    }

    pub fn as_orientation(&self) -> Option<Orientation> {
        match self {
            Value::Orientation(x) => Some(*x),
            _ => None,
        }
    }

    pub fn as_oriented(&self) -> Option<&OrientedLine> {
        match self {
            Value::OrientedIdentifier(x) => Some(x),
            _ => None,
        }
    }

    pub fn as_alignment(&self) -> Option<&Alignment> {
        match self {
            Value::Alignment(x) => Some(x),
            _ => None,
        }
    }

    pub fn as_position(&self) -> Option<Position> {
        match self {
            Value::Position(x) => Some(*x),
            Value::Integer(x) => Some(Position::new_trusted(*x, false)),
            _ => None,
        }
    }
}

impl From<i64> for Value {
    fn from(x: i64) -> Self {
        Value::Integer(x)
    }
}

impl From<f64> for Value {
    fn from(x: f64) -> Self {
        Value::Float(x)
    }
}

impl From<char> for Value {
    fn from(x: char) -> Self {
        Value::Char(x)
    }
}

impl From<&str> for Value {
    fn from(x: &str) -> Self {
        Value::String(x.to_string())
    }
}

impl From<String> for Value {
    fn from(x: String) -> Self {
        Value::String(x)
    }
}

impl From<Vec<i64>> for Value {
    fn from(x: Vec<i64>) -> Self {
        Value::NumericArray(NumericArray::from_integers(x))
    }
}

impl From<NumericArray> for Value {
    fn from(x: NumericArray) -> Self {
        Value::NumericArray(x)
    }
}

impl From<ByteArray> for Value {
    fn from(x: ByteArray) -> Self {
        Value::ByteArray(x)
    }
}

impl From<serde_json::Value> for Value {
    fn from(x: serde_json::Value) -> Self {
        Value::Json(x)
    }
}

impl From<Orientation> for Value {
    fn from(x: Orientation) -> Self {
        Value::Orientation(x)
    }
}

impl From<OrientedLine> for Value {
    fn from(x: OrientedLine) -> Self {
        Value::OrientedIdentifier(x)
    }
}

impl From<Position> for Value {
    fn from(x: Position) -> Self {
        Value::Position(x)
    }
}

impl From<Alignment> for Value {
    fn from(x: Alignment) -> Self {
        Value::Alignment(x)
    }
}

// Tests
#[cfg(test)]
mod tests {

    #[test]
    fn tag_datatypes_round_trip() {
        use super::Datatype;

        let samples = [
            (Datatype::Char, "A"),
            (Datatype::Integer, "-12"),
            (Datatype::Float, "1.5"),
            (Datatype::String, "hello world"),
            (Datatype::Json, r#"{"a":[1,2]}"#),
            (Datatype::ByteArray, "0AFF"),
            (Datatype::NumericArray, "C,18,72,244"),
        ];
        for (datatype, text) in samples {
            let value = datatype.decode(text).unwrap();
            assert_eq!(datatype.encode(&value).unwrap(), text);
        }
    }

    #[test]
    fn positional_datatypes_round_trip() {
        use super::Datatype;

        let samples = [
            (Datatype::SegmentNameGfa1, "contig1"),
            (Datatype::OptionalIdentifierGfa2, "*"),
            (Datatype::OrientedIdentifierGfa2, "a-"),
            (Datatype::OrientedIdentifierListGfa1, "1+,2-,3+"),
            (Datatype::OrientedIdentifierListGfa2, "1+ 2- e1+"),
            (Datatype::IdentifierListGfa2, "1 2 e1"),
            (Datatype::SequenceGfa1, "ACGT"),
            (Datatype::SequenceGfa1, "*"),
            (Datatype::PositionGfa2, "120$"),
            (Datatype::AlignmentGfa1, "10M2=1X"),
            (Datatype::AlignmentGfa2, "12,14"),
            (Datatype::AlignmentListGfa1, "2M,*,4M"),
            (Datatype::AlignmentListGfa1, "*"),
            (Datatype::OptionalInteger, "*"),
        ];
        for (datatype, text) in samples {
            let value = datatype.decode(text).unwrap();
            assert_eq!(datatype.encode(&value).unwrap(), text);
        }
    }

    #[test]
    fn decode_rejects_bad_syntax() {
        use super::Datatype;

        assert!(Datatype::Char.decode("AB").is_err());
        assert!(Datatype::String.decode("a\tb").is_err());
        assert!(Datatype::Json.decode("{a").is_err());
        assert!(Datatype::SequenceGfa1.decode("AC GT").is_err());
        assert!(Datatype::PositionGfa1.decode("-1").is_err());
        assert!(Datatype::AlignmentGfa2.decode("10M2=1X").is_err());
        assert!(Datatype::from_tag_letter("Q").is_err());
    }

    #[test]
    fn numeric_array_decode_checks_subtype_range() {
        use super::{Datatype, Value};
        use crate::field::numeric_array::NumericArray;

        assert!(Datatype::NumericArray.decode("c,300").is_err());
        assert!(Datatype::NumericArray.decode("C,-1").is_err());
        assert!(Datatype::NumericArray.decode("S,70000").is_err());
        assert!(Datatype::NumericArray.unsafe_decode("c,300").is_ok());
        assert_eq!(
            Datatype::NumericArray.decode("c,-5").unwrap(),
            Value::NumericArray(NumericArray::from_integers(vec![-5])),
        );
    }

    #[test]
    fn gfa1_oriented_list_names_with_commas() {
        use super::{Datatype, Value};
        use crate::field::oriented::{OrientedLine, Orientation};

        let value = Datatype::OrientedIdentifierListGfa1.decode("a,b+,c-").unwrap();
        let expected = Value::OrientedIdentifierList(vec![
            OrientedLine { name: "a,b".to_string(), orient: Orientation::Forward },
            OrientedLine { name: "c".to_string(), orient: Orientation::Reverse },
        ]);
        assert_eq!(value, expected);
        assert_eq!(Datatype::OrientedIdentifierListGfa1.encode(&value).unwrap(), "a,b+,c-");

        let broken = Value::OrientedIdentifierList(vec![
            OrientedLine { name: "a+,b".to_string(), orient: Orientation::Forward },
        ]);
        assert!(Datatype::OrientedIdentifierListGfa1.unsafe_encode(&broken).is_err());
        assert!(Datatype::OrientedIdentifierListGfa1.encode(&broken).is_err());

        let spaced = Value::OrientedIdentifierList(vec![
            OrientedLine { name: "a b".to_string(), orient: Orientation::Forward },
        ]);
        assert!(Datatype::OrientedIdentifierListGfa2.unsafe_encode(&spaced).is_err());
    }

    #[test]
    fn unsafe_decode_skips_checks() {
        use super::{Datatype, Value};

        assert_eq!(Datatype::SequenceGfa1.unsafe_decode("AC GT").unwrap(), Value::String("AC GT".to_string()));
        assert!(Datatype::Integer.unsafe_decode("x").is_err());
    }

    #[test]
    fn encode_checks_type() {
        use super::{Datatype, Value};

        let err = Datatype::Integer.encode(&Value::String("12".to_string())).unwrap_err();
        assert_eq!(err.kind(), "TypeError");
        let err = Datatype::Float.encode(&Value::Float(f64::NAN)).unwrap_err();
        assert_eq!(err.kind(), "ValueError");
    }

    #[test]
    fn infer_tag_datatype() {
        use super::{Datatype, Value};

        assert_eq!(Datatype::infer(&Value::Integer(1)).unwrap(), Datatype::Integer);
        assert_eq!(Datatype::infer(&Value::Float(1.0)).unwrap(), Datatype::Float);
        assert_eq!(Datatype::infer(&Value::from("x")).unwrap(), Datatype::String);
        assert_eq!(Datatype::infer(&Value::Json(serde_json::json!([1, 2, 3]))).unwrap(), Datatype::NumericArray);
        assert_eq!(Datatype::infer(&Value::Json(serde_json::json!([1, "a"]))).unwrap(), Datatype::Json);
        assert!(Datatype::infer(&Value::Placeholder).is_err());
    }
}
