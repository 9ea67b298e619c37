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

//! Records of a GFA file.
//!
//! A [Line] holds the positional fields of its record type, in the order
//! given by its [Schema](schema::Schema), and any number of tags. Fields
//! are stored as text until first read when their datatype is expensive to
//! decode, see [Datatype::is_lazy].
//!
//! How much checking happens is controlled per record by its
//! [ValidationLevel].
//!
//! ## Usage
//!
//! ```rust
//! use gfaedit::line::{Line, ValidationLevel};
//! use gfaedit::field::Value;
//!
//! let mut line = Line::parse("S\t1\tACGT\tRC:i:1200", None, ValidationLevel::default()).unwrap();
//! assert_eq!(line.field("RC").unwrap(), &Value::Integer(1200));
//!
//! line.set("RC", 600).unwrap();
//! line.set("xx", "note").unwrap();
//! assert_eq!(line.to_string(), "S\t1\tACGT\tRC:i:600\txx:Z:note");
//! ```
//!

pub mod convert;
pub mod parse;
pub mod references;
pub mod schema;

use std::sync::OnceLock;

use indexmap::IndexMap;

use crate::error::GfaError;
use crate::field::{text, Datatype, Value};
use schema::Schema;

/// Specification version of a record or graph.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Version {
    Gfa1,
    Gfa2,
    /// Records valid in both versions: headers and comments.
    Generic,
}

impl Version {
    /// Value of the `VN` header tag.
    pub fn header_value(self) -> Option<&'static str> {
        match self {
            Version::Gfa1 => Some("1.0"),
            Version::Gfa2 => Some("2.0"),
            Version::Generic => None,
        }
    }

    pub fn from_header_value(text: &str) -> Result<Self, GfaError> {
        match text {
            "1" | "1.0" => Ok(Version::Gfa1),
            "2" | "2.0" => Ok(Version::Gfa2),
            _ => Err(GfaError::Version(format!("unknown GFA version '{}' in header", text))),
        }
    }
}

impl std::str::FromStr for Version {
    type Err = GfaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "gfa1" | "1" | "1.0" => Ok(Version::Gfa1),
            "gfa2" | "2" | "2.0" => Ok(Version::Gfa2),
            "generic" => Ok(Version::Generic),
            _ => Err(GfaError::Version(format!("unknown GFA version '{}'", s))),
        }
    }
}

impl std::fmt::Display for Version {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Version::Gfa1 => write!(f, "GFA1"),
            Version::Gfa2 => write!(f, "GFA2"),
            Version::Generic => write!(f, "generic GFA"),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RecordType {
    Header,
    Segment,
    Link,
    Containment,
    Path,
    Edge,
    Gap,
    Fragment,
    OrderedGroup,
    UnorderedGroup,
    /// GFA2 record with a record type not defined by the format.
    Custom,
    Comment,
}

impl RecordType {
    pub fn from_code(code: &str) -> Self {
        match code {
            "H" => RecordType::Header,
            "S" => RecordType::Segment,
            "L" => RecordType::Link,
            "C" => RecordType::Containment,
            "P" => RecordType::Path,
            "E" => RecordType::Edge,
            "G" => RecordType::Gap,
            "F" => RecordType::Fragment,
            "O" => RecordType::OrderedGroup,
            "U" => RecordType::UnorderedGroup,
            "#" => RecordType::Comment,
            _ => RecordType::Custom,
        }
    }

    pub fn code(self) -> &'static str {
        match self {
            RecordType::Header => "H",
            RecordType::Segment => "S",
            RecordType::Link => "L",
            RecordType::Containment => "C",
            RecordType::Path => "P",
            RecordType::Edge => "E",
            RecordType::Gap => "G",
            RecordType::Fragment => "F",
            RecordType::OrderedGroup => "O",
            RecordType::UnorderedGroup => "U",
            RecordType::Custom => "custom",
            RecordType::Comment => "#",
        }
    }

    /// Version implied by the record type alone.
    ///
    /// Segments exist in both versions with different fields and return None.
    pub fn version(self) -> Option<Version> {
        match self {
            RecordType::Header | RecordType::Comment => Some(Version::Generic),
            RecordType::Segment => None,
            RecordType::Link | RecordType::Containment | RecordType::Path => Some(Version::Gfa1),
            RecordType::Edge
                | RecordType::Gap
                | RecordType::Fragment
                | RecordType::OrderedGroup
                | RecordType::UnorderedGroup
                | RecordType::Custom => Some(Version::Gfa2),
        }
    }

    /// Records listing segments without direction or orientation slots.
    pub fn is_path_like(self) -> bool {
        matches!(self, RecordType::Path | RecordType::OrderedGroup | RecordType::UnorderedGroup)
    }
}

/// How much checking a record does.
///
/// Each level includes the checks of the levels below it.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ValidationLevel {
    /// Only what is needed to split the record into fields.
    None = 0,
    /// Field counts, tag syntax, duplicate tags and predefined tag types.
    #[default]
    Structural = 1,
    /// Content of each field when it is first decoded or set.
    OnDecode = 2,
    /// All fields when the record is created, plus cross-field checks.
    Eager = 3,
    /// Again when the record is converted to text.
    OnWrite = 4,
    /// Again on every read and write of a field.
    Paranoid = 5,
}

impl ValidationLevel {
    pub fn from_u8(level: u8) -> Result<Self, GfaError> {
        match level {
            0 => Ok(ValidationLevel::None),
            1 => Ok(ValidationLevel::Structural),
            2 => Ok(ValidationLevel::OnDecode),
            3 => Ok(ValidationLevel::Eager),
            4 => Ok(ValidationLevel::OnWrite),
            5 => Ok(ValidationLevel::Paranoid),
            _ => Err(GfaError::Value(format!("validation level {} is not between 0 and 5", level))),
        }
    }

    pub fn as_u8(self) -> u8 {
        self as u8
    }
}

/// A field stored as text, as a value, or both once decoded.
#[derive(Clone, Debug)]
struct Field {
    datatype: Datatype,
    raw: Option<String>,
    decoded: OnceLock<Value>,
}

impl Field {
    fn from_text(
        datatype: Datatype,
        raw: &str,
        vlevel: ValidationLevel,
    ) -> Result<Self, GfaError> {
        let field = Field { datatype, raw: Some(raw.to_string()), decoded: OnceLock::new() };
        if vlevel >= ValidationLevel::Eager || !datatype.is_lazy() {
            field.value(vlevel)?;
        }
        Ok(field)
    }

    fn from_value(
        datatype: Datatype,
        value: Value,
        vlevel: ValidationLevel,
    ) -> Result<Self, GfaError> {
        let value = datatype.coerce(value)?;
        if vlevel >= ValidationLevel::OnDecode {
            datatype.validate_decoded(&value)?;
        } else if let Value::NumericArray(values) = &value {
            // Arrays that fit no subtype can not be written at all.
            values.subtype()?;
        }
        Ok(Field { datatype, raw: None, decoded: OnceLock::from(value) })
    }

    fn value(
        &self,
        vlevel: ValidationLevel,
    ) -> Result<&Value, GfaError> {
        if let Some(value) = self.decoded.get() {
            return Ok(value)
        }
        let raw = self.raw.as_deref().ok_or_else(|| GfaError::Runtime("field has no content".to_string()))?;
        let value = if vlevel >= ValidationLevel::OnDecode {
            self.datatype.decode(raw)?
        } else {
            self.datatype.unsafe_decode(raw)?
        };
        Ok(self.decoded.get_or_init(|| value))
    }

    fn text(
        &self,
        checked: bool,
    ) -> Result<String, GfaError> {
        if let Some(raw) = &self.raw {
            if checked {
                self.datatype.validate_encoded(raw)?;
            }
            return Ok(raw.clone())
        }
        match self.decoded.get() {
            Some(value) if checked => self.datatype.encode(value),
            Some(value) => self.datatype.unsafe_encode(value),
            None => Err(GfaError::Runtime("field has no content".to_string())),
        }
    }

    fn validate(&self) -> Result<(), GfaError> {
        match (&self.raw, self.decoded.get()) {
            (Some(raw), _) => self.datatype.decode(raw).map(|_| ()),
            (None, Some(value)) => self.datatype.validate_decoded(value),
            (None, None) => Err(GfaError::Runtime("field has no content".to_string())),
        }
    }
}

/// One record of a GFA file.
#[derive(Debug)]
pub struct Line {
    record_type: RecordType,
    version: Version,
    schema: &'static Schema,
    positional: Vec<Field>,
    tags: IndexMap<String, Field>,
    vlevel: ValidationLevel,
    is_virtual: bool,
    connected: bool,
}

impl Line {
    /// Build a record from decoded positional values.
    ///
    /// Values are converted to the datatype of their field where this is
    /// lossless, eg. a string is accepted for a segment name.
    pub fn new(
        record_type: RecordType,
        version: Version,
        positional: Vec<Value>,
    ) -> Result<Self, GfaError> {
        Line::with_vlevel(record_type, version, positional, ValidationLevel::default())
    }

    pub fn with_vlevel(
        record_type: RecordType,
        version: Version,
        positional: Vec<Value>,
        vlevel: ValidationLevel,
    ) -> Result<Self, GfaError> {
        let version = match record_type.version() {
            Some(fixed) => fixed,
            None => version,
        };
        let schema = schema::schema(record_type, version)?;
        let datatypes = positional_datatypes(record_type, schema, positional.len())?;
        let positional = positional.into_iter().zip(datatypes)
            .map(|(value, datatype)| Field::from_value(datatype, value, vlevel))
            .collect::<Result<Vec<Field>, GfaError>>()?;

        let line = Line {
            record_type, version, schema, positional,
            tags: IndexMap::new(),
            vlevel,
            is_virtual: false,
            connected: false,
        };
        if vlevel >= ValidationLevel::Eager {
            line.validate_consistency()?;
        }
        Ok(line)
    }

    /// Assemble a record from the text of its fields.
    ///
    /// `tags` are `(name, datatype, text)` triples.
    pub(crate) fn from_text(
        record_type: RecordType,
        version: Version,
        positional: &[&str],
        tags: Vec<(String, Datatype, String)>,
        vlevel: ValidationLevel,
    ) -> Result<Self, GfaError> {
        let schema = schema::schema(record_type, version)?;
        let datatypes = positional_datatypes(record_type, schema, positional.len())?;
        let positional = positional.iter().zip(datatypes).enumerate()
            .map(|(i, (text, datatype))| {
                Field::from_text(datatype, text, vlevel)
                    .map_err(|err| err.context(&format!("field {} of {} record", i + 1, record_type.code())))
            })
            .collect::<Result<Vec<Field>, GfaError>>()?;

        let mut fields = IndexMap::with_capacity(tags.len());
        for (name, datatype, raw) in tags {
            if vlevel >= ValidationLevel::Structural {
                if let Some(expected) = schema.predefined_datatype(&name) {
                    if expected != datatype {
                        return Err(GfaError::Type(format!(
                            "tag {} must have datatype {}",
                            name, expected.tag_letter().unwrap_or('?')
                        )))
                    }
                }
                if fields.contains_key(&name) {
                    return Err(GfaError::NotUnique(format!("tag {} is defined more than once", name)))
                }
            }
            let field = Field::from_text(datatype, &raw, vlevel).map_err(|err| err.context(&format!("tag {}", name)))?;
            fields.insert(name, field);
        }

        let line = Line {
            record_type, version, schema, positional,
            tags: fields,
            vlevel,
            is_virtual: false,
            connected: false,
        };
        if vlevel >= ValidationLevel::Eager {
            line.validate_consistency()?;
        }
        Ok(line)
    }

    /// Placeholder for a segment that is referenced but not yet defined.
    pub(crate) fn virtual_segment(
        name: &str,
        version: Version,
    ) -> Result<Self, GfaError> {
        let positional = match version {
            Version::Gfa2 => vec![Value::Identifier(name.to_string()), Value::Integer(0), Value::Placeholder],
            _ => vec![Value::Identifier(name.to_string()), Value::Placeholder],
        };
        let version = if version == Version::Gfa2 { Version::Gfa2 } else { Version::Gfa1 };
        let mut line = Line::with_vlevel(RecordType::Segment, version, positional, ValidationLevel::None)?;
        line.is_virtual = true;
        Ok(line)
    }

    /// Add a tag, builder style.
    pub fn tag(
        mut self,
        name: &str,
        value: impl Into<Value>,
    ) -> Result<Self, GfaError> {
        self.set(name, value)?;
        Ok(self)
    }

    pub fn record_type(&self) -> RecordType {
        self.record_type
    }

    pub fn version(&self) -> Version {
        self.version
    }

    pub fn vlevel(&self) -> ValidationLevel {
        self.vlevel
    }

    pub fn set_vlevel(&mut self, vlevel: ValidationLevel) {
        self.vlevel = vlevel;
    }

    /// True for segments that only exist because other records reference them.
    pub fn is_virtual(&self) -> bool {
        self.is_virtual
    }

    /// True while the record belongs to a graph.
    pub fn is_connected(&self) -> bool {
        self.connected
    }

    pub(crate) fn set_connected(&mut self, connected: bool) {
        self.connected = connected;
    }

    pub(crate) fn schema(&self) -> &'static Schema {
        self.schema
    }

    /// Names of the positional fields in order.
    pub fn positional_names(&self) -> Vec<String> {
        (0..self.positional.len()).map(|i| match self.schema.positional.get(i) {
            Some((name, _)) => name.to_string(),
            None => format!("field{}", i),
        }).collect()
    }

    pub fn tag_names(&self) -> Vec<&str> {
        self.tags.keys().map(|name| name.as_str()).collect()
    }

    fn positional_index(
        &self,
        name: &str,
    ) -> Option<usize> {
        let name = self.schema.canonical(name);
        match self.schema.positional_index(name) {
            Some(i) => Some(i),
            None if self.record_type == RecordType::Custom => {
                name.strip_prefix("field")?.parse::<usize>().ok().filter(|i| *i >= 1 && *i < self.positional.len())
            },
            None => None,
        }
    }

    fn lookup(
        &self,
        name: &str,
    ) -> Option<&Field> {
        match self.positional_index(name) {
            Some(i) => self.positional.get(i),
            None => self.tags.get(name),
        }
    }

    pub fn datatype(
        &self,
        name: &str,
    ) -> Option<Datatype> {
        self.lookup(name).map(|field| field.datatype)
    }

    /// Value of a field or tag, None if the record has no such tag.
    pub fn get(
        &self,
        name: &str,
    ) -> Result<Option<&Value>, GfaError> {
        let Some(field) = self.lookup(name) else { return Ok(None) };
        let value = field.value(self.vlevel).map_err(|err| err.context(name))?;
        if self.vlevel >= ValidationLevel::Paranoid {
            field.datatype.validate_decoded(value).map_err(|err| err.context(name))?;
        }
        Ok(Some(value))
    }

    /// Value of a field or tag that must be present.
    pub fn field(
        &self,
        name: &str,
    ) -> Result<&Value, GfaError> {
        self.get(name)?.ok_or_else(|| GfaError::NotFound(format!("{} record has no field {}", self.record_type.code(), name)))
    }

    /// Encoded text of a field or tag value.
    pub fn get_text(
        &self,
        name: &str,
    ) -> Result<Option<String>, GfaError> {
        match self.lookup(name) {
            Some(field) => Ok(Some(field.text(self.vlevel >= ValidationLevel::OnWrite)?)),
            None => Ok(None),
        }
    }

    /// Set a field or tag.
    ///
    /// New tags are created if the name is a predefined tag of the record
    /// type or a custom tag name (lowercase letter and a letter or digit).
    /// The datatype of a new custom tag is inferred from `value`.
    ///
    /// Fields holding the record's name or references to segments can not
    /// be written while the record is in a graph, see
    /// [Graph::set_field](crate::graph::Graph::set_field).
    pub fn set(
        &mut self,
        name: &str,
        value: impl Into<Value>,
    ) -> Result<(), GfaError> {
        if self.connected && self.schema.is_blocked(self.schema.canonical(name)) {
            return Err(GfaError::Runtime(format!(
                "field {} references other records and can not be changed while the {} record is in a graph",
                name, self.record_type.code()
            )))
        }
        self.set_unchecked(name, value.into())
    }

    pub(crate) fn set_unchecked(
        &mut self,
        name: &str,
        value: Value,
    ) -> Result<(), GfaError> {
        let vlevel = self.vlevel;
        if let Some(i) = self.positional_index(name) {
            let datatype = self.positional[i].datatype;
            self.positional[i] = Field::from_value(datatype, value, vlevel).map_err(|err| err.context(name))?;
            return Ok(())
        }
        if let Some(field) = self.tags.get_mut(name) {
            *field = Field::from_value(field.datatype, value, vlevel).map_err(|err| err.context(name))?;
            return Ok(())
        }

        text::check(&text::TAG_NAME, name, "tag name")?;
        let datatype = match self.schema.predefined_datatype(name) {
            Some(datatype) => datatype,
            None => {
                if vlevel >= ValidationLevel::Structural && !text::CUSTOM_TAG_NAME.is_match(name) {
                    return Err(GfaError::Format(format!(
                        "{} is not a predefined tag of {} records nor a custom tag name",
                        name, self.record_type.code()
                    )))
                }
                Datatype::infer(&value)?
            },
        };
        let field = Field::from_value(datatype, value, vlevel).map_err(|err| err.context(name))?;
        self.tags.insert(name.to_string(), field);
        Ok(())
    }

    /// Remove a tag, returning its value.
    pub fn delete(
        &mut self,
        name: &str,
    ) -> Result<Option<Value>, GfaError> {
        if self.positional_index(name).is_some() {
            return Err(GfaError::Runtime(format!("positional field {} can not be deleted", name)))
        }
        match self.tags.shift_remove(name) {
            Some(field) => Ok(Some(field.value(self.vlevel)?.clone())),
            None => Ok(None),
        }
    }

    /// Check every field and the consistency between fields.
    pub fn validate(&self) -> Result<(), GfaError> {
        let names = self.positional_names();
        for (field, name) in self.positional.iter().zip(names.iter()) {
            field.validate().map_err(|err| err.context(name))?;
        }
        for (name, field) in self.tags.iter() {
            if let Some(expected) = self.schema.predefined_datatype(name) {
                if expected != field.datatype {
                    return Err(GfaError::Type(format!("tag {} has the wrong datatype", name)))
                }
            }
            field.validate().map_err(|err| err.context(name))?;
        }
        self.validate_consistency()
    }

    /// Check a single field.
    pub fn validate_field(
        &self,
        name: &str,
    ) -> Result<(), GfaError> {
        match self.lookup(name) {
            Some(field) => field.validate().map_err(|err| err.context(name)),
            None => Err(GfaError::NotFound(format!("{} record has no field {}", self.record_type.code(), name))),
        }
    }

    fn validate_consistency(&self) -> Result<(), GfaError> {
        match (self.record_type, self.version) {
            (RecordType::Segment, Version::Gfa1) => {
                let length = self.get("LN")?.and_then(|x| x.as_i64());
                if let (Some(length), Value::String(sequence)) = (length, self.field("sequence")?) {
                    if length != sequence.len() as i64 {
                        return Err(GfaError::Inconsistency(format!(
                            "segment {} has length tag {} but a sequence of length {}",
                            self.field("name")?.as_str().unwrap_or_default(), length, sequence.len()
                        )))
                    }
                }
                Ok(())
            },
            (RecordType::Path, _) => {
                let segments = match self.field("segment_names")? {
                    Value::OrientedIdentifierList(items) => items.len(),
                    _ => 0,
                };
                if let Value::AlignmentList(overlaps) = self.field("overlaps")? {
                    if !overlaps.is_empty() && overlaps.len() + 1 != segments {
                        return Err(GfaError::Inconsistency(format!(
                            "path has {} segments but {} overlaps", segments, overlaps.len()
                        )))
                    }
                }
                Ok(())
            },
            (RecordType::Edge, _) => {
                self.check_interval("beg1", "end1")?;
                self.check_interval("beg2", "end2")
            },
            (RecordType::Fragment, _) => {
                self.check_interval("s_beg", "s_end")?;
                self.check_interval("f_beg", "f_end")
            },
            _ => Ok(()),
        }
    }

    fn check_interval(
        &self,
        beg: &str,
        end: &str,
    ) -> Result<(), GfaError> {
        let (Some(from), Some(to)) = (self.field(beg)?.as_position(), self.field(end)?.as_position()) else {
            return Ok(())
        };
        if from.value() > to.value() {
            return Err(GfaError::Value(format!("{} {} is after {} {}", beg, from, end, to)))
        }
        Ok(())
    }

    fn render(
        &self,
        checked: bool,
    ) -> Result<String, GfaError> {
        self.render_with(|field| field.text(checked))
    }

    fn render_with<F>(
        &self,
        text: F,
    ) -> Result<String, GfaError>
    where
        F: Fn(&Field) -> Result<String, GfaError>,
    {
        if self.record_type == RecordType::Comment {
            let content = text(&self.positional[0])?;
            let spacer = text(&self.positional[1])?;
            return Ok(format!("#{}{}", spacer, content))
        }
        let mut fields: Vec<String> = Vec::with_capacity(self.positional.len() + self.tags.len() + 1);
        if self.record_type != RecordType::Custom {
            fields.push(self.record_type.code().to_string());
        }
        for field in self.positional.iter() {
            fields.push(text(field)?);
        }
        for (name, field) in self.tags.iter() {
            let letter = field.datatype.tag_letter().unwrap_or('Z');
            fields.push(format!("{}:{}:{}", name, letter, text(field)?));
        }
        Ok(fields.join("\t"))
    }

    /// Text of the record, validated first at validation level 4 and above.
    pub fn to_text(&self) -> Result<String, GfaError> {
        if self.vlevel >= ValidationLevel::OnWrite {
            self.validate_consistency()?;
            return self.render(true)
        }
        self.render(false)
    }

    /// Sorted `(name, text)` pairs of every field.
    fn field_pairs(&self) -> Result<Vec<(String, String)>, GfaError> {
        let mut pairs = self.positional_names().into_iter()
            .zip(self.positional.iter())
            .map(|(name, field)| Ok((name, field.text(false)?)))
            .collect::<Result<Vec<(String, String)>, GfaError>>()?;
        for (name, field) in self.tags.iter() {
            pairs.push((name.clone(), field.text(false)?));
        }
        pairs.sort();
        Ok(pairs)
    }
}

fn positional_datatypes(
    record_type: RecordType,
    schema: &Schema,
    count: usize,
) -> Result<Vec<Datatype>, GfaError> {
    if record_type == RecordType::Custom {
        if count == 0 {
            return Err(GfaError::Format("custom record without a record type".to_string()))
        }
        let mut datatypes = vec![Datatype::CustomRecordType];
        datatypes.resize(count, Datatype::Generic);
        return Ok(datatypes)
    }
    if count != schema.positional.len() {
        return Err(GfaError::Format(format!(
            "{} record has {} positional fields, expected {}",
            record_type.code(), count, schema.positional.len()
        )))
    }
    Ok(schema.positional.iter().map(|(_, datatype)| *datatype).collect())
}

/// Clones are not part of any graph.
impl Clone for Line {
    fn clone(&self) -> Self {
        Line {
            record_type: self.record_type,
            version: self.version,
            schema: self.schema,
            positional: self.positional.clone(),
            tags: self.tags.clone(),
            vlevel: self.vlevel,
            is_virtual: self.is_virtual,
            connected: false,
        }
    }
}

/// Records are equal if they have the same record type and the same fields
/// with the same encoded values, regardless of tag order.
impl PartialEq for Line {
    fn eq(&self, other: &Self) -> bool {
        if self.record_type != other.record_type {
            return false
        }
        match (self.field_pairs(), other.field_pairs()) {
            (Ok(ours), Ok(theirs)) => ours == theirs,
            _ => false,
        }
    }
}

impl std::fmt::Display for Line {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        // Fields that can not be encoded are shown as placeholders.
        let text = self.render_with(|field| Ok(field.text(false).unwrap_or_else(|_| "*".to_string())))
            .map_err(|_| std::fmt::Error)?;
        write!(f, "{}", text)
    }
}

// Tests
#[cfg(test)]
mod tests {

    #[test]
    fn get_and_set_fields() {
        use super::{Line, ValidationLevel};
        use crate::field::Value;

        let mut line = Line::parse("L\t1\t+\t2\t-\t12M\tID:Z:link1", None, ValidationLevel::default()).unwrap();
        assert_eq!(line.field("from").unwrap(), &Value::Identifier("1".to_string()));
        assert_eq!(line.field("ID").unwrap(), &Value::String("link1".to_string()));
        assert!(line.get("KC").unwrap().is_none());

        line.set("KC", 20).unwrap();
        assert_eq!(line.to_string(), "L\t1\t+\t2\t-\t12M\tID:Z:link1\tKC:i:20");
    }

    #[test]
    fn set_rejects_unknown_uppercase_tags() {
        use super::{Line, ValidationLevel};

        let mut line = Line::parse("S\t1\t*", None, ValidationLevel::default()).unwrap();
        let err = line.set("XX", 1).unwrap_err();
        assert_eq!(err.kind(), "FormatError");

        let mut lax = Line::parse("S\t1\t*", None, ValidationLevel::None).unwrap();
        assert!(lax.set("XX", 1).is_ok());
    }

    #[test]
    fn set_predefined_tag_with_wrong_type() {
        use super::{Line, ValidationLevel};

        let mut line = Line::parse("S\t1\t*", None, ValidationLevel::default()).unwrap();
        let err = line.set("LN", "ten").unwrap_err();
        assert_eq!(err.kind(), "TypeError");
    }

    #[test]
    fn numeric_list_becomes_numeric_array() {
        use super::{Line, ValidationLevel};

        let mut line = Line::parse("S\t1\t*", None, ValidationLevel::default()).unwrap();
        line.set("zz", serde_json::json!([1, 2, 300])).unwrap();
        assert_eq!(line.to_string(), "S\t1\t*\tzz:B:S,1,2,300");
    }

    #[test]
    fn set_rejects_numeric_array_without_subtype() {
        use super::{Line, ValidationLevel};

        let mut line = Line::parse("S\t1\t*", None, ValidationLevel::None).unwrap();
        assert!(line.set("zz", vec![5_000_000_000i64]).is_err());
        assert!(line.set("zz", vec![-1i64, 4_294_967_295]).is_err());
        assert!(line.get("zz").unwrap().is_none());
        assert_eq!(line.to_string(), "S\t1\t*");
    }

    #[test]
    fn display_never_fails_on_unencodable_field() {
        use std::sync::OnceLock;

        use super::{Field, Line, ValidationLevel};
        use crate::field::{Datatype, Value};
        use crate::field::numeric_array::NumericArray;

        let mut line = Line::parse("S\t1\t*", None, ValidationLevel::default()).unwrap();
        let decoded = OnceLock::from(Value::NumericArray(NumericArray::from_integers(vec![5_000_000_000])));
        line.tags.insert("zz".to_string(), Field { datatype: Datatype::NumericArray, raw: None, decoded });
        assert!(line.to_text().is_err());
        assert_eq!(line.to_string(), "S\t1\t*\tzz:B:*");
    }

    #[test]
    fn write_level_checks_fields_again() {
        use super::{Line, ValidationLevel};

        let mut line = Line::parse("E\t*\t1+\t2+\t0\t10\t0\t10\t10X", None, ValidationLevel::Structural).unwrap();
        assert_eq!(line.to_text().unwrap(), "E\t*\t1+\t2+\t0\t10\t0\t10\t10X");

        line.set_vlevel(ValidationLevel::OnWrite);
        assert_eq!(line.to_text().unwrap_err().kind(), "FormatError");
    }

    #[test]
    fn paranoid_level_checks_every_read() {
        use super::{Line, ValidationLevel};

        let mut line = Line::parse("E\t*\t1+\t2+\t0\t10\t0\t10\t10X", None, ValidationLevel::Structural).unwrap();
        assert!(line.get("alignment").is_ok());

        line.set_vlevel(ValidationLevel::Paranoid);
        assert_eq!(line.get("alignment").unwrap_err().kind(), "FormatError");
    }

    #[test]
    fn delete_tags_only() {
        use super::{Line, ValidationLevel};
        use crate::field::Value;

        let mut line = Line::parse("S\t1\t*\tRC:i:4", None, ValidationLevel::default()).unwrap();
        assert_eq!(line.delete("RC").unwrap(), Some(Value::Integer(4)));
        assert_eq!(line.delete("RC").unwrap(), None);
        assert!(line.delete("sequence").is_err());
        assert_eq!(line.to_string(), "S\t1\t*");
    }

    #[test]
    fn length_tag_must_match_sequence_when_eager() {
        use super::{Line, ValidationLevel};

        let err = Line::parse("S\t1\tACGT\tLN:i:5", None, ValidationLevel::Eager).unwrap_err();
        assert_eq!(err.kind(), "InconsistencyError");
        assert!(Line::parse("S\t1\tACGT\tLN:i:5", None, ValidationLevel::Structural).is_ok());
    }

    #[test]
    fn lazy_fields_are_checked_when_read() {
        use super::{Line, ValidationLevel};

        let line = Line::parse("S\t1\t*\tzz:B:C,1,x", None, ValidationLevel::OnDecode).unwrap();
        assert_eq!(line.get("zz").unwrap_err().kind(), "FormatError");

        let err = Line::parse("S\t1\t*\tzz:B:C,1,x", None, ValidationLevel::Eager).unwrap_err();
        assert_eq!(err.kind(), "FormatError");
    }

    #[test]
    fn equality_ignores_tag_order() {
        use super::{Line, ValidationLevel};

        let a = Line::parse("S\t1\t*\tRC:i:4\tKC:i:2", None, ValidationLevel::default()).unwrap();
        let b = Line::parse("S\t1\t*\tKC:i:2\tRC:i:4", None, ValidationLevel::default()).unwrap();
        let c = Line::parse("S\t1\t*\tKC:i:3\tRC:i:4", None, ValidationLevel::default()).unwrap();
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn build_from_values() {
        use super::{Line, RecordType, Version};
        use crate::field::Value;
        use crate::field::oriented::Orientation;

        let line = Line::new(RecordType::Link, Version::Gfa1, vec![
            Value::from("a"), Value::from(Orientation::Forward),
            Value::from("b"), Value::from(Orientation::Reverse),
            Value::Placeholder,
        ]).unwrap();
        assert_eq!(line.to_string(), "L\ta\t+\tb\t-\t*");
        assert!(Line::new(RecordType::Link, Version::Gfa1, vec![Value::from("a")]).is_err());
    }

    #[test]
    fn parse_validation_levels() {
        use super::ValidationLevel;

        assert_eq!(ValidationLevel::from_u8(3).unwrap(), ValidationLevel::Eager);
        assert!(ValidationLevel::from_u8(6).is_err());
        assert!(ValidationLevel::Paranoid > ValidationLevel::OnWrite);
    }
}
