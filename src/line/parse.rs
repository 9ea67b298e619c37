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

//! Parse tab separated GFA lines into [Line]s.
//!
//! The version of a record is taken from the caller if known, otherwise
//! from the record type. Segments have a different layout in the two
//! versions and are classified by trying GFA1 first, then GFA2.
//!

use log::debug;

use crate::error::GfaError;
use crate::field::{text, Datatype};
use crate::line::{schema, Line, RecordType, ValidationLevel, Version};

/// Split a tag into its name, datatype and value text.
fn parse_tag(field: &str) -> Result<(String, Datatype, String), GfaError> {
    let caps = text::TAG.captures(field)
        .ok_or_else(|| GfaError::Format(format!("'{}' is not a valid tag", field)))?;
    let datatype = Datatype::from_tag_letter(&caps[2])?;
    Ok((caps[1].to_string(), datatype, caps[3].to_string()))
}

/// True if `fields` (without the record type) form a segment of `version`.
fn fits_segment(
    fields: &[&str],
    version: Version,
) -> Result<(), GfaError> {
    let schema = schema::schema(RecordType::Segment, version)?;
    if fields.len() < schema.positional.len() {
        return Err(GfaError::Format(format!(
            "{} positional fields, expected {}", fields.len(), schema.positional.len()
        )))
    }
    for ((name, datatype), text) in schema.positional.iter().zip(fields.iter()) {
        datatype.decode(text).map_err(|err| err.context(name))?;
    }
    for tag in fields[schema.positional.len()..].iter() {
        parse_tag(tag)?;
    }
    Ok(())
}

/// Version of a segment line, trying GFA1 before GFA2.
pub fn classify_segment(fields: &[&str]) -> Result<Version, GfaError> {
    let mut failures: Vec<String> = Vec::with_capacity(2);
    for version in [Version::Gfa1, Version::Gfa2] {
        match fits_segment(fields, version) {
            Ok(()) => {
                debug!("Segment {} classified as {}", fields.first().unwrap_or(&""), version);
                return Ok(version)
            },
            Err(err) => failures.push(format!("as {}: {}", version, err)),
        }
    }
    Err(GfaError::Format(format!("segment is neither GFA1 nor GFA2 ({})", failures.join("; "))))
}

fn parse_comment(
    rest: &str,
    vlevel: ValidationLevel,
) -> Result<Line, GfaError> {
    let content = rest.trim_start_matches([' ', '\t']);
    let spacer = &rest[..(rest.len() - content.len())];
    Line::from_text(RecordType::Comment, Version::Generic, &[content, spacer], Vec::new(), vlevel)
}

impl Line {
    /// Parse one line of GFA text.
    ///
    /// `version` is the version of the surrounding file if known. A record
    /// type that does not exist in that version is a version error.
    pub fn parse(
        text: &str,
        version: Option<Version>,
        vlevel: ValidationLevel,
    ) -> Result<Line, GfaError> {
        let text = text.trim_end_matches(['\n', '\r']);
        if let Some(rest) = text.strip_prefix('#') {
            return parse_comment(rest, vlevel)
        }

        let fields: Vec<&str> = text.split('\t').collect();
        let code = fields[0];
        if code.is_empty() {
            return Err(GfaError::Format(format!("line '{}' has no record type", text)))
        }
        let record_type = RecordType::from_code(code);

        let version = match (record_type.version(), version) {
            (Some(Version::Generic), _) => Version::Generic,
            (Some(fixed), Some(known)) if known != Version::Generic && known != fixed => {
                return Err(GfaError::Version(format!("record type {} is not allowed in {}", code, known)))
            },
            (Some(fixed), _) => fixed,
            (None, Some(known)) if known != Version::Generic => known,
            (None, _) => classify_segment(&fields[1..])?,
        };

        let schema = schema::schema(record_type, version)?;
        let (positional, tags) = if record_type == RecordType::Custom {
            // Custom records keep their record type as the first field and
            // end with any fields that look like tags.
            let end = fields.iter().rposition(|field| !text::TAG.is_match(field)).map_or(1, |i| i + 1);
            (&fields[..end], &fields[end..])
        } else {
            let end = schema.positional.len() + 1;
            if fields.len() < end {
                return Err(GfaError::Format(format!(
                    "{} record has {} positional fields, expected {}",
                    code, fields.len() - 1, end - 1
                )))
            }
            (&fields[1..end], &fields[end..])
        };

        let tags = tags.iter().map(|field| parse_tag(field)).collect::<Result<Vec<_>, GfaError>>()?;
        Line::from_text(record_type, version, positional, tags, vlevel)
    }
}

impl std::str::FromStr for Line {
    type Err = GfaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Line::parse(s, None, ValidationLevel::default())
    }
}
