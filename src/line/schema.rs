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

//! Field layout of each record type and version.
//!
//! A [Schema] lists the positional fields in the order they appear on a
//! line, the predefined tags with their fixed datatypes, alternative names
//! for fields, the field holding the record's own name and the fields that
//! reference segments.
//!

use crate::error::GfaError;
use crate::field::Datatype;
use crate::line::{RecordType, Version};

#[derive(Debug)]
pub struct Schema {
    pub positional: &'static [(&'static str, Datatype)],
    pub predefined: &'static [(&'static str, Datatype)],
    /// (alias, canonical name)
    pub aliases: &'static [(&'static str, &'static str)],
    pub name_field: Option<&'static str>,
    pub references: &'static [&'static str],
}

impl Schema {
    pub fn positional_index(
        &self,
        name: &str,
    ) -> Option<usize> {
        self.positional.iter().position(|(field, _)| *field == name)
    }

    pub fn predefined_datatype(
        &self,
        name: &str,
    ) -> Option<Datatype> {
        self.predefined.iter().find(|(tag, _)| *tag == name).map(|(_, datatype)| *datatype)
    }

    /// Canonical name of `name`, resolving aliases.
    pub fn canonical<'a>(
        &self,
        name: &'a str,
    ) -> &'a str {
        match self.aliases.iter().find(|(alias, _)| *alias == name) {
            Some((_, canonical)) => canonical,
            None => name,
        }
    }

    /// Fields that may not be written directly while the record is in a graph.
    pub fn is_blocked(
        &self,
        name: &str,
    ) -> bool {
        self.name_field == Some(name) || self.references.contains(&name)
    }
}

const COUNT_TAGS_GFA1: [(&str, Datatype); 6] = [
    ("LN", Datatype::Integer),
    ("RC", Datatype::Integer),
    ("FC", Datatype::Integer),
    ("KC", Datatype::Integer),
    ("SH", Datatype::ByteArray),
    ("UR", Datatype::String),
];

const EDGE_TAGS_GFA1: [(&str, Datatype); 6] = [
    ("MQ", Datatype::Integer),
    ("NM", Datatype::Integer),
    ("RC", Datatype::Integer),
    ("FC", Datatype::Integer),
    ("KC", Datatype::Integer),
    ("ID", Datatype::String),
];

pub static HEADER: Schema = Schema {
    positional: &[],
    predefined: &[("VN", Datatype::String), ("TS", Datatype::Integer)],
    aliases: &[],
    name_field: None,
    references: &[],
};

pub static COMMENT: Schema = Schema {
    positional: &[("content", Datatype::Comment), ("spacer", Datatype::Comment)],
    predefined: &[],
    aliases: &[],
    name_field: None,
    references: &[],
};

pub static SEGMENT_GFA1: Schema = Schema {
    positional: &[("name", Datatype::SegmentNameGfa1), ("sequence", Datatype::SequenceGfa1)],
    predefined: &COUNT_TAGS_GFA1,
    aliases: &[("sid", "name")],
    name_field: Some("name"),
    references: &[],
};

pub static SEGMENT_GFA2: Schema = Schema {
    positional: &[("sid", Datatype::IdentifierGfa2), ("slen", Datatype::PositionGfa1), ("sequence", Datatype::SequenceGfa2)],
    predefined: &[
        ("RC", Datatype::Integer),
        ("FC", Datatype::Integer),
        ("KC", Datatype::Integer),
        ("SH", Datatype::ByteArray),
        ("UR", Datatype::String),
    ],
    aliases: &[("name", "sid")],
    name_field: Some("sid"),
    references: &[],
};

pub static LINK: Schema = Schema {
    positional: &[
        ("from_segment", Datatype::SegmentNameGfa1),
        ("from_orient", Datatype::Orientation),
        ("to_segment", Datatype::SegmentNameGfa1),
        ("to_orient", Datatype::Orientation),
        ("overlap", Datatype::AlignmentGfa1),
    ],
    predefined: &EDGE_TAGS_GFA1,
    aliases: &[("from", "from_segment"), ("to", "to_segment")],
    name_field: None,
    references: &["from_segment", "from_orient", "to_segment", "to_orient"],
};

pub static CONTAINMENT: Schema = Schema {
    positional: &[
        ("from_segment", Datatype::SegmentNameGfa1),
        ("from_orient", Datatype::Orientation),
        ("to_segment", Datatype::SegmentNameGfa1),
        ("to_orient", Datatype::Orientation),
        ("pos", Datatype::PositionGfa1),
        ("overlap", Datatype::AlignmentGfa1),
    ],
    predefined: &EDGE_TAGS_GFA1,
    aliases: &[
        ("container", "from_segment"),
        ("container_orient", "from_orient"),
        ("contained", "to_segment"),
        ("contained_orient", "to_orient"),
        ("from", "from_segment"),
        ("to", "to_segment"),
    ],
    name_field: None,
    references: &["from_segment", "from_orient", "to_segment", "to_orient"],
};

pub static PATH: Schema = Schema {
    positional: &[
        ("path_name", Datatype::PathNameGfa1),
        ("segment_names", Datatype::OrientedIdentifierListGfa1),
        ("overlaps", Datatype::AlignmentListGfa1),
    ],
    predefined: &[],
    aliases: &[("name", "path_name")],
    name_field: Some("path_name"),
    references: &["segment_names"],
};

pub static EDGE: Schema = Schema {
    positional: &[
        ("eid", Datatype::OptionalIdentifierGfa2),
        ("sid1", Datatype::OrientedIdentifierGfa2),
        ("sid2", Datatype::OrientedIdentifierGfa2),
        ("beg1", Datatype::PositionGfa2),
        ("end1", Datatype::PositionGfa2),
        ("beg2", Datatype::PositionGfa2),
        ("end2", Datatype::PositionGfa2),
        ("alignment", Datatype::AlignmentGfa2),
    ],
    predefined: &[],
    aliases: &[("name", "eid")],
    name_field: Some("eid"),
    references: &["sid1", "sid2"],
};

pub static GAP: Schema = Schema {
    positional: &[
        ("gid", Datatype::OptionalIdentifierGfa2),
        ("sid1", Datatype::OrientedIdentifierGfa2),
        ("sid2", Datatype::OrientedIdentifierGfa2),
        ("disp", Datatype::Integer),
        ("var", Datatype::OptionalInteger),
    ],
    predefined: &[],
    aliases: &[("name", "gid")],
    name_field: Some("gid"),
    references: &["sid1", "sid2"],
};

pub static FRAGMENT: Schema = Schema {
    positional: &[
        ("sid", Datatype::IdentifierGfa2),
        ("external", Datatype::OrientedIdentifierGfa2),
        ("s_beg", Datatype::PositionGfa2),
        ("s_end", Datatype::PositionGfa2),
        ("f_beg", Datatype::PositionGfa2),
        ("f_end", Datatype::PositionGfa2),
        ("alignment", Datatype::AlignmentGfa2),
    ],
    predefined: &[],
    aliases: &[],
    name_field: None,
    references: &["sid"],
};

pub static ORDERED_GROUP: Schema = Schema {
    positional: &[("pid", Datatype::OptionalIdentifierGfa2), ("items", Datatype::OrientedIdentifierListGfa2)],
    predefined: &[],
    aliases: &[("name", "pid")],
    name_field: Some("pid"),
    references: &["items"],
};

pub static UNORDERED_GROUP: Schema = Schema {
    positional: &[("pid", Datatype::OptionalIdentifierGfa2), ("items", Datatype::IdentifierListGfa2)],
    predefined: &[],
    aliases: &[("name", "pid")],
    name_field: Some("pid"),
    references: &["items"],
};

/// Custom records only fix their first field, the rest are free-form.
pub static CUSTOM: Schema = Schema {
    positional: &[("record_type", Datatype::CustomRecordType)],
    predefined: &[],
    aliases: &[],
    name_field: None,
    references: &[],
};

/// Schema of `record_type` in `version`.
pub fn schema(
    record_type: RecordType,
    version: Version,
) -> Result<&'static Schema, GfaError> {
    let schema = match (record_type, version) {
        (RecordType::Header, _) => &HEADER,
        (RecordType::Comment, _) => &COMMENT,
        (RecordType::Segment, Version::Gfa1) => &SEGMENT_GFA1,
        (RecordType::Segment, Version::Gfa2) => &SEGMENT_GFA2,
        (RecordType::Link, Version::Gfa1) => &LINK,
        (RecordType::Containment, Version::Gfa1) => &CONTAINMENT,
        (RecordType::Path, Version::Gfa1) => &PATH,
        (RecordType::Edge, Version::Gfa2) => &EDGE,
        (RecordType::Gap, Version::Gfa2) => &GAP,
        (RecordType::Fragment, Version::Gfa2) => &FRAGMENT,
        (RecordType::OrderedGroup, Version::Gfa2) => &ORDERED_GROUP,
        (RecordType::UnorderedGroup, Version::Gfa2) => &UNORDERED_GROUP,
        (RecordType::Custom, Version::Gfa2) => &CUSTOM,
        (record_type, version) => {
            return Err(GfaError::Version(format!("record type '{}' does not exist in {}", record_type.code(), version)))
        },
    };
    Ok(schema)
}

// Tests
#[cfg(test)]
mod tests {

    #[test]
    fn segment_schemas_differ_by_version() {
        use super::schema;
        use crate::line::{RecordType, Version};

        assert_eq!(schema(RecordType::Segment, Version::Gfa1).unwrap().positional.len(), 2);
        assert_eq!(schema(RecordType::Segment, Version::Gfa2).unwrap().positional.len(), 3);
        assert!(schema(RecordType::Segment, Version::Generic).is_err());
    }

    #[test]
    fn version_specific_record_types() {
        use super::schema;
        use crate::line::{RecordType, Version};

        assert!(schema(RecordType::Link, Version::Gfa2).is_err());
        assert!(schema(RecordType::Edge, Version::Gfa1).is_err());
        assert!(schema(RecordType::Comment, Version::Gfa2).is_ok());
    }

    #[test]
    fn aliases_resolve() {
        use super::{CONTAINMENT, SEGMENT_GFA2};

        assert_eq!(CONTAINMENT.canonical("contained"), "to_segment");
        assert_eq!(SEGMENT_GFA2.canonical("name"), "sid");
        assert_eq!(SEGMENT_GFA2.canonical("slen"), "slen");
    }
}
