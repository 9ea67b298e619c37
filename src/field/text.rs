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

//! Syntax of the text based field datatypes.
//!
//! Each pattern matches the full encoded text of a field.
//!

use std::sync::LazyLock;

use regex::Regex;

use crate::error::GfaError;

fn anchored(pattern: &str) -> Regex {
    Regex::new(&format!("^(?:{})$", pattern)).unwrap_or_else(|err| panic!("invalid built-in pattern '{}': {}", pattern, err))
}

const SEGMENT_NAME_GFA1: &str = r"[!-)+-<>-~][!-~]*";
const FLOAT: &str = r"[-+]?[0-9]*\.?[0-9]+(?:[eE][-+]?[0-9]+)?";

pub static CHAR: LazyLock<Regex> = LazyLock::new(|| anchored(r"[!-~]"));
pub static INTEGER: LazyLock<Regex> = LazyLock::new(|| anchored(r"[-+]?[0-9]+"));
pub static FLOAT_NUMBER: LazyLock<Regex> = LazyLock::new(|| anchored(FLOAT));
pub static STRING: LazyLock<Regex> = LazyLock::new(|| anchored(r"[ !-~]+"));
pub static NUMERIC_ARRAY: LazyLock<Regex> = LazyLock::new(|| anchored(
    &format!(r"[cCsSiI](?:,[-+]?[0-9]+)*|f(?:,{})*", FLOAT)
));
pub static SEGMENT_NAME: LazyLock<Regex> = LazyLock::new(|| anchored(SEGMENT_NAME_GFA1));
pub static IDENTIFIER: LazyLock<Regex> = LazyLock::new(|| anchored(r"[!-~]+"));
pub static OPTIONAL_IDENTIFIER: LazyLock<Regex> = LazyLock::new(|| anchored(r"\*|[!-~]+"));
pub static ORIENTED_IDENTIFIER: LazyLock<Regex> = LazyLock::new(|| anchored(r"[!-~]+[+-]"));
pub static ORIENTED_IDENTIFIER_LIST_GFA1: LazyLock<Regex> = LazyLock::new(|| anchored(
    &format!(r"{0}[+-](?:,{0}[+-])*", SEGMENT_NAME_GFA1)
));
pub static ORIENTED_IDENTIFIER_LIST_GFA2: LazyLock<Regex> = LazyLock::new(|| anchored(r"[!-~]+[+-](?: [!-~]+[+-])*"));
pub static IDENTIFIER_LIST_GFA2: LazyLock<Regex> = LazyLock::new(|| anchored(r"[!-~]+(?: [!-~]+)*"));
pub static ORIENTATION: LazyLock<Regex> = LazyLock::new(|| anchored(r"[+-]"));
pub static SEQUENCE_GFA1: LazyLock<Regex> = LazyLock::new(|| anchored(r"\*|[A-Za-z=.]+"));
pub static SEQUENCE_GFA2: LazyLock<Regex> = LazyLock::new(|| anchored(r"\*|[!-~]+"));
pub static POSITION_GFA1: LazyLock<Regex> = LazyLock::new(|| anchored(r"[0-9]+"));
pub static POSITION_GFA2: LazyLock<Regex> = LazyLock::new(|| anchored(r"[0-9]+\$?"));
pub static ALIGNMENT_GFA1: LazyLock<Regex> = LazyLock::new(|| anchored(r"\*|(?:[0-9]+[MIDNSHPX=])+"));
pub static ALIGNMENT_GFA2: LazyLock<Regex> = LazyLock::new(|| anchored(r"\*|(?:[0-9]+[MDIP])+|[0-9]+(?:,[0-9]+)*"));
pub static ALIGNMENT_LIST_GFA1: LazyLock<Regex> = LazyLock::new(|| anchored(
    r"\*|(?:(?:[0-9]+[MIDNSHPX=])+|\*)(?:,(?:(?:[0-9]+[MIDNSHPX=])+|\*))*"
));
pub static OPTIONAL_INTEGER: LazyLock<Regex> = LazyLock::new(|| anchored(r"\*|[-+]?[0-9]+"));
pub static CUSTOM_RECORD_TYPE: LazyLock<Regex> = LazyLock::new(|| anchored(r"[!-~]+"));
pub static GENERIC: LazyLock<Regex> = LazyLock::new(|| anchored(r"[^\t\n]+"));
pub static COMMENT: LazyLock<Regex> = LazyLock::new(|| anchored(r"[^\n]*"));

/// Tag syntax `XX:T:value`.
pub static TAG: LazyLock<Regex> = LazyLock::new(|| anchored(r"([A-Za-z][A-Za-z0-9]):([AifZJHB]):(.*)"));
/// Names of tags not defined by the format.
pub static CUSTOM_TAG_NAME: LazyLock<Regex> = LazyLock::new(|| anchored(r"[a-z][a-z0-9]"));
pub static TAG_NAME: LazyLock<Regex> = LazyLock::new(|| anchored(r"[A-Za-z][A-Za-z0-9]"));

/// Check `text` against `pattern`, describing the expected syntax on failure.
pub fn check(
    pattern: &Regex,
    text: &str,
    what: &str,
) -> Result<(), GfaError> {
    if pattern.is_match(text) {
        Ok(())
    } else {
        Err(GfaError::Format(format!("'{}' is not a valid {}", text, what)))
    }
}

/// GFA1 segment names may not contain `+,` or `-,`, which would break paths.
pub fn check_segment_name(text: &str) -> Result<(), GfaError> {
    check(&SEGMENT_NAME, text, "GFA1 segment name")?;
    if text.contains("+,") || text.contains("-,") {
        return Err(GfaError::Format(format!("segment name '{}' contains '+,' or '-,'", text)))
    }
    Ok(())
}

/// Split a GFA1 list of oriented segment names.
///
/// Names may contain commas, so items end only at a comma that follows an
/// orientation sign.
pub fn split_oriented_list_gfa1(text: &str) -> Vec<&str> {
    let bytes = text.as_bytes();
    let mut items = Vec::new();
    let mut start = 0;
    for i in 1..bytes.len() {
        if bytes[i] == b',' && matches!(bytes[i - 1], b'+' | b'-') {
            items.push(&text[start..i]);
            start = i + 1;
        }
    }
    items.push(&text[start..]);
    items
}

// Tests
#[cfg(test)]
mod tests {

    #[test]
    fn segment_names() {
        use super::check_segment_name;

        assert!(check_segment_name("contig_1").is_ok());
        assert!(check_segment_name("*").is_err());
        assert!(check_segment_name("=a").is_err());
        assert!(check_segment_name("a+,b").is_err());
        assert!(check_segment_name("a b").is_err());
    }

    #[test]
    fn split_gfa1_list_at_orientations() {
        use super::split_oriented_list_gfa1;

        assert_eq!(split_oriented_list_gfa1("1+,2-,3+"), vec!["1+", "2-", "3+"]);
        assert_eq!(split_oriented_list_gfa1("a,b+,c-"), vec!["a,b+", "c-"]);
        assert_eq!(split_oriented_list_gfa1("x,+"), vec!["x,+"]);
    }

    #[test]
    fn tag_syntax() {
        use super::TAG;

        let caps = TAG.captures("RC:i:1200").unwrap();
        assert_eq!(&caps[1], "RC");
        assert_eq!(&caps[2], "i");
        assert_eq!(&caps[3], "1200");
        assert!(TAG.captures("RCC:i:1").is_none());
        assert!(TAG.captures("RC:q:1").is_none());
    }

    #[test]
    fn alignment_patterns() {
        use super::{ALIGNMENT_GFA1, ALIGNMENT_GFA2, ALIGNMENT_LIST_GFA1};

        assert!(ALIGNMENT_GFA1.is_match("10M2=1X"));
        assert!(!ALIGNMENT_GFA2.is_match("10M2=1X"));
        assert!(ALIGNMENT_GFA2.is_match("10,12,4"));
        assert!(ALIGNMENT_LIST_GFA1.is_match("10M,*,3M1D2M"));
    }

    #[test]
    fn numeric_arrays() {
        use super::NUMERIC_ARRAY;

        assert!(NUMERIC_ARRAY.is_match("C,1,2,3"));
        assert!(NUMERIC_ARRAY.is_match("f,1.5,-2e3"));
        assert!(!NUMERIC_ARRAY.is_match("C,1.5"));
        assert!(!NUMERIC_ARRAY.is_match("x,1"));
    }
}
