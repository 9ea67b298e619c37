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

//! Names for segments created by merging and multiplication.

use crate::error::GfaError;
use crate::graph::Graph;

/// Suffix appended to a name to derive new unique names.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SuffixStyle {
    /// `b`, `c`, ..., `z`, `ba`, ...
    #[default]
    Lowercase,
    /// `B`, `C`, ..., `Z`, `BA`, ...
    Uppercase,
    /// `_2`, `_3`, ...
    Numeric,
    /// `_copy`, `_copy2`, ...
    Copy,
}

impl std::str::FromStr for SuffixStyle {
    type Err = GfaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "lowercase" => Ok(SuffixStyle::Lowercase),
            "uppercase" => Ok(SuffixStyle::Uppercase),
            "numeric" => Ok(SuffixStyle::Numeric),
            "copy" => Ok(SuffixStyle::Copy),
            _ => Err(GfaError::Value(format!("'{}' is not a valid suffix style", s))),
        }
    }
}

/// How new segments are named.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Naming {
    /// Names of the merged segments joined with `_`.
    Joined,
    /// Names given by the caller.
    Explicit(Vec<String>),
    /// The first name of the input with the first free suffix.
    Suffix(SuffixStyle),
}

fn letters(
    mut k: usize,
    base: u8,
) -> String {
    let mut out = String::new();
    loop {
        out.push((base + (k % 26) as u8) as char);
        k /= 26;
        if k == 0 {
            break
        }
    }
    out.chars().rev().collect()
}

/// The `k`th suffix of `style`, counting the unsuffixed name as 0.
pub fn suffix(
    style: SuffixStyle,
    k: usize,
) -> String {
    match style {
        SuffixStyle::Lowercase => letters(k, b'a'),
        SuffixStyle::Uppercase => letters(k, b'A'),
        SuffixStyle::Numeric => format!("_{}", k + 1),
        SuffixStyle::Copy if k <= 1 => "_copy".to_string(),
        SuffixStyle::Copy => format!("_copy{}", k),
    }
}

impl Graph {
    /// `count` names derived from `base` that are not used in the graph.
    pub fn unused_names(
        &self,
        base: &str,
        style: SuffixStyle,
        count: usize,
    ) -> Vec<String> {
        let mut names: Vec<String> = Vec::with_capacity(count);
        let mut k = 1;
        while names.len() < count {
            let candidate = format!("{}{}", base, suffix(style, k));
            if !self.is_name_used(&candidate) && !names.contains(&candidate) {
                names.push(candidate);
            }
            k += 1;
        }
        names
    }

    /// Names for `count` copies of `base`.
    pub fn names_for_copies(
        &self,
        base: &str,
        naming: &Naming,
        count: usize,
    ) -> Result<Vec<String>, GfaError> {
        match naming {
            Naming::Suffix(style) => Ok(self.unused_names(base, *style, count)),
            Naming::Explicit(names) => {
                if names.len() != count {
                    return Err(GfaError::Value(format!("{} copies of {} need {} names, got {}", count, base, count, names.len())))
                }
                for (i, name) in names.iter().enumerate() {
                    if self.is_name_used(name) || names[..i].contains(name) {
                        return Err(GfaError::NotUnique(format!("name {} is already used", name)))
                    }
                }
                Ok(names.clone())
            },
            Naming::Joined => Err(GfaError::Runtime("copies can not be named by joining names".to_string())),
        }
    }

    /// Name of the segment merged from `names`.
    ///
    /// The merged segments themselves are deleted before the new one is
    /// added, so their names may be reused.
    pub fn merged_name(
        &self,
        names: &[String],
        naming: &Naming,
    ) -> Result<String, GfaError> {
        let first = names.first().ok_or_else(|| GfaError::Value("nothing to merge".to_string()))?;
        let name = match naming {
            Naming::Joined => names.join("_"),
            Naming::Explicit(given) => given.first()
                .ok_or_else(|| GfaError::Value("no name given for the merged segment".to_string()))?
                .clone(),
            Naming::Suffix(style) => return Ok(self.unused_names(first, *style, 1).remove(0)),
        };
        if self.is_name_used(&name) && !names.contains(&name) {
            return Err(GfaError::NotUnique(format!("name {} is already used", name)))
        }
        Ok(name)
    }
}

// Tests
#[cfg(test)]
mod tests {

    #[test]
    fn suffixes() {
        use super::{suffix, SuffixStyle};

        assert_eq!(suffix(SuffixStyle::Lowercase, 1), "b");
        assert_eq!(suffix(SuffixStyle::Lowercase, 25), "z");
        assert_eq!(suffix(SuffixStyle::Lowercase, 26), "ba");
        assert_eq!(suffix(SuffixStyle::Uppercase, 2), "C");
        assert_eq!(suffix(SuffixStyle::Numeric, 1), "_2");
        assert_eq!(suffix(SuffixStyle::Copy, 1), "_copy");
        assert_eq!(suffix(SuffixStyle::Copy, 2), "_copy2");

        assert_eq!("numeric".parse::<SuffixStyle>().unwrap(), SuffixStyle::Numeric);
        assert!("roman".parse::<SuffixStyle>().is_err());
    }

    #[test]
    fn unused_names_skip_taken_ones() {
        use super::SuffixStyle;
        use crate::graph::Graph;

        let graph = Graph::from_reader("S\t1\t*\nS\t1b\t*\nS\t1d\t*\n".as_bytes()).unwrap();
        assert_eq!(graph.unused_names("1", SuffixStyle::Lowercase, 3), vec!["1c", "1e", "1f"]);
        assert_eq!(graph.unused_names("1", SuffixStyle::Copy, 2), vec!["1_copy", "1_copy2"]);
    }

    #[test]
    fn explicit_names_are_checked() {
        use super::Naming;
        use crate::graph::Graph;

        let graph = Graph::from_reader("S\t1\t*\nS\t2\t*\n".as_bytes()).unwrap();
        let names = Naming::Explicit(vec!["x".to_string(), "y".to_string()]);
        assert_eq!(graph.names_for_copies("1", &names, 2).unwrap(), vec!["x", "y"]);
        assert_eq!(graph.names_for_copies("1", &names, 3).unwrap_err().kind(), "ValueError");

        let taken = Naming::Explicit(vec!["2".to_string()]);
        assert_eq!(graph.names_for_copies("1", &taken, 1).unwrap_err().kind(), "NotUniqueError");
        assert!(graph.names_for_copies("1", &Naming::Joined, 1).is_err());
    }

    #[test]
    fn merged_names() {
        use super::{Naming, SuffixStyle};
        use crate::graph::Graph;

        let graph = Graph::from_reader("S\t1\t*\nS\t2\t*\nS\t1_2\t*\n".as_bytes()).unwrap();
        let members = vec!["1".to_string(), "2".to_string()];
        assert_eq!(graph.merged_name(&members, &Naming::Joined).unwrap_err().kind(), "NotUniqueError");
        assert_eq!(graph.merged_name(&members, &Naming::Suffix(SuffixStyle::Uppercase)).unwrap(), "1B");
        assert_eq!(graph.merged_name(&members, &Naming::Explicit(vec!["2".to_string()])).unwrap(), "2");
    }
}
