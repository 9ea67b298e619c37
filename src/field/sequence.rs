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
use needletail::sequence::complement;

/// Reverse complement of a segment sequence.
///
/// IUPAC codes are complemented and case is kept. Characters without a
/// complement (`=`, `.`) are only reversed. The placeholder `*` is returned
/// as is.
pub fn reverse_complement(sequence: &str) -> String {
    if sequence == "*" {
        return sequence.to_string()
    }
    sequence.chars().rev().map(|c| {
        if c.is_ascii() { complement(c as u8) as char } else { c }
    }).collect()
}

// Tests
#[cfg(test)]
mod tests {

    #[test]
    fn reverse_complement_keeps_case() {
        use super::reverse_complement;

        assert_eq!(reverse_complement("ACCTg"), "cAGGT");
        assert_eq!(reverse_complement("ARN"), "NYT");
        assert_eq!(reverse_complement("*"), "*");
    }

    #[test]
    fn reverse_complement_is_an_involution() {
        use super::reverse_complement;

        let seq = "GATTACAnnRYkm";
        assert_eq!(reverse_complement(&reverse_complement(seq)), seq);
    }
}
