//! GNU-unified-diff-like textual encoding/decoding of a patch list.

use once_cell::sync::Lazy;
use regex::Regex;

use super::Patch;
use crate::diff::{Diff, Op};
use crate::error::{Error, Result};
use crate::strutil::{percent_decode, percent_encode};

/// Characters left unescaped by the patch-line encoder beyond the
/// unreserved set, matching the delta codec's allow-list.
const PATCH_ALLOW: &str = " !~*'();/?:@&=+$,#";

static PATCH_HEADER: Lazy<Regex> = Lazy::new(|| Regex::new(r"^@@ -(\d+),?(\d*) \+(\d+),?(\d*) @@$").unwrap());

/// Renders a patch list as `@@ -S1[,L1] +S2[,L2] @@` headers followed by
/// percent-encoded ` `/`-`/`+` lines, one patch after another.
pub fn patch_to_text(patches: &[Patch]) -> String {
    let mut text = String::new();
    for patch in patches {
        text.push_str(&patch_header(patch));
        text.push('\n');
        for d in &patch.diffs {
            let sign = match d.op {
                Op::Insert => '+',
                Op::Delete => '-',
                Op::Equal => ' ',
            };
            text.push(sign);
            text.push_str(&percent_encode(&d.text, PATCH_ALLOW));
            text.push('\n');
        }
    }
    text
}

fn patch_header(patch: &Patch) -> String {
    let coords1 = coords(patch.start1, patch.length1);
    let coords2 = coords(patch.start2, patch.length2);
    format!("@@ -{coords1} +{coords2} @@")
}

fn coords(start: usize, length: usize) -> String {
    match length {
        0 => format!("{start},0"),
        1 => format!("{}", start + 1),
        n => format!("{},{n}", start + 1),
    }
}

/// Parses one `start[,length]` half of a header into a zero-based start
/// and a length, applying the GNU convention that an omitted length means
/// 1. Fails rather than underflowing when the header claims a 1-based
/// start of `0` with an implied or explicit non-zero length.
fn parse_coords(raw_cap: &str, len_cap: &str, header_line: &str) -> Result<(usize, usize)> {
    let raw_start: usize = raw_cap.parse().map_err(|_| Error::PatchInvalidHeader(header_line.to_string()))?;
    if len_cap.is_empty() {
        let start = raw_start.checked_sub(1).ok_or_else(|| Error::PatchInvalidHeader(header_line.to_string()))?;
        Ok((start, 1))
    } else if len_cap == "0" {
        Ok((raw_start, 0))
    } else {
        let len: usize = len_cap.parse().map_err(|_| Error::PatchInvalidHeader(header_line.to_string()))?;
        let start = raw_start.checked_sub(1).ok_or_else(|| Error::PatchInvalidHeader(header_line.to_string()))?;
        Ok((start, len))
    }
}

/// Parses the textual form [`patch_to_text`] produces back into a patch
/// list. Fails on a header that doesn't match the GNU header grammar or
/// a body line with an unrecognized leading sign.
pub fn patch_from_text(text: &str) -> Result<Vec<Patch>> {
    let mut patches = Vec::new();
    if text.is_empty() {
        return Ok(patches);
    }

    let lines: Vec<&str> = text.split('\n').collect();
    let mut i = 0usize;

    while i < lines.len() {
        if lines[i].is_empty() && i == lines.len() - 1 {
            break;
        }

        let caps = PATCH_HEADER
            .captures(lines[i])
            .ok_or_else(|| Error::PatchInvalidHeader(lines[i].to_string()))?;
        i += 1;

        let mut patch = Patch { start1: 0, start2: 0, length1: 0, length2: 0, diffs: Vec::new() };

        let (start1, length1) = parse_coords(&caps[1], &caps[2], lines[i - 1])?;
        patch.start1 = start1;
        patch.length1 = length1;

        let (start2, length2) = parse_coords(&caps[3], &caps[4], lines[i - 1])?;
        patch.start2 = start2;
        patch.length2 = length2;

        while i < lines.len() {
            if lines[i].is_empty() {
                i += 1;
                continue;
            }
            let sign = lines[i].chars().next().unwrap();
            if sign == '@' {
                break;
            }

            let rest = &lines[i][sign.len_utf8()..];
            let replaced = rest.replace('+', "%2B");
            let decoded = percent_decode(&replaced);

            match sign {
                '-' => patch.diffs.push(Diff::delete(decoded)),
                '+' => patch.diffs.push(Diff::insert(decoded)),
                ' ' => patch.diffs.push(Diff::equal(decoded)),
                other => return Err(Error::PatchInvalidMode(other, lines[i].to_string())),
            }
            i += 1;
        }

        patches.push(patch);
    }

    Ok(patches)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Dmp;

    #[test]
    fn round_trips_through_text() {
        let dmp = Dmp::default();
        let patches = dmp.patch_make_from_texts(
            "The quick brown fox jumps over the lazy dog.",
            "That quick brown fox jumped over a lazy dog.",
        );
        let text = patch_to_text(&patches);
        let restored = patch_from_text(&text).unwrap();
        assert_eq!(restored, patches);
    }

    #[test]
    fn zero_length_hunk_header_has_no_minus_one() {
        let patch = Patch { start1: 5, start2: 5, length1: 0, length2: 2, diffs: vec![Diff::insert("hi")] };
        let header = patch_header(&patch);
        assert_eq!(header, "@@ -5,0 +6,2 @@");
    }

    #[test]
    fn rejects_malformed_header() {
        let err = patch_from_text("not a header\n").unwrap_err();
        assert!(matches!(err, Error::PatchInvalidHeader(_)));
    }

    #[test]
    fn rejects_unknown_mode() {
        let text = "@@ -1,1 +1,1 @@\n*oops\n";
        let err = patch_from_text(text).unwrap_err();
        assert!(matches!(err, Error::PatchInvalidMode('*', _)));
    }

    #[test]
    fn rejects_zero_start_with_implied_length_instead_of_panicking() {
        let err = patch_from_text("@@ -0 +1 @@\n").unwrap_err();
        assert!(matches!(err, Error::PatchInvalidHeader(_)));

        let err = patch_from_text("@@ -1 +0 @@\n").unwrap_err();
        assert!(matches!(err, Error::PatchInvalidHeader(_)));
    }
}
