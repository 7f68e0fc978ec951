//! Compact TAB-separated delta encoding of an edit script, relative to a
//! known source text.

use super::{Diff, Op};
use crate::error::{Error, Result};
use crate::strutil::{percent_decode, percent_encode};

/// Characters left unescaped by `diff_toDelta` beyond the unreserved set,
/// matching the original's `PATCH_TEXT_ENCODE_CHARACTERS`.
const DELTA_ALLOW: &str = " !~*'();/?:@&=+$,#";

/// Encodes an edit script as `=N` / `-N` / `+TEXT` tokens joined by TAB.
pub fn diff_to_delta(diffs: &[Diff]) -> String {
    diffs
        .iter()
        .map(|d| match d.op {
            Op::Equal => format!("={}", d.text.chars().count()),
            Op::Delete => format!("-{}", d.text.chars().count()),
            Op::Insert => format!("+{}", percent_encode(&d.text, DELTA_ALLOW)),
        })
        .collect::<Vec<_>>()
        .join("\t")
}

/// Reconstructs the edit script that `diff_toDelta` encoded, consuming
/// code units from `text1` for every `=`/`-` token.
pub fn diff_from_delta(text1: &str, delta: &str) -> Result<Vec<Diff>> {
    let source: Vec<char> = text1.chars().collect();
    let mut pointer = 0usize;
    let mut diffs = Vec::new();

    for token in delta.split('\t') {
        if token.is_empty() {
            continue;
        }

        let (sign, rest) = token.split_at(1);
        let sign = sign.chars().next().unwrap();

        match sign {
            '+' => {
                let replaced = rest.replace('+', "%2B");
                diffs.push(Diff::insert(percent_decode(&replaced)));
            }
            '-' | '=' => {
                let n: i64 = rest
                    .parse()
                    .map_err(|_| Error::DeltaNegativeNumber(token.to_string()))?;
                if n < 0 {
                    return Err(Error::DeltaNegativeNumber(token.to_string()));
                }
                let n = n as usize;
                if pointer + n > source.len() {
                    return Err(Error::DeltaTooLong { delta_len: pointer + n, source_len: source.len() });
                }
                let text: String = source[pointer..pointer + n].iter().collect();
                pointer += n;
                if sign == '=' {
                    diffs.push(Diff::equal(text));
                } else {
                    diffs.push(Diff::delete(text));
                }
            }
            other => return Err(Error::DeltaInvalidOperation(other)),
        }
    }

    if pointer != source.len() {
        return Err(Error::DeltaTooShort { delta_len: pointer, source_len: source.len() });
    }

    Ok(diffs)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_through_delta() {
        let diffs = vec![
            Diff::equal("jump"),
            Diff::delete("s"),
            Diff::insert("ed"),
            Diff::equal(" over "),
            Diff::delete("the"),
            Diff::insert("a"),
            Diff::equal(" lazy"),
            Diff::insert("old dog"),
        ];
        let delta = diff_to_delta(&diffs);
        assert_eq!(delta, "=4\t-1\t+ed\t=6\t-3\t+a\t=5\t+old dog");

        let text1 = super::super::diff_text1(&diffs);
        let restored = diff_from_delta(&text1, &delta).unwrap();
        assert_eq!(restored, diffs);
    }

    #[test]
    fn percent_encodes_special_characters_in_insertions() {
        let diffs = vec![Diff::insert("100% fresh air!")];
        let delta = diff_to_delta(&diffs);
        assert_eq!(delta, "+100%25 fresh air!");
    }

    #[test]
    fn rejects_source_length_mismatch() {
        let err = diff_from_delta("short", "=10").unwrap_err();
        assert!(matches!(err, Error::DeltaTooLong { .. }));
    }

    #[test]
    fn rejects_unconsumed_source() {
        let err = diff_from_delta("longer text", "=3").unwrap_err();
        assert!(matches!(err, Error::DeltaTooShort { .. }));
    }

    #[test]
    fn rejects_unknown_operation() {
        let err = diff_from_delta("abc", "*3").unwrap_err();
        assert!(matches!(err, Error::DeltaInvalidOperation('*')));
    }
}
