//! Error types for the diff/match/patch engine.
//!
//! The engine distinguishes parse errors and precondition violations (both
//! represented here) from soft failures (deadline expiry, unmatched
//! patches, imperfect matches) which are never errors — they are reported
//! as data, per spec: a degraded diff, or a `false` slot in a patch
//! application's success vector.

use thiserror::Error;

/// Failures the engine can report.
#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum Error {
    /// `match_bitap` was asked to locate a pattern longer than `Match_MaxBits`.
    #[error("pattern too long for this application: {len} code units exceeds Match_MaxBits ({max_bits})")]
    PatternTooLong { len: usize, max_bits: usize },

    /// A `=N` or `-N` delta token carried a negative count.
    #[error("negative number in diff_fromDelta: {0}")]
    DeltaNegativeNumber(String),

    /// The delta consumed fewer code units than `text1` provides.
    #[error("delta length ({delta_len}) smaller than source text length ({source_len})")]
    DeltaTooShort { delta_len: usize, source_len: usize },

    /// The delta tried to consume more code units than `text1` provides.
    #[error("delta length ({delta_len}) larger than source text length ({source_len})")]
    DeltaTooLong { delta_len: usize, source_len: usize },

    /// A delta token began with something other than `=`, `-` or `+`.
    #[error("invalid diff operation in diff_fromDelta: {0}")]
    DeltaInvalidOperation(char),

    /// A patch header line did not match `^@@ -(\d+),?(\d*) \+(\d+),?(\d*) @@$`.
    #[error("invalid patch string: {0}")]
    PatchInvalidHeader(String),

    /// A patch body line began with something other than ` `, `-`, `+` or `@`.
    #[error("invalid patch mode '{0}' in: {1}")]
    PatchInvalidMode(char, String),
}

pub type Result<T> = std::result::Result<T, Error>;
