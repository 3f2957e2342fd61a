//! Commit identifiers and `git submodule status` parsing.
//!
//! A status line looks like
//!
//! ```text
//!  c47e41da05b1e9f0a4a1d6a4f3e43c8f0d6c2b71 flip (heads/master)
//! -c47e41da05b1e9f0a4a1d6a4f3e43c8f0d6c2b71 flip
//! ```
//!
//! where the first character is a state flag and characters 1..=10 are the
//! short hash the rest of tpsetup works with.

use serde::Serialize;
use thiserror::Error;

/// Number of hash characters used to identify a sync library version.
pub const COMMIT_ID_LEN: usize = 10;

/// Checkout state reported by the leading flag of a status line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SubmoduleState {
    /// `' '`: checked out at the recorded commit.
    InSync,
    /// `'-'`: not initialized; the recorded commit is still reported.
    Uninitialized,
    /// `'+'`: checked out at a commit other than the recorded one.
    Modified,
}

/// A validated commit reference taken from a status line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PinnedCommit {
    pub state: SubmoduleState,
    /// Exactly [`COMMIT_ID_LEN`] hex characters.
    pub commit: String,
}

/// Why a status line was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubmoduleStatusError {
    #[error("git submodule status produced no output (is the path a registered submodule?)")]
    Empty,

    #[error("status line is {len} characters, expected at least {min}: {line:?}")]
    TooShort { line: String, len: usize, min: usize },

    #[error("unrecognised submodule state flag {flag:?} in {line:?}")]
    UnknownState { flag: char, line: String },

    #[error("submodule has merge conflicts, no commit is pinned: {line:?}")]
    MergeConflict { line: String },

    #[error("characters 1..={len} are not a hex commit hash in {line:?}")]
    NotHex { line: String, len: usize },
}

/// Extract the pinned commit from `git submodule status` output.
///
/// Only the first non-blank line is considered; anything after the hash
/// (path, describe output) is ignored.
pub fn parse_submodule_status(output: &str) -> Result<PinnedCommit, SubmoduleStatusError> {
    let line = output
        .lines()
        .find(|l| !l.trim().is_empty())
        .ok_or(SubmoduleStatusError::Empty)?;

    let min = COMMIT_ID_LEN + 1;
    let len = line.chars().count();
    if len < min {
        return Err(SubmoduleStatusError::TooShort {
            line: line.to_string(),
            len,
            min,
        });
    }

    let mut chars = line.chars();
    let state = match chars.next() {
        Some(' ') => SubmoduleState::InSync,
        Some('-') => SubmoduleState::Uninitialized,
        Some('+') => SubmoduleState::Modified,
        Some('U') => {
            return Err(SubmoduleStatusError::MergeConflict {
                line: line.to_string(),
            });
        }
        Some(flag) => {
            return Err(SubmoduleStatusError::UnknownState {
                flag,
                line: line.to_string(),
            });
        }
        None => return Err(SubmoduleStatusError::Empty),
    };

    let commit: String = chars.take(COMMIT_ID_LEN).collect();
    if !commit.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(SubmoduleStatusError::NotHex {
            line: line.to_string(),
            len: COMMIT_ID_LEN,
        });
    }

    Ok(PinnedCommit { state, commit })
}

/// First [`COMMIT_ID_LEN`] characters of `value` (fewer if it is shorter).
pub fn truncate_commit(value: &str) -> String {
    value.chars().take(COMMIT_ID_LEN).collect()
}

/// Whether `value` is exactly [`COMMIT_ID_LEN`] hex characters.
pub fn is_commit_id(value: &str) -> bool {
    value.len() == COMMIT_ID_LEN && value.chars().all(|c| c.is_ascii_hexdigit())
}
