//! Precondition tokens a task can declare in `needs`.

use std::fmt;
use std::str::FromStr;

use crate::error::RunnerError;

/// A named precondition checked before a task runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Need {
    /// Working tree has no uncommitted changes to tracked files.
    GitClean,
    /// The reachability endpoint answers.
    Online,
}

impl Need {
    pub const ALL: [Need; 2] = [Need::GitClean, Need::Online];

    pub const fn token(self) -> &'static str {
        match self {
            Need::GitClean => "<git-clean>",
            Need::Online => "<online>",
        }
    }
}

impl fmt::Display for Need {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

impl FromStr for Need {
    type Err = RunnerError;

    fn from_str(token: &str) -> Result<Self, Self::Err> {
        Need::ALL
            .into_iter()
            .find(|need| need.token() == token)
            .ok_or_else(|| RunnerError::config(format!("unknown need '{token}'")))
    }
}

/// Split a `needs` string into trimmed, non-empty tokens in declared order.
pub fn split_needs(needs: &str) -> impl Iterator<Item = &str> {
    needs
        .split(',')
        .map(str::trim)
        .filter(|token| !token.is_empty())
}
