//! Declarative task records loaded from the runner config.

use serde::{Deserialize, Serialize};

/// Parsed runner config: an advisory version plus the task list.
///
/// Task order only affects how tasks are grouped in the usage text; lookup is
/// always by name.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Config {
    #[serde(default)]
    pub version: String,
    #[serde(default)]
    pub tasks: Vec<Task>,
}

impl Config {
    pub fn find(&self, name: &str) -> Option<&Task> {
        self.tasks.iter().find(|task| task.name == name)
    }

    pub fn task_names(&self) -> Vec<&str> {
        self.tasks.iter().map(|task| task.name.as_str()).collect()
    }
}

/// One named unit of work.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct Task {
    pub name: String,

    /// Input 0 names a workspace package when set.
    #[serde(default, rename = "package")]
    pub package_scoped: bool,

    /// Comma-separated precondition tokens, e.g. `<git-clean>, <online>`.
    #[serde(default)]
    pub needs: String,

    /// `KEY=VALUE` templates. When non-empty they are the child's whole
    /// environment.
    #[serde(default)]
    pub env: Vec<String>,

    /// Command-line templates, run in order.
    pub exec: Vec<String>,
}

impl Task {
    /// Inputs forwarded to every exec line.
    pub fn pass_through<'a>(&self, inputs: &'a [String]) -> &'a [String] {
        if self.package_scoped {
            inputs.get(1..).unwrap_or_default()
        } else {
            inputs
        }
    }

    /// Value substituted for `<package>`: the first user input, if any.
    pub fn package<'a>(&self, inputs: &'a [String]) -> &'a str {
        inputs.first().map(String::as_str).unwrap_or_default()
    }
}
