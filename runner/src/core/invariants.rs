//! Semantic config invariants not expressible via serde.

use std::collections::HashSet;

use crate::task::{Config, Task};

/// Check semantic invariants of a parsed config:
/// - Task names are non-empty, contain no whitespace and are unique
/// - `exec` is non-empty and has no blank lines
/// - Every `env` entry is `KEY=VALUE` with a non-empty key
pub fn validate_invariants(config: &Config) -> Vec<String> {
    let mut errors = Vec::new();
    let mut seen = HashSet::new();
    for (index, task) in config.tasks.iter().enumerate() {
        let label = task_label(task, index);
        if task.name.trim().is_empty() {
            errors.push(format!("{label}: name must not be empty"));
        } else if task.name.chars().any(char::is_whitespace) {
            errors.push(format!("{label}: name must not contain whitespace"));
        }
        if !task.name.is_empty() && !seen.insert(task.name.as_str()) {
            errors.push(format!("duplicate task name '{}'", task.name));
        }
        validate_task(task, &label, &mut errors);
    }
    errors
}

fn validate_task(task: &Task, label: &str, errors: &mut Vec<String>) {
    if task.exec.is_empty() {
        errors.push(format!("{label}: exec must not be empty"));
    }
    for (line_no, line) in task.exec.iter().enumerate() {
        if line.trim().is_empty() {
            errors.push(format!("{label}: exec[{line_no}] is blank"));
        }
    }
    for entry in &task.env {
        match entry.split_once('=') {
            Some((key, _)) if !key.trim().is_empty() => {}
            _ => errors.push(format!("{label}: env entry '{entry}' must be KEY=VALUE")),
        }
    }
}

fn task_label(task: &Task, index: usize) -> String {
    if task.name.is_empty() {
        format!("tasks[{index}]")
    } else {
        format!("task '{}'", task.name)
    }
}
