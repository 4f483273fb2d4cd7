//! Help text printed on usage errors.

use std::fmt::Write as _;

use crate::io::config::DEFAULT_CONFIG_FILES;
use crate::io::settings::env_help;
use crate::task::Task;

/// Render the usage text. Task and package sections are left out when they
/// would be empty.
pub fn render_usage(tasks: &[Task], packages: &[String]) -> String {
    let mut out = String::new();
    out.push_str("runner: miscellaneous automation tool\n");
    out.push_str("run task:      ./run <task> <args...>\n");
    out.push_str("task help:     ./run <task> -h\n");
    out.push_str("version:       ./run -v\n");
    out.push_str("custom config: ./run -config <file>\n");

    let (package_tasks, repo_tasks): (Vec<&Task>, Vec<&Task>) =
        tasks.iter().partition(|task| task.package_scoped);
    push_task_section(&mut out, "package tasks:", &package_tasks);
    push_task_section(&mut out, "repository tasks:", &repo_tasks);

    if !packages.is_empty() {
        out.push_str("\npackages:\n");
        for package in packages {
            let _ = writeln!(out, "- {package}");
        }
    }

    let _ = writeln!(out, "\n{}", env_help());
    out.push_str("\n.env file is checked for environment variables.\n");
    out.push_str("see docs for config documentation.\n");
    let _ = writeln!(out, "default config files: {}", DEFAULT_CONFIG_FILES.join(", "));
    out
}

fn push_task_section(out: &mut String, title: &str, tasks: &[&Task]) {
    if tasks.is_empty() {
        return;
    }
    let _ = writeln!(out, "\n{title}");
    for task in tasks {
        let _ = writeln!(out, "./run {}", task.name);
    }
}
