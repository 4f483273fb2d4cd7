//! Pre-execution checks for a selected task.

use anyhow::Result;
use tracing::{debug, instrument};

use crate::core::needs::{Need, split_needs};
use crate::core::suggest::suggest;
use crate::error::{RunnerError, with_suggestion};
use crate::io::checks::NeedChecker;
use crate::io::discover::PackageSource;
use crate::task::Task;

/// True for the flags a task is expected to answer itself.
pub fn is_help_flag(input: &str) -> bool {
    matches!(input, "-h" | "--help")
}

impl Task {
    /// Check inputs and preconditions before running.
    ///
    /// A help flag anywhere in `inputs` skips every check. Package-scoped
    /// tasks need a known package as input 0. Needs are checked in declared
    /// order and the first failure is returned.
    #[instrument(skip_all, fields(task = %self.name))]
    pub fn validate<P: PackageSource, N: NeedChecker>(
        &self,
        inputs: &[String],
        packages: &P,
        checks: &N,
    ) -> Result<()> {
        if inputs.iter().any(|input| is_help_flag(input)) {
            debug!("help flag present, skipping validation");
            return Ok(());
        }

        if self.package_scoped {
            let package = inputs.first().ok_or_else(|| {
                RunnerError::usage(format!("task '{}' requires a package", self.name))
            })?;
            let known = packages.packages()?;
            ensure_known_package(package, &known)?;
        }

        for token in split_needs(&self.needs) {
            let need: Need = token.parse()?;
            checks.check(need)?;
        }
        Ok(())
    }
}

/// Fail with a usage error when `package` is not in `known`.
pub fn ensure_known_package(package: &str, known: &[String]) -> Result<(), RunnerError> {
    if known.iter().any(|candidate| candidate == package) {
        return Ok(());
    }
    let message = format!("unknown package '{package}'");
    Err(RunnerError::usage(with_suggestion(
        message,
        suggest(package, known),
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::classify;
    use crate::test_support::{RecordingChecks, StaticPackages, task};

    fn args(values: &[&str]) -> Vec<String> {
        values.iter().map(|value| value.to_string()).collect()
    }

    fn package_task(name: &str) -> Task {
        let mut task = task(name, &["go build ./<package>/..."]);
        task.package_scoped = true;
        task
    }

    #[test]
    fn help_flag_short_circuits_everything() {
        let mut build = package_task("build");
        build.needs = "<git-clean>, <bogus>".to_string();
        let checks = RecordingChecks::passing();

        build
            .validate(&args(&["-h"]), &StaticPackages::failing(), &checks)
            .expect("help skips validation");
        build
            .validate(&args(&["pkg", "--help"]), &StaticPackages::failing(), &checks)
            .expect("help skips validation");
        assert!(checks.calls().is_empty());
    }

    #[test]
    fn package_scoped_requires_input() {
        let err = package_task("vet")
            .validate(&[], &StaticPackages::new(&["a"]), &RecordingChecks::passing())
            .unwrap_err();
        assert!(classify(&err).is_some_and(RunnerError::is_usage));
        assert_eq!(err.to_string(), "task 'vet' requires a package");
    }

    #[test]
    fn known_package_passes() {
        package_task("vet")
            .validate(
                &args(&["b", "-race"]),
                &StaticPackages::new(&["a", "b"]),
                &RecordingChecks::passing(),
            )
            .expect("known package");
    }

    #[test]
    fn unknown_package_suggests_close_names() {
        let err = package_task("vet")
            .validate(
                &args(&["pkg/lg"]),
                &StaticPackages::new(&["pkg/log", "pkg/http"]),
                &RecordingChecks::passing(),
            )
            .unwrap_err();
        assert!(classify(&err).is_some_and(RunnerError::is_usage));
        assert_eq!(
            err.to_string(),
            "unknown package 'pkg/lg', did you mean: 'pkg/log'?"
        );
    }

    #[test]
    fn unknown_package_sharing_two_characters_always_suggests() {
        let cases: &[(&str, &[&str])] = &[
            ("zzlo", &["log"]),
            ("xxhtyy", &["pkg/http", "ids"]),
            ("idqqqqqqqqqq", &["cmd/ids"]),
            ("qqqqqqqqqqid", &["cmd/ids"]),
        ];
        for (query, known) in cases {
            let known: Vec<String> = known.iter().map(|k| k.to_string()).collect();
            let err = ensure_known_package(query, &known).unwrap_err();
            let message = err.to_string();
            assert!(err.is_usage());
            assert!(message.contains("did you mean: "), "{query}: {message}");
            assert!(message.ends_with('?'), "{query}: {message}");
        }
    }

    #[test]
    fn unknown_package_without_overlap_has_no_suggestion() {
        let err = ensure_known_package("zzz", &args(&["log"])).unwrap_err();
        assert_eq!(err.to_string(), "unknown package 'zzz'");
    }

    #[test]
    fn discovery_failure_propagates() {
        let err = package_task("vet")
            .validate(&args(&["a"]), &StaticPackages::failing(), &RecordingChecks::passing())
            .unwrap_err();
        assert!(err.to_string().contains("discovery failed"));
    }

    #[test]
    fn needs_run_in_declared_order() {
        let mut release = task("release", &["goreleaser"]);
        release.needs = " <git-clean> ,<online>,".to_string();
        let checks = RecordingChecks::passing();

        release
            .validate(&[], &StaticPackages::new(&[]), &checks)
            .expect("needs met");
        assert_eq!(checks.calls(), vec![Need::GitClean, Need::Online]);
    }

    #[test]
    fn first_failed_need_stops_the_rest() {
        let mut release = task("release", &["goreleaser"]);
        release.needs = "<git-clean>, <online>".to_string();
        let checks = RecordingChecks::failing_on(Need::GitClean);

        let err = release
            .validate(&[], &StaticPackages::new(&[]), &checks)
            .unwrap_err();
        assert!(matches!(classify(&err), Some(RunnerError::Validation(_))));
        assert_eq!(checks.calls(), vec![Need::GitClean]);
    }

    #[test]
    fn unknown_need_is_config_error_after_earlier_needs() {
        let mut release = task("release", &["goreleaser"]);
        release.needs = "<online>, <vpn>".to_string();
        let checks = RecordingChecks::passing();

        let err = release
            .validate(&[], &StaticPackages::new(&[]), &checks)
            .unwrap_err();
        assert!(matches!(classify(&err), Some(RunnerError::Config(_))));
        assert_eq!(checks.calls(), vec![Need::Online]);
    }
}
