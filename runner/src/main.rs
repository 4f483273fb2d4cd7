//! `run`: execute a task declared in `.t0runnerrc.yml`.
//!
//! ```text
//! run [-v|-version] [-config <path>] <task> [<package>] [<args>...]
//! ```

use std::io;

use t0_runner::dispatch::Runner;
use t0_runner::exit_codes;
use t0_runner::io::checks::HostChecks;
use t0_runner::io::discover::WorkspacePackages;
use t0_runner::io::process::ProcessLauncher;
use t0_runner::io::settings::{Settings, load_dotenv};
use t0_runner::logging;
use tracing::{debug, warn};

fn main() {
    let root = match std::env::current_dir() {
        Ok(root) => root,
        Err(err) => {
            eprintln!("fatal: read working directory: {err}");
            std::process::exit(exit_codes::FAILURE);
        }
    };

    let dotenv = load_dotenv(&root);
    let settings = Settings::from_env();
    logging::init(&settings.as_ref().copied().unwrap_or_default());
    logging::install_panic_hook();

    match dotenv {
        Ok(Some(path)) => debug!(path = %path.display(), "loaded .env"),
        Ok(None) => {}
        Err(err) => warn!("ignoring .env: {err:#}"),
    }
    if let Err(err) = &settings {
        warn!("using default log settings: {err:#}");
    }

    let runner = Runner::new(
        &root,
        WorkspacePackages::new(&root),
        HostChecks::new(&root),
        ProcessLauncher,
    );
    let code = runner.run(
        std::env::args().skip(1),
        &mut io::stdout().lock(),
        &mut io::stderr(),
    );
    std::process::exit(code);
}
