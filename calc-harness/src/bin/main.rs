// SPDX-License-Identifier: GPL-3.0-or-later

use calc_harness::{args, config, runner};
use log::LevelFilter;
use std::process::ExitCode;

/// Driver function of the application.
fn main() -> anyhow::Result<ExitCode> {
    // Parse the command line arguments.
    let matches = args::cli().get_matches();
    let arguments = args::Arguments::try_from(matches)?;
    // Initialize the logging system. The environment overrides the flags.
    env_logger::Builder::new()
        .filter_level(verbosity(arguments.verbose))
        .parse_default_env()
        .init();
    // Get the package name and version from Cargo
    let pkg_name = env!("CARGO_PKG_NAME");
    let pkg_version = env!("CARGO_PKG_VERSION");
    log::info!("{pkg_name} v{pkg_version}");
    log::info!("{arguments}");

    // Load the scenarios.
    let suite = config::Loader::load(&arguments.scenarios)?;
    log::info!("{suite}");

    // Run the scenarios.
    let application = runner::Runner::configure(arguments, suite);
    log::debug!("Configuration complete, running the scenarios now...");
    let result = application.run();
    log::debug!("Exit code: {result:?}");

    Ok(result)
}

fn verbosity(count: u8) -> LevelFilter {
    match count {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}
