//! `mlaunch`: start a local MongoDB single node, replica set, or sharded
//! cluster and wait until it is ready.
//!
//! Exits 0 once every process accepts connections (and every replica set is
//! configured), 1 if any group failed, 2 for invalid options.

use clap::Parser;
use mlaunch::admin::ShellAdmin;
use mlaunch::cli::Cli;
use mlaunch::launcher::{spawn_client_shell, CommandSpawner};
use mlaunch::lifecycle::tracing::setup_tracing;
use mlaunch::lifecycle::Deployment;
use std::process::ExitCode;
use tracing::{error, info, warn};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    setup_tracing(cli.verbose);

    let (request, settings) = match cli.topology_request().and_then(|r| Ok((r, cli.settings()?))) {
        Ok(parsed) => parsed,
        Err(e) => {
            error!(error = %e, "invalid options");
            return ExitCode::from(2);
        }
    };

    let deployment = Deployment::new(
        CommandSpawner::new(settings.binaries.clone(), settings.verbose),
        ShellAdmin::new(settings.binaries.shell.clone()),
        settings.poll,
    );

    let report = match deployment.launch(&request).await {
        Ok(report) => report,
        Err(e) => {
            error!(error = %e, "cannot launch topology");
            return ExitCode::from(2);
        }
    };

    print!("{report}");
    if let Ok(processes) = deployment.processes().await {
        for process in processes {
            info!(process = %process.id, endpoint = %process.endpoint, state = %process.liveness, "final state");
        }
    }

    let ready = report.is_ready();
    if !ready {
        for group in report.failures() {
            error!(group = %group.name, outcome = %group.outcome, "not ready");
        }
    }

    if let Err(e) = deployment.shutdown().await {
        warn!(error = %e, "registry did not shut down cleanly");
    }

    if !ready {
        return ExitCode::FAILURE;
    }

    if cli.mongo {
        match spawn_client_shell(&settings.binaries, &report.entry_point) {
            Ok(mut shell) => {
                if let Err(e) = shell.wait().await {
                    warn!(error = %e, "client shell ended abnormally");
                }
            }
            Err(e) => {
                error!(error = %e, "cannot start client shell");
                return ExitCode::FAILURE;
            }
        }
    }

    ExitCode::SUCCESS
}
