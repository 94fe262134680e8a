use crate::cli::RunArgs;
use crate::config::PartialDriverConfig;
use crate::error::Result;
use crate::utils::progress::CliProgressHandler;
use ipidriver::engine::progress::ProgressReporter;
use ipidriver::workflows::drive;
use tracing::{debug, info};

pub fn run(args: RunArgs) -> Result<()> {
    info!("Starting driver session with config {:?}", args.config);
    let config = PartialDriverConfig::from_file(&args.config)?.merge_with_cli(&args)?;
    debug!("Resolved driver configuration: {:?}", config);

    let handler = CliProgressHandler::new();
    let reporter = ProgressReporter::with_callback(handler.get_callback());

    let result = drive::run_lennard_jones(&config, &reporter);
    match &result {
        Ok(summary) => {
            handler.finish(format!(
                "Session closed after {} frame(s)",
                summary.frames_computed
            ));
        }
        Err(_) => handler.finish("Session aborted"),
    }
    let summary = result?;

    info!(
        "Session ended: {} frame(s) computed, {} force set(s) sent",
        summary.frames_computed, summary.forces_sent
    );
    println!("Frames computed: {}", summary.frames_computed);
    println!("Forces sent:     {}", summary.forces_sent);
    if let Some(atoms) = summary.atom_count {
        println!("Atoms per frame: {}", atoms);
    }
    Ok(())
}
