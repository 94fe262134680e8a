use crate::core::io::traits::CoordinateFile;
use crate::core::io::xyz::XyzFile;
use crate::core::ordering::AtomOrderMapper;
use crate::core::potential::ComputeOracle;
use crate::core::potential::lennard_jones::LennardJonesOracle;
use crate::engine::config::DriverConfig;
use crate::engine::error::EngineError;
use crate::engine::progress::{Progress, ProgressReporter};
use crate::engine::session::ProtocolEngine;
use crate::engine::state::SessionSummary;
use crate::engine::transport;
use tracing::{info, instrument};

/// Loads the coordinate file and builds the wire-to-backend atom mapping.
///
/// Runs before any connection is opened, so an unknown atom name fails the
/// run without touching the network.
pub fn prepare_mapper(config: &DriverConfig) -> Result<AtomOrderMapper, EngineError> {
    let (atoms, metadata) = XyzFile::read_from_path(&config.coord_file)?;
    info!(
        "Loaded {} atom(s) from {:?} ({})",
        atoms.len(),
        config.coord_file,
        metadata.comment
    );
    let mapper = AtomOrderMapper::new(atoms.names(), &config.type_map)?;
    Ok(mapper)
}

/// Serves one full session with the given evaluator.
#[instrument(skip_all, name = "drive_workflow", fields(endpoint = %config.endpoint))]
pub fn run<O: ComputeOracle>(
    config: &DriverConfig,
    oracle: O,
    reporter: &ProgressReporter,
) -> Result<SessionSummary, EngineError> {
    let mapper = prepare_mapper(config)?;

    let channel = transport::connect(&config.endpoint)?;
    reporter.report(Progress::Connected {
        endpoint: config.endpoint.to_string(),
    });

    let mut engine = ProtocolEngine::new(channel, oracle, mapper, config.options).with_reporter(reporter);
    engine.run()
}

/// Serves one full session with the Lennard-Jones evaluator configured in `config`.
pub fn run_lennard_jones(
    config: &DriverConfig,
    reporter: &ProgressReporter,
) -> Result<SessionSummary, EngineError> {
    let oracle = LennardJonesOracle::load(&config.potential_file)?;
    info!(
        "Loaded Lennard-Jones parameters from {:?} (cutoff {} Å)",
        config.potential_file,
        oracle.cutoff()
    );
    run(config, oracle, reporter)
}
