use crate::cli::RunArgs;
use crate::config::PartialDriverConfig;
use crate::error::Result;
use ipidriver::core::potential::lennard_jones::LennardJonesOracle;
use ipidriver::engine::error::EngineError;
use ipidriver::workflows::drive;
use std::collections::BTreeMap;
use tracing::info;

/// Resolves the configuration and loads every input the driver needs, without connecting.
pub fn run(args: RunArgs) -> Result<()> {
    let config = PartialDriverConfig::from_file(&args.config)?.merge_with_cli(&args)?;
    let mapper = drive::prepare_mapper(&config)?;
    let oracle = LennardJonesOracle::load(&config.potential_file).map_err(EngineError::from)?;
    info!("Configuration for {} is valid", config.endpoint);

    let mut counts: BTreeMap<usize, usize> = BTreeMap::new();
    for &t in mapper.get_types() {
        *counts.entry(t).or_default() += 1;
    }

    println!("Endpoint:  {}", config.endpoint);
    println!("Atoms:     {}", mapper.num_atoms());
    for (name, id) in config.type_map.iter() {
        println!(
            "  {:<6} type {:>3}: {} atom(s)",
            name,
            id,
            counts.get(&id).copied().unwrap_or(0)
        );
    }
    println!("LJ cutoff: {} Å", oracle.cutoff());
    Ok(())
}
