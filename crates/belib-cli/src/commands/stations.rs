//! `stations`: list the dataset, optionally for one district.

use anyhow::Result;
use clap::Args;

use belib_lib::Station;

use crate::commands::CommandContext;
use crate::output::{emit, write_stations};

#[derive(Args, Debug, Clone)]
pub struct StationsArgs {
    /// District label, e.g. "15e Arrondissement" or "Paris centre".
    #[arg(long)]
    pub district: Option<String>,
    /// Only list stations currently in service.
    #[arg(long)]
    pub in_service: bool,
}

pub fn handle_stations(ctx: &CommandContext, args: &StationsArgs) -> Result<()> {
    let dataset = ctx.load_dataset()?;
    let mut stations: Vec<&Station> = match args.district.as_deref() {
        Some(label) => dataset.in_district(label)?,
        None => dataset.stations().iter().collect(),
    };
    if args.in_service {
        stations.retain(|station| station.is_in_service());
    }
    emit(ctx.format, stations.as_slice(), write_stations)?;
    Ok(())
}
