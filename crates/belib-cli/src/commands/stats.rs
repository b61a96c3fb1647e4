//! `stats`: dataset statistics.

use anyhow::Result;

use belib_lib::DatasetStats;

use crate::commands::CommandContext;
use crate::output::{emit, write_stats};

pub fn handle_stats(ctx: &CommandContext) -> Result<()> {
    let dataset = ctx.load_dataset()?;
    let stats = DatasetStats::compute(dataset.stations());
    emit(ctx.format, &stats, write_stats)?;
    Ok(())
}
