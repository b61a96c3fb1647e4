//! `districts`: district labels with station counts and centres.

use anyhow::Result;

use belib_lib::district;
use belib_lib::stats::DatasetStats;

use crate::commands::CommandContext;
use crate::output::{emit, write_districts, DistrictRow};

pub fn handle_districts(ctx: &CommandContext) -> Result<()> {
    let dataset = ctx.load_dataset()?;
    let rows = district_rows(&DatasetStats::compute(dataset.stations()));
    emit(ctx.format, rows.as_slice(), write_districts)?;
    Ok(())
}

/// Rows sorted by label, each with its centre when known.
fn district_rows(stats: &DatasetStats) -> Vec<DistrictRow> {
    let mut rows: Vec<DistrictRow> = stats
        .by_district
        .iter()
        .map(|count| DistrictRow {
            district: count.district.clone(),
            stations: count.stations,
            center: district::center(&count.district),
        })
        .collect();
    rows.sort_by(|a, b| a.district.cmp(&b.district));
    rows
}
