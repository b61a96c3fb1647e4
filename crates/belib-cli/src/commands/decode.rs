//! `decode`: decode an encoded polyline into coordinates.

use anyhow::{Context, Result};
use clap::Args;

use belib_lib::polyline;

use crate::commands::CommandContext;
use crate::output::{emit, write_points};

#[derive(Args, Debug, Clone)]
pub struct DecodeArgs {
    /// Encoded polyline, e.g. "_p~iF~ps|U_ulLnnqC_mqNvxq`@".
    #[arg(allow_hyphen_values = true)]
    pub polyline: String,
    /// Decimal digits of precision (OSRM uses 5, some services 6).
    #[arg(
        long,
        default_value_t = polyline::DEFAULT_PRECISION,
        value_parser = clap::value_parser!(u32).range(1..=i64::from(polyline::MAX_PRECISION))
    )]
    pub precision: u32,
}

pub fn handle_decode(ctx: &CommandContext, args: &DecodeArgs) -> Result<()> {
    let points = polyline::decode_with_precision(&args.polyline, args.precision)
        .context("failed to decode polyline")?;
    emit(ctx.format, points.as_slice(), write_points)?;
    Ok(())
}
