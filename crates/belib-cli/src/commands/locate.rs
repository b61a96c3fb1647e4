//! `locate`: nearest station from known coordinates.

use anyhow::Result;
use clap::Args;

use belib_lib::{plan_trip_from_point, GeoPoint, PlugType, TripOptions, PARIS_CENTER};

use crate::commands::CommandContext;
use crate::output::{emit, write_trip};

#[derive(Args, Debug, Clone)]
pub struct LocateArgs {
    /// Origin as "latitude,longitude", e.g. "48.8556,2.3594". Defaults to
    /// the centre of Paris.
    #[arg(long, allow_hyphen_values = true, default_value_t = PARIS_CENTER)]
    pub at: GeoPoint,
    /// Only consider stations currently in service.
    #[arg(long)]
    pub in_service: bool,
    /// Skip the route request.
    #[arg(long)]
    pub no_route: bool,
    /// Only consider stations offering this plug (ef, type2, combo-ccs, chademo).
    #[arg(long)]
    pub plug: Option<PlugType>,
}

pub fn handle_locate(ctx: &CommandContext, args: &LocateArgs) -> Result<()> {
    let dataset = ctx.load_dataset()?;
    let options = TripOptions {
        in_service_only: args.in_service,
        with_route: !args.no_route,
        required_plug: args.plug,
    };
    let config = ctx.service_config()?;
    let router = ctx.router(&config)?;

    let outcome = plan_trip_from_point(&dataset, &router, args.at, &options)?;
    emit(ctx.format, &outcome, write_trip)?;
    Ok(())
}
