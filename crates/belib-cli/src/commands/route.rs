//! `route`: raw route request between two coordinates.

use anyhow::{Context, Result};
use clap::Args;

use belib_lib::{GeoPoint, Route, RouteProvider};

use crate::commands::CommandContext;
use crate::output::{emit, write_route, OutputFormat};

#[derive(Args, Debug, Clone)]
pub struct RouteArgs {
    /// Start as "latitude,longitude".
    #[arg(long = "from", allow_hyphen_values = true)]
    pub from: GeoPoint,
    /// Destination as "latitude,longitude".
    #[arg(long = "to", allow_hyphen_values = true)]
    pub to: GeoPoint,
}

pub fn handle_route(ctx: &CommandContext, args: &RouteArgs) -> Result<()> {
    let config = ctx.service_config()?;
    let router = ctx.router(&config)?;
    let route = match router.route(args.from, args.to) {
        Ok(route) => route,
        // JSON consumers still get a document: an empty path with zero length.
        Err(err) if err.is_recoverable() && ctx.format == OutputFormat::Json => {
            emit(ctx.format, &Route::empty(), write_route)?;
            return Err(err.into());
        }
        Err(err) => {
            return Err(err)
                .with_context(|| format!("no route from {} to {}", args.from, args.to))
        }
    };
    emit(ctx.format, &route, write_route)?;
    Ok(())
}
