//! `nearest`: address → nearest station → route.

use std::io::{self, BufRead, Write};

use anyhow::Result;
use clap::Args;
use tracing::debug;

use belib_lib::{plan_trip, PlugType, TripOptions};

use crate::commands::CommandContext;
use crate::output::{emit, write_trip};

#[derive(Args, Debug, Clone)]
pub struct NearestArgs {
    /// Free-text address in Paris, e.g. "10 rue de Rivoli".
    #[arg(long)]
    pub address: String,
    /// Accept a corrected address without asking.
    #[arg(long, short = 'y')]
    pub yes: bool,
    /// Only consider stations currently in service.
    #[arg(long)]
    pub in_service: bool,
    /// Skip the route request and report the straight-line distance only.
    #[arg(long)]
    pub no_route: bool,
    /// Only consider stations offering this plug (ef, type2, combo-ccs, chademo).
    #[arg(long)]
    pub plug: Option<PlugType>,
}

impl NearestArgs {
    pub fn options(&self) -> TripOptions {
        TripOptions {
            in_service_only: self.in_service,
            with_route: !self.no_route,
            required_plug: self.plug,
        }
    }
}

/// Handle the nearest subcommand.
pub fn handle_nearest(ctx: &CommandContext, args: &NearestArgs) -> Result<()> {
    let dataset = ctx.load_dataset()?;
    let config = ctx.service_config()?;
    let geocoder = ctx.geocoder(&config)?;
    let router = ctx.router(&config)?;

    let outcome = plan_trip(
        &dataset,
        &geocoder,
        &router,
        &args.address,
        &args.options(),
        |original, suggestion| {
            if args.yes {
                debug!(%suggestion, "correction accepted by --yes");
                return true;
            }
            let stdin = io::stdin();
            confirm_correction(&mut stdin.lock(), &mut io::stderr(), original, suggestion)
        },
    )?;

    emit(ctx.format, &outcome, write_trip)?;
    Ok(())
}

/// Ask on `prompt` whether `suggestion` should replace `original` and read
/// the answer from `input`. Anything but an explicit yes declines, including
/// end of input.
pub fn confirm_correction<R, W>(
    input: &mut R,
    prompt: &mut W,
    original: &str,
    suggestion: &str,
) -> bool
where
    R: BufRead + ?Sized,
    W: Write + ?Sized,
{
    let _ = write!(
        prompt,
        "Did you mean '{suggestion}' instead of '{original}'? [y/N] "
    );
    let _ = prompt.flush();

    let mut answer = String::new();
    if input.read_line(&mut answer).is_err() {
        return false;
    }
    matches!(
        answer.trim().to_lowercase().as_str(),
        "y" | "yes" | "o" | "oui"
    )
}
