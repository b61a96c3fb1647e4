//! Output formatting for command results.
//!
//! Every command result is a serde-serializable library value. In JSON mode
//! it is written as-is; in text mode one of the `write_*` renderers below
//! formats it for humans.

use std::io::{self, Write};

use clap::ValueEnum;
use serde::Serialize;

use belib_lib::stats::DatasetStats;
use belib_lib::{GeoPoint, Route, RouteOutcome, Station, TripOutcome};

use crate::terminal::{format_distance, format_duration, ColorPalette};

/// Output format selected with `--format`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text.
    #[default]
    Text,
    /// Pretty-printed JSON on stdout.
    Json,
}

/// One row of the `districts` listing.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DistrictRow {
    pub district: String,
    pub stations: usize,
    /// Approximate district centre, when the label is a known Paris district.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub center: Option<GeoPoint>,
}

/// Write `value` to stdout in the selected format.
pub fn emit<T, F>(format: OutputFormat, value: &T, text: F) -> io::Result<()>
where
    T: Serialize + ?Sized,
    F: FnOnce(&mut dyn Write, &T, &ColorPalette) -> io::Result<()>,
{
    let stdout = io::stdout();
    let mut lock = stdout.lock();
    let out: &mut dyn Write = &mut lock;
    match format {
        OutputFormat::Text => text(out, value, &ColorPalette::detect()),
        OutputFormat::Json => render_json(out, value),
    }
}

/// Render any serializable value as pretty JSON followed by a newline.
pub fn render_json<T: Serialize + ?Sized>(out: &mut dyn Write, value: &T) -> io::Result<()> {
    serde_json::to_writer_pretty(&mut *out, value).map_err(io::Error::other)?;
    out.write_all(b"\n")
}

pub fn write_trip(out: &mut dyn Write, outcome: &TripOutcome, p: &ColorPalette) -> io::Result<()> {
    match outcome {
        TripOutcome::Found(trip) => {
            if let Some(address) = &trip.address {
                if address.corrected {
                    writeln!(
                        out,
                        "Address: {} {}(corrected from '{}'){}",
                        address.label, p.gray, address.query, p.reset
                    )?;
                } else {
                    writeln!(out, "Address: {}", address.label)?;
                }
            }
            writeln!(out, "Origin: {}{}{}", p.gray, trip.origin, p.reset)?;
            writeln!(out)?;
            writeln!(
                out,
                "Nearest station: {}{}{}",
                p.white_bold, trip.station.name, p.reset
            )?;
            write_station_details(out, &trip.station, p)?;
            writeln!(
                out,
                "  Distance: {}{}{} (straight line)",
                p.cyan,
                format_distance(trip.distance_m),
                p.reset
            )?;

            match &trip.route {
                RouteOutcome::Found(route) => {
                    writeln!(out)?;
                    write_route_summary(out, route, p)?;
                }
                RouteOutcome::Unavailable { reason } => {
                    writeln!(out)?;
                    writeln!(out, "Route unavailable: {reason}")?;
                }
                RouteOutcome::Skipped => {}
            }
            Ok(())
        }
        TripOutcome::AddressNotFound { query } => {
            writeln!(out, "No address found for '{query}'.")
        }
        TripOutcome::CorrectionRejected { query, suggestion } => writeln!(
            out,
            "Correction to '{suggestion}' declined; no search performed for '{query}'."
        ),
        TripOutcome::NoStation { origin } => {
            writeln!(out, "No station found near {origin}.")
        }
    }
}

fn write_station_details(out: &mut dyn Write, station: &Station, p: &ColorPalette) -> io::Result<()> {
    let status_color = if station.is_in_service() {
        p.green
    } else {
        p.yellow
    };
    writeln!(out, "  Address:  {}", station.address)?;
    writeln!(out, "  District: {}", station.district)?;
    writeln!(
        out,
        "  Status:   {}{}{}",
        status_color,
        station.status.label(),
        p.reset
    )?;
    writeln!(out, "  Power:    {} kW", station.nominal_power_kw)?;
    writeln!(out, "  Plugs:    {}", plug_list(station))?;
    writeln!(out, "  Position: {}", station.position)
}

fn plug_list(station: &Station) -> String {
    let plugs: Vec<&str> = station
        .plugs
        .available()
        .into_iter()
        .map(|plug| plug.label())
        .collect();
    if plugs.is_empty() {
        "none listed".to_string()
    } else {
        plugs.join(", ")
    }
}

fn write_route_summary(out: &mut dyn Write, route: &Route, p: &ColorPalette) -> io::Result<()> {
    writeln!(
        out,
        "Route: {}{}{}, {}{}{} ({} points)",
        p.cyan,
        format_distance(route.distance_m),
        p.reset,
        p.cyan,
        format_duration(route.duration_s),
        p.reset,
        route.path.len()
    )
}

pub fn write_route(out: &mut dyn Write, route: &Route, p: &ColorPalette) -> io::Result<()> {
    write_route_summary(out, route, p)?;
    write_points(out, &route.path, p)
}

pub fn write_points(out: &mut dyn Write, points: &[GeoPoint], _p: &ColorPalette) -> io::Result<()> {
    for point in points {
        writeln!(out, "  {point}")?;
    }
    Ok(())
}

pub fn write_stations(out: &mut dyn Write, stations: &[&Station], p: &ColorPalette) -> io::Result<()> {
    if stations.is_empty() {
        return writeln!(out, "No stations in dataset.");
    }
    writeln!(out, "Stations ({}):", stations.len())?;
    for station in stations {
        let status_color = if station.is_in_service() {
            p.green
        } else {
            p.yellow
        };
        writeln!(
            out,
            "- {}{}{} [{}{}{}] {} kW, {} {}({}){}",
            p.white_bold,
            station.name,
            p.reset,
            status_color,
            station.status.label(),
            p.reset,
            station.nominal_power_kw,
            plug_list(station),
            p.gray,
            station.district,
            p.reset
        )?;
    }
    Ok(())
}

pub fn write_districts(out: &mut dyn Write, rows: &[DistrictRow], p: &ColorPalette) -> io::Result<()> {
    writeln!(out, "{:<22} {:>8}  Centre", "District", "Stations")?;
    for row in rows {
        let center = row
            .center
            .map(|point| point.to_string())
            .unwrap_or_else(|| "-".to_string());
        writeln!(
            out,
            "{:<22} {:>8}  {}{}{}",
            row.district, row.stations, p.gray, center, p.reset
        )?;
    }
    Ok(())
}

pub fn write_stats(out: &mut dyn Write, stats: &DatasetStats, _p: &ColorPalette) -> io::Result<()> {
    writeln!(
        out,
        "Stations: {} ({} in service)",
        stats.total, stats.in_service
    )?;
    writeln!(out)?;
    writeln!(out, "By district:")?;
    for row in &stats.by_district {
        writeln!(out, "  {:<22} {:>6}", row.district, row.stations)?;
    }
    writeln!(out)?;
    writeln!(out, "By plug type:")?;
    for row in &stats.by_plug {
        writeln!(out, "  {:<22} {:>6}", row.plug.label(), row.stations)?;
    }
    Ok(())
}
