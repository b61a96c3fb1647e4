//! Station dataset loading.
//!
//! The Paris open-data export of the Belib' network is a `;`-delimited CSV
//! with one row per charge point. Rows are parsed once into typed
//! [`Station`] records; the resulting [`StationDataset`] is immutable and is
//! passed by reference into the search and trip functions.

use std::collections::BTreeMap;
use std::env;
use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use csv::{ReaderBuilder, StringRecord, Trim};
use directories::ProjectDirs;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::district;
use crate::error::{Error, Result};
use crate::geo::GeoPoint;

/// Default filename for the station dataset.
pub const DATASET_FILENAME: &str = "belib_stations.csv";

/// Environment variable overriding the dataset location.
pub const DATASET_PATH_ENV: &str = "BELIB_DATASET_PATH";

/// Status label the dataset uses for working charge points.
const IN_SERVICE_LABEL: &str = "En service";

/// Operational status of a charge point.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StationStatus {
    InService,
    /// Any other status label, kept verbatim (e.g. `En maintenance`).
    Other(String),
}

impl StationStatus {
    fn parse(label: &str) -> Self {
        if label.trim().eq_ignore_ascii_case(IN_SERVICE_LABEL) {
            StationStatus::InService
        } else {
            StationStatus::Other(label.trim().to_string())
        }
    }

    pub fn label(&self) -> &str {
        match self {
            StationStatus::InService => IN_SERVICE_LABEL,
            StationStatus::Other(label) => label,
        }
    }
}

/// Plug standards tracked by the dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PlugType {
    /// Domestic socket (type E/F).
    Ef,
    Type2,
    ComboCcs,
    Chademo,
}

impl PlugType {
    pub const ALL: [PlugType; 4] = [
        PlugType::Ef,
        PlugType::Type2,
        PlugType::ComboCcs,
        PlugType::Chademo,
    ];

    /// Human-readable label shown in textual renderings.
    pub fn label(self) -> &'static str {
        match self {
            PlugType::Ef => "E/F",
            PlugType::Type2 => "Type 2",
            PlugType::ComboCcs => "Combo CCS",
            PlugType::Chademo => "CHAdeMO",
        }
    }
}

impl FromStr for PlugType {
    type Err = Error;

    /// Accepts the labels and their compact forms: `ef`, `type2`,
    /// `combo-ccs` / `ccs`, `chademo`.
    fn from_str(s: &str) -> Result<Self> {
        let key: String = s
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .collect::<String>()
            .to_ascii_lowercase();
        match key.as_str() {
            "ef" | "e" | "domestic" => Ok(PlugType::Ef),
            "type2" | "t2" => Ok(PlugType::Type2),
            "comboccs" | "ccs" | "combo" => Ok(PlugType::ComboCcs),
            "chademo" => Ok(PlugType::Chademo),
            _ => Err(Error::UnknownPlugType {
                name: s.trim().to_string(),
            }),
        }
    }
}

/// Plug availability flags of one charge point.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PlugTypes {
    pub ef: bool,
    pub type_2: bool,
    pub combo_ccs: bool,
    pub chademo: bool,
}

impl PlugTypes {
    pub fn has(&self, plug: PlugType) -> bool {
        match plug {
            PlugType::Ef => self.ef,
            PlugType::Type2 => self.type_2,
            PlugType::ComboCcs => self.combo_ccs,
            PlugType::Chademo => self.chademo,
        }
    }

    /// Plugs present on this charge point, in [`PlugType::ALL`] order.
    pub fn available(&self) -> Vec<PlugType> {
        PlugType::ALL
            .into_iter()
            .filter(|plug| self.has(*plug))
            .collect()
    }
}

/// One charge point of the dataset.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Station {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    pub address: String,
    pub status: StationStatus,
    /// Nominal power in kW.
    pub nominal_power_kw: f64,
    pub plugs: PlugTypes,
    pub district: String,
    pub position: GeoPoint,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub charge_points: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pmr_accessibility: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub access_condition: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pricing: Option<String>,
}

impl Station {
    pub fn is_in_service(&self) -> bool {
        self.status == StationStatus::InService
    }
}

/// Immutable collection of stations loaded from the CSV export.
#[derive(Debug, Clone, Default)]
pub struct StationDataset {
    stations: Vec<Station>,
    source: Option<PathBuf>,
}

impl StationDataset {
    /// Build a dataset from already parsed stations, keeping their order.
    pub fn new(stations: Vec<Station>) -> Self {
        Self {
            stations,
            source: None,
        }
    }

    /// Load the dataset from a CSV file.
    pub fn from_path(path: &Path) -> Result<Self> {
        if !path.is_file() {
            return Err(Error::DatasetNotFound {
                path: path.to_path_buf(),
            });
        }
        let file = fs::File::open(path)?;
        let mut dataset = Self::from_reader(file)?;
        info!(
            path = %path.display(),
            stations = dataset.len(),
            "loaded station dataset"
        );
        dataset.source = Some(path.to_path_buf());
        Ok(dataset)
    }

    /// Load the dataset from a reader (e.g., file or in-memory buffer).
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let mut csv_reader = ReaderBuilder::new()
            .delimiter(b';')
            .trim(Trim::Fields)
            .flexible(true)
            .from_reader(reader);

        let headers = csv_reader.headers()?.clone();
        let columns = ColumnMap::resolve(&headers)?;

        let mut stations = Vec::new();
        for (index, result) in csv_reader.records().enumerate() {
            let record = result?;
            stations.push(columns.parse_row(index + 1, &record)?);
        }

        debug!(stations = stations.len(), "parsed station rows");
        Ok(Self::new(stations))
    }

    pub fn stations(&self) -> &[Station] {
        &self.stations
    }

    pub fn len(&self) -> usize {
        self.stations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stations.is_empty()
    }

    /// File the dataset was read from, when loaded through [`Self::from_path`].
    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    /// Sorted, de-duplicated district labels.
    pub fn districts(&self) -> Vec<&str> {
        let mut labels: Vec<&str> = self.stations.iter().map(|s| s.district.as_str()).collect();
        labels.sort_unstable();
        labels.dedup();
        labels
    }

    /// Stations of one district, in dataset order.
    ///
    /// Fails with [`Error::UnknownDistrict`] (and close matches) when no row
    /// carries the label.
    pub fn in_district(&self, label: &str) -> Result<Vec<&Station>> {
        let wanted = label.trim();
        let matches: Vec<&Station> = self
            .stations
            .iter()
            .filter(|s| s.district.eq_ignore_ascii_case(wanted))
            .collect();
        if matches.is_empty() {
            return Err(Error::UnknownDistrict {
                name: wanted.to_string(),
                suggestions: district::suggest(wanted, self.districts()),
            });
        }
        Ok(matches)
    }
}

/// Resolve the dataset path from an explicit override, the
/// `BELIB_DATASET_PATH` environment variable, or the platform data directory.
///
/// A directory is accepted in place of a file and joined with
/// [`DATASET_FILENAME`].
pub fn resolve_dataset_path(explicit: Option<&Path>) -> Result<PathBuf> {
    let candidate = match explicit {
        Some(path) => path.to_path_buf(),
        None => match env::var_os(DATASET_PATH_ENV) {
            Some(value) if !value.is_empty() => PathBuf::from(value),
            _ => default_dataset_path()?,
        },
    };

    let path = if candidate.is_dir() {
        candidate.join(DATASET_FILENAME)
    } else {
        candidate
    };

    if !path.is_file() {
        return Err(Error::DatasetNotFound { path });
    }
    Ok(path)
}

/// Resolve the default dataset location using platform-specific project directories.
pub fn default_dataset_path() -> Result<PathBuf> {
    let dirs = ProjectDirs::from("fr", "belib", "belib-locator")
        .ok_or(Error::ProjectDirsUnavailable)?;
    Ok(dirs.data_dir().join(DATASET_FILENAME))
}

/// Canonical fields read from the CSV header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum Field {
    Id,
    Name,
    Address,
    Status,
    Power,
    PlugEf,
    PlugType2,
    PlugComboCcs,
    PlugChademo,
    ChargePoints,
    PmrAccessibility,
    AccessCondition,
    Pricing,
    District,
    Coordinates,
}

const REQUIRED: [Field; 10] = [
    Field::Name,
    Field::Address,
    Field::Status,
    Field::Power,
    Field::PlugEf,
    Field::PlugType2,
    Field::PlugComboCcs,
    Field::PlugChademo,
    Field::District,
    Field::Coordinates,
];

// Canonical field -> accepted header names (normalized).
const SYNONYMS: &[(Field, &[&str])] = &[
    (Field::Id, &["id_pdc_itinerance", "id_pdc"]),
    (Field::Name, &["nom_station", "station"]),
    (Field::Address, &["adresse_station", "adresse"]),
    (Field::Status, &["statut_pdc", "statut"]),
    (Field::Power, &["puissance_nominale", "puissance"]),
    (Field::PlugEf, &["prise_type_ef"]),
    (Field::PlugType2, &["prise_type_2"]),
    (Field::PlugComboCcs, &["prise_type_combo_ccs"]),
    (Field::PlugChademo, &["prise_type_chademo"]),
    (Field::ChargePoints, &["nbre_pdc"]),
    (Field::PmrAccessibility, &["accessibilite_pmr"]),
    (Field::AccessCondition, &["condition_acces"]),
    (Field::Pricing, &["tarification"]),
    (Field::District, &["arrondissement"]),
    (Field::Coordinates, &["coordonneesxy", "geo_point_2d"]),
];

fn column_name(field: Field) -> &'static str {
    SYNONYMS
        .iter()
        .find(|(f, _)| *f == field)
        .map(|(_, names)| names[0])
        .unwrap_or("?")
}

fn normalize_header(header: &str) -> String {
    header
        .trim_start_matches('\u{feff}')
        .trim()
        .to_ascii_lowercase()
}

/// Header position of each canonical field.
struct ColumnMap {
    index: BTreeMap<Field, usize>,
}

impl ColumnMap {
    fn resolve(headers: &StringRecord) -> Result<Self> {
        let normalized: Vec<String> = headers.iter().map(normalize_header).collect();

        let mut index = BTreeMap::new();
        for (field, names) in SYNONYMS {
            if let Some(position) = names
                .iter()
                .find_map(|name| normalized.iter().position(|h| h == name))
            {
                index.insert(*field, position);
            }
        }

        let missing: Vec<String> = REQUIRED
            .iter()
            .filter(|field| !index.contains_key(field))
            .map(|field| column_name(*field).to_string())
            .collect();
        if !missing.is_empty() {
            return Err(Error::MissingColumns {
                columns: missing,
                available: headers.iter().map(|h| h.to_string()).collect(),
            });
        }

        Ok(Self { index })
    }

    fn get<'r>(&self, record: &'r StringRecord, field: Field) -> Option<&'r str> {
        self.index
            .get(&field)
            .and_then(|i| record.get(*i))
            .map(str::trim)
    }

    fn required<'r>(&self, row: usize, record: &'r StringRecord, field: Field) -> Result<&'r str> {
        match self.get(record, field) {
            Some(value) if !value.is_empty() => Ok(value),
            _ => Err(Error::InvalidRecord {
                row,
                column: column_name(field).to_string(),
                message: "value is missing".to_string(),
            }),
        }
    }

    fn optional(&self, record: &StringRecord, field: Field) -> Option<String> {
        self.get(record, field)
            .filter(|value| !value.is_empty())
            .map(str::to_string)
    }

    fn flag(&self, row: usize, record: &StringRecord, field: Field) -> Result<bool> {
        let value = self.get(record, field).unwrap_or_default();
        parse_flag(value).ok_or_else(|| Error::InvalidRecord {
            row,
            column: column_name(field).to_string(),
            message: format!("'{value}' is not a boolean"),
        })
    }

    fn parse_row(&self, row: usize, record: &StringRecord) -> Result<Station> {
        let invalid = |field: Field, message: String| Error::InvalidRecord {
            row,
            column: column_name(field).to_string(),
            message,
        };

        let power_text = self.required(row, record, Field::Power)?;
        let nominal_power_kw: f64 = power_text
            .replace(',', ".")
            .parse()
            .map_err(|_| invalid(Field::Power, format!("'{power_text}' is not a number")))?;

        let coordinates = self.required(row, record, Field::Coordinates)?;
        let position: GeoPoint = coordinates
            .parse()
            .map_err(|err: Error| invalid(Field::Coordinates, err.to_string()))?;

        let charge_points = self
            .optional(record, Field::ChargePoints)
            .and_then(|value| match value.parse::<u32>() {
                Ok(count) => Some(count),
                Err(_) => {
                    warn!(row, value = %value, "ignoring unparseable nbre_pdc");
                    None
                }
            });

        Ok(Station {
            id: self.optional(record, Field::Id),
            name: self.required(row, record, Field::Name)?.to_string(),
            address: self.required(row, record, Field::Address)?.to_string(),
            status: StationStatus::parse(self.required(row, record, Field::Status)?),
            nominal_power_kw,
            plugs: PlugTypes {
                ef: self.flag(row, record, Field::PlugEf)?,
                type_2: self.flag(row, record, Field::PlugType2)?,
                combo_ccs: self.flag(row, record, Field::PlugComboCcs)?,
                chademo: self.flag(row, record, Field::PlugChademo)?,
            },
            district: self.required(row, record, Field::District)?.to_string(),
            position,
            charge_points,
            pmr_accessibility: self.optional(record, Field::PmrAccessibility),
            access_condition: self.optional(record, Field::AccessCondition),
            pricing: self.optional(record, Field::Pricing),
        })
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "" | "false" | "0" | "non" | "no" | "f" => Some(false),
        "true" | "1" | "oui" | "yes" | "t" => Some(true),
        _ => None,
    }
}
