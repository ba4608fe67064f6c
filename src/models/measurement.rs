use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{ProcessingError, Result};

/// A numeric column of the station file, named as in the CSV header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Measurement {
    #[serde(rename = "PM2.5")]
    Pm25,
    #[serde(rename = "PM10")]
    Pm10,
    #[serde(rename = "SO2")]
    So2,
    #[serde(rename = "NO2")]
    No2,
    #[serde(rename = "CO")]
    Co,
    #[serde(rename = "O3")]
    O3,
    #[serde(rename = "TEMP")]
    Temp,
    #[serde(rename = "PRES")]
    Pres,
    #[serde(rename = "DEWP")]
    Dewp,
    #[serde(rename = "RAIN")]
    Rain,
    #[serde(rename = "WSPM")]
    Wspm,
}

impl Measurement {
    pub const ALL: [Measurement; 11] = [
        Measurement::Pm25,
        Measurement::Pm10,
        Measurement::So2,
        Measurement::No2,
        Measurement::Co,
        Measurement::O3,
        Measurement::Temp,
        Measurement::Pres,
        Measurement::Dewp,
        Measurement::Rain,
        Measurement::Wspm,
    ];

    pub fn column_name(&self) -> &'static str {
        match self {
            Measurement::Pm25 => "PM2.5",
            Measurement::Pm10 => "PM10",
            Measurement::So2 => "SO2",
            Measurement::No2 => "NO2",
            Measurement::Co => "CO",
            Measurement::O3 => "O3",
            Measurement::Temp => "TEMP",
            Measurement::Pres => "PRES",
            Measurement::Dewp => "DEWP",
            Measurement::Rain => "RAIN",
            Measurement::Wspm => "WSPM",
        }
    }

    /// Header lookup is case-insensitive; the station files are not consistent about it.
    pub fn from_column_name(name: &str) -> Option<Self> {
        let name = name.trim();
        Self::ALL
            .into_iter()
            .find(|m| m.column_name().eq_ignore_ascii_case(name))
    }

    /// Columns a station file must carry for the dashboard views to be computable.
    pub fn is_required(&self) -> bool {
        !matches!(
            self,
            Measurement::Temp | Measurement::Pres | Measurement::Dewp | Measurement::Rain
        )
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Measurement::Pm25 => "Fine particulate matter",
            Measurement::Pm10 => "Coarse particulate matter",
            Measurement::So2 => "Sulphur dioxide",
            Measurement::No2 => "Nitrogen dioxide",
            Measurement::Co => "Carbon monoxide",
            Measurement::O3 => "Ozone",
            Measurement::Temp => "Temperature",
            Measurement::Pres => "Pressure",
            Measurement::Dewp => "Dew point",
            Measurement::Rain => "Precipitation",
            Measurement::Wspm => "Wind speed",
        }
    }

    pub fn units(&self) -> &'static str {
        match self {
            Measurement::Pm25
            | Measurement::Pm10
            | Measurement::So2
            | Measurement::No2
            | Measurement::Co
            | Measurement::O3 => "µg/m³",
            Measurement::Temp | Measurement::Dewp => "°C",
            Measurement::Pres => "hPa",
            Measurement::Rain => "mm",
            Measurement::Wspm => "m/s",
        }
    }

    pub fn required() -> impl Iterator<Item = Measurement> {
        Self::ALL.into_iter().filter(|m| m.is_required())
    }
}

impl fmt::Display for Measurement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column_name())
    }
}

impl FromStr for Measurement {
    type Err = ProcessingError;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_column_name(s).ok_or_else(|| ProcessingError::UnknownColumn(s.to_string()))
    }
}

/// The measurements a user can pick for the hourly and weekly trend views.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Pollutant {
    #[serde(rename = "PM2.5")]
    Pm25,
    #[serde(rename = "PM10")]
    Pm10,
    #[serde(rename = "SO2")]
    So2,
    #[serde(rename = "NO2")]
    No2,
    #[serde(rename = "CO")]
    Co,
    #[serde(rename = "O3")]
    O3,
}

impl Pollutant {
    pub const ALL: [Pollutant; 6] = [
        Pollutant::Pm25,
        Pollutant::Pm10,
        Pollutant::So2,
        Pollutant::No2,
        Pollutant::Co,
        Pollutant::O3,
    ];

    pub fn measurement(&self) -> Measurement {
        match self {
            Pollutant::Pm25 => Measurement::Pm25,
            Pollutant::Pm10 => Measurement::Pm10,
            Pollutant::So2 => Measurement::So2,
            Pollutant::No2 => Measurement::No2,
            Pollutant::Co => Measurement::Co,
            Pollutant::O3 => Measurement::O3,
        }
    }
}

impl Default for Pollutant {
    fn default() -> Self {
        Pollutant::Pm25
    }
}

impl From<Pollutant> for Measurement {
    fn from(pollutant: Pollutant) -> Self {
        pollutant.measurement()
    }
}

impl fmt::Display for Pollutant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.measurement().column_name())
    }
}

impl FromStr for Pollutant {
    type Err = ProcessingError;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|p| p.measurement().column_name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| {
                ProcessingError::InvalidFormat(format!(
                    "'{}' is not a pollutant (expected one of PM2.5, PM10, SO2, NO2, CO, O3)",
                    s
                ))
            })
    }
}
