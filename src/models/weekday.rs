use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{ProcessingError, Result};
use crate::utils::constants::{DAYS_PER_WEEK, WEEKDAY_NAMES};

/// Name of a weekday index, Monday = 0.
pub fn weekday_name(day: u32) -> Option<&'static str> {
    WEEKDAY_NAMES.get(day as usize).copied()
}

/// A subset of the weekdays {0..6}, Monday = 0 ... Sunday = 6.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "Vec<u32>", try_from = "Vec<u32>")]
pub struct WeekdaySet {
    mask: u8,
}

impl WeekdaySet {
    const FULL_MASK: u8 = 0b0111_1111;

    pub fn all() -> Self {
        Self {
            mask: Self::FULL_MASK,
        }
    }

    pub fn empty() -> Self {
        Self { mask: 0 }
    }

    pub fn from_days<I: IntoIterator<Item = u32>>(days: I) -> Result<Self> {
        let mut set = Self::empty();
        for day in days {
            set.insert(day)?;
        }
        Ok(set)
    }

    pub fn insert(&mut self, day: u32) -> Result<()> {
        if day >= DAYS_PER_WEEK {
            return Err(ProcessingError::InvalidFormat(format!(
                "weekday {} is outside 0..=6",
                day
            )));
        }
        self.mask |= 1 << day;
        Ok(())
    }

    pub fn contains(&self, day: u32) -> bool {
        day < DAYS_PER_WEEK && self.mask & (1 << day) != 0
    }

    pub fn is_empty(&self) -> bool {
        self.mask == 0
    }

    pub fn is_full(&self) -> bool {
        self.mask == Self::FULL_MASK
    }

    pub fn len(&self) -> usize {
        self.mask.count_ones() as usize
    }

    pub fn iter(&self) -> impl Iterator<Item = u32> + '_ {
        (0..DAYS_PER_WEEK).filter(move |day| self.contains(*day))
    }

    fn parse_day(token: &str) -> Result<u32> {
        if let Ok(day) = token.parse::<u32>() {
            return Ok(day);
        }

        let lowered = token.to_ascii_lowercase();
        WEEKDAY_NAMES
            .iter()
            .position(|name| {
                let name = name.to_ascii_lowercase();
                lowered.len() >= 3 && name.starts_with(&lowered)
            })
            .map(|idx| idx as u32)
            .ok_or_else(|| ProcessingError::InvalidFormat(format!("Unknown weekday: '{}'", token)))
    }
}

impl Default for WeekdaySet {
    fn default() -> Self {
        Self::all()
    }
}

impl FromStr for WeekdaySet {
    type Err = ProcessingError;

    /// Accepts `0,5,6`, `mon,sat,sunday`, `all`, or `none`/empty.
    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("none") {
            return Ok(Self::empty());
        }
        if trimmed.eq_ignore_ascii_case("all") {
            return Ok(Self::all());
        }

        let mut set = Self::empty();
        for token in trimmed.split(',').map(str::trim).filter(|t| !t.is_empty()) {
            set.insert(Self::parse_day(token)?)?;
        }
        Ok(set)
    }
}

impl fmt::Display for WeekdaySet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return f.write_str("none");
        }
        let names: Vec<&str> = self
            .iter()
            .filter_map(weekday_name)
            .map(|name| &name[..3])
            .collect();
        f.write_str(&names.join(","))
    }
}

impl From<WeekdaySet> for Vec<u32> {
    fn from(set: WeekdaySet) -> Self {
        set.iter().collect()
    }
}

impl TryFrom<Vec<u32>> for WeekdaySet {
    type Error = ProcessingError;

    fn try_from(days: Vec<u32>) -> Result<Self> {
        Self::from_days(days)
    }
}
