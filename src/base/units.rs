use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Clock frequency in Hz. Parsed from strings like `2GHz` or `500MHz`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Frequency(pub u64);

/// Byte count. Parsed from strings like `64kB`, `2MB` or `1024MB`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct MemSize(pub u64);

/// Split `"2GHz"` into `(2, "GHz")`.
fn split_number(value: &str) -> Result<(u64, &str), String> {
    let value = value.trim();
    let digits = value
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(value.len());
    if digits == 0 {
        return Err(format!("'{}' does not start with a number", value));
    }
    let number = value[..digits]
        .parse::<u64>()
        .map_err(|e| format!("'{}': {}", value, e))?;
    Ok((number, value[digits..].trim()))
}

impl FromStr for Frequency {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let (number, unit) = split_number(value)?;
        let scale = match unit {
            "Hz" | "" => 1,
            "kHz" => 1_000,
            "MHz" => 1_000_000,
            "GHz" => 1_000_000_000,
            _ => {
                return Err(format!(
                    "unsupported frequency unit '{}', expected one of: Hz, kHz, MHz, GHz",
                    unit
                ))
            }
        };
        number
            .checked_mul(scale)
            .map(Frequency)
            .ok_or_else(|| format!("'{}' overflows", value))
    }
}

impl FromStr for MemSize {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let (number, unit) = split_number(value)?;
        let shift = match unit {
            "B" | "" => 0,
            "kB" | "KB" | "KiB" => 10,
            "MB" | "MiB" => 20,
            "GB" | "GiB" => 30,
            _ => {
                return Err(format!(
                    "unsupported size unit '{}', expected one of: B, kB, MB, GB",
                    unit
                ))
            }
        };
        number
            .checked_mul(1 << shift)
            .map(MemSize)
            .ok_or_else(|| format!("'{}' overflows", value))
    }
}

impl TryFrom<String> for Frequency {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl TryFrom<String> for MemSize {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Frequency> for String {
    fn from(value: Frequency) -> Self {
        value.to_string()
    }
}

impl From<MemSize> for String {
    fn from(value: MemSize) -> Self {
        value.to_string()
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let hz = self.0;
        match hz {
            0 => write!(f, "0Hz"),
            _ if hz % 1_000_000_000 == 0 => write!(f, "{}GHz", hz / 1_000_000_000),
            _ if hz % 1_000_000 == 0 => write!(f, "{}MHz", hz / 1_000_000),
            _ if hz % 1_000 == 0 => write!(f, "{}kHz", hz / 1_000),
            _ => write!(f, "{}Hz", hz),
        }
    }
}

impl fmt::Display for MemSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let bytes = self.0;
        match bytes {
            0 => write!(f, "0B"),
            _ if bytes % (1 << 30) == 0 => write!(f, "{}GB", bytes >> 30),
            _ if bytes % (1 << 20) == 0 => write!(f, "{}MB", bytes >> 20),
            _ if bytes % (1 << 10) == 0 => write!(f, "{}kB", bytes >> 10),
            _ => write!(f, "{}B", bytes),
        }
    }
}

impl MemSize {
    pub fn bytes(&self) -> u64 {
        self.0
    }
}
