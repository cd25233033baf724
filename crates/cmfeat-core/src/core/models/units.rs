use serde::Deserialize;
use std::fmt;
use std::str::FromStr;

/// Bohr radius in Angstroms (CODATA 2010).
pub const BOHR_RADIUS_ANGSTROM: f64 = 0.52917721092;

/// Length unit of externally supplied coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LengthUnit {
    #[default]
    Angstrom,
    Bohr,
}

impl LengthUnit {
    /// Multiplicative factor converting a length in this unit into Bohr.
    #[inline]
    pub fn to_bohr_factor(self) -> f64 {
        match self {
            LengthUnit::Angstrom => 1.0 / BOHR_RADIUS_ANGSTROM,
            LengthUnit::Bohr => 1.0,
        }
    }

    #[inline]
    pub fn to_bohr(self, value: f64) -> f64 {
        value * self.to_bohr_factor()
    }

    #[inline]
    pub fn from_bohr(self, value: f64) -> f64 {
        value / self.to_bohr_factor()
    }
}

impl fmt::Display for LengthUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LengthUnit::Angstrom => write!(f, "angstrom"),
            LengthUnit::Bohr => write!(f, "bohr"),
        }
    }
}

impl FromStr for LengthUnit {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "angstrom" | "angstroms" | "a" | "ang" => Ok(LengthUnit::Angstrom),
            "bohr" | "au" | "a.u." => Ok(LengthUnit::Bohr),
            _ => Err(()),
        }
    }
}
