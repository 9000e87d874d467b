// ---------------------------------------------------------------------------
// Engine version: four-component ordered value
// ---------------------------------------------------------------------------
//
// Compatibility between a save and the running engine is decided on the
// first three components only. The fourth (build) component may differ
// between engines that read each other's saves.

use std::fmt;
use std::str::FromStr;

use bitcode::{Decode, Encode};
use serde::{Deserialize, Serialize};

/// Version of the engine currently running.
pub const ENGINE_VERSION: Version = Version::new(1, 9, 0, 3);

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Default,
    Serialize,
    Deserialize,
    Encode,
    Decode,
)]
#[serde(try_from = "String", into = "String")]
pub struct Version {
    pub major: u32,
    pub minor: u32,
    pub patch: u32,
    pub build: u32,
}

impl Version {
    pub const fn new(major: u32, minor: u32, patch: u32, build: u32) -> Self {
        Self {
            major,
            minor,
            patch,
            build,
        }
    }

    /// True when the first three components match. Saves are only readable
    /// by engines for which this holds.
    pub fn is_engine_compatible(&self, other: &Version) -> bool {
        self.major == other.major && self.minor == other.minor && self.patch == other.patch
    }

    /// Equality with an optional "ignore build" mode.
    pub fn equals(&self, other: &Version, ignore_build: bool) -> bool {
        if ignore_build {
            self.is_engine_compatible(other)
        } else {
            self == other
        }
    }

    /// Strict ordering, optionally ignoring the build component.
    pub fn is_greater_than(&self, other: &Version, ignore_build: bool) -> bool {
        let lhs = (self.major, self.minor, self.patch);
        let rhs = (other.major, other.minor, other.patch);
        if ignore_build || lhs != rhs {
            lhs > rhs
        } else {
            self.build > other.build
        }
    }

    /// Renders the version with a custom separator, e.g. `1_9_0_3`.
    pub fn to_string_full(&self, separator: &str, ignore_build: bool) -> String {
        let mut out = format!(
            "{}{sep}{}{sep}{}",
            self.major,
            self.minor,
            self.patch,
            sep = separator
        );
        if !ignore_build {
            out.push_str(separator);
            out.push_str(&self.build.to_string());
        }
        out
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}.{}.{}.{}",
            self.major, self.minor, self.patch, self.build
        )
    }
}

/// Error returned when a version string cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseVersionError(String);

impl fmt::Display for ParseVersionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid version string: {}", self.0)
    }
}

impl std::error::Error for ParseVersionError {}

impl FromStr for Version {
    type Err = ParseVersionError;

    /// Accepts `.` or `_` separated versions with three or four components;
    /// a missing build component is zero.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.trim().split(['.', '_']).collect();
        if parts.len() < 3 || parts.len() > 4 {
            return Err(ParseVersionError(s.to_string()));
        }
        let mut components = [0u32; 4];
        for (slot, part) in components.iter_mut().zip(&parts) {
            *slot = part
                .parse()
                .map_err(|_| ParseVersionError(s.to_string()))?;
        }
        let [major, minor, patch, build] = components;
        Ok(Version::new(major, minor, patch, build))
    }
}

impl TryFrom<String> for Version {
    type Error = ParseVersionError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<Version> for String {
    fn from(v: Version) -> Self {
        v.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_component_ignored_for_engine_compatibility() {
        let a = Version::new(1, 2, 3, 0);
        let b = Version::new(1, 2, 3, 7);
        assert!(a.is_engine_compatible(&b));
        assert!(a.equals(&b, true));
        assert!(!a.equals(&b, false));
        assert_ne!(a, b);
    }

    #[test]
    fn test_first_three_components_take_precedence() {
        let newer = Version::new(1, 2, 4, 0);
        let older = Version::new(1, 2, 3, 9);
        assert!(newer > older);
        assert!(newer.is_greater_than(&older, false));
        assert!(newer.is_greater_than(&older, true));
        assert!(!older.is_greater_than(&newer, false));
    }

    #[test]
    fn test_greater_than_on_build_only() {
        let a = Version::new(1, 2, 3, 9);
        let b = Version::new(1, 2, 3, 4);
        assert!(a.is_greater_than(&b, false));
        assert!(!a.is_greater_than(&b, true));
        assert!(!b.is_greater_than(&a, false));
        assert!(!a.is_greater_than(&a, false));
    }

    #[test]
    fn test_parse_dotted_and_underscored() {
        assert_eq!("1.9.0.3".parse::<Version>(), Ok(Version::new(1, 9, 0, 3)));
        assert_eq!("1_9_0".parse::<Version>(), Ok(Version::new(1, 9, 0, 0)));
        assert!("1.9".parse::<Version>().is_err());
        assert!("1.9.x.0".parse::<Version>().is_err());
        assert!("1.2.3.4.5".parse::<Version>().is_err());
    }

    #[test]
    fn test_display_and_full_string() {
        let v = Version::new(1, 9, 0, 3);
        assert_eq!(v.to_string(), "1.9.0.3");
        assert_eq!(v.to_string_full("_", false), "1_9_0_3");
        assert_eq!(v.to_string_full("_", true), "1_9_0");
    }

    #[test]
    fn test_string_conversions_roundtrip() {
        let v = Version::new(2, 0, 1, 5);
        let s = String::from(v);
        assert_eq!(s, "2.0.1.5");
        assert_eq!(Version::try_from(s), Ok(v));
    }
}
