//! Materialize release versions as reported by `mz_version()` and used to gate
//! upgrade checks.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use anyhow::{anyhow, bail};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A `vMAJOR.MINOR.PATCH[-PRERELEASE]` version.
///
/// Build metadata (`+...`) and anything after the first whitespace, such as the
/// commit hash in `v0.74.0 (8d2ecc1b4)`, is ignored.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MzVersion {
    pub major: u64,
    pub minor: u64,
    pub patch: u64,
    pub prerelease: Option<String>,
}

impl MzVersion {
    pub const fn new(major: u64, minor: u64, patch: u64) -> Self {
        Self {
            major,
            minor,
            patch,
            prerelease: None,
        }
    }

    pub fn parse(input: &str) -> anyhow::Result<Self> {
        let token = input
            .split_whitespace()
            .next()
            .ok_or_else(|| anyhow!("empty version string"))?;
        let token = token.strip_prefix('v').unwrap_or(token);
        let token = token.split('+').next().unwrap_or(token);

        let (release, prerelease) = match token.split_once('-') {
            Some((release, pre)) if !pre.is_empty() => (release, Some(pre.to_string())),
            Some(_) => bail!("invalid version {input:?}: empty pre-release"),
            None => (token, None),
        };

        let parts: Vec<&str> = release.split('.').collect();
        if parts.len() != 3 {
            bail!("invalid version {input:?}: expected MAJOR.MINOR.PATCH");
        }

        let number = |s: &str| {
            s.parse::<u64>()
                .map_err(|e| anyhow!("invalid version {input:?}: {e}"))
        };

        Ok(Self {
            major: number(parts[0])?,
            minor: number(parts[1])?,
            patch: number(parts[2])?,
            prerelease,
        })
    }
}

impl FromStr for MzVersion {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Ord for MzVersion {
    fn cmp(&self, other: &Self) -> Ordering {
        (self.major, self.minor, self.patch)
            .cmp(&(other.major, other.minor, other.patch))
            .then_with(|| match (&self.prerelease, &other.prerelease) {
                (None, None) => Ordering::Equal,
                // A pre-release sorts before the release it precedes.
                (Some(_), None) => Ordering::Less,
                (None, Some(_)) => Ordering::Greater,
                (Some(a), Some(b)) => a.cmp(b),
            })
    }
}

impl PartialOrd for MzVersion {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for MzVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v{}.{}.{}", self.major, self.minor, self.patch)?;
        if let Some(pre) = &self.prerelease {
            write!(f, "-{pre}")?;
        }
        Ok(())
    }
}

impl Serialize for MzVersion {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for MzVersion {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        MzVersion::parse(&raw).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::MzVersion;

    #[test]
    fn parses_plain_and_prefixed_versions() {
        assert_eq!(MzVersion::parse("v0.74.0").unwrap(), MzVersion::new(0, 74, 0));
        assert_eq!(MzVersion::parse("0.74.0").unwrap(), MzVersion::new(0, 74, 0));
        assert_eq!(
            MzVersion::parse("v0.81.2 (8d2ecc1b4)").unwrap(),
            MzVersion::new(0, 81, 2)
        );
    }

    #[test]
    fn parses_prerelease_and_drops_build_metadata() {
        let v = MzVersion::parse("v0.75.0-dev+abc").unwrap();
        assert_eq!(v.prerelease.as_deref(), Some("dev"));
        assert_eq!(v.to_string(), "v0.75.0-dev");
    }

    #[test]
    fn rejects_malformed_versions() {
        for input in ["", "v0.74", "v0.x.1", "v1.2.3.4", "v1.2.3-"] {
            assert!(MzVersion::parse(input).is_err(), "expected error: {input:?}");
        }
    }

    #[test]
    fn orders_by_release_then_prerelease() {
        let v = |s: &str| MzVersion::parse(s).unwrap();
        assert!(v("v0.74.0") >= v("v0.73.2"));
        assert!(v("v0.74.0") > v("v0.74.0-dev"));
        assert!(v("v1.0.0") > v("v0.999.999"));
        assert!(v("v0.74.0-alpha") < v("v0.74.0-beta"));
        assert_eq!(v("v0.74.0"), v("0.74.0"));
    }

    #[test]
    fn serializes_as_display_string() {
        let v = MzVersion::parse("v0.74.0-rc1").unwrap();
        let json = serde_json::to_string(&v).unwrap();
        assert_eq!(json, "\"v0.74.0-rc1\"");
        let back: MzVersion = serde_json::from_str(&json).unwrap();
        assert_eq!(back, v);
    }
}
