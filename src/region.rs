//! Region allow-list validation.
//!
//! The upstream API only serves a fixed set of shard codes. Requests for
//! anything else are rejected before any upstream traffic happens.

use std::fmt;

/// A game server region accepted by the upstream API.
///
/// Closed set, fixed at compile time. Parsing is an exact, case-sensitive
/// match — `"EU"` is not a region, only `"eu"` is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Region {
    Eu,
    Na,
    Latam,
    Ap,
    Kr,
    Br,
}

impl Region {
    pub const ALL: [Region; 6] = [
        Region::Eu,
        Region::Na,
        Region::Latam,
        Region::Ap,
        Region::Kr,
        Region::Br,
    ];

    /// Parse a region code. No case-folding, no trimming.
    pub fn parse(s: &str) -> Option<Region> {
        match s {
            "eu" => Some(Region::Eu),
            "na" => Some(Region::Na),
            "latam" => Some(Region::Latam),
            "ap" => Some(Region::Ap),
            "kr" => Some(Region::Kr),
            "br" => Some(Region::Br),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Region::Eu => "eu",
            Region::Na => "na",
            Region::Latam => "latam",
            Region::Ap => "ap",
            Region::Kr => "kr",
            Region::Br => "br",
        }
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Membership test against the fixed allow-list.
pub fn is_valid_region(region: &str) -> bool {
    Region::parse(region).is_some()
}
