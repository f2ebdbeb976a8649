use std::fmt::Debug;

use chrono_tz::Tz;
use tzf_rs::DefaultFinder;

/// Maps a coordinate to an IANA zone name, if it can.
pub trait TimezoneResolver: Send + Sync + Debug {
    fn resolve(&self, lat: f64, lon: f64) -> Option<String>;
}

/// Offline lookup against the zone polygons bundled with `tzf-rs`.
///
/// Building the finder decodes the embedded data set, so construct one and
/// reuse it.
pub struct TzfResolver {
    finder: DefaultFinder,
}

impl TzfResolver {
    pub fn new() -> Self {
        Self {
            finder: DefaultFinder::new(),
        }
    }
}

impl Default for TzfResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl Debug for TzfResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TzfResolver").finish_non_exhaustive()
    }
}

impl TimezoneResolver for TzfResolver {
    fn resolve(&self, lat: f64, lon: f64) -> Option<String> {
        let name = self.finder.get_tz_name(lon, lat);
        (!name.is_empty()).then(|| name.to_string())
    }
}

/// Always answers with the same zone (or with nothing).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FixedTimezone(pub Option<String>);

impl FixedTimezone {
    pub fn named(name: impl Into<String>) -> Self {
        Self(Some(name.into()))
    }

    pub fn unknown() -> Self {
        Self(None)
    }
}

impl TimezoneResolver for FixedTimezone {
    fn resolve(&self, _lat: f64, _lon: f64) -> Option<String> {
        self.0.clone()
    }
}

/// Zone for a coordinate, falling back to UTC when the resolver has no
/// answer or answers with a name `chrono-tz` does not know.
pub fn resolve_timezone(resolver: &dyn TimezoneResolver, lat: f64, lon: f64) -> Tz {
    let Some(name) = resolver.resolve(lat, lon) else {
        tracing::warn!("No timezone found for {lat},{lon}; using UTC for local timestamps");
        return Tz::UTC;
    };

    match name.parse::<Tz>() {
        Ok(tz) => {
            tracing::debug!("Resolved {lat},{lon} to timezone {tz}");
            tz
        }
        Err(e) => {
            tracing::warn!("Unrecognised timezone '{name}' for {lat},{lon} ({e}); using UTC");
            Tz::UTC
        }
    }
}
