use std::collections::HashMap;
use std::fmt;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use chrono::Duration;

use super::sim_error::SimError;

/// Order-sensitive key made of the origin and destination IATA codes, e.g. `LAXLAS`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RouteKey(String);

impl RouteKey {
    pub fn new(origin_iata: &str, destination_iata: &str) -> Self {
        RouteKey(format!(
            "{}{}",
            origin_iata.trim().to_uppercase(),
            destination_iata.trim().to_uppercase()
        ))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Average flight time of a direct route.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlightDuration(Duration);

impl FlightDuration {
    /// Builds a duration from a (possibly fractional) number of minutes,
    /// rounded to whole minutes.
    pub fn from_minutes(minutes: f64) -> Option<Self> {
        if !minutes.is_finite() || minutes < 0.0 {
            return None;
        }
        Duration::try_minutes(minutes.round() as i64).map(FlightDuration)
    }

    pub fn total_minutes(&self) -> i64 {
        self.0.num_minutes()
    }

    pub fn hours(&self) -> i64 {
        self.0.num_hours()
    }

    /// Minutes left over after the whole hours.
    pub fn minutes(&self) -> i64 {
        self.0.num_minutes() % 60
    }
}

impl fmt::Display for FlightDuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} hours and {} minutes", self.hours(), self.minutes())
    }
}

/// Immutable mapping from route keys to average direct-flight durations.
#[derive(Debug, Default, Clone)]
pub struct RouteTable {
    durations: HashMap<RouteKey, FlightDuration>,
}

impl RouteTable {
    pub fn from_path(path: &Path) -> Result<Self, SimError> {
        let file = File::open(path)?;
        Self::from_reader(file)
    }

    /// Reads a JSON object such as `{"LAXLAS": 65.4, "LASLAX": 71}`.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, SimError> {
        let raw: HashMap<String, f64> = serde_json::from_reader(reader)?;
        let mut durations = HashMap::with_capacity(raw.len());

        for (key, minutes) in raw {
            let duration = FlightDuration::from_minutes(minutes)
                .ok_or_else(|| SimError::InvalidRoute(format!("{}: {} minutes", key, minutes)))?;
            durations.insert(RouteKey(key.trim().to_uppercase()), duration);
        }

        Ok(RouteTable { durations })
    }

    pub fn insert(&mut self, origin_iata: &str, destination_iata: &str, duration: FlightDuration) {
        self.durations
            .insert(RouteKey::new(origin_iata, destination_iata), duration);
    }

    /// Average duration of the direct flight, or `None` when there is no direct flight.
    pub fn lookup(&self, origin_iata: &str, destination_iata: &str) -> Option<FlightDuration> {
        self.durations
            .get(&RouteKey::new(origin_iata, destination_iata))
            .copied()
    }

    pub fn keys(&self) -> impl Iterator<Item = &RouteKey> {
        self.durations.keys()
    }

    pub fn len(&self) -> usize {
        self.durations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.durations.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_is_order_sensitive() {
        let table = RouteTable::from_reader(r#"{"LAXLAS": 65}"#.as_bytes()).unwrap();
        assert!(table.lookup("LAX", "LAS").is_some());
        assert!(table.lookup("LAS", "LAX").is_none());
    }

    #[test]
    fn test_duration_splits_into_hours_and_minutes() {
        let table = RouteTable::from_reader(r#"{"JFKLAX": 334.6}"#.as_bytes()).unwrap();
        let duration = table.lookup("jfk", "lax").unwrap();
        assert_eq!(duration.total_minutes(), 335);
        assert_eq!(duration.hours(), 5);
        assert_eq!(duration.minutes(), 35);
        assert_eq!(duration.to_string(), "5 hours and 35 minutes");
    }

    #[test]
    fn test_rounding_never_yields_sixty_minutes() {
        let duration = FlightDuration::from_minutes(119.7).unwrap();
        assert_eq!(duration.hours(), 2);
        assert_eq!(duration.minutes(), 0);
    }

    #[test]
    fn test_negative_duration_is_rejected() {
        assert!(FlightDuration::from_minutes(-3.0).is_none());
        assert!(RouteTable::from_reader(r#"{"LAXLAS": -1}"#.as_bytes()).is_err());
    }

    #[test]
    fn test_malformed_json_is_an_error() {
        assert!(matches!(
            RouteTable::from_reader("[1, 2]".as_bytes()),
            Err(SimError::Json(_))
        ));
    }
}
