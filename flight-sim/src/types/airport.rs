use std::collections::BTreeMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use serde::Deserialize;

use super::geo_point::GeoPoint;
use super::sim_error::SimError;

/// Represents an airport with its region, municipality, IATA code and geographical position.
#[derive(Clone, Debug, PartialEq)]
pub struct Airport {
    pub iata_code: String,
    pub region: String,
    pub municipality: String,
    pub position: GeoPoint,
}

impl Airport {
    pub fn new(iata_code: String, region: String, municipality: String, position: GeoPoint) -> Self {
        Airport {
            iata_code,
            region,
            municipality,
            position,
        }
    }

    /// Name shown in selectors, e.g. `"California, Los Angeles (LAX)"`.
    pub fn display_name(&self) -> String {
        format!("{}, {} ({})", self.region, self.municipality, self.iata_code)
    }
}

/// One row of the airports CSV. Columns not listed here are ignored.
#[derive(Debug, Deserialize)]
struct AirportRow {
    region_name: Option<String>,
    municipality: Option<String>,
    iata_code: Option<String>,
    latitude_deg: Option<f64>,
    longitude_deg: Option<f64>,
}

/// Immutable lookup of airports keyed by display name, built once at startup.
#[derive(Debug, Default, Clone)]
pub struct AirportTable {
    airports: BTreeMap<String, Airport>,
}

impl AirportTable {
    /// Loads the table from a CSV file on disk.
    pub fn from_path(path: &Path) -> Result<Self, SimError> {
        let file = File::open(path)?;
        Self::from_reader(file)
    }

    /// Loads the table from any CSV source with a header row.
    ///
    /// Rows without an IATA code are skipped. A row that has an IATA code but
    /// lacks valid coordinates fails the whole load.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, SimError> {
        let mut csv_reader = csv::ReaderBuilder::new().flexible(true).from_reader(reader);
        let headers = csv_reader.headers()?.clone();
        let mut airports = BTreeMap::new();

        for result in csv_reader.records() {
            let raw = result?;
            let line = raw.position().map_or(0, |position| position.line() as usize);
            let record: AirportRow = raw.deserialize(Some(&headers))?;

            let iata_code = match record.iata_code.as_deref().map(str::trim) {
                Some(code) if !code.is_empty() => code.to_string(),
                _ => continue,
            };

            let (latitude, longitude) = match (record.latitude_deg, record.longitude_deg) {
                (Some(lat), Some(lon)) => (lat, lon),
                _ => {
                    return Err(SimError::InvalidAirportRecord {
                        line,
                        message: format!("{} has no coordinates", iata_code),
                    })
                }
            };
            let position =
                GeoPoint::new(latitude, longitude).map_err(|e| SimError::InvalidAirportRecord {
                    line,
                    message: format!("{}: {}", iata_code, e),
                })?;

            let airport = Airport::new(
                iata_code,
                record.region_name.unwrap_or_default().trim().to_string(),
                record.municipality.unwrap_or_default().trim().to_string(),
                position,
            );
            airports.insert(airport.display_name(), airport);
        }

        Ok(AirportTable { airports })
    }

    pub fn from_airports(list: Vec<Airport>) -> Self {
        AirportTable {
            airports: list
                .into_iter()
                .map(|airport| (airport.display_name(), airport))
                .collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.airports.len()
    }

    pub fn is_empty(&self) -> bool {
        self.airports.is_empty()
    }

    /// Display names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.airports.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Airport> {
        self.airports.values()
    }

    pub fn get(&self, display_name: &str) -> Option<&Airport> {
        self.airports.get(display_name)
    }

    pub fn find_by_iata(&self, code: &str) -> Option<&Airport> {
        self.airports
            .values()
            .find(|airport| airport.iata_code.eq_ignore_ascii_case(code))
    }

    /// Resolves either a full display name or a bare IATA code.
    pub fn resolve(&self, query: &str) -> Result<&Airport, SimError> {
        let query = query.trim();
        self.get(query)
            .or_else(|| self.find_by_iata(query))
            .ok_or_else(|| SimError::AirportNotFound(query.to_string()))
    }

    /// Airports whose display name contains `filter`, ignoring case.
    pub fn search<'a>(&'a self, filter: &'a str) -> impl Iterator<Item = &'a Airport> + 'a {
        let needle = filter.to_lowercase();
        self.airports
            .iter()
            .filter(move |(name, _)| name.to_lowercase().contains(&needle))
            .map(|(_, airport)| airport)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CSV: &str = "\
id,ident,region_name,municipality,iata_code,latitude_deg,longitude_deg
1,KLAX,California,Los Angeles,LAX,33.942501,-118.407997
2,KLAS,Nevada,Las Vegas,LAS,36.083361,-115.151817
3,00CA,California,Barstow,,35.350498,-116.888
4,KJFK,New York,New York,JFK,40.639801,-73.7789
";

    #[test]
    fn test_load_skips_rows_without_iata() {
        let table = AirportTable::from_reader(CSV.as_bytes()).unwrap();
        assert_eq!(table.len(), 3);
        assert!(table.find_by_iata("00CA").is_none());
    }

    #[test]
    fn test_display_names_are_sorted() {
        let table = AirportTable::from_reader(CSV.as_bytes()).unwrap();
        let names: Vec<&str> = table.names().collect();
        assert_eq!(
            names,
            vec![
                "California, Los Angeles (LAX)",
                "Nevada, Las Vegas (LAS)",
                "New York, New York (JFK)",
            ]
        );
    }

    #[test]
    fn test_resolve_by_name_and_code() {
        let table = AirportTable::from_reader(CSV.as_bytes()).unwrap();
        let by_name = table.resolve("Nevada, Las Vegas (LAS)").unwrap();
        let by_code = table.resolve("las").unwrap();
        assert_eq!(by_name, by_code);
        assert_eq!(by_code.position.latitude, 36.083361);
        assert!(matches!(
            table.resolve("XXX"),
            Err(SimError::AirportNotFound(_))
        ));
    }

    #[test]
    fn test_missing_coordinates_fail_the_load() {
        let csv = "region_name,municipality,iata_code,latitude_deg,longitude_deg\n\
                   California,Los Angeles,LAX,33.94,-118.40\n\
                   Nevada,Las Vegas,LAS,,-115.15\n";
        match AirportTable::from_reader(csv.as_bytes()) {
            Err(SimError::InvalidAirportRecord { line, message }) => {
                // The header is line 1.
                assert_eq!(line, 3);
                assert!(message.contains("LAS"));
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_nan_coordinates_fail_the_load() {
        let csv = "region_name,municipality,iata_code,latitude_deg,longitude_deg\n\
                   Nevada,Las Vegas,LAS,NaN,-115.15\n";
        assert!(matches!(
            AirportTable::from_reader(csv.as_bytes()),
            Err(SimError::InvalidAirportRecord { line: 2, .. })
        ));
    }

    #[test]
    fn test_error_names_the_file_line_after_skipped_rows() {
        let csv = "region_name,municipality,iata_code,latitude_deg,longitude_deg\n\
                   California,Barstow,,35.35,-116.88\n\
                   California,Los Angeles,LAX,33.94,-118.40\n\
                   Nevada,Las Vegas,LAS,95.0,-115.15\n";
        match AirportTable::from_reader(csv.as_bytes()) {
            Err(SimError::InvalidAirportRecord { line, message }) => {
                assert_eq!(line, 4);
                assert!(message.contains("LAS"));
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_search_is_case_insensitive() {
        let table = AirportTable::from_reader(CSV.as_bytes()).unwrap();
        let found: Vec<&str> = table
            .search("california")
            .map(|a| a.iata_code.as_str())
            .collect();
        assert_eq!(found, vec!["LAX"]);
    }
}
