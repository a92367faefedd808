use logger::LoggerError;

/// Represents errors that can occur in the flight path simulator.
#[derive(Debug, thiserror::Error)]
pub enum SimError {
    #[error("Invalid input. Please check your input and try again.")]
    InvalidInput,
    #[error("Invalid coordinate: {0}")]
    InvalidCoordinate(String),
    #[error("Airport not found: {0}")]
    AirportNotFound(String),
    #[error("Invalid airport record at line {line}: {message}")]
    InvalidAirportRecord { line: usize, message: String },
    #[error("Invalid route entry: {0}")]
    InvalidRoute(String),
    #[error("Origin and destination are the same airport: {0}")]
    SameAirport(String),
    #[error("No route selected")]
    NoRouteSelected,
    #[error("There are no direct flights between {origin} and {destination}")]
    NoDirectFlight { origin: String, destination: String },
    #[error("Invalid view setting: {0}")]
    InvalidViewSetting(String),
    #[error("Invalid tick interval: {0}")]
    InvalidInterval(String),
    #[error("Timer start error: {0}")]
    TimerStartError(String),
    #[error("Lock error: {0}")]
    LockError(String),
    #[error("Render error: {0}")]
    RenderError(String),
    #[error("Error: {0}")]
    Other(String),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Log error: {0}")]
    Log(#[from] LoggerError),
}
