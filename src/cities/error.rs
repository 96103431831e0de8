use thiserror::Error;

#[derive(Debug, Error)]
pub enum CityLookupError {
    #[error("Unknown city '{0}'")]
    UnknownCity(String),
}
