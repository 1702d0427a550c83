use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ViewError {
    #[error("no provider with id \"{id}\" is displayed")]
    UnknownProvider { id: String },

    #[error("marker does not belong to any displayed provider")]
    UnknownMarker,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum GeocodeError {
    #[error("could not find a location matching \"{query}\"")]
    NotFound { query: String },

    #[error("no address is known near {position}")]
    NoAddress { position: String },

    #[error("geocoder unavailable: {reason}")]
    Unavailable { reason: String },
}
