//! Shareable search links: a facet state packed into a URL-safe token.

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE;

use crate::search_query::FacetState;


#[derive(Debug)]
pub enum StateLinkError {
    Encode(ciborium::ser::Error<std::io::Error>),
    Decode(base64::DecodeError),
    Deserialize(ciborium::de::Error<std::io::Error>),
}

impl std::fmt::Display for StateLinkError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Encode(err) => write!(f, "Failed to serialize search state: {}", err),
            Self::Decode(err) => write!(f, "Failed to decode base64: {}", err),
            Self::Deserialize(err) => write!(f, "Failed to deserialize search state: {}", err),
        }
    }
}

impl std::error::Error for StateLinkError {}

/// CBOR-encodes the state and wraps it in URL-safe base64.
pub fn encode_state(state: &FacetState) -> Result<String, StateLinkError> {
    let mut serialized = Vec::new();
    ciborium::into_writer(state, &mut serialized).map_err(StateLinkError::Encode)?;
    Ok(URL_SAFE.encode(serialized))
}

pub fn decode_state(token: &str) -> Result<FacetState, StateLinkError> {
    let bytes = URL_SAFE
        .decode(token.trim().as_bytes())
        .map_err(StateLinkError::Decode)?;
    ciborium::from_reader(std::io::Cursor::new(bytes)).map_err(StateLinkError::Deserialize)
}
