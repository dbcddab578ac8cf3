use async_trait::async_trait;
use log::info;
use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use reqwest::Client;
use thiserror::Error;

use crate::viacep::model::{CepAddress, CepPayload};

pub mod model;

const BASE_URL: &str = "https://viacep.com.br";
const UA: &str = "cep-form/0.1";

/// Ways a lookup can come back without an address.
#[derive(Debug, Error)]
pub enum LookupError {
    /// Transport or HTTP-level failure reaching the service.
    #[error("cannot reach the postal code service: {0}")]
    Failed(String),
    /// The service answered but knows no such code.
    #[error("postal code not found")]
    NotFound,
}

impl From<reqwest::Error> for LookupError {
    fn from(e: reqwest::Error) -> Self {
        LookupError::Failed(e.to_string())
    }
}

/// Seam the controller calls through, so tests can stand in for the real
/// service.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CepLookup: Send + Sync {
    /// Resolve an 8-digit postal code (already normalized) to an address.
    async fn lookup(&self, cep: &str) -> Result<CepAddress, LookupError>;
}

/// HTTP client for the ViaCEP address service.
pub struct ViaCepClient {
    client: Client,
}

impl ViaCepClient {
    pub fn new() -> color_eyre::Result<Self> {
        Ok(
            Self {
                client: Client::builder()
                    .default_headers(Self::default_headers())
                    .build()?,
            }
        )
    }

    fn default_headers() -> HeaderMap {
        let mut map = HeaderMap::new();
        map.insert(USER_AGENT, HeaderValue::from_static(UA));
        map
    }
}

#[async_trait]
impl CepLookup for ViaCepClient {
    async fn lookup(&self, cep: &str) -> Result<CepAddress, LookupError> {
        let url = format!("{BASE_URL}/ws/{cep}/json/");
        info!("looking up postal code [{cep}]");

        let payload = self
            .client
            .get(&url)
            .send()
            .await?
            .error_for_status()?
            .json::<CepPayload>()
            .await?;
        address_from(payload)
    }
}

fn address_from(payload: CepPayload) -> Result<CepAddress, LookupError> {
    if payload.is_not_found() {
        return Err(LookupError::NotFound);
    }
    Ok(payload.into_address())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_flag_becomes_its_own_error() {
        let payload = CepPayload {
            erro: true,
            ..CepPayload::default()
        };
        assert!(matches!(address_from(payload), Err(LookupError::NotFound)));
    }

    #[test]
    fn normal_payload_becomes_an_address() {
        let payload = CepPayload {
            logradouro: Some("Avenida Paulista".to_string()),
            uf: Some("SP".to_string()),
            ..CepPayload::default()
        };
        let address = address_from(payload).unwrap();
        assert_eq!(address.street.as_deref(), Some("Avenida Paulista"));
        assert_eq!(address.state.as_deref(), Some("SP"));
    }

    #[test]
    fn error_messages_are_distinct() {
        let failed = LookupError::Failed("connection refused".to_string());
        assert_ne!(failed.to_string(), LookupError::NotFound.to_string());
    }
}
