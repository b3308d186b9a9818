//! Postal-code (CEP) lookup via the ViaCEP public API.
//!
//! Given an 8-digit CEP the API returns street/neighborhood/city/state, or a
//! not-found marker. Lookup failure is retryable and user-visible, never
//! fatal - the customer can always type the address by hand.

use serde::Deserialize;
use thiserror::Error;
use tracing::instrument;

/// Errors from a CEP lookup, each with its customer-facing notice text.
#[derive(Debug, Error)]
pub enum CepError {
    /// Input did not contain exactly 8 digits.
    #[error("CEP inválido. Digite 8 números.")]
    InvalidCep,

    /// The API answered but knows no such CEP.
    #[error("CEP não encontrado.")]
    NotFound,

    /// Network or decode failure; worth retrying.
    #[error("Erro ao buscar CEP. Tente novamente.")]
    Http(#[from] reqwest::Error),
}

/// Address fields returned by ViaCEP.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CepAddress {
    #[serde(rename = "logradouro", default)]
    pub street: String,
    #[serde(rename = "bairro", default)]
    pub neighborhood: String,
    #[serde(rename = "localidade", default)]
    pub city: String,
    #[serde(rename = "uf", default)]
    pub state: String,
    #[serde(rename = "erro", default)]
    not_found: bool,
}

/// ViaCEP lookup client.
#[derive(Clone)]
pub struct CepClient {
    client: reqwest::Client,
    base_url: String,
}

impl Default for CepClient {
    fn default() -> Self {
        Self::new("https://viacep.com.br")
    }
}

impl CepClient {
    /// Create a client against a ViaCEP-compatible endpoint.
    #[must_use]
    pub fn new(base_url: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Look up a CEP. Non-digit characters (the `12345-678` mask) are
    /// stripped before validation.
    ///
    /// # Errors
    ///
    /// [`CepError::InvalidCep`] for anything but 8 digits,
    /// [`CepError::NotFound`] when the API knows no such CEP, and
    /// [`CepError::Http`] for transport failures.
    #[instrument(skip(self))]
    pub async fn lookup(&self, cep: &str) -> Result<CepAddress, CepError> {
        let digits: String = cep.chars().filter(char::is_ascii_digit).collect();
        if digits.len() != 8 {
            return Err(CepError::InvalidCep);
        }

        let url = format!("{}/ws/{digits}/json/", self.base_url);
        let address: CepAddress = self
            .client
            .get(&url)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        if address.not_found {
            return Err(CepError::NotFound);
        }
        Ok(address)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_invalid_cep_rejected_before_any_request() {
        // Unroutable base URL: an HTTP attempt would error differently.
        let client = CepClient::new("http://127.0.0.1:1");
        assert!(matches!(
            client.lookup("1234").await,
            Err(CepError::InvalidCep)
        ));
        assert!(matches!(
            client.lookup("abcdefgh").await,
            Err(CepError::InvalidCep)
        ));
    }

    #[test]
    fn test_masked_cep_digits_are_stripped() {
        let digits: String = "12345-678".chars().filter(char::is_ascii_digit).collect();
        assert_eq!(digits, "12345678");
    }

    #[test]
    fn test_not_found_payload() {
        let address: CepAddress = serde_json::from_str(r#"{"erro": true}"#).unwrap();
        assert!(address.not_found);
    }

    #[test]
    fn test_found_payload() {
        let json = r#"{
            "logradouro": "Praça da Sé",
            "bairro": "Sé",
            "localidade": "São Paulo",
            "uf": "SP"
        }"#;
        let address: CepAddress = serde_json::from_str(json).unwrap();
        assert!(!address.not_found);
        assert_eq!(address.city, "São Paulo");
    }
}
