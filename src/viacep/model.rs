use serde::Deserialize;

use crate::format::normalize_state_code;
use crate::record::FormRecord;

/// Raw response body of the postal code service.
///
/// Only the consumed fields are declared; anything else in the payload is
/// ignored during deserialization.
#[derive(Debug, Default, Deserialize)]
pub struct CepPayload {
    /// Set by the service when the code has no match.
    #[serde(default)]
    pub erro: bool,
    pub logradouro: Option<String>,
    pub bairro: Option<String>,
    pub localidade: Option<String>,
    pub uf: Option<String>,
    pub complemento: Option<String>,
}

impl CepPayload {
    pub fn is_not_found(&self) -> bool {
        self.erro
    }

    /// Address parts of the payload. The service sends empty strings for
    /// parts it does not know, so those count as absent.
    pub fn into_address(self) -> CepAddress {
        CepAddress {
            street: present(self.logradouro),
            district: present(self.bairro),
            city: present(self.localidade),
            state: present(self.uf),
            complement: present(self.complemento),
        }
    }
}

fn present(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.is_empty())
}

/// A looked-up address, ready to be merged into the form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CepAddress {
    pub street: Option<String>,
    pub district: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub complement: Option<String>,
}

impl CepAddress {
    /// Merge the looked-up parts into the record.
    ///
    /// Street, district and city overwrite unconditionally. The state code
    /// is normalized before it lands. The complement only fills an empty
    /// field, so a value the user already typed survives. Returns whether
    /// anything was written.
    pub fn apply_to(&self, record: &mut FormRecord) -> bool {
        let mut filled = false;
        if let Some(street) = &self.street {
            record.address_line1 = street.clone();
            filled = true;
        }
        if let Some(district) = &self.district {
            record.district = district.clone();
            filled = true;
        }
        if let Some(city) = &self.city {
            record.city = city.clone();
            filled = true;
        }
        if let Some(state) = &self.state {
            record.state = normalize_state_code(state);
            filled = true;
        }
        if let Some(complement) = &self.complement {
            if record.address_complement.is_empty() {
                record.address_complement = complement.clone();
                filled = true;
            }
        }
        filled
    }
}
