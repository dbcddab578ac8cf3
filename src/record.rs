use serde::Serialize;

/// The closed set of form field names, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    FirstName,
    LastName,
    Email,
    Phone,
    ZipCode,
    AddressLine1,
    AddressNumber,
    AddressComplement,
    District,
    City,
    State,
}

impl Field {
    pub const ALL: [Field; 11] = [
        Field::FirstName,
        Field::LastName,
        Field::Email,
        Field::Phone,
        Field::ZipCode,
        Field::AddressLine1,
        Field::AddressNumber,
        Field::AddressComplement,
        Field::District,
        Field::City,
        Field::State,
    ];

    /// Name the field carries in the persisted record.
    pub fn name(self) -> &'static str {
        match self {
            Field::FirstName => "first_name",
            Field::LastName => "last_name",
            Field::Email => "email",
            Field::Phone => "phone",
            Field::ZipCode => "zip_code",
            Field::AddressLine1 => "address_line1",
            Field::AddressNumber => "address_number",
            Field::AddressComplement => "address_complement",
            Field::District => "district",
            Field::City => "city",
            Field::State => "state",
        }
    }

    pub fn from_name(name: &str) -> Option<Field> {
        Field::ALL.into_iter().find(|field| field.name() == name)
    }
}

/// The full set of field values for one form instance.
///
/// Every value is a string and is present once the record exists; display
/// invariants (zip/phone masks, upper-cased two-letter state) are maintained
/// by the controller, not here.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FormRecord {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub zip_code: String,
    pub address_line1: String,
    pub address_number: String,
    pub address_complement: String,
    pub district: String,
    pub city: String,
    pub state: String,
}

impl FormRecord {
    pub fn get(&self, field: Field) -> &str {
        match field {
            Field::FirstName => &self.first_name,
            Field::LastName => &self.last_name,
            Field::Email => &self.email,
            Field::Phone => &self.phone,
            Field::ZipCode => &self.zip_code,
            Field::AddressLine1 => &self.address_line1,
            Field::AddressNumber => &self.address_number,
            Field::AddressComplement => &self.address_complement,
            Field::District => &self.district,
            Field::City => &self.city,
            Field::State => &self.state,
        }
    }

    pub fn set(&mut self, field: Field, value: impl Into<String>) {
        let value = value.into();
        match field {
            Field::FirstName => self.first_name = value,
            Field::LastName => self.last_name = value,
            Field::Email => self.email = value,
            Field::Phone => self.phone = value,
            Field::ZipCode => self.zip_code = value,
            Field::AddressLine1 => self.address_line1 = value,
            Field::AddressNumber => self.address_number = value,
            Field::AddressComplement => self.address_complement = value,
            Field::District => self.district = value,
            Field::City => self.city = value,
            Field::State => self.state = value,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_names_round_trip() {
        for field in Field::ALL {
            assert_eq!(Field::from_name(field.name()), Some(field));
        }
        assert_eq!(Field::from_name("zip"), None);
        assert_eq!(Field::from_name(""), None);
    }

    #[test]
    fn get_and_set_cover_every_field() {
        let mut record = FormRecord::default();
        for (idx, field) in Field::ALL.into_iter().enumerate() {
            record.set(field, format!("value-{idx}"));
        }
        for (idx, field) in Field::ALL.into_iter().enumerate() {
            assert_eq!(record.get(field), format!("value-{idx}"));
        }
    }

    #[test]
    fn serialized_keys_match_field_names() {
        let record = FormRecord::default();
        let value = serde_json::to_value(&record).unwrap();
        let object = value.as_object().unwrap();

        assert_eq!(object.len(), Field::ALL.len());
        for field in Field::ALL {
            assert!(object.contains_key(field.name()), "missing {}", field.name());
        }
    }
}
