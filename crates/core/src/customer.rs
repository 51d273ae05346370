//! Customers, their vehicles and the registration form that creates both.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{Cpf, CpfError, CustomerId, Km, Phone, Plate, PlateError, VehicleId};
use crate::vehicle::{VehicleSize, VehicleType};

/// A registered customer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
    pub id: CustomerId,
    pub name: String,
    pub cpf: Cpf,
    pub phone: Phone,
    /// Used for pickup and delivery ("Leva e Traz").
    pub address: String,
    pub created_at: DateTime<Utc>,
}

/// A vehicle, owned by exactly one customer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vehicle {
    pub id: VehicleId,
    pub plate: Plate,
    pub vehicle_type: VehicleType,
    pub size: VehicleSize,
    pub brand: String,
    pub model: String,
    pub color: String,
    pub year: String,
    /// Last odometer reading taken at check-in.
    pub km: Option<Km>,
    pub customer_id: CustomerId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A validated customer ready to insert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCustomer {
    pub name: String,
    pub cpf: Cpf,
    pub phone: Phone,
    pub address: String,
}

/// A validated vehicle ready to insert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewVehicle {
    pub plate: Plate,
    pub vehicle_type: VehicleType,
    pub size: VehicleSize,
    pub brand: String,
    pub model: String,
    pub color: String,
    pub year: String,
    pub km: Option<Km>,
}

/// Errors from validating a [`RegistrationForm`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistrationError {
    #[error("customer name is required")]
    MissingName,
    #[error(transparent)]
    Cpf(#[from] CpfError),
    #[error(transparent)]
    Plate(#[from] PlateError),
}

/// Raw registration input for a new customer and their first vehicle.
///
/// Masked input is accepted (`123.456.789-01`, `(11) 99999-8888`,
/// `abc-1d23`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistrationForm {
    pub name: String,
    pub cpf: String,
    pub phone: String,
    pub address: String,
    pub plate: String,
    pub vehicle_type: Option<VehicleType>,
    pub size: Option<VehicleSize>,
    pub brand: String,
    pub model: String,
    pub color: String,
    pub year: String,
    pub km: String,
}

impl RegistrationForm {
    /// Validate and normalize the form.
    ///
    /// Vehicle type defaults to car and size to medium. The km reading is
    /// optional here; it is required only when a returning vehicle checks in.
    ///
    /// # Errors
    ///
    /// Returns [`RegistrationError`] for a blank name, a CPF with fewer than
    /// 11 digits or an invalid plate, checked in that order.
    pub fn validate(&self) -> Result<(NewCustomer, NewVehicle), RegistrationError> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(RegistrationError::MissingName);
        }
        let cpf = Cpf::parse(&self.cpf)?;
        let plate = Plate::parse(&self.plate)?;

        let customer = NewCustomer {
            name: name.to_owned(),
            cpf,
            phone: Phone::parse(&self.phone),
            address: self.address.trim().to_owned(),
        };
        let vehicle = NewVehicle {
            plate,
            vehicle_type: self.vehicle_type.unwrap_or(VehicleType::Carro),
            size: self.size.unwrap_or(VehicleSize::M),
            brand: self.brand.trim().to_owned(),
            model: self.model.trim().to_owned(),
            color: self.color.trim().to_owned(),
            year: self.year.trim().to_owned(),
            km: Km::parse(&self.km).ok(),
        };
        Ok((customer, vehicle))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn form() -> RegistrationForm {
        RegistrationForm {
            name: "  João da Silva ".to_owned(),
            cpf: "123.456.789-01".to_owned(),
            phone: "(11) 99999-8888".to_owned(),
            plate: "abc-1d23".to_owned(),
            vehicle_type: Some(VehicleType::Moto),
            brand: " Honda ".to_owned(),
            ..RegistrationForm::default()
        }
    }

    #[test]
    fn test_validate_normalizes_fields() {
        let (customer, vehicle) = form().validate().unwrap();
        assert_eq!(customer.name, "João da Silva");
        assert_eq!(customer.cpf.as_str(), "12345678901");
        assert_eq!(customer.phone.as_str(), "11999998888");
        assert_eq!(vehicle.plate.as_str(), "ABC1D23");
        assert_eq!(vehicle.vehicle_type, VehicleType::Moto);
        assert_eq!(vehicle.size, VehicleSize::M);
        assert_eq!(vehicle.brand, "Honda");
        assert_eq!(vehicle.km, None);
    }

    #[test]
    fn test_validate_checks_in_order() {
        let blank = RegistrationForm {
            name: "   ".to_owned(),
            cpf: String::new(),
            ..form()
        };
        assert_eq!(blank.validate(), Err(RegistrationError::MissingName));

        let short_cpf = RegistrationForm {
            cpf: "123.456".to_owned(),
            ..form()
        };
        assert_eq!(
            short_cpf.validate(),
            Err(RegistrationError::Cpf(CpfError::TooShort(6)))
        );

        let bad_plate = RegistrationForm {
            plate: "ABC12".to_owned(),
            ..form()
        };
        assert!(matches!(
            bad_plate.validate(),
            Err(RegistrationError::Plate(_))
        ));
    }
}
