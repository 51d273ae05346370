//! Service catalog entries and their price tables.
//!
//! A service is priced per vehicle type, and within a type per size. A
//! service with no row for a vehicle type is not offered for that type.

use std::collections::BTreeMap;

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use crate::types::{Money, ServiceId};
use crate::vehicle::{VehicleSize, VehicleType};

/// Cost and sale price for each size, for one vehicle type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SizePricing {
    pub cost_p: Money,
    pub cost_m: Money,
    pub cost_g: Money,
    pub price_p: Money,
    pub price_m: Money,
    pub price_g: Money,
}

impl SizePricing {
    /// Sale price for a size.
    #[must_use]
    pub const fn price(&self, size: VehicleSize) -> Money {
        match size {
            VehicleSize::P => self.price_p,
            VehicleSize::M => self.price_m,
            VehicleSize::G => self.price_g,
        }
    }

    /// Shop cost for a size.
    #[must_use]
    pub const fn cost(&self, size: VehicleSize) -> Money {
        match size {
            VehicleSize::P => self.cost_p,
            VehicleSize::M => self.cost_m,
            VehicleSize::G => self.cost_g,
        }
    }

    fn has_negative(&self) -> bool {
        [
            self.cost_p,
            self.cost_m,
            self.cost_g,
            self.price_p,
            self.price_m,
            self.price_g,
        ]
        .iter()
        .any(Money::is_negative)
    }

    fn exceeds_column(&self) -> bool {
        let max = max_price();
        [
            self.cost_p,
            self.cost_m,
            self.cost_g,
            self.price_p,
            self.price_m,
            self.price_g,
        ]
        .iter()
        .any(|m| !fits_numeric(m.amount(), max))
    }
}

/// Largest price or cost a catalog row can hold (`NUMERIC(10, 2)`).
fn max_price() -> Decimal {
    Decimal::new(9_999_999_999, 2)
}

/// Largest hours value a catalog row can hold (`NUMERIC(6, 2)`).
fn max_hours() -> Decimal {
    Decimal::new(999_999, 2)
}

/// Whether `value` is at most `max` with at most two decimal places.
fn fits_numeric(value: Decimal, max: Decimal) -> bool {
    value <= max && value.normalize().scale() <= 2
}

/// Gross margin as a whole percentage, `None` when the price is zero.
///
/// ```
/// use arycar_core::{Money, margin_percent};
///
/// assert_eq!(margin_percent(Money::from_centavos(3_000), Money::from_centavos(10_000)), Some(70));
/// assert_eq!(margin_percent(Money::from_centavos(3_000), Money::ZERO), None);
/// ```
#[must_use]
pub fn margin_percent(cost: Money, price: Money) -> Option<i64> {
    if price.is_zero() {
        return None;
    }
    let pct = (price.amount() - cost.amount()) / price.amount() * Decimal::ONE_HUNDRED;
    pct.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_i64()
}

/// A service offered by the shop.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Service {
    pub id: ServiceId,
    pub name: String,
    /// Price table per vehicle type. Absent types are not offered.
    pub pricing: BTreeMap<VehicleType, SizePricing>,
    /// Expected labor hours per unit.
    pub hours: Decimal,
    /// Must be booked ahead instead of done on walk-in.
    pub needs_scheduling: bool,
    /// Products used, free text.
    pub products: String,
    pub observation: String,
    /// Free-text pricing note shown next to the price (e.g. "a partir de").
    pub price_rule: String,
    /// Sold per unit (e.g. per seat); adding it again increments quantity.
    pub per_unit: bool,
}

impl Service {
    /// Whether the service is offered for a vehicle type.
    #[must_use]
    pub fn is_available_for(&self, vehicle_type: VehicleType) -> bool {
        self.pricing.contains_key(&vehicle_type)
    }

    /// Sale price for a vehicle type and size.
    #[must_use]
    pub fn price(&self, vehicle_type: VehicleType, size: VehicleSize) -> Option<Money> {
        self.pricing.get(&vehicle_type).map(|p| p.price(size))
    }

    /// Shop cost for a vehicle type and size.
    #[must_use]
    pub fn cost(&self, vehicle_type: VehicleType, size: VehicleSize) -> Option<Money> {
        self.pricing.get(&vehicle_type).map(|p| p.cost(size))
    }

    /// Vehicle types the service is offered for.
    pub fn vehicle_types(&self) -> impl Iterator<Item = VehicleType> + '_ {
        self.pricing.keys().copied()
    }
}

/// Errors from validating a [`ServiceInput`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ServiceError {
    #[error("service name is required")]
    MissingName,
    #[error("hours cannot be negative")]
    NegativeHours,
    #[error("hours must be at most 9999.99 with at most 2 decimal places")]
    HoursOutOfRange,
    #[error("prices and costs cannot be negative ({0})")]
    NegativePrice(VehicleType),
    #[error("prices and costs must be at most 99999999.99 with at most 2 decimal places ({0})")]
    PriceOutOfRange(VehicleType),
    #[error("service must be offered for at least one vehicle type")]
    NoPricing,
}

/// Fields for creating or replacing a service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceInput {
    pub name: String,
    pub pricing: BTreeMap<VehicleType, SizePricing>,
    #[serde(default = "default_hours")]
    pub hours: Decimal,
    #[serde(default)]
    pub needs_scheduling: bool,
    #[serde(default)]
    pub products: String,
    #[serde(default)]
    pub observation: String,
    #[serde(default)]
    pub price_rule: String,
    #[serde(default)]
    pub per_unit: bool,
}

fn default_hours() -> Decimal {
    Decimal::ONE
}

impl ServiceInput {
    /// Trim text fields and check the input.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError`] for an empty name, negative hours or prices,
    /// values too large or too precise to store, or an empty price table.
    pub fn validated(mut self) -> Result<Self, ServiceError> {
        self.name = self.name.trim().to_owned();
        if self.name.is_empty() {
            return Err(ServiceError::MissingName);
        }
        if self.hours.is_sign_negative() && !self.hours.is_zero() {
            return Err(ServiceError::NegativeHours);
        }
        if !fits_numeric(self.hours, max_hours()) {
            return Err(ServiceError::HoursOutOfRange);
        }
        if self.pricing.is_empty() {
            return Err(ServiceError::NoPricing);
        }
        if let Some((vt, _)) = self.pricing.iter().find(|(_, p)| p.has_negative()) {
            return Err(ServiceError::NegativePrice(*vt));
        }
        if let Some((vt, _)) = self.pricing.iter().find(|(_, p)| p.exceeds_column()) {
            return Err(ServiceError::PriceOutOfRange(*vt));
        }
        self.products = self.products.trim().to_owned();
        self.observation = self.observation.trim().to_owned();
        self.price_rule = self.price_rule.trim().to_owned();
        Ok(self)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Flat pricing helper: costs are 40% of the price.
    pub(crate) fn pricing(p: i64, m: i64, g: i64) -> SizePricing {
        SizePricing {
            cost_p: Money::from_centavos(p * 40),
            cost_m: Money::from_centavos(m * 40),
            cost_g: Money::from_centavos(g * 40),
            price_p: Money::from_centavos(p * 100),
            price_m: Money::from_centavos(m * 100),
            price_g: Money::from_centavos(g * 100),
        }
    }

    /// A car-only service priced in whole reais.
    pub(crate) fn car_service(id: i32, name: &str, p: i64, m: i64, g: i64) -> Service {
        Service {
            id: ServiceId::new(id),
            name: name.to_owned(),
            pricing: BTreeMap::from([(VehicleType::Carro, pricing(p, m, g))]),
            hours: Decimal::ONE,
            needs_scheduling: false,
            products: String::new(),
            observation: String::new(),
            price_rule: String::new(),
            per_unit: false,
        }
    }

    #[test]
    fn test_price_by_type_and_size() {
        let wash = car_service(1, "Lavagem Simples", 40, 50, 60);
        assert_eq!(
            wash.price(VehicleType::Carro, VehicleSize::P),
            Some(Money::from_centavos(4_000))
        );
        assert_eq!(
            wash.price(VehicleType::Carro, VehicleSize::G),
            Some(Money::from_centavos(6_000))
        );
        assert_eq!(
            wash.cost(VehicleType::Carro, VehicleSize::M),
            Some(Money::from_centavos(2_000))
        );
        assert_eq!(wash.price(VehicleType::Moto, VehicleSize::P), None);
        assert!(!wash.is_available_for(VehicleType::Caminhao));
    }

    #[test]
    fn test_margin() {
        assert_eq!(
            margin_percent(Money::from_centavos(2_000), Money::from_centavos(5_000)),
            Some(60)
        );
        assert_eq!(
            margin_percent(Money::from_centavos(1_000), Money::from_centavos(3_000)),
            Some(67)
        );
        assert_eq!(
            margin_percent(Money::from_centavos(6_000), Money::from_centavos(5_000)),
            Some(-20)
        );
        assert_eq!(margin_percent(Money::ZERO, Money::ZERO), None);
    }

    #[test]
    fn test_input_validation() {
        let input = ServiceInput {
            name: "  Vitrificação  ".to_owned(),
            pricing: BTreeMap::from([(VehicleType::Carro, pricing(500, 600, 700))]),
            hours: Decimal::from(8),
            needs_scheduling: true,
            products: String::new(),
            observation: String::new(),
            price_rule: String::new(),
            per_unit: false,
        };
        let ok = input.clone().validated();
        assert_eq!(ok.map(|i| i.name), Ok("Vitrificação".to_owned()));

        let blank = ServiceInput {
            name: "   ".to_owned(),
            ..input.clone()
        };
        assert_eq!(blank.validated(), Err(ServiceError::MissingName));

        let unpriced = ServiceInput {
            pricing: BTreeMap::new(),
            ..input.clone()
        };
        assert_eq!(unpriced.validated(), Err(ServiceError::NoPricing));

        let mut negative = pricing(10, 10, 10);
        negative.price_g = Money::from_centavos(-1);
        let bad = ServiceInput {
            pricing: BTreeMap::from([(VehicleType::Moto, negative)]),
            ..input
        };
        assert_eq!(
            bad.validated(),
            Err(ServiceError::NegativePrice(VehicleType::Moto))
        );
    }

    #[test]
    fn test_input_must_fit_catalog_columns() {
        let input = ServiceInput {
            name: "Vitrificação".to_owned(),
            pricing: BTreeMap::from([(VehicleType::Carro, pricing(500, 600, 700))]),
            hours: Decimal::from(8),
            needs_scheduling: false,
            products: String::new(),
            observation: String::new(),
            price_rule: String::new(),
            per_unit: false,
        };

        let mut largest = pricing(10, 10, 10);
        largest.price_g = Money::from_centavos(9_999_999_999);
        let at_limit = ServiceInput {
            pricing: BTreeMap::from([(VehicleType::Carro, largest)]),
            ..input.clone()
        };
        assert!(at_limit.validated().is_ok());

        let mut huge = pricing(10, 10, 10);
        huge.price_m = Money::from_centavos(100_000_000_000);
        let too_large = ServiceInput {
            pricing: BTreeMap::from([(VehicleType::Caminhao, huge)]),
            ..input.clone()
        };
        assert_eq!(
            too_large.validated(),
            Err(ServiceError::PriceOutOfRange(VehicleType::Caminhao))
        );

        let mut fractional = pricing(10, 10, 10);
        fractional.cost_p = Money::new(Decimal::new(10_005, 3));
        let too_precise = ServiceInput {
            pricing: BTreeMap::from([(VehicleType::Carro, fractional)]),
            ..input.clone()
        };
        assert_eq!(
            too_precise.validated(),
            Err(ServiceError::PriceOutOfRange(VehicleType::Carro))
        );

        // trailing zeros are not extra precision
        let mut padded = pricing(10, 10, 10);
        padded.price_p = Money::new(Decimal::new(10_500, 3));
        let padded = ServiceInput {
            pricing: BTreeMap::from([(VehicleType::Carro, padded)]),
            ..input.clone()
        };
        assert!(padded.validated().is_ok());

        let long_job = ServiceInput {
            hours: Decimal::from(10_000),
            ..input
        };
        assert_eq!(long_job.validated(), Err(ServiceError::HoursOutOfRange));
    }

    #[test]
    fn test_pricing_serializes_keyed_by_type() {
        let wash = car_service(1, "Lavagem Simples", 40, 50, 60);
        let json = serde_json::to_value(&wash).unwrap_or_default();
        assert_eq!(json["pricing"]["carro"]["price_m"], "50.00");
    }
}
