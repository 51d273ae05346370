//! Service orders (OS, "ordem de serviço") and the queue board.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::cart::{self, Cart, CartError, CartItem};
use crate::customer::{Customer, Vehicle};
use crate::exclusions::ExclusionRules;
use crate::pricing::Service;
use crate::types::{CustomerId, Money, OrderId, OrderStatus, Plate, ServiceId};
use crate::vehicle::{VehicleSize, VehicleType};

/// Errors from order operations.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum OrderError {
    #[error("cannot create an order from an empty cart")]
    EmptyCart,
    #[error("vehicle {plate} does not belong to customer {customer}")]
    VehicleNotOwned { plate: Plate, customer: CustomerId },
    #[error("service {0} is already in the order")]
    AlreadyInOrder(ServiceId),
    #[error("order total {0} exceeds the maximum of R$ 9.999.999.999,99")]
    TotalTooLarge(Money),
    #[error(transparent)]
    Cart(#[from] CartError),
}

/// Largest total an order row can hold (`NUMERIC(12, 2)`).
fn max_total() -> Money {
    Money::from_centavos(999_999_999_999)
}

fn check_total(total: Money) -> Result<Money, OrderError> {
    if total > max_total() {
        return Err(OrderError::TotalTooLarge(total));
    }
    Ok(total)
}

/// An order ready to be stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewOrder {
    pub items: Vec<CartItem>,
    pub vehicle_type: VehicleType,
    pub size: VehicleSize,
    pub total: Money,
    pub status: OrderStatus,
    pub customer_id: CustomerId,
    pub customer_name: String,
    pub vehicle_plate: Plate,
    pub pickup_delivery: bool,
}

impl NewOrder {
    /// Finalize a cart for a customer's vehicle. The order starts out
    /// waiting, priced at the cart total.
    ///
    /// # Errors
    ///
    /// Returns [`OrderError::EmptyCart`] for an empty cart,
    /// [`OrderError::VehicleNotOwned`] when the vehicle belongs to someone
    /// else and [`OrderError::TotalTooLarge`] when the total cannot be
    /// stored.
    pub fn from_cart(
        cart: Cart,
        customer: &Customer,
        vehicle: &Vehicle,
        pickup_delivery: bool,
    ) -> Result<Self, OrderError> {
        if cart.is_empty() {
            return Err(OrderError::EmptyCart);
        }
        if vehicle.customer_id != customer.id {
            return Err(OrderError::VehicleNotOwned {
                plate: vehicle.plate.clone(),
                customer: customer.id,
            });
        }

        let total = check_total(cart.total())?;
        let (vehicle_type, size) = (cart.vehicle_type(), cart.size());
        Ok(Self {
            items: cart.into_items(),
            vehicle_type,
            size,
            total,
            status: OrderStatus::Waiting,
            customer_id: customer.id,
            customer_name: customer.name.clone(),
            vehicle_plate: vehicle.plate.clone(),
            pickup_delivery,
        })
    }
}

/// A stored service order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderSummary {
    pub id: OrderId,
    pub items: Vec<CartItem>,
    pub vehicle_type: VehicleType,
    pub size: VehicleSize,
    pub total: Money,
    pub status: OrderStatus,
    pub customer_id: CustomerId,
    pub customer_name: String,
    pub vehicle_plate: Plate,
    /// Pickup and delivery ("Leva e Traz") requested.
    pub pickup_delivery: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl OrderSummary {
    /// `OS #0042`
    #[must_use]
    pub fn short_code(&self) -> String {
        format!("OS #{}", self.id.short_code())
    }

    #[must_use]
    pub fn total_hours(&self) -> Decimal {
        cart::items_hours(&self.items)
    }

    #[must_use]
    pub fn service_ids(&self) -> Vec<ServiceId> {
        self.items.iter().map(|i| i.service_id).collect()
    }

    /// Add one unit of a service, priced for the order's vehicle type and
    /// size, and recompute the total.
    ///
    /// # Errors
    ///
    /// Returns [`OrderError::AlreadyInOrder`] if the service is present and
    /// [`OrderError::Cart`] if it is not offered for the vehicle type or an
    /// exclusion group blocks it. The order is unchanged on error.
    pub fn add_service(&mut self, service: &Service, rules: &ExclusionRules) -> Result<(), OrderError> {
        if self.items.iter().any(|i| i.service_id == service.id) {
            return Err(OrderError::AlreadyInOrder(service.id));
        }
        let item = cart::admit(&self.items, service, self.vehicle_type, self.size, rules)?;
        self.total = check_total(self.total + item.line_total())?;
        self.items.push(item);
        Ok(())
    }

    /// Drop a service's line and recompute the total. Returns whether a line
    /// was removed.
    pub fn remove_service(&mut self, service_id: ServiceId) -> bool {
        let before = self.items.len();
        self.items.retain(|i| i.service_id != service_id);
        self.total = cart::items_total(&self.items);
        self.items.len() != before
    }

    /// Catalog services that could still be added, with their exclusion
    /// state. Services already in the order or not offered for its vehicle
    /// type are left out.
    #[must_use]
    pub fn addable(&self, catalog: &[Service], rules: &ExclusionRules) -> Vec<ServiceOption> {
        let current = self.service_ids();
        service_options(catalog, self.vehicle_type, self.size, &current, rules)
            .into_iter()
            .filter(|opt| !current.contains(&opt.service_id))
            .collect()
    }
}

/// A catalog service as offered for one vehicle, with its selection state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceOption {
    pub service_id: ServiceId,
    pub name: String,
    pub price: Money,
    pub hours: Decimal,
    pub per_unit: bool,
    pub needs_scheduling: bool,
    pub price_rule: String,
    pub selected: bool,
    pub disabled: bool,
    pub reason: Option<String>,
}

/// Services offered for a vehicle type, priced for its size, flagged as
/// disabled when an exclusion group blocks them given `selected`.
#[must_use]
pub fn service_options(
    catalog: &[Service],
    vehicle_type: VehicleType,
    size: VehicleSize,
    selected: &[ServiceId],
    rules: &ExclusionRules,
) -> Vec<ServiceOption> {
    let disabled = rules.disabled_ids(selected);
    let name_of = |id: ServiceId| catalog.iter().find(|s| s.id == id).map(|s| s.name.clone());

    catalog
        .iter()
        .filter_map(|service| {
            let price = service.price(vehicle_type, size)?;
            Some(ServiceOption {
                service_id: service.id,
                name: service.name.clone(),
                price,
                hours: service.hours,
                per_unit: service.per_unit,
                needs_scheduling: service.needs_scheduling,
                price_rule: service.price_rule.clone(),
                selected: selected.contains(&service.id),
                disabled: disabled.contains(&service.id),
                reason: rules.exclusion_reason(service.id, selected, name_of),
            })
        })
        .collect()
}

/// Which orders the queue board shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusFilter {
    #[default]
    All,
    Only(OrderStatus),
}

impl StatusFilter {
    /// The status to filter on, if any.
    #[must_use]
    pub const fn status(self) -> Option<OrderStatus> {
        match self {
            Self::All => None,
            Self::Only(status) => Some(status),
        }
    }
}

impl FromStr for StatusFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "" | "all" => Ok(Self::All),
            other => other.parse().map(Self::Only),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::TimeZone;

    use super::*;
    use crate::pricing::tests::car_service;
    use crate::types::{Cpf, Phone, VehicleId};

    fn customer() -> Customer {
        Customer {
            id: CustomerId::new(3),
            name: "Maria".to_owned(),
            cpf: Cpf::parse("12345678901").unwrap(),
            phone: Phone::default(),
            address: String::new(),
            created_at: Utc::now(),
        }
    }

    fn vehicle(owner: i32) -> Vehicle {
        Vehicle {
            id: VehicleId::new(8),
            plate: Plate::parse("BRA2E19").unwrap(),
            vehicle_type: VehicleType::Carro,
            size: VehicleSize::P,
            brand: String::new(),
            model: String::new(),
            color: String::new(),
            year: String::new(),
            km: None,
            customer_id: CustomerId::new(owner),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn catalog() -> Vec<Service> {
        vec![
            car_service(1, "Lavagem Simples", 40, 50, 60),
            car_service(2, "Lavagem Detalhada", 90, 110, 130),
            car_service(5, "Aspiração", 30, 30, 30),
        ]
    }

    fn stored(new: NewOrder, id: i32) -> OrderSummary {
        let at = Utc.with_ymd_and_hms(2026, 3, 1, 9, 0, 0).unwrap();
        OrderSummary {
            id: OrderId::new(id),
            items: new.items,
            vehicle_type: new.vehicle_type,
            size: new.size,
            total: new.total,
            status: new.status,
            customer_id: new.customer_id,
            customer_name: new.customer_name,
            vehicle_plate: new.vehicle_plate,
            pickup_delivery: new.pickup_delivery,
            created_at: at,
            updated_at: at,
        }
    }

    fn order_with_simple_wash() -> OrderSummary {
        let services = catalog();
        let mut cart = Cart::new(VehicleType::Carro, VehicleSize::P);
        cart.add(&services[0], &ExclusionRules::default()).unwrap();
        stored(NewOrder::from_cart(cart, &customer(), &vehicle(3), true).unwrap(), 42)
    }

    #[test]
    fn test_from_cart() {
        let order = order_with_simple_wash();
        assert_eq!(order.status, OrderStatus::Waiting);
        assert_eq!(order.total, Money::from_centavos(4_000));
        assert_eq!(order.customer_name, "Maria");
        assert_eq!(order.vehicle_plate.as_str(), "BRA2E19");
        assert!(order.pickup_delivery);
        assert_eq!(order.short_code(), "OS #0042");
    }

    #[test]
    fn test_from_cart_refusals() {
        let empty = Cart::new(VehicleType::Carro, VehicleSize::P);
        assert_eq!(
            NewOrder::from_cart(empty, &customer(), &vehicle(3), false),
            Err(OrderError::EmptyCart)
        );

        let services = catalog();
        let mut cart = Cart::new(VehicleType::Carro, VehicleSize::P);
        cart.add(&services[0], &ExclusionRules::default()).unwrap();
        assert!(matches!(
            NewOrder::from_cart(cart, &customer(), &vehicle(99), false),
            Err(OrderError::VehicleNotOwned { .. })
        ));
    }

    #[test]
    fn test_add_and_remove_recompute_total() {
        let services = catalog();
        let rules = ExclusionRules::default();
        let mut order = order_with_simple_wash();

        order.add_service(&services[2], &rules).unwrap();
        assert_eq!(order.total, Money::from_centavos(7_000));
        assert_eq!(order.total_hours(), Decimal::from(2));

        assert_eq!(
            order.add_service(&services[2], &rules),
            Err(OrderError::AlreadyInOrder(ServiceId::new(5)))
        );
        assert!(matches!(
            order.add_service(&services[1], &rules),
            Err(OrderError::Cart(CartError::Excluded(_)))
        ));

        assert!(order.remove_service(ServiceId::new(1)));
        assert!(!order.remove_service(ServiceId::new(1)));
        assert_eq!(order.total, Money::from_centavos(3_000));
    }

    #[test]
    fn test_addable_flags_excluded_services() {
        let order = order_with_simple_wash();
        let options = order.addable(&catalog(), &ExclusionRules::default());
        let ids: Vec<_> = options.iter().map(|o| o.service_id).collect();
        assert_eq!(ids, vec![ServiceId::new(2), ServiceId::new(5)]);

        assert!(options[0].disabled);
        assert_eq!(
            options[0].reason.as_deref(),
            Some("Incompatível com \"Lavagem Simples\"")
        );
        assert!(!options[1].disabled);
        assert_eq!(options[1].reason, None);
    }

    #[test]
    fn test_total_must_fit_order_row() {
        let mut costly = car_service(9, "Vitrificação", 1, 1, 1);
        costly.per_unit = true;
        if let Some(p) = costly.pricing.get_mut(&VehicleType::Carro) {
            p.price_p = Money::from_centavos(9_999_999_999);
        }
        let rules = ExclusionRules::default();

        let mut cart = Cart::new(VehicleType::Carro, VehicleSize::P);
        cart.add(&costly, &rules).unwrap();
        cart.update_quantity(costly.id, 200).unwrap();
        assert!(matches!(
            NewOrder::from_cart(cart, &customer(), &vehicle(3), false),
            Err(OrderError::TotalTooLarge(_))
        ));

        let mut cart = Cart::new(VehicleType::Carro, VehicleSize::P);
        cart.add(&costly, &rules).unwrap();
        cart.update_quantity(costly.id, 100).unwrap();
        let mut order = stored(NewOrder::from_cart(cart, &customer(), &vehicle(3), false).unwrap(), 7);
        let before = order.clone();
        assert!(matches!(
            order.add_service(&catalog()[0], &rules),
            Err(OrderError::TotalTooLarge(_))
        ));
        assert_eq!(order, before);
    }

    #[test]
    fn test_status_filter_parse() {
        assert_eq!("all".parse::<StatusFilter>(), Ok(StatusFilter::All));
        assert_eq!(
            "in_progress".parse::<StatusFilter>(),
            Ok(StatusFilter::Only(OrderStatus::InProgress))
        );
        assert!("closed".parse::<StatusFilter>().is_err());
    }
}
