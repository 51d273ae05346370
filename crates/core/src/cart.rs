//! The service cart built during intake.
//!
//! A cart belongs to one vehicle type and size; every line snapshots the
//! service's name, hours and unit price for that type and size at the time it
//! was added, so later catalog edits do not change a quote already shown to
//! the customer.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::exclusions::ExclusionRules;
use crate::pricing::Service;
use crate::types::{Money, ServiceId};
use crate::vehicle::{VehicleSize, VehicleType};

/// Largest quantity a single line can carry.
pub const MAX_QUANTITY: u32 = 999;

/// Errors from cart operations.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum CartError {
    /// The service has no price row for the cart's vehicle type.
    #[error("service {name:?} is not offered for {vehicle_type}")]
    Unavailable {
        name: String,
        vehicle_type: VehicleType,
    },
    /// An exclusion group blocks the service.
    #[error("{0}")]
    Excluded(String),
    #[error("quantity must be between 1 and 999 (got {0})")]
    InvalidQuantity(u32),
    #[error("service {0} is not in the cart")]
    NotInCart(ServiceId),
    #[error("service {0} does not exist")]
    UnknownService(ServiceId),
}

/// One line of a cart or order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartItem {
    pub service_id: ServiceId,
    pub name: String,
    pub hours: Decimal,
    pub per_unit: bool,
    pub quantity: u32,
    pub vehicle_type: VehicleType,
    pub size: VehicleSize,
    pub unit_price: Money,
}

impl CartItem {
    /// Snapshot `service` priced for a type and size, or `None` when the
    /// service is not offered for that type.
    #[must_use]
    pub fn snapshot(service: &Service, vehicle_type: VehicleType, size: VehicleSize) -> Option<Self> {
        let unit_price = service.price(vehicle_type, size)?;
        Some(Self {
            service_id: service.id,
            name: service.name.clone(),
            hours: service.hours,
            per_unit: service.per_unit,
            quantity: 1,
            vehicle_type,
            size,
            unit_price,
        })
    }

    #[must_use]
    pub fn line_total(&self) -> Money {
        self.unit_price * self.quantity
    }

    #[must_use]
    pub fn line_hours(&self) -> Decimal {
        self.hours * Decimal::from(self.quantity)
    }
}

/// Check a requested line quantity.
///
/// # Errors
///
/// Returns [`CartError::InvalidQuantity`] outside `1..=MAX_QUANTITY`.
pub const fn check_quantity(quantity: u32) -> Result<u32, CartError> {
    if quantity < 1 || quantity > MAX_QUANTITY {
        return Err(CartError::InvalidQuantity(quantity));
    }
    Ok(quantity)
}

/// Sum of line totals.
pub fn items_total(items: &[CartItem]) -> Money {
    items.iter().map(CartItem::line_total).sum()
}

/// Sum of line hours.
pub fn items_hours(items: &[CartItem]) -> Decimal {
    items.iter().map(CartItem::line_hours).sum()
}

/// Check that `service` can join `items` for the given vehicle and snapshot
/// it. Shared by carts and open orders.
pub(crate) fn admit(
    items: &[CartItem],
    service: &Service,
    vehicle_type: VehicleType,
    size: VehicleSize,
    rules: &ExclusionRules,
) -> Result<CartItem, CartError> {
    let item = CartItem::snapshot(service, vehicle_type, size).ok_or_else(|| {
        CartError::Unavailable {
            name: service.name.clone(),
            vehicle_type,
        }
    })?;

    let selected: Vec<ServiceId> = items.iter().map(|i| i.service_id).collect();
    let reason = rules.exclusion_reason(service.id, &selected, |id| {
        items
            .iter()
            .find(|i| i.service_id == id)
            .map(|i| i.name.clone())
    });
    match reason {
        Some(reason) => Err(CartError::Excluded(reason)),
        None => Ok(item),
    }
}

/// Services selected for one vehicle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cart {
    vehicle_type: VehicleType,
    size: VehicleSize,
    items: Vec<CartItem>,
}

impl Cart {
    #[must_use]
    pub const fn new(vehicle_type: VehicleType, size: VehicleSize) -> Self {
        Self {
            vehicle_type,
            size,
            items: Vec::new(),
        }
    }

    /// Rebuild a cart from `(service, quantity)` pairs against the catalog,
    /// applying the same checks as interactive adds.
    ///
    /// Repeated services are merged into one line whose quantity is the sum
    /// of the requested ones.
    ///
    /// # Errors
    ///
    /// Returns [`CartError`] for unknown services, services not offered for
    /// the vehicle type, excluded combinations and quantities outside
    /// `1..=MAX_QUANTITY`.
    pub fn from_lines(
        vehicle_type: VehicleType,
        size: VehicleSize,
        lines: &[(ServiceId, u32)],
        catalog: &[Service],
        rules: &ExclusionRules,
    ) -> Result<Self, CartError> {
        let mut merged: Vec<(ServiceId, u32)> = Vec::with_capacity(lines.len());
        for &(service_id, quantity) in lines {
            check_quantity(quantity)?;
            match merged.iter_mut().find(|(id, _)| *id == service_id) {
                Some((_, total)) => *total = total.saturating_add(quantity),
                None => merged.push((service_id, quantity)),
            }
        }

        let mut cart = Self::new(vehicle_type, size);
        for (service_id, quantity) in merged {
            let service = catalog
                .iter()
                .find(|s| s.id == service_id)
                .ok_or(CartError::UnknownService(service_id))?;
            check_quantity(quantity)?;
            cart.add(service, rules)?;
            cart.update_quantity(service_id, quantity)?;
        }
        Ok(cart)
    }

    #[must_use]
    pub const fn vehicle_type(&self) -> VehicleType {
        self.vehicle_type
    }

    #[must_use]
    pub const fn size(&self) -> VehicleSize {
        self.size
    }

    #[must_use]
    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Add a service.
    ///
    /// Adding a service that is already in the cart increments its quantity
    /// when it is sold per unit and does nothing otherwise.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::Unavailable`] when the service has no price for
    /// the cart's vehicle type, [`CartError::Excluded`] when another
    /// selected service is in the same exclusion group and
    /// [`CartError::InvalidQuantity`] when the line is already at
    /// [`MAX_QUANTITY`].
    pub fn add(&mut self, service: &Service, rules: &ExclusionRules) -> Result<(), CartError> {
        if let Some(existing) = self.items.iter_mut().find(|i| i.service_id == service.id) {
            if existing.per_unit {
                existing.quantity = check_quantity(existing.quantity.saturating_add(1))?;
            }
            return Ok(());
        }

        let item = admit(&self.items, service, self.vehicle_type, self.size, rules)?;
        self.items.push(item);
        Ok(())
    }

    /// Remove a service's line. Absent services are ignored.
    pub fn remove(&mut self, service_id: ServiceId) {
        self.items.retain(|i| i.service_id != service_id);
    }

    /// Set a line's quantity.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::InvalidQuantity`] outside `1..=MAX_QUANTITY`,
    /// leaving the cart unchanged, and [`CartError::NotInCart`] for an
    /// absent service.
    pub fn update_quantity(&mut self, service_id: ServiceId, quantity: u32) -> Result<(), CartError> {
        check_quantity(quantity)?;
        let item = self
            .items
            .iter_mut()
            .find(|i| i.service_id == service_id)
            .ok_or(CartError::NotInCart(service_id))?;
        item.quantity = quantity;
        Ok(())
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    #[must_use]
    pub fn total(&self) -> Money {
        items_total(&self.items)
    }

    #[must_use]
    pub fn total_hours(&self) -> Decimal {
        items_hours(&self.items)
    }

    #[must_use]
    pub fn service_ids(&self) -> Vec<ServiceId> {
        self.items.iter().map(|i| i.service_id).collect()
    }

    /// Give up the lines, e.g. when finalizing an order.
    #[must_use]
    pub fn into_items(self) -> Vec<CartItem> {
        self.items
    }
}
