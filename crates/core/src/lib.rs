//! AryCar Core - domain types and rules for the car-wash order service.
//!
//! This crate is shared by:
//! - `api` - the JSON HTTP service
//! - `cli` - command-line tools for migrations, seeding and the queue
//!
//! # Architecture
//!
//! The core crate contains only types and rules - no I/O, no database access,
//! no HTTP clients. The optional `postgres` feature adds `sqlx` encodings for
//! ids, money, plates and enums so the API can bind them directly.
//!
//! # Modules
//!
//! - [`types`] - ids, plates, CPF/phone/km, money and statuses
//! - [`vehicle`] - vehicle type and size, and their inference from plate lookups
//! - [`pricing`] - services and their per-type, per-size price tables
//! - [`exclusions`] - mutually exclusive service groups
//! - [`cart`] - the intake cart
//! - [`order`] - service orders and the queue board
//! - [`customer`] - customers, vehicles and registration
//! - [`checklist`] - entry/exit inspection sheets
//! - [`employee`] - shop staff

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod checklist;
pub mod customer;
pub mod employee;
pub mod exclusions;
pub mod order;
pub mod pricing;
pub mod types;
pub mod vehicle;

pub use cart::{Cart, CartError, CartItem, MAX_QUANTITY, check_quantity};
pub use checklist::{
    CHECKLIST_ITEMS, Checklist, ChecklistCategory, ChecklistError, ChecklistItemDef, ItemState,
    SavedChecklist,
};
pub use customer::{Customer, NewCustomer, NewVehicle, RegistrationError, RegistrationForm, Vehicle};
pub use employee::{Employee, EmployeeError, EmployeeInput};
pub use exclusions::ExclusionRules;
pub use order::{
    NewOrder, OrderError, OrderSummary, ServiceOption, StatusFilter, service_options,
};
pub use pricing::{Service, ServiceError, ServiceInput, SizePricing, margin_percent};
pub use types::*;
pub use vehicle::{VehicleSize, VehicleType};
