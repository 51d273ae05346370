//! Core value types for AryCar.
//!
//! This module provides type-safe wrappers for ids, documents, plates, money
//! and statuses.

pub mod document;
pub mod id;
pub mod money;
pub mod plate;
pub mod status;

pub use document::{Cpf, CpfError, Km, KmError, Phone, format_cpf, format_phone};
pub use id::*;
pub use money::Money;
pub use plate::{Plate, PlateError};
pub use status::*;
