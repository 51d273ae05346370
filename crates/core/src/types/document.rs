//! Customer documents and contact numbers: CPF, phone and odometer reading.
//!
//! All three are stored digits-only and formatted for display. The
//! `format_*` functions also accept partial input so a client can mask a
//! field while the user types.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Keep the ASCII digits of `input`, at most `max` of them.
fn digits(input: &str, max: usize) -> String {
    input.chars().filter(char::is_ascii_digit).take(max).collect()
}

/// Errors that can occur when parsing a [`Cpf`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum CpfError {
    /// Fewer than 11 digits.
    #[error("invalid CPF: expected 11 digits, got {0}")]
    TooShort(usize),
}

/// A CPF (Brazilian individual taxpayer number).
///
/// Only the digit count is checked; the check digits are not verified.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cpf(String);

impl Cpf {
    /// Number of digits in a CPF.
    pub const LEN: usize = 11;

    /// Parse a CPF from masked or unmasked input.
    ///
    /// # Errors
    ///
    /// Returns [`CpfError::TooShort`] if the input has fewer than 11 digits.
    pub fn parse(input: &str) -> Result<Self, CpfError> {
        let nums = digits(input, Self::LEN);
        if nums.len() < Self::LEN {
            return Err(CpfError::TooShort(nums.len()));
        }
        Ok(Self(nums))
    }

    /// The digits-only CPF.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// `000.000.000-00`
    #[must_use]
    pub fn formatted(&self) -> String {
        format_cpf(&self.0)
    }
}

impl fmt::Display for Cpf {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.formatted())
    }
}

/// Mask (possibly partial) CPF input as `000.000.000-00`.
///
/// ```
/// use arycar_core::format_cpf;
///
/// assert_eq!(format_cpf("123"), "123");
/// assert_eq!(format_cpf("12345"), "123.45");
/// assert_eq!(format_cpf("123.456.789-0"), "123.456.789-0");
/// assert_eq!(format_cpf("12345678901999"), "123.456.789-01");
/// ```
#[must_use]
pub fn format_cpf(input: &str) -> String {
    let nums = digits(input, Cpf::LEN);
    let part = |from: usize, to: usize| nums.get(from..to.min(nums.len())).unwrap_or("");
    match nums.len() {
        0..=3 => nums.clone(),
        4..=6 => format!("{}.{}", part(0, 3), part(3, 6)),
        7..=9 => format!("{}.{}.{}", part(0, 3), part(3, 6), part(6, 9)),
        _ => format!(
            "{}.{}.{}-{}",
            part(0, 3),
            part(3, 6),
            part(6, 9),
            part(9, 11)
        ),
    }
}

/// A phone number, digits only (area code + number, at most 11 digits).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(transparent)]
pub struct Phone(String);

impl Phone {
    /// Maximum number of digits (2-digit area code + 9-digit mobile number).
    pub const MAX_LEN: usize = 11;

    /// Keep the digits of `input`. Phone is optional on registration, so an
    /// empty result is allowed.
    #[must_use]
    pub fn parse(input: &str) -> Self {
        Self(digits(input, Self::MAX_LEN))
    }

    /// The digits-only phone number.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// `true` when no digits were given.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for Phone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&format_phone(&self.0))
    }
}

/// Mask (possibly partial) phone input as `(11) 99999-9999`.
///
/// ```
/// use arycar_core::format_phone;
///
/// assert_eq!(format_phone("1"), "(1");
/// assert_eq!(format_phone("11999"), "(11) 999");
/// assert_eq!(format_phone("11999998888"), "(11) 99999-8888");
/// ```
#[must_use]
pub fn format_phone(input: &str) -> String {
    let nums = digits(input, Phone::MAX_LEN);
    let part = |from: usize, to: usize| nums.get(from..to.min(nums.len())).unwrap_or("");
    match nums.len() {
        0..=2 => format!("({nums}"),
        3..=7 => format!("({}) {}", part(0, 2), part(2, 7)),
        _ => format!("({}) {}-{}", part(0, 2), part(2, 7), part(7, 11)),
    }
}

/// Odometer reading, digits only.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Km(String);

/// Errors that can occur when parsing a [`Km`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum KmError {
    /// No digits in the input.
    #[error("current km is required")]
    Missing,
}

impl Km {
    /// Keep the digits of `input`.
    ///
    /// # Errors
    ///
    /// Returns [`KmError::Missing`] when the input has no digits.
    pub fn parse(input: &str) -> Result<Self, KmError> {
        let nums: String = input.chars().filter(char::is_ascii_digit).collect();
        if nums.is_empty() {
            return Err(KmError::Missing);
        }
        Ok(Self(nums))
    }

    /// The reading as a string of digits.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Km {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
