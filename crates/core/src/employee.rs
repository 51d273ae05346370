//! Shop staff.

use serde::{Deserialize, Serialize};

use crate::types::EmployeeId;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Employee {
    pub id: EmployeeId,
    pub name: String,
    /// Free text, e.g. "Lavador" or "Polidor".
    pub role: String,
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum EmployeeError {
    #[error("employee name is required")]
    MissingName,
}

/// Fields for creating or updating an employee.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmployeeInput {
    pub name: String,
    #[serde(default)]
    pub role: String,
}

impl EmployeeInput {
    /// Trim both fields and require a name.
    ///
    /// # Errors
    ///
    /// Returns [`EmployeeError::MissingName`] when the name is blank.
    pub fn validated(self) -> Result<Self, EmployeeError> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(EmployeeError::MissingName);
        }
        Ok(Self {
            name: name.to_owned(),
            role: self.role.trim().to_owned(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validated() {
        let input = EmployeeInput {
            name: " Carlos ".to_owned(),
            role: " Polidor".to_owned(),
        };
        assert_eq!(
            input.validated(),
            Ok(EmployeeInput {
                name: "Carlos".to_owned(),
                role: "Polidor".to_owned(),
            })
        );
        assert_eq!(
            EmployeeInput::default().validated(),
            Err(EmployeeError::MissingName)
        );
    }
}
