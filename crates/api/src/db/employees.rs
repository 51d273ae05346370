//! Employee repository.

use sqlx::PgPool;

use arycar_core::{Employee, EmployeeId, EmployeeInput};

use super::RepositoryError;

#[derive(sqlx::FromRow)]
struct EmployeeRow {
    id: EmployeeId,
    name: String,
    role: String,
}

impl From<EmployeeRow> for Employee {
    fn from(r: EmployeeRow) -> Self {
        Self {
            id: r.id,
            name: r.name,
            role: r.role,
        }
    }
}

/// Repository for staff records.
pub struct EmployeeRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> EmployeeRepository<'a> {
    /// Create a new employee repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List all employees by name.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self) -> Result<Vec<Employee>, RepositoryError> {
        let rows = sqlx::query_as::<_, EmployeeRow>(
            "SELECT id, name, role FROM arycar.employee ORDER BY name, id",
        )
        .fetch_all(self.pool)
        .await?;
        Ok(rows.into_iter().map(Employee::from).collect())
    }

    /// Insert an employee.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn create(&self, input: &EmployeeInput) -> Result<Employee, RepositoryError> {
        let row = sqlx::query_as::<_, EmployeeRow>(
            "INSERT INTO arycar.employee (name, role) VALUES ($1, $2) RETURNING id, name, role",
        )
        .bind(&input.name)
        .bind(&input.role)
        .fetch_one(self.pool)
        .await?;
        Ok(row.into())
    }

    /// Update an employee's name and role.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the employee does not exist.
    pub async fn update(
        &self,
        id: EmployeeId,
        input: &EmployeeInput,
    ) -> Result<Employee, RepositoryError> {
        let row = sqlx::query_as::<_, EmployeeRow>(
            r"
            UPDATE arycar.employee SET name = $2, role = $3
            WHERE id = $1
            RETURNING id, name, role
            ",
        )
        .bind(id)
        .bind(&input.name)
        .bind(&input.role)
        .fetch_optional(self.pool)
        .await?
        .ok_or(RepositoryError::NotFound)?;
        Ok(row.into())
    }

    /// Delete an employee.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the employee does not exist.
    pub async fn delete(&self, id: EmployeeId) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM arycar.employee WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }
}
