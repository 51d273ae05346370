//! Customer repository.

use chrono::{DateTime, Utc};
use sqlx::{PgConnection, PgPool};

use arycar_core::{Cpf, Customer, CustomerId, NewCustomer, NewVehicle, Phone, Vehicle};

use super::RepositoryError;
use super::vehicles::insert_vehicle;

#[derive(sqlx::FromRow)]
struct CustomerRow {
    id: CustomerId,
    name: String,
    cpf: String,
    phone: String,
    address: String,
    created_at: DateTime<Utc>,
}

impl TryFrom<CustomerRow> for Customer {
    type Error = RepositoryError;

    fn try_from(r: CustomerRow) -> Result<Self, Self::Error> {
        let cpf = Cpf::parse(&r.cpf).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid CPF in database: {e}"))
        })?;
        Ok(Self {
            id: r.id,
            name: r.name,
            cpf,
            phone: Phone::parse(&r.phone),
            address: r.address,
            created_at: r.created_at,
        })
    }
}

/// Repository for customer database operations.
pub struct CustomerRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> CustomerRepository<'a> {
    /// Create a new customer repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Insert a customer and their first vehicle in one transaction.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the CPF or the plate is
    /// already registered; nothing is stored in that case.
    pub async fn create_with_vehicle(
        &self,
        customer: &NewCustomer,
        vehicle: &NewVehicle,
    ) -> Result<(Customer, Vehicle), RepositoryError> {
        let mut tx = self.pool.begin().await?;
        let customer = insert_customer(&mut *tx, customer).await?;
        let vehicle = insert_vehicle(&mut *tx, customer.id, vehicle).await?;
        tx.commit().await?;
        Ok((customer, vehicle))
    }

    /// Get a customer by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_id(&self, id: CustomerId) -> Result<Option<Customer>, RepositoryError> {
        sqlx::query_as::<_, CustomerRow>(
            r"
            SELECT id, name, cpf, phone, address, created_at
            FROM arycar.customer
            WHERE id = $1
            ",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?
        .map(Customer::try_from)
        .transpose()
    }

    /// Find a customer by CPF.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn find_by_cpf(&self, cpf: &Cpf) -> Result<Option<Customer>, RepositoryError> {
        sqlx::query_as::<_, CustomerRow>(
            r"
            SELECT id, name, cpf, phone, address, created_at
            FROM arycar.customer
            WHERE cpf = $1
            ",
        )
        .bind(cpf.as_str())
        .fetch_optional(self.pool)
        .await?
        .map(Customer::try_from)
        .transpose()
    }
}

async fn insert_customer(
    conn: &mut PgConnection,
    customer: &NewCustomer,
) -> Result<Customer, RepositoryError> {
    let row = sqlx::query_as::<_, CustomerRow>(
        r"
        INSERT INTO arycar.customer (name, cpf, phone, address)
        VALUES ($1, $2, $3, $4)
        RETURNING id, name, cpf, phone, address, created_at
        ",
    )
    .bind(&customer.name)
    .bind(customer.cpf.as_str())
    .bind(customer.phone.as_str())
    .bind(&customer.address)
    .fetch_one(conn)
    .await
    .map_err(|e| RepositoryError::unique_or(e, "CPF already registered"))?;

    row.try_into()
}
