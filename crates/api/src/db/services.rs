//! Service catalog repository: services, their price tables and the
//! exclusion groups.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use sqlx::{PgConnection, PgPool, Postgres, Transaction};

use arycar_core::{
    ExclusionRules, Money, Service, ServiceId, ServiceInput, SizePricing, VehicleType,
};

use super::RepositoryError;

#[derive(sqlx::FromRow)]
struct ServiceRow {
    id: ServiceId,
    name: String,
    hours: Decimal,
    needs_scheduling: bool,
    products: String,
    observation: String,
    price_rule: String,
    per_unit: bool,
}

#[derive(sqlx::FromRow)]
struct PriceRow {
    service_id: ServiceId,
    vehicle_type: VehicleType,
    cost_p: Money,
    cost_m: Money,
    cost_g: Money,
    price_p: Money,
    price_m: Money,
    price_g: Money,
}

impl PriceRow {
    const fn pricing(&self) -> SizePricing {
        SizePricing {
            cost_p: self.cost_p,
            cost_m: self.cost_m,
            cost_g: self.cost_g,
            price_p: self.price_p,
            price_m: self.price_m,
            price_g: self.price_g,
        }
    }
}

fn assemble(row: ServiceRow, prices: &[PriceRow]) -> Service {
    let pricing: BTreeMap<VehicleType, SizePricing> = prices
        .iter()
        .filter(|p| p.service_id == row.id)
        .map(|p| (p.vehicle_type, p.pricing()))
        .collect();
    Service {
        id: row.id,
        name: row.name,
        pricing,
        hours: row.hours,
        needs_scheduling: row.needs_scheduling,
        products: row.products,
        observation: row.observation,
        price_rule: row.price_rule,
        per_unit: row.per_unit,
    }
}

const SERVICE_COLUMNS: &str =
    "id, name, hours, needs_scheduling, products, observation, price_rule, per_unit";

const PRICE_COLUMNS: &str =
    "service_id, vehicle_type, cost_p, cost_m, cost_g, price_p, price_m, price_g";

/// Repository for the service catalog.
pub struct ServiceRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ServiceRepository<'a> {
    /// Create a new service repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List every service with its price table, ordered by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    pub async fn list(&self) -> Result<Vec<Service>, RepositoryError> {
        let services = sqlx::query_as::<_, ServiceRow>(&format!(
            "SELECT {SERVICE_COLUMNS} FROM arycar.service ORDER BY id"
        ))
        .fetch_all(self.pool)
        .await?;

        let prices = sqlx::query_as::<_, PriceRow>(&format!(
            "SELECT {PRICE_COLUMNS} FROM arycar.service_price ORDER BY service_id, vehicle_type"
        ))
        .fetch_all(self.pool)
        .await?;

        Ok(services
            .into_iter()
            .map(|row| assemble(row, &prices))
            .collect())
    }

    /// Get a service by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    pub async fn get(&self, id: ServiceId) -> Result<Option<Service>, RepositoryError> {
        let mut conn = self.pool.acquire().await?;
        fetch_service(&mut *conn, id).await
    }

    /// Insert a service and its price table.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    pub async fn create(&self, input: &ServiceInput) -> Result<Service, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let id: ServiceId = sqlx::query_scalar(
            r"
            INSERT INTO arycar.service
                (name, hours, needs_scheduling, products, observation, price_rule, per_unit)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id
            ",
        )
        .bind(&input.name)
        .bind(input.hours)
        .bind(input.needs_scheduling)
        .bind(&input.products)
        .bind(&input.observation)
        .bind(&input.price_rule)
        .bind(input.per_unit)
        .fetch_one(&mut *tx)
        .await?;

        insert_prices(&mut tx, id, input).await?;
        let service = fetch_service(&mut *tx, id)
            .await?
            .ok_or(RepositoryError::NotFound)?;
        tx.commit().await?;
        Ok(service)
    }

    /// Insert or replace a service under a fixed ID (catalog seeding).
    ///
    /// Bumps the ID sequence past `id` so later inserts do not collide.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    pub async fn upsert_with_id(
        &self,
        id: ServiceId,
        input: &ServiceInput,
    ) -> Result<Service, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r"
            INSERT INTO arycar.service
                (id, name, hours, needs_scheduling, products, observation, price_rule, per_unit)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            ON CONFLICT (id) DO UPDATE SET
                name = EXCLUDED.name,
                hours = EXCLUDED.hours,
                needs_scheduling = EXCLUDED.needs_scheduling,
                products = EXCLUDED.products,
                observation = EXCLUDED.observation,
                price_rule = EXCLUDED.price_rule,
                per_unit = EXCLUDED.per_unit,
                updated_at = NOW()
            ",
        )
        .bind(id)
        .bind(&input.name)
        .bind(input.hours)
        .bind(input.needs_scheduling)
        .bind(&input.products)
        .bind(&input.observation)
        .bind(&input.price_rule)
        .bind(input.per_unit)
        .execute(&mut *tx)
        .await?;

        replace_prices(&mut tx, id, input).await?;

        sqlx::query(
            r"
            SELECT setval(
                pg_get_serial_sequence('arycar.service', 'id'),
                GREATEST((SELECT MAX(id) FROM arycar.service), 1)
            )
            ",
        )
        .execute(&mut *tx)
        .await?;

        let service = fetch_service(&mut *tx, id)
            .await?
            .ok_or(RepositoryError::NotFound)?;
        tx.commit().await?;
        Ok(service)
    }

    /// Replace a service's fields and its whole price table.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the service does not exist.
    pub async fn update(
        &self,
        id: ServiceId,
        input: &ServiceInput,
    ) -> Result<Service, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let result = sqlx::query(
            r"
            UPDATE arycar.service SET
                name = $2,
                hours = $3,
                needs_scheduling = $4,
                products = $5,
                observation = $6,
                price_rule = $7,
                per_unit = $8,
                updated_at = NOW()
            WHERE id = $1
            ",
        )
        .bind(id)
        .bind(&input.name)
        .bind(input.hours)
        .bind(input.needs_scheduling)
        .bind(&input.products)
        .bind(&input.observation)
        .bind(&input.price_rule)
        .bind(input.per_unit)
        .execute(&mut *tx)
        .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        replace_prices(&mut tx, id, input).await?;
        let service = fetch_service(&mut *tx, id)
            .await?
            .ok_or(RepositoryError::NotFound)?;
        tx.commit().await?;
        Ok(service)
    }

    /// Delete a service. Its price rows go with it.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the service does not exist.
    pub async fn delete(&self, id: ServiceId) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM arycar.service WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    /// Delete every service (catalog reseeding).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn delete_all(&self) -> Result<u64, RepositoryError> {
        let result = sqlx::query("DELETE FROM arycar.service")
            .execute(self.pool)
            .await?;
        Ok(result.rows_affected())
    }

    /// Load the exclusion groups in force.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn exclusion_rules(&self) -> Result<ExclusionRules, RepositoryError> {
        let groups: Vec<Vec<i32>> =
            sqlx::query_scalar("SELECT service_ids FROM arycar.exclusion_group ORDER BY id")
                .fetch_all(self.pool)
                .await?;

        Ok(ExclusionRules::new(
            groups
                .into_iter()
                .map(|g| g.into_iter().map(ServiceId::new).collect())
                .collect(),
        ))
    }

    /// Replace all exclusion groups.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    pub async fn replace_exclusion_groups(
        &self,
        groups: &[(String, Vec<ServiceId>)],
    ) -> Result<(), RepositoryError> {
        let mut tx = self.pool.begin().await?;
        sqlx::query("DELETE FROM arycar.exclusion_group")
            .execute(&mut *tx)
            .await?;

        for (label, members) in groups {
            let ids: Vec<i32> = members.iter().map(ServiceId::as_i32).collect();
            sqlx::query("INSERT INTO arycar.exclusion_group (label, service_ids) VALUES ($1, $2)")
                .bind(label)
                .bind(&ids)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;
        Ok(())
    }
}

/// Load a service with its price table, as stored.
async fn fetch_service(
    conn: &mut PgConnection,
    id: ServiceId,
) -> Result<Option<Service>, RepositoryError> {
    let Some(row) = sqlx::query_as::<_, ServiceRow>(&format!(
        "SELECT {SERVICE_COLUMNS} FROM arycar.service WHERE id = $1"
    ))
    .bind(id)
    .fetch_optional(&mut *conn)
    .await?
    else {
        return Ok(None);
    };

    let prices = sqlx::query_as::<_, PriceRow>(&format!(
        "SELECT {PRICE_COLUMNS} FROM arycar.service_price WHERE service_id = $1"
    ))
    .bind(id)
    .fetch_all(&mut *conn)
    .await?;

    Ok(Some(assemble(row, &prices)))
}

async fn replace_prices(
    tx: &mut Transaction<'_, Postgres>,
    id: ServiceId,
    input: &ServiceInput,
) -> Result<(), RepositoryError> {
    sqlx::query("DELETE FROM arycar.service_price WHERE service_id = $1")
        .bind(id)
        .execute(&mut **tx)
        .await?;
    insert_prices(tx, id, input).await
}

async fn insert_prices(
    tx: &mut Transaction<'_, Postgres>,
    id: ServiceId,
    input: &ServiceInput,
) -> Result<(), RepositoryError> {
    for (vehicle_type, p) in &input.pricing {
        sqlx::query(
            r"
            INSERT INTO arycar.service_price
                (service_id, vehicle_type, cost_p, cost_m, cost_g, price_p, price_m, price_g)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            ",
        )
        .bind(id)
        .bind(*vehicle_type)
        .bind(p.cost_p)
        .bind(p.cost_m)
        .bind(p.cost_g)
        .bind(p.price_p)
        .bind(p.price_m)
        .bind(p.price_g)
        .execute(&mut **tx)
        .await?;
    }
    Ok(())
}
