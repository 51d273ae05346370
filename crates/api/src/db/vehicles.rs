//! Vehicle repository.

use chrono::{DateTime, Utc};
use sqlx::{PgConnection, PgPool};

use arycar_core::{CustomerId, Km, NewVehicle, Plate, Vehicle, VehicleId, VehicleSize, VehicleType};

use super::RepositoryError;

const VEHICLE_COLUMNS: &str = "id, plate, vehicle_type, size, brand, model, color, year, km, \
                               customer_id, created_at, updated_at";

#[derive(sqlx::FromRow)]
struct VehicleRow {
    id: VehicleId,
    plate: Plate,
    vehicle_type: VehicleType,
    size: VehicleSize,
    brand: String,
    model: String,
    color: String,
    year: String,
    km: Option<String>,
    customer_id: CustomerId,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<VehicleRow> for Vehicle {
    fn from(r: VehicleRow) -> Self {
        Self {
            id: r.id,
            plate: r.plate,
            vehicle_type: r.vehicle_type,
            size: r.size,
            brand: r.brand,
            model: r.model,
            color: r.color,
            year: r.year,
            km: r.km.as_deref().and_then(|km| Km::parse(km).ok()),
            customer_id: r.customer_id,
            created_at: r.created_at,
            updated_at: r.updated_at,
        }
    }
}

/// Repository for vehicle database operations.
pub struct VehicleRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> VehicleRepository<'a> {
    /// Create a new vehicle repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Insert a vehicle for a customer.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the plate is already registered.
    pub async fn create(
        &self,
        customer_id: CustomerId,
        vehicle: &NewVehicle,
    ) -> Result<Vehicle, RepositoryError> {
        let mut conn = self.pool.acquire().await?;
        insert_vehicle(&mut *conn, customer_id, vehicle).await
    }

    /// Get a vehicle by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_id(&self, id: VehicleId) -> Result<Option<Vehicle>, RepositoryError> {
        let sql = format!("SELECT {VEHICLE_COLUMNS} FROM arycar.vehicle WHERE id = $1");
        let row = sqlx::query_as::<_, VehicleRow>(&sql)
            .bind(id)
            .fetch_optional(self.pool)
            .await?;
        Ok(row.map(Vehicle::from))
    }

    /// Find a vehicle by plate.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn find_by_plate(&self, plate: &Plate) -> Result<Option<Vehicle>, RepositoryError> {
        let sql = format!("SELECT {VEHICLE_COLUMNS} FROM arycar.vehicle WHERE plate = $1");
        let row = sqlx::query_as::<_, VehicleRow>(&sql)
            .bind(plate)
            .fetch_optional(self.pool)
            .await?;
        Ok(row.map(Vehicle::from))
    }

    /// List a customer's vehicles, oldest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_by_customer(
        &self,
        customer_id: CustomerId,
    ) -> Result<Vec<Vehicle>, RepositoryError> {
        let sql = format!(
            "SELECT {VEHICLE_COLUMNS} FROM arycar.vehicle WHERE customer_id = $1 ORDER BY id"
        );
        let rows = sqlx::query_as::<_, VehicleRow>(&sql)
            .bind(customer_id)
            .fetch_all(self.pool)
            .await?;
        Ok(rows.into_iter().map(Vehicle::from).collect())
    }

    /// Record the current odometer reading.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the vehicle does not exist.
    pub async fn update_km(&self, id: VehicleId, km: &Km) -> Result<Vehicle, RepositoryError> {
        let sql = format!(
            r"
            UPDATE arycar.vehicle
            SET km = $2, updated_at = NOW()
            WHERE id = $1
            RETURNING {VEHICLE_COLUMNS}
            "
        );
        let row = sqlx::query_as::<_, VehicleRow>(&sql)
            .bind(id)
            .bind(km.as_str())
            .fetch_optional(self.pool)
            .await?
            .ok_or(RepositoryError::NotFound)?;
        Ok(row.into())
    }
}

/// Insert a vehicle on an open connection, usually inside a transaction.
pub(super) async fn insert_vehicle(
    conn: &mut PgConnection,
    customer_id: CustomerId,
    vehicle: &NewVehicle,
) -> Result<Vehicle, RepositoryError> {
    let sql = format!(
        r"
        INSERT INTO arycar.vehicle
            (plate, vehicle_type, size, brand, model, color, year, km, customer_id)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
        RETURNING {VEHICLE_COLUMNS}
        "
    );
    let row = sqlx::query_as::<_, VehicleRow>(&sql)
        .bind(&vehicle.plate)
        .bind(vehicle.vehicle_type)
        .bind(vehicle.size)
        .bind(&vehicle.brand)
        .bind(&vehicle.model)
        .bind(&vehicle.color)
        .bind(&vehicle.year)
        .bind(vehicle.km.as_ref().map(Km::as_str))
        .bind(customer_id)
        .fetch_one(conn)
        .await
        .map_err(|e| {
            RepositoryError::unique_or(e, format!("plate {} already registered", vehicle.plate))
        })?;

    Ok(row.into())
}
