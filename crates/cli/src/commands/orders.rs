//! Print the order queue.

use arycar_api::db::OrderRepository;
use arycar_core::StatusFilter;

use super::connect;

/// List orders matching `status` (`all` for every order), newest first.
///
/// # Errors
///
/// Returns an error for an unknown status or a failed query.
pub async fn list(status: &str) -> Result<(), Box<dyn std::error::Error>> {
    let filter: StatusFilter = status.parse()?;

    let pool = connect().await?;
    let orders = OrderRepository::new(&pool).list(filter).await?;

    #[allow(clippy::print_stdout)]
    {
        if orders.is_empty() {
            println!("No orders.");
        }
        for order in &orders {
            println!(
                "{:<9} {:<12} {:<8} {:>12}  {} ({} services){}",
                order.short_code(),
                order.status.label(),
                order.vehicle_plate.as_str(),
                order.total.display(),
                order.customer_name,
                order.items.len(),
                if order.pickup_delivery { "  [leva e traz]" } else { "" },
            );
        }
    }

    tracing::info!(count = orders.len(), "Orders listed");
    Ok(())
}
