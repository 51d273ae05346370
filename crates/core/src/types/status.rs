//! Status enums for service orders and vehicle checklists.

use serde::{Deserialize, Serialize};

/// Where a service order (OS) is on the queue board.
///
/// There is no guarded state machine: staff can move an order to any status
/// at any time, including backwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[cfg_attr(feature = "postgres", derive(sqlx::Type))]
#[cfg_attr(
    feature = "postgres",
    sqlx(type_name = "arycar.order_status", rename_all = "snake_case")
)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    /// Vehicle checked in, nobody working on it yet.
    #[default]
    Waiting,
    /// Services being performed.
    InProgress,
    /// Services finished, waiting for the customer.
    Done,
    /// Handed back to the customer.
    Delivered,
}

impl OrderStatus {
    /// All statuses in board order.
    pub const ALL: [Self; 4] = [Self::Waiting, Self::InProgress, Self::Done, Self::Delivered];

    /// Label shown to staff.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Waiting => "Aguardando",
            Self::InProgress => "Em andamento",
            Self::Done => "Concluído",
            Self::Delivered => "Entregue",
        }
    }

    /// Wire name (`in_progress`).
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Waiting => "waiting",
            Self::InProgress => "in_progress",
            Self::Done => "done",
            Self::Delivered => "delivered",
        }
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for OrderStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "waiting" => Ok(Self::Waiting),
            "in_progress" => Ok(Self::InProgress),
            "done" => Ok(Self::Done),
            "delivered" => Ok(Self::Delivered),
            _ => Err(format!("invalid order status: {s}")),
        }
    }
}

/// Whether a checklist was taken when the vehicle arrived or when it left.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "postgres", derive(sqlx::Type))]
#[cfg_attr(
    feature = "postgres",
    sqlx(type_name = "arycar.checklist_kind", rename_all = "snake_case")
)]
#[serde(rename_all = "snake_case")]
pub enum ChecklistKind {
    Entry,
    Exit,
}

impl ChecklistKind {
    /// Label shown to staff.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Entry => "entrada",
            Self::Exit => "saída",
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_order_status_wire_names() {
        for status in OrderStatus::ALL {
            let json = serde_json::to_string(&status).unwrap();
            assert_eq!(json, format!("\"{}\"", status.as_str()));
            assert_eq!(status.as_str().parse::<OrderStatus>().unwrap(), status);
        }
    }

    #[test]
    fn test_order_status_default_and_labels() {
        assert_eq!(OrderStatus::default(), OrderStatus::Waiting);
        assert_eq!(OrderStatus::InProgress.label(), "Em andamento");
        assert!("finished".parse::<OrderStatus>().is_err());
    }
}
