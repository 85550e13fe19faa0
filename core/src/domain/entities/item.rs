//! Item entity: a single claimable lot within a sale.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Lifecycle status of an item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemStatus {
    Available,
    Claimed,
    Removed,
}

impl ItemStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Available => "available",
            Self::Claimed => "claimed",
            Self::Removed => "removed",
        }
    }
}

impl std::fmt::Display for ItemStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Item entity
///
/// The `Available -> Claimed` transition is the contended edge: it must
/// only ever be applied through the repository's conditional update so two
/// concurrent claims resolve to exactly one winner. There is no path back
/// out of `Claimed`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    /// Unique identifier for the item
    pub id: Uuid,

    /// The sale this item belongs to
    pub sale_id: Uuid,

    pub title: String,
    pub description: Option<String>,

    /// Asking price for display; claims are not bids
    pub price: Option<f64>,

    /// Display ordering within the sale
    pub sort_order: i32,

    pub status: ItemStatus,

    /// The buyer who claimed this item, once claimed
    pub claimed_by: Option<Uuid>,

    /// When the winning claim landed
    pub claimed_at: Option<DateTime<Utc>>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Item {
    /// Create a new available item for a sale
    pub fn new(
        sale_id: Uuid,
        title: String,
        description: Option<String>,
        price: Option<f64>,
        sort_order: i32,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            sale_id,
            title,
            description,
            price,
            sort_order,
            status: ItemStatus::Available,
            claimed_by: None,
            claimed_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_available(&self) -> bool {
        self.status == ItemStatus::Available
    }
}
