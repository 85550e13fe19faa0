//! Input types for seller-side sale operations

use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::domain::value_objects::contact::ContactMethod;

/// Input for creating a sale
#[derive(Debug, Clone, Deserialize)]
pub struct NewSale {
    pub title: String,
    pub description: Option<String>,
    pub address: String,
    pub city: String,
    pub state: String,
    pub zip: String,
    /// Contact channel buyer inquiries are routed to
    pub seller_contact_method: ContactMethod,
    pub seller_contact_value: String,
    pub claim_start: DateTime<Utc>,
    pub claim_end: DateTime<Utc>,
    pub pickup_start: DateTime<Utc>,
    pub pickup_end: DateTime<Utc>,
}

/// Input for adding an item to a sale
#[derive(Debug, Clone, Deserialize)]
pub struct NewItem {
    pub title: String,
    pub description: Option<String>,
    pub price: Option<f64>,
    #[serde(default)]
    pub sort_order: i32,
}
