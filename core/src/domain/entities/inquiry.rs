//! Inquiry entity: a buyer message (optionally with an offer amount)
//! about a specific item, routed to the seller.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::value_objects::contact::Contact;

/// Triage status of an inquiry from the seller's point of view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InquiryStatus {
    New,
    Read,
    Responded,
    Closed,
}

impl InquiryStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::New => "new",
            Self::Read => "read",
            Self::Responded => "responded",
            Self::Closed => "closed",
        }
    }
}

impl std::fmt::Display for InquiryStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Inquiry entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Inquiry {
    /// Unique identifier for the inquiry
    pub id: Uuid,

    /// The sale the item belongs to
    pub sale_id: Uuid,

    /// The item being asked about
    pub item_id: Uuid,

    /// Verified buyer identity, when the requester holds a session
    pub buyer_id: Option<Uuid>,

    /// Requester name (freeform; inquiries do not require verification)
    pub name: String,

    /// Requester contact channel for the seller's reply
    pub contact: Contact,

    pub message: String,

    /// Offer amount when the inquiry is a bid rather than a question
    pub offer_amount: Option<f64>,

    pub status: InquiryStatus,

    pub created_at: DateTime<Utc>,
}

impl Inquiry {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        sale_id: Uuid,
        item_id: Uuid,
        buyer_id: Option<Uuid>,
        name: String,
        contact: Contact,
        message: String,
        offer_amount: Option<f64>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            sale_id,
            item_id,
            buyer_id,
            name,
            contact,
            message,
            offer_amount,
            status: InquiryStatus::New,
            created_at: Utc::now(),
        }
    }

    pub fn is_new(&self) -> bool {
        self.status == InquiryStatus::New
    }

    pub fn mark_read(&mut self) {
        if self.status == InquiryStatus::New {
            self.status = InquiryStatus::Read;
        }
    }

    /// Short reference shown to the requester, derived from the id
    pub fn reference(&self) -> String {
        format!("INQ-{}", &self.id.simple().to_string()[..8].to_uppercase())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_objects::contact::ContactMethod;

    fn sample_inquiry() -> Inquiry {
        Inquiry::new(
            Uuid::new_v4(),
            Uuid::new_v4(),
            None,
            "Pat".to_string(),
            Contact::new(ContactMethod::Email, "pat@example.com").unwrap(),
            "Is the dresser solid oak?".to_string(),
            None,
        )
    }

    #[test]
    fn test_new_inquiry() {
        let inquiry = sample_inquiry();
        assert!(inquiry.is_new());
        assert!(inquiry.offer_amount.is_none());
    }

    #[test]
    fn test_mark_read_only_from_new() {
        let mut inquiry = sample_inquiry();
        inquiry.mark_read();
        assert_eq!(inquiry.status, InquiryStatus::Read);

        inquiry.status = InquiryStatus::Responded;
        inquiry.mark_read();
        assert_eq!(inquiry.status, InquiryStatus::Responded);
    }

    #[test]
    fn test_reference_format() {
        let inquiry = sample_inquiry();
        let reference = inquiry.reference();
        assert!(reference.starts_with("INQ-"));
        assert_eq!(reference.len(), 12);
    }
}
