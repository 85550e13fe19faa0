//! Request and response types for the claim service use cases

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::entities::item::Item;
use crate::domain::entities::sale::Sale;
use crate::domain::value_objects::contact::ContactMethod;

/// Input for requesting a verification code
#[derive(Debug, Clone, Deserialize)]
pub struct VerificationRequest {
    pub sale_id: Uuid,
    pub name: String,
    pub method: ContactMethod,
    pub contact_value: String,
}

/// Opaque acknowledgement of a code request.
///
/// Identical whether or not delivery succeeded, and regardless of whether
/// the contact was already registered. The response is not an oracle.
#[derive(Debug, Clone, Serialize)]
pub struct VerificationRequested {
    pub sale_id: Uuid,
    /// Masked contact the code was (apparently) sent to
    pub sent_to: String,
    /// When the issued code expires
    pub expires_at: DateTime<Utc>,
}

/// Session credential returned after a successful confirmation
#[derive(Debug, Clone, Serialize)]
pub struct SessionGrant {
    pub session_token: String,
    pub expires_at: DateTime<Utc>,
    pub sale_id: Uuid,
    pub buyer_name: String,
}

/// Input for submitting an inquiry or offer
#[derive(Debug, Clone, Deserialize)]
pub struct InquiryRequest {
    pub item_id: Uuid,
    pub name: String,
    pub method: ContactMethod,
    pub contact_value: String,
    pub message: String,
    pub offer_amount: Option<f64>,
    /// Requester's network origin, used for rate limiting
    pub origin: String,
    /// Session token when the requester is a verified buyer
    pub session_token: Option<String>,
}

/// Acknowledgement of a stored inquiry
#[derive(Debug, Clone, Serialize)]
pub struct InquiryReceipt {
    pub inquiry_id: Uuid,
    /// Short reference shown to the requester
    pub reference: String,
}

/// Result of a successful claim
#[derive(Debug, Clone, Serialize)]
pub struct ClaimConfirmation {
    pub item_id: Uuid,
    pub sale_id: Uuid,
    pub claimed_at: DateTime<Utc>,
}

/// A sale opened through its access code or QR token
#[derive(Debug, Clone, Serialize)]
pub struct SaleAccess {
    pub sale: Sale,
    pub items: Vec<Item>,
}
