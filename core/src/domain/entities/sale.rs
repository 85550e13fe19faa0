//! Sale entity: a seller-published, time-boxed batch of claimable items.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::value_objects::contact::Contact;
use crate::errors::{ClaimError, ValidationError};

/// Length of the human-enterable access code (digits)
pub const ACCESS_CODE_LENGTH: usize = 6;

/// Length of the opaque QR token (lowercase hex characters, 128 bits)
pub const QR_TOKEN_LENGTH: usize = 32;

/// Lifecycle status of a sale
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SaleStatus {
    Draft,
    Active,
    Closed,
    Cancelled,
}

impl SaleStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Active => "active",
            Self::Closed => "closed",
            Self::Cancelled => "cancelled",
        }
    }

    /// Whether the status permits no further transitions
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Closed | Self::Cancelled)
    }

    /// The allowed transition edges:
    /// draft -> active, active -> closed, active -> cancelled,
    /// draft -> cancelled. Everything else is rejected.
    pub fn can_transition_to(&self, to: SaleStatus) -> bool {
        matches!(
            (self, to),
            (Self::Draft, Self::Active)
                | (Self::Active, Self::Closed)
                | (Self::Active, Self::Cancelled)
                | (Self::Draft, Self::Cancelled)
        )
    }
}

impl std::fmt::Display for SaleStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// When buyers may claim items and when claimed items are picked up
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaleWindows {
    pub claim_start: DateTime<Utc>,
    pub claim_end: DateTime<Utc>,
    pub pickup_start: DateTime<Utc>,
    pub pickup_end: DateTime<Utc>,
}

impl SaleWindows {
    /// Validate the window invariants: `claim_start < claim_end` and
    /// `pickup_start <= pickup_end`.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.claim_start >= self.claim_end {
            return Err(ValidationError::InvalidWindow {
                message: "claim_start must be before claim_end".to_string(),
            });
        }
        if self.pickup_start > self.pickup_end {
            return Err(ValidationError::InvalidWindow {
                message: "pickup_start must not be after pickup_end".to_string(),
            });
        }
        Ok(())
    }
}

/// Sale entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sale {
    /// Unique identifier for the sale
    pub id: Uuid,

    /// The seller who owns this sale
    pub seller_id: Uuid,

    /// Contact channel for routing buyer inquiries to the seller
    pub seller_contact: Contact,

    pub title: String,
    pub description: Option<String>,

    /// Street address of the sale location
    pub address: String,
    pub city: String,
    pub state: String,
    pub zip: String,

    pub status: SaleStatus,

    /// Claim and pickup windows
    pub windows: SaleWindows,

    /// Human-enterable code, unique across all sales
    pub access_code: String,

    /// Opaque token embedded in the sale's QR code, unique
    pub qr_token: String,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Sale {
    /// Create a new draft sale.
    ///
    /// The caller is responsible for supplying an access code and QR token
    /// that are unique in the sale collection (see `CodeGenerator`).
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        seller_id: Uuid,
        seller_contact: Contact,
        title: String,
        description: Option<String>,
        address: String,
        city: String,
        state: String,
        zip: String,
        windows: SaleWindows,
        access_code: String,
        qr_token: String,
    ) -> Result<Self, ValidationError> {
        if title.trim().is_empty() {
            return Err(ValidationError::RequiredField {
                field: "title".to_string(),
            });
        }
        windows.validate()?;

        let now = Utc::now();
        Ok(Self {
            id: Uuid::new_v4(),
            seller_id,
            seller_contact,
            title,
            description,
            address,
            city,
            state,
            zip,
            status: SaleStatus::Draft,
            windows,
            access_code,
            qr_token,
            created_at: now,
            updated_at: now,
        })
    }

    /// A sale is claimable iff it is active and `now` falls inside the
    /// claim window (inclusive bounds).
    pub fn is_claimable(&self, now: DateTime<Utc>) -> bool {
        self.status == SaleStatus::Active
            && now >= self.windows.claim_start
            && now <= self.windows.claim_end
    }

    /// Apply a status transition, rejecting edges outside the table.
    pub fn transition(&mut self, to: SaleStatus) -> Result<(), ClaimError> {
        if !self.status.can_transition_to(to) {
            return Err(ClaimError::InvalidTransition {
                from: self.status,
                to,
            });
        }
        self.status = to;
        self.updated_at = Utc::now();
        Ok(())
    }
}
