//! Role and status enums for marketplace entities.

use serde::{Deserialize, Serialize};

/// Role of an authenticated user.
///
/// Wire values match the backend's French role strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UserRole {
    /// A customer browsing the catalog and ordering prints.
    #[serde(rename = "CLIENT")]
    Client,
    /// A print-shop operator fulfilling print jobs.
    #[serde(rename = "IMPRIMEUR")]
    Imprimeur,
    /// The platform administrator.
    #[serde(rename = "ADMIN")]
    Admin,
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Client => write!(f, "CLIENT"),
            Self::Imprimeur => write!(f, "IMPRIMEUR"),
            Self::Admin => write!(f, "ADMIN"),
        }
    }
}

impl std::str::FromStr for UserRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "CLIENT" => Ok(Self::Client),
            "IMPRIMEUR" => Ok(Self::Imprimeur),
            "ADMIN" => Ok(Self::Admin),
            _ => Err(format!("invalid user role: {s}")),
        }
    }
}

/// Status of a single order line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderLineStatus {
    #[default]
    Pending,
    InPrinting,
    Shipped,
    Delivered,
    Cancelled,
}

/// Status of a print job in the operator queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PrintJobStatus {
    /// Not yet claimed by any operator.
    #[default]
    Unassigned,
    /// Claimed by an operator, printing pending.
    Claimed,
    /// Currently on a printer.
    Printing,
    /// Finished and handed off to shipping.
    Completed,
}

/// Verification status of a customer-uploaded 3D model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ModelVerification {
    /// Awaiting printability review.
    #[default]
    Pending,
    /// Reviewed and printable.
    Approved,
    /// Rejected as unprintable.
    Rejected,
}

/// Status of a customer complaint or operator incident report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ComplaintStatus {
    #[default]
    Open,
    InReview,
    Resolved,
    Dismissed,
}
