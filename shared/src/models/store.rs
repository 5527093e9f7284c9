//! Store Model

use serde::{Deserialize, Serialize};

/// Delivery weekday
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "lowercase"))]
#[serde(rename_all = "lowercase")]
pub enum Weekday {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl Default for Weekday {
    fn default() -> Self {
        Self::Monday
    }
}

/// Store status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "lowercase"))]
#[serde(rename_all = "lowercase")]
pub enum StoreStatus {
    Active,
    Inactive,
}

impl Default for StoreStatus {
    fn default() -> Self {
        Self::Active
    }
}

/// Store record - a customer location orders are delivered to
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Store {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub owner_name: String,
    #[serde(default)]
    pub address: String,
    pub contact: Option<String>,
    pub email: Option<String>,
    /// Preferred delivery day
    pub delivery_day: Weekday,
    pub status: StoreStatus,
    /// Archived stores are hidden from default listings but never deleted
    #[serde(default)]
    pub is_archived: bool,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    /// Opening hours, free text (e.g. "9:00-18:00")
    pub hours: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Create store payload
#[derive(Debug, Clone, Deserialize)]
pub struct StoreCreate {
    pub name: String,
    #[serde(default)]
    pub owner_name: String,
    #[serde(default)]
    pub address: String,
    pub contact: Option<String>,
    pub email: Option<String>,
    #[serde(default)]
    pub delivery_day: Weekday,
    #[serde(default)]
    pub status: StoreStatus,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub hours: Option<String>,
}

/// Update store payload
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StoreUpdate {
    pub name: Option<String>,
    pub owner_name: Option<String>,
    pub address: Option<String>,
    pub contact: Option<String>,
    pub email: Option<String>,
    pub delivery_day: Option<Weekday>,
    pub status: Option<StoreStatus>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub hours: Option<String>,
}
