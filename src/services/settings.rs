use std::sync::Arc;

use sea_orm::{DatabaseConnection, EntityTrait};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::{
    entities::settings::{self, Entity as Settings, SETTINGS_ROW_ID},
    errors::ServiceError,
};

/// Branding values handed to the rendering layer per request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Branding {
    pub system_name: String,
    pub logo_path: String,
    pub primary_color: String,
    pub success_color: String,
    pub warning_color: String,
    pub danger_color: String,
}

impl Default for Branding {
    fn default() -> Self {
        Self {
            system_name: "Stock Checker System".to_string(),
            logo_path: "/static/images/default-logo.png".to_string(),
            primary_color: "#2563eb".to_string(),
            success_color: "#059669".to_string(),
            warning_color: "#d97706".to_string(),
            danger_color: "#dc2626".to_string(),
        }
    }
}

impl From<settings::Model> for Branding {
    fn from(m: settings::Model) -> Self {
        Self {
            system_name: m.system_name,
            logo_path: m.logo_path,
            primary_color: m.primary_color,
            success_color: m.success_color,
            warning_color: m.warning_color,
            danger_color: m.danger_color,
        }
    }
}

/// Reads the single settings row on demand. No process-wide cache: an
/// admin edit is visible on the next request.
#[derive(Clone)]
pub struct SettingsService {
    db: Arc<DatabaseConnection>,
}

impl SettingsService {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    #[instrument(skip(self))]
    pub async fn load(&self) -> Result<Branding, ServiceError> {
        let db = &*self.db;
        let row = Settings::find_by_id(SETTINGS_ROW_ID).one(db).await?;
        Ok(row.map(Into::into).unwrap_or_default())
    }
}
