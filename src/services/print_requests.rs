use std::sync::Arc;

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    Set,
};
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::{
    entities::print_request::{self, encode_sku_items, Entity as PrintRequest, PrintItem},
    errors::ServiceError,
    events::{Event, EventSender},
};

/// Creates print requests from SKU lists produced by search or bulk
/// lookup. Approval, printing and completion happen outside this crate;
/// new requests always start out pending.
#[derive(Clone)]
pub struct PrintRequestService {
    db: Arc<DatabaseConnection>,
    event_sender: Option<EventSender>,
}

impl PrintRequestService {
    pub fn new(db: Arc<DatabaseConnection>, event_sender: Option<EventSender>) -> Self {
        Self { db, event_sender }
    }

    #[instrument(skip(self, items), fields(items = items.len()))]
    pub async fn create(
        &self,
        items: Vec<PrintItem>,
        notes: Option<String>,
        requested_by: &str,
        requested_by_id: &str,
        source_type: &str,
    ) -> Result<print_request::Model, ServiceError> {
        if items.is_empty() {
            return Err(ServiceError::InvalidInput("No SKUs provided".to_string()));
        }

        let db = &*self.db;
        let now = Utc::now();
        let request_id = self.next_request_id().await?;

        let model = print_request::ActiveModel {
            id: Set(Uuid::new_v4()),
            request_id: Set(request_id.clone()),
            requested_by: Set(requested_by.to_string()),
            requested_by_id: Set(requested_by_id.to_string()),
            requested_at: Set(now),
            status: Set("pending".to_string()),
            sku_list: Set(encode_sku_items(&items)),
            sku_count: Set(items.len() as i32),
            notes: Set(notes),
            source_type: Set(source_type.to_string()),
        }
        .insert(db)
        .await?;

        info!(request_id = %model.request_id, sku_count = model.sku_count, "print request created");

        if let Some(sender) = &self.event_sender {
            if let Err(e) = sender
                .send(Event::PrintRequestCreated {
                    request_id: model.request_id.clone(),
                    sku_count: model.sku_count,
                    requested_by: model.requested_by.clone(),
                })
                .await
            {
                warn!(error = %e, "failed to send print request event");
            }
        }

        Ok(model)
    }

    /// Request ids run `PR-YYYYMMDD-NNNN`, numbering within the UTC day.
    async fn next_request_id(&self) -> Result<String, ServiceError> {
        let db = &*self.db;
        let today = Utc::now().date_naive();
        let day_start = today.and_time(chrono::NaiveTime::MIN).and_utc();
        let day_end = day_start + chrono::Duration::days(1);

        let today_count = PrintRequest::find()
            .filter(print_request::Column::RequestedAt.gte(day_start))
            .filter(print_request::Column::RequestedAt.lt(day_end))
            .count(db)
            .await?;

        Ok(format!(
            "PR-{}-{:04}",
            today.format("%Y%m%d"),
            today_count + 1
        ))
    }
}
