use crate::modules::gallery::use_cases::list_items_by_category::queries_port::ItemQueries;
use crate::modules::gallery::use_cases::reconcile_item::lane::LaneSender;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub queries: Arc<dyn ItemQueries + Send + Sync>,
    pub photos: LaneSender,
    pub likes: LaneSender,
}
