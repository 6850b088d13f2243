pub mod assignments;
pub mod events;
pub mod health;
pub mod venues;

use axum::Router;
use std::sync::Arc;

pub fn routes() -> Router<Arc<crate::AppState>> {
    Router::new()
        .merge(events::routes())
        .merge(assignments::routes())
        .merge(venues::routes())
}
