pub mod bookings;
pub mod events;

use std::sync::Arc;

use devevent_db::Database;
use devevent_kernel::ModuleRegistry;
use utoipa::PartialSchema;

/// Register all project modules with the registry. Events come first: the
/// bookings table references it.
pub fn register_all(registry: &mut ModuleRegistry, db: &Arc<Database>) -> anyhow::Result<()> {
    registry.register(events::create_module(Arc::clone(db)))?;
    registry.register(bookings::create_module(Arc::clone(db)))?;
    Ok(())
}

/// JSON rendering of a model's OpenAPI schema.
pub(crate) fn schema_json<T: PartialSchema>() -> serde_json::Value {
    serde_json::to_value(T::schema()).unwrap_or_default()
}
