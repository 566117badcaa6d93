use std::sync::Arc;

use staydesk_core::blob::BlobStore;
use staydesk_core::room_schema::RoomSchema;

use crate::config::ServerConfig;
use crate::notify::CredentialNotifier;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheap to clone: everything heavy sits behind an `Arc` or is `Copy`.
#[derive(Clone)]
pub struct AppState {
    pub pool: staydesk_db::DbPool,
    pub config: Arc<ServerConfig>,
    /// Where room photos, logos and hero images are stored.
    pub blobs: Arc<dyn BlobStore>,
    /// Room table capability record, resolved once at startup.
    pub room_schema: RoomSchema,
    pub notifier: Arc<dyn CredentialNotifier>,
}
