use std::sync::Arc;

use agora_core::urls::ForumUrl;
use agora_mail::Mailer;

use crate::config::ServerConfig;

/// Shared application state available to all handlers via `State<AppState>`.
///
/// Cheap to clone. Holds no per-request data: everything a handler needs
/// about the request travels in its `RequestContext`.
#[derive(Clone)]
pub struct AppState {
    pub pool: agora_db::DbPool,
    pub config: Arc<ServerConfig>,
    /// Redirect and link builder rooted at `FORUM_BASE_URL`.
    pub urls: Arc<ForumUrl>,
    pub mailer: Mailer,
}

impl AppState {
    pub fn new(pool: agora_db::DbPool, config: ServerConfig, mailer: Mailer) -> Self {
        let urls = ForumUrl::new(config.forum_base_url.clone());
        Self {
            pool,
            config: Arc::new(config),
            urls: Arc::new(urls),
            mailer,
        }
    }
}
