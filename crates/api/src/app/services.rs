use std::sync::Arc;

use userbase_infra::{InMemoryUserGateway, UserGateway};

/// Dependencies shared by every handler.
///
/// Built once at startup and handed to `build_app`; handlers receive it as an
/// `Extension<Arc<AppServices>>`.
#[derive(Clone)]
pub struct AppServices {
    pub users: Arc<dyn UserGateway>,
}

impl AppServices {
    pub fn new(users: Arc<dyn UserGateway>) -> Self {
        Self { users }
    }

    /// Services backed by an empty in-memory user table.
    pub fn in_memory() -> Self {
        Self::new(Arc::new(InMemoryUserGateway::new()))
    }
}

impl std::fmt::Debug for AppServices {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppServices").finish_non_exhaustive()
    }
}
