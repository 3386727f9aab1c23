use std::sync::Arc;

use crate::auth::IdentityProvider;
use crate::config::Config;
use crate::rooms::RoomRegistry;
use crate::video::VideoPlatform;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub identity: Arc<dyn IdentityProvider>,
    pub video: Arc<dyn VideoPlatform>,
    pub rooms: Arc<RoomRegistry>,
}

impl AppState {
    pub fn new(
        config: Config,
        identity: Arc<dyn IdentityProvider>,
        video: Arc<dyn VideoPlatform>,
    ) -> Self {
        Self {
            config: Arc::new(config),
            identity,
            rooms: Arc::new(RoomRegistry::new(video.clone())),
            video,
        }
    }
}
