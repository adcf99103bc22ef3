use std::sync::Arc;

use crate::config::AppConfig;
use crate::database::Stores;
use crate::services::{PostService, UserService};

/// Handles shared by every request. Cloning is cheap.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub posts: PostService,
    pub users: UserService,
}

impl AppState {
    pub fn new(config: AppConfig, stores: Stores) -> Self {
        let config = Arc::new(config);
        Self {
            posts: PostService::new(stores.posts.clone(), stores.users.clone()),
            users: UserService::new(stores.users, config.clone()),
            config,
        }
    }
}
