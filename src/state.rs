use std::sync::Arc;

use crate::{
    assets::AssetStore,
    db::{CommentStore, ContentStore, SubmissionStore},
    services::counters::ViewLimiter,
};

#[derive(Clone)]
pub struct AppState {
    pub contents: Arc<dyn ContentStore>,
    pub comments: Arc<dyn CommentStore>,
    pub submissions: Arc<dyn SubmissionStore>,
    pub assets: Arc<dyn AssetStore>,
    pub views: Arc<ViewLimiter>,
    pub jwt_secret: Arc<str>,
    pub asset_folder: Arc<str>,
}
