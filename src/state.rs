//! Shared handles, constructed once at startup and passed down explicitly.

use std::sync::Arc;

use crate::images::ImageUploader;
use crate::store::{ProductStore, UserStore};

#[derive(Clone)]
pub struct AppState {
    pub users: Arc<dyn UserStore>,
    pub products: Arc<dyn ProductStore>,
    pub uploader: Arc<dyn ImageUploader>,
}
