// src/state.rs
use std::sync::Arc;

use crate::services::tutor::Tutor;

pub type SharedState = Arc<AppState>;

#[derive(Debug)]
pub struct AppState {
    pub tutor: Tutor,
}

impl AppState {
    pub fn new(tutor: Tutor) -> Self {
        Self { tutor }
    }
}
