use std::sync::Arc;

use foodcast_core::application::FoodcastService;

use crate::args::Args;

#[derive(Clone)]
pub struct AppState {
    pub args: Arc<Args>,
    pub service: FoodcastService,
}

impl AppState {
    pub fn new(args: Arc<Args>, service: FoodcastService) -> Self {
        Self { args, service }
    }
}
