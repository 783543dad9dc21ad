//! Today entry point

use std::sync::OnceLock;
use zoon::*;

/// Stores the main application task handle to prevent it from being dropped.
static MAIN_TASK: OnceLock<TaskHandle> = OnceLock::new();

mod app;
mod config;
mod dataflow;
mod logging;
mod timeline;
mod views;

pub fn main() {
    logging::init();
    let handle = Task::start_droppable(async {
        let app = crate::app::TodayApp::new();
        let root_element = app.root();
        start_app("app", move || root_element);
    });
    let _ = MAIN_TASK.set(handle);
}
