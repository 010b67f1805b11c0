pub(crate) mod dispatch;
pub(crate) mod events;
pub(crate) mod headless;
pub(crate) mod logging;

pub(crate) use dispatch::spawn_prediction_service;
pub(crate) use headless::run_headless;
pub(crate) use logging::init_tracing;
