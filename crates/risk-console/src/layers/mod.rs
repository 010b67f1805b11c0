pub(crate) mod controller;
pub(crate) mod display;
pub(crate) mod service;
pub(crate) mod transport;
pub(crate) mod ui;
