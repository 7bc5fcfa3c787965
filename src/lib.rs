//! agro-advisor: crop recommendation and plant disease detection service.
//!
//! A thin HTTP layer over two pre-trained classifiers:
//!   soil/weather features → crop label, leaf image → disease label
//! Each prediction is expanded into human-readable agronomic advice by an
//! external generative-language model, then cleaned up for display.

pub mod advisory;
pub mod config;
pub mod inference;
pub mod server;
