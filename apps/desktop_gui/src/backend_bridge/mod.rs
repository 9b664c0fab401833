//! Bridge between the UI thread and the async worker that talks to the content service.

pub mod commands;
pub mod runtime;
