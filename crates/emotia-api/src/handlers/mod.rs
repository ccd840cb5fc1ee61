//! HTTP handlers. Thin: parse, call the service, render.

pub mod channels;
pub mod emotes;
