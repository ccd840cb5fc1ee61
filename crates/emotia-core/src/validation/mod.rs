//! Validation modules

pub mod emote_name;

pub use emote_name::{
    infer_name_from_filename, validate_emote_name, EMOTE_NAME_PATTERN, MAX_EMOTE_NAME_BYTES,
};
