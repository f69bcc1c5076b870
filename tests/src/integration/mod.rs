//! Cross-crate integration flows

pub mod custody;
pub mod flows;
