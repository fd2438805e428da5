//! API layer - in-process access to the generation service

pub mod native;
