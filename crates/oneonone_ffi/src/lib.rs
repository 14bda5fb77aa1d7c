//! Flutter bridge crate for OneOnOne core.

pub mod api;
