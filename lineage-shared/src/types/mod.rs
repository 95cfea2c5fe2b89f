//! Core types of the lineage model.

pub mod entity;
pub mod event;
pub mod query;
pub mod relationships;
