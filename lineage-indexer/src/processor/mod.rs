//! Processor module for the lineage indexer.
//!
//! Turns process lineage events into staging subgraphs.

mod lineage_processor;

pub use lineage_processor::{LineageProcessor, ProcessedEvent};
