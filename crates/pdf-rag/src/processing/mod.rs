//! Parallel processing of document batches

mod worker;

pub use worker::{BatchReport, DocumentOutcome, DocumentStatus, ProcessingWorker};
