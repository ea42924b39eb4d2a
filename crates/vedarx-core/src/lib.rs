//! # VedaRx Core
//!
//! Shared foundation for the VedaRx workspace: the case-record and patient
//! data model, the error taxonomy, and the TOML configuration system.
//!
//! Nothing here does I/O beyond reading the config file; the knowledge base
//! loader, ranker, and generation orchestrator live in their own crates and
//! all depend on these types.

pub mod config;
pub mod error;
pub mod types;

pub use config::VedarxConfig;
pub use error::{DataLoadError, GenerationError, Result, VedarxError};
pub use types::{CaseRecord, DietChart, GenerationMode, PatientProfile, Prescription, RankedCase};
