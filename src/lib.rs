//! fruitqc — fruit quality classification
//!
//! A repeatable "clean data → train → compare models → report" workflow
//! for a binary fruit-quality label derived from six sensory measurements
//! plus an ordinal ripeness attribute.
//!
//! # Modules
//!
//! - [`data`] - Schema constants, vocabularies, cleaned dataset, CSV loading
//! - [`cleaning`] - Missing-value policy and categorical remapping
//! - [`split`] - Stratified, seeded train/test partitioning
//! - [`pipeline`] - Leakage-safe scaler + classifier composition
//! - [`models`] - Logistic regression and random forest classifiers
//! - [`evaluation`] - Accuracy, confusion matrix, per-class metrics
//! - [`report`] - Side-by-side model comparison table
//! - [`viz`] - Row-normalized confusion-matrix rendering
//! - [`cli`] - Command-line entry point

pub mod error;

pub mod cleaning;
pub mod data;
pub mod evaluation;
pub mod models;
pub mod pipeline;
pub mod report;
pub mod split;
pub mod viz;

pub mod cli;

pub use error::{FruitError, Result};
