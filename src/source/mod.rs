//! Single-stream preprocessing: imputation, error tracking, calibration.

pub mod data_source;

pub use data_source::*;
