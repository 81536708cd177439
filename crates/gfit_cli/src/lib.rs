//! Calorie-per-activity reporting on top of `gfit_client`.

pub mod report;

pub use report::{Report, Session, build_report, render};
