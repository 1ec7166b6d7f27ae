//! Utility functions shared across the crate

pub mod logging;

pub use logging::{
    create_spinner, finish_progress_bar, log_operation_complete, log_operation_start, log_warning,
};
