//! Utility functions and types

pub mod data_loader;

pub use data_loader::{
    load_csv, load_examples, load_records, frame_to_examples, frame_to_records,
    records_to_frame, examples_to_frame, save_csv, write_predictions,
};
