//! End-of-batch output

pub mod console;
