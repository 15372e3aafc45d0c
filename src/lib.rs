//! Small habit tracker. Routines are scheduled for a time of day, can be completed once per day
//! up to that time, and count how many times they were completed. Everything is kept in a local
//! directory, together with a plain text history of changes.
//!

pub mod cli;
pub mod routines;
pub mod storage;
pub mod utils;
