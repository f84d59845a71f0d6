//! Output formatting for subnet plans.
//!
//! This module handles formatting and printing plan data:
//! - [`csv`] - CSV export
//! - [`terminal`] - aligned terminal tables with colors

mod csv;
mod terminal;

pub use csv::subnets_to_csv;
pub use terminal::{format_field, print_facts, print_subnet_table, print_warnings};
