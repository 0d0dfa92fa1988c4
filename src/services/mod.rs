// Write path
pub mod ledger;
pub mod recorder;

// Read path
pub mod stock;

// Master data
pub mod catalog;

// Access control
pub mod access;
