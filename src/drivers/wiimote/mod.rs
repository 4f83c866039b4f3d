pub mod crypto;
pub mod factory_data;
pub mod hid_report;
pub mod registers;
#[cfg(test)]
pub mod registers_test;
pub mod snapshot;
