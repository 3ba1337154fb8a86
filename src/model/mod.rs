//! Domain types for customer records.

pub mod customer;

pub use customer::{Customer, CustomerId, CustomerPatch, NewCustomer};
