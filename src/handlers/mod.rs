//! HTTP handlers for the customer API and pages.

pub mod customer;
pub mod pages;
