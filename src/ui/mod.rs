//! Browser pages: list page with create/edit form, detail page with derived age.

pub mod age;
pub mod form;
pub mod templates;

pub use age::age_on;
pub use form::{FormValues, ListPageState};
