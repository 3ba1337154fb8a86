//! List page state: the record set plus the create/edit form.

use crate::model::{Customer, CustomerId};
use serde::Serialize;

/// Form field values as the browser shows them. Everything is a string, like an HTML input.
#[derive(Serialize, Clone, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct FormValues {
    pub name: String,
    /// Plain calendar value (`YYYY-MM-DD`), as a date input expects.
    pub date_of_birth: String,
    pub member_number: String,
    pub interests: String,
}

impl FormValues {
    pub fn from_customer(c: &Customer) -> Self {
        FormValues {
            name: c.name.clone(),
            date_of_birth: c.date_of_birth.format("%Y-%m-%d").to_string(),
            member_number: c.member_number.to_string(),
            interests: c.interests.clone().unwrap_or_default(),
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct ListPageState {
    pub customers: Vec<Customer>,
    pub show_form: bool,
    /// `None` while creating, the record being edited otherwise.
    pub editing: Option<Customer>,
    pub form: FormValues,
    pub error: Option<String>,
}

impl ListPageState {
    pub fn new(customers: Vec<Customer>) -> Self {
        ListPageState {
            customers,
            ..Default::default()
        }
    }

    /// Show an empty form for a new record.
    pub fn open_create(&mut self) {
        self.show_form = true;
        self.editing = None;
        self.form = FormValues::default();
        self.error = None;
    }

    /// Show the form pre-populated from the record with this id. Returns false if it is not listed.
    pub fn edit(&mut self, id: &CustomerId) -> bool {
        let Some(customer) = self.customers.iter().find(|c| &c.id == id).cloned() else {
            return false;
        };
        self.form = FormValues::from_customer(&customer);
        self.editing = Some(customer);
        self.show_form = true;
        self.error = None;
        true
    }

    /// Hide the form and reset every form field.
    pub fn cancel(&mut self) {
        self.show_form = false;
        self.editing = None;
        self.form = FormValues::default();
        self.error = None;
    }

    /// HTTP method and URL the form submits to: Update when editing, Create otherwise.
    pub fn submit_target(&self, collection_url: &str) -> (&'static str, String) {
        match &self.editing {
            Some(c) => ("PUT", format!("{}/{}", collection_url, c.id)),
            None => ("POST", collection_url.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::NewCustomer;
    use chrono::{NaiveDate, Utc};

    fn ann() -> Customer {
        Customer::new(
            CustomerId::from("ann"),
            NewCustomer {
                name: "Ann".into(),
                date_of_birth: NaiveDate::from_ymd_opt(1990, 5, 1).expect("date"),
                member_number: 1,
                interests: None,
            },
            Utc::now(),
        )
    }

    #[test]
    fn starts_with_hidden_form() {
        let s = ListPageState::new(vec![ann()]);
        assert!(!s.show_form);
        assert!(s.editing.is_none());
        assert_eq!(s.form, FormValues::default());
    }

    #[test]
    fn edit_populates_form_with_plain_date() {
        let mut s = ListPageState::new(vec![ann()]);
        assert!(s.edit(&CustomerId::from("ann")));
        assert!(s.show_form);
        assert_eq!(s.form.date_of_birth, "1990-05-01");
        assert_eq!(s.form.member_number, "1");
        assert_eq!(s.form.interests, "");
        assert_eq!(s.submit_target("/api/customer"), ("PUT", "/api/customer/ann".to_string()));
    }

    #[test]
    fn edit_of_unlisted_record_changes_nothing() {
        let mut s = ListPageState::new(vec![ann()]);
        assert!(!s.edit(&CustomerId::from("nobody")));
        assert!(!s.show_form);
    }

    #[test]
    fn create_then_cancel_resets() {
        let mut s = ListPageState::new(vec![ann()]);
        s.edit(&CustomerId::from("ann"));
        s.open_create();
        assert!(s.editing.is_none());
        assert_eq!(s.form, FormValues::default());
        assert_eq!(s.submit_target("/api/customer"), ("POST", "/api/customer".to_string()));
        s.cancel();
        assert!(!s.show_form);
    }
}
