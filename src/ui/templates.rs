//! Page templates (embedded) and the view models passed to them.

use crate::config::AppConfig;
use crate::model::Customer;
use crate::ui::age::age_on;
use crate::ui::form::{FormValues, ListPageState};
use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use tera::{Context, Tera};

pub const LIST_TEMPLATE: &str = "customer_list.html";
pub const DETAIL_TEMPLATE: &str = "customer_detail.html";
pub const ERROR_TEMPLATE: &str = "customer_error.html";

/// Browser script for form submission and deletes.
pub const SCRIPT: &str = include_str!("../../assets/customer.js");

/// Compile all page templates.
pub fn load() -> Result<Tera, tera::Error> {
    let mut tera = Tera::default();
    tera.add_raw_templates(vec![
        ("base.html", include_str!("../../templates/base.html")),
        (LIST_TEMPLATE, include_str!("../../templates/customer_list.html")),
        (DETAIL_TEMPLATE, include_str!("../../templates/customer_detail.html")),
        (ERROR_TEMPLATE, include_str!("../../templates/customer_error.html")),
    ])?;
    Ok(tera)
}

/// URLs every page needs, resolved against the base path.
#[derive(Serialize)]
struct Links {
    home: String,
    list: String,
    new: String,
    api: String,
    script: String,
}

impl Links {
    fn new(config: &AppConfig) -> Self {
        Links {
            home: if config.base_path.is_empty() {
                "/".into()
            } else {
                config.base_path.clone()
            },
            list: config.path("/customer"),
            new: config.path("/customer?new"),
            api: config.path("/api/customer"),
            script: config.path("/assets/customer.js"),
        }
    }
}

#[derive(Serialize)]
struct RowView<'a> {
    member_number: i64,
    name: &'a str,
    date_of_birth: String,
    interests: Option<&'a str>,
    detail_url: String,
    edit_url: String,
    delete_url: String,
}

#[derive(Serialize)]
struct FormView<'a> {
    heading: &'static str,
    submit_label: &'static str,
    method: &'static str,
    action: String,
    values: &'a FormValues,
}

#[derive(Serialize)]
struct DetailView<'a> {
    initial: String,
    name: &'a str,
    member_number: i64,
    date_of_birth: String,
    age: i32,
    interests: Option<&'a str>,
    created_at: String,
    updated_at: String,
    delete_url: String,
}

/// en-US short date, e.g. `5/1/1990`.
fn short_date(d: NaiveDate) -> String {
    d.format("%-m/%-d/%Y").to_string()
}

/// en-US long date, e.g. `May 1, 1990`.
fn long_date(d: NaiveDate) -> String {
    d.format("%B %-d, %Y").to_string()
}

fn timestamp(t: DateTime<Utc>) -> String {
    t.format("%-m/%-d/%Y, %-I:%M:%S %p UTC").to_string()
}

pub fn render_list(tera: &Tera, config: &AppConfig, state: &ListPageState) -> Result<String, tera::Error> {
    let links = Links::new(config);
    let rows: Vec<RowView> = state
        .customers
        .iter()
        .map(|c| RowView {
            member_number: c.member_number,
            name: &c.name,
            date_of_birth: short_date(c.date_of_birth),
            interests: c.interests.as_deref(),
            detail_url: format!("{}/{}", links.list, c.id),
            edit_url: format!("{}?edit={}", links.list, c.id),
            delete_url: format!("{}/{}", links.api, c.id),
        })
        .collect();
    let form = state.show_form.then(|| {
        let (method, action) = state.submit_target(&links.api);
        let editing = state.editing.is_some();
        FormView {
            heading: if editing { "Edit Customer" } else { "Add New Customer" },
            submit_label: if editing { "Update" } else { "Create" },
            method,
            action,
            values: &state.form,
        }
    });

    let mut ctx = Context::new();
    ctx.insert("links", &links);
    ctx.insert("rows", &rows);
    ctx.insert("form", &form);
    ctx.insert("error", &state.error);
    tera.render(LIST_TEMPLATE, &ctx)
}

pub fn render_detail(
    tera: &Tera,
    config: &AppConfig,
    customer: &Customer,
    today: NaiveDate,
) -> Result<String, tera::Error> {
    let links = Links::new(config);
    let view = DetailView {
        initial: customer
            .name
            .chars()
            .next()
            .map(|c| c.to_uppercase().collect::<String>())
            .unwrap_or_default(),
        name: &customer.name,
        member_number: customer.member_number,
        date_of_birth: long_date(customer.date_of_birth),
        age: age_on(customer.date_of_birth, today),
        interests: customer.interests.as_deref(),
        created_at: timestamp(customer.created_at),
        updated_at: timestamp(customer.updated_at),
        delete_url: format!("{}/{}", links.api, customer.id),
    };
    let mut ctx = Context::new();
    ctx.insert("links", &links);
    ctx.insert("customer", &view);
    tera.render(DETAIL_TEMPLATE, &ctx)
}

/// Standalone error page with a link back to the list.
pub fn render_error(tera: &Tera, config: &AppConfig, message: &str) -> Result<String, tera::Error> {
    let mut ctx = Context::new();
    ctx.insert("links", &Links::new(config));
    ctx.insert("message", message);
    tera.render(ERROR_TEMPLATE, &ctx)
}
