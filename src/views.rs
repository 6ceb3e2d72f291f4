use serde::Serialize;
use tera::{Context, Tera};

use crate::bills::sort_by_date_desc;
use crate::fixtures::EXPENSE_TYPES;
use crate::model::BillRecord;
use crate::routes::Route;

// Embed templates at compile time so the binary is self-contained
const LAYOUT_TEMPLATE: &str = include_str!("../templates/layout.html.tera");
const BILLS_TEMPLATE: &str = include_str!("../templates/bills.html.tera");
const NEW_BILL_TEMPLATE: &str = include_str!("../templates/new_bill.html.tera");
const ERROR_TEMPLATE: &str = include_str!("../templates/error.html.tera");
const LOADING_TEMPLATE: &str = include_str!("../templates/loading.html.tera");

/// What the bills page is showing.
#[derive(Debug, Clone, PartialEq)]
pub enum BillsPage {
    Loading,
    Error(String),
    Data(Vec<BillRecord>),
}

#[derive(Serialize)]
struct BillRow {
    expense_type: String,
    expense_name: String,
    date: String,
    amount: String,
    status: &'static str,
    file_url: String,
}

impl From<&BillRecord> for BillRow {
    fn from(bill: &BillRecord) -> Self {
        Self {
            expense_type: bill.expense_type.clone(),
            expense_name: bill.expense_name.clone(),
            date: bill.date.clone(),
            amount: format_amount(bill.amount),
            status: bill.status.label(),
            file_url: bill.file_url.clone(),
        }
    }
}

#[derive(Serialize)]
struct BillsContext {
    active: &'static str,
    rows: Vec<BillRow>,
}

#[derive(Serialize)]
struct ErrorContext<'a> {
    active: &'static str,
    error: &'a str,
}

#[derive(Debug, Serialize)]
pub struct NewBillPage {
    active: &'static str,
    expense_types: Vec<&'static str>,
    error_message: Option<String>,
    file_name: Option<String>,
}

impl NewBillPage {
    pub fn new(error_message: Option<String>, file_name: Option<String>) -> Self {
        Self {
            active: Route::NewBill.id(),
            expense_types: EXPENSE_TYPES.to_vec(),
            error_message,
            file_name,
        }
    }
}

pub fn format_amount(amount: f64) -> String {
    if amount.fract() == 0.0 {
        format!("{:.0}", amount)
    } else {
        format!("{:.2}", amount)
    }
}

pub struct Views {
    tera: Tera,
}

impl Views {
    pub fn new() -> Result<Self, tera::Error> {
        let mut tera = Tera::default();
        tera.add_raw_templates(vec![
            ("layout.html", LAYOUT_TEMPLATE),
            ("bills.html", BILLS_TEMPLATE),
            ("new_bill.html", NEW_BILL_TEMPLATE),
            ("error.html", ERROR_TEMPLATE),
            ("loading.html", LOADING_TEMPLATE),
        ])?;
        Ok(Self { tera })
    }

    /// Rows are always rendered most recent first.
    pub fn render_bills(&self, page: &BillsPage) -> Result<String, tera::Error> {
        match page {
            BillsPage::Loading => {
                let mut context = Context::new();
                context.insert("active", Route::Bills.id());
                self.tera.render("loading.html", &context)
            }
            BillsPage::Error(message) => self.render_error(Route::Bills, message),
            BillsPage::Data(bills) => {
                let mut bills = bills.clone();
                sort_by_date_desc(&mut bills);
                let context = Context::from_serialize(BillsContext {
                    active: Route::Bills.id(),
                    rows: bills.iter().map(BillRow::from).collect(),
                })?;
                self.tera.render("bills.html", &context)
            }
        }
    }

    pub fn render_error(&self, active: Route, message: &str) -> Result<String, tera::Error> {
        let context = Context::from_serialize(ErrorContext {
            active: active.id(),
            error: message,
        })?;
        self.tera.render("error.html", &context)
    }

    pub fn render_new_bill(&self, page: &NewBillPage) -> Result<String, tera::Error> {
        let context = Context::from_serialize(page)?;
        self.tera.render("new_bill.html", &context)
    }
}
