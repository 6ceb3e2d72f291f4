//! The bills list: ordering, row actions and loading from the store.

use std::cmp::Ordering;
use std::sync::Arc;

use chrono::NaiveDate;

use crate::error::StoreError;
use crate::model::BillRecord;
use crate::routes::{Navigator, Route};
use crate::store::RemoteBillsClient;
use crate::views::BillsPage;

const FRENCH_MONTHS: [&str; 12] = [
    "Jan", "Fév", "Mar", "Avr", "Mai", "Jui", "Jui", "Aoû", "Sep", "Oct", "Nov", "Déc",
];

fn parse_date(date: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(date, "%Y-%m-%d").ok()
}

/// Most recent first. Undated rows go last; equal dates keep their order.
pub fn compare_dates_desc(a: &str, b: &str) -> Ordering {
    match (parse_date(a), parse_date(b)) {
        (Some(x), Some(y)) => y.cmp(&x),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => b.cmp(a),
    }
}

pub fn sort_by_date_desc(bills: &mut [BillRecord]) {
    bills.sort_by(|a, b| compare_dates_desc(&a.date, &b.date));
}

/// `2004-04-04` becomes `4 Avr. 04`. Unparseable dates are returned as-is.
pub fn format_date(date: &str) -> String {
    use chrono::Datelike;

    match parse_date(date) {
        Some(d) => format!(
            "{} {}. {:02}",
            d.day(),
            FRENCH_MONTHS[d.month0() as usize],
            d.year().rem_euclid(100)
        ),
        None => date.to_string(),
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AttachmentPreview {
    pub file_url: String,
    pub file_name: String,
}

pub struct BillsList {
    store: Arc<dyn RemoteBillsClient>,
    navigator: Arc<dyn Navigator>,
}

impl BillsList {
    pub fn new(store: Arc<dyn RemoteBillsClient>, navigator: Arc<dyn Navigator>) -> Self {
        Self { store, navigator }
    }

    pub fn handle_click_new_bill(&self) {
        self.navigator.navigate(Route::NewBill);
    }

    pub fn handle_click_icon_eye(&self, bill: &BillRecord) -> AttachmentPreview {
        AttachmentPreview {
            file_url: bill.file_url.clone(),
            file_name: bill.file_name.clone(),
        }
    }

    pub async fn get_bills(&self) -> Result<Vec<BillRecord>, StoreError> {
        let mut bills = self.store.list().await.map_err(|err| {
            tracing::warn!(error = %err, "could not load bills");
            err
        })?;
        sort_by_date_desc(&mut bills);
        tracing::debug!(count = bills.len(), "bills loaded");
        Ok(bills)
    }

    /// Page state after a load: the bills, or the store's error message.
    pub async fn load_page(&self) -> BillsPage {
        match self.get_bills().await {
            Ok(bills) => BillsPage::Data(bills),
            Err(err) => BillsPage::Error(err.to_string()),
        }
    }
}
