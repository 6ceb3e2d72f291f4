use crate::model::{BillRecord, BillStatus};

pub const EXPENSE_TYPES: [&str; 7] = [
    "Transports",
    "Restaurants et bars",
    "Hôtel et logement",
    "Services en ligne",
    "IT et électronique",
    "Equipement et matériel",
    "Fournitures de bureau",
];

fn bill(
    expense_type: &str,
    expense_name: &str,
    amount: f64,
    date: &str,
    status: BillStatus,
    file_name: &str,
) -> BillRecord {
    BillRecord {
        email: "a@a".to_string(),
        expense_type: expense_type.to_string(),
        expense_name: expense_name.to_string(),
        amount,
        date: date.to_string(),
        vat_amount: "70".to_string(),
        vat_percent: 20,
        commentary: "séminaire billed".to_string(),
        file_url: format!("https://test.storage.tld/v0/b/billable/{file_name}"),
        file_name: file_name.to_string(),
        status,
    }
}

/// Sample bills, deliberately stored out of date order.
pub fn bills() -> Vec<BillRecord> {
    vec![
        bill(
            "Hôtel et logement",
            "encore",
            400.0,
            "2004-04-04",
            BillStatus::Pending,
            "preview-facture-free-201801-pdf-1.jpg",
        ),
        bill(
            "Services en ligne",
            "test3",
            300.0,
            "2003-03-03",
            BillStatus::Accepted,
            "facture-client-php-exportee-dans-document-pdf-enregistre-sur-disque-dur.png",
        ),
        bill(
            "Transports",
            "test1",
            100.0,
            "2001-01-01",
            BillStatus::Refused,
            "1592770761.jpeg",
        ),
        bill(
            "Restaurants et bars",
            "test2",
            200.0,
            "2002-02-02",
            BillStatus::Accepted,
            "facture-aldi.jpg",
        ),
    ]
}
