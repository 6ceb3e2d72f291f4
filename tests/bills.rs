use std::sync::Arc;

use billed::fixtures;
use billed::{
    BillsList, BillsPage, MockBillsStore, NavigationLog, RemoteBillsClient, Route, Router,
    SessionUser, StoreError, Views,
};
use regex::Regex;

fn rendered_dates(html: &str) -> Vec<String> {
    let re = Regex::new(
        r#"data-testid="bill-date">((19|20)\d\d-(0[1-9]|1[012])-(0[1-9]|[12][0-9]|3[01]))<"#,
    )
    .unwrap();
    re.captures_iter(html).map(|c| c[1].to_string()).collect()
}

fn fixture_list(nav: Arc<NavigationLog>) -> BillsList {
    BillsList::new(Arc::new(MockBillsStore::with_fixtures()), nav)
}

fn employee_router(store: Arc<dyn RemoteBillsClient>) -> Router {
    Router::new(
        SessionUser::employee("employee@test.tld"),
        store,
        Arc::new(NavigationLog::new()),
        "https://images.com",
    )
    .unwrap()
}

#[test]
fn bills_are_displayed() {
    let html = Views::new()
        .unwrap()
        .render_bills(&BillsPage::Data(fixtures::bills()))
        .unwrap();
    assert!(html.contains(r#"data-testid="bill-type">Transports<"#));
    assert_eq!(html.matches(r#"data-testid="icon-eye""#).count(), 4);
}

#[test]
fn bills_are_ordered_most_recent_first() {
    let views = Views::new().unwrap();
    let mut bills = fixtures::bills();

    for _ in 0..bills.len() {
        bills.rotate_left(1);
        let html = views.render_bills(&BillsPage::Data(bills.clone())).unwrap();
        let dates = rendered_dates(&html);
        assert_eq!(dates.len(), 4);

        let mut sorted = dates.clone();
        sorted.sort_by(|a, b| b.cmp(a));
        assert_eq!(dates, sorted);
    }
}

#[test]
fn error_messages_are_displayed() {
    let views = Views::new().unwrap();
    for message in ["Erreur 404", "Erreur 500"] {
        let html = views.render_bills(&BillsPage::Error(message.into())).unwrap();
        let re = Regex::new(message).unwrap();
        assert!(re.is_match(&html), "{message} not rendered");
        assert!(!html.contains("bill-date"));
    }
}

#[test]
fn eye_icon_surfaces_the_attachment() {
    let list = fixture_list(Arc::new(NavigationLog::new()));
    let bill = &fixtures::bills()[0];
    let preview = list.handle_click_icon_eye(bill);
    assert_eq!(preview.file_url, bill.file_url);
    assert_eq!(preview.file_name, "preview-facture-free-201801-pdf-1.jpg");
}

#[test]
fn new_bill_button_navigates() {
    let nav = Arc::new(NavigationLog::new());
    let list = fixture_list(nav.clone());
    list.handle_click_new_bill();
    assert_eq!(nav.visits(), vec![Route::NewBill]);
}

#[tokio::test]
async fn get_bills_sorts_store_data() {
    let list = fixture_list(Arc::new(NavigationLog::new()));
    let bills = list.get_bills().await.unwrap();
    let dates: Vec<_> = bills.iter().map(|b| b.date.as_str()).collect();
    assert_eq!(dates, ["2004-04-04", "2003-03-03", "2002-02-02", "2001-01-01"]);
}

#[tokio::test]
async fn fetches_bills_from_the_store() {
    let router = employee_router(Arc::new(MockBillsStore::with_fixtures()));
    let html = router.render(Route::Bills).await.unwrap();

    assert!(html.contains("Mes notes de frais"));
    assert!(html.contains("Transports"));
    assert!(html.contains("Hôtel et logement"));
    assert!(html.contains(r#"data-testid="icon-window" class="active-icon""#));
    assert_eq!(rendered_dates(&html).first().map(String::as_str), Some("2004-04-04"));
}

#[tokio::test]
async fn store_errors_render_the_error_page() {
    let cases = [
        (StoreError::NotFound, "Erreur 404"),
        (StoreError::Internal, "Erreur 500"),
        (StoreError::Backend("Erreur 401".into()), "Erreur 401"),
    ];
    for (failure, text) in cases {
        let router = employee_router(Arc::new(MockBillsStore::failing(failure)));
        let html = router.render(Route::Bills).await.unwrap();
        assert!(html.contains(&format!(r#"data-testid="error-message">{text}<"#)));
    }
}

#[tokio::test]
async fn submitted_bill_shows_up_in_the_list() {
    let store = Arc::new(MockBillsStore::with_fixtures());
    let nav = Arc::new(NavigationLog::new());
    let router = Router::new(
        SessionUser::employee("a@a"),
        store.clone(),
        nav.clone(),
        "https://images.com",
    )
    .unwrap();

    let mut form = router.new_bill_form();
    let receipt = billed::AttachedFile::new("receipt.jpg", "image/jpeg", vec![1, 2, 3]);
    form.handle_file_selection(receipt);
    let input = billed::NewBillInput::parse(billed::RawBillFields {
        expense_type: "Services en ligne".into(),
        expense_name: "abonnement".into(),
        amount: "12.5".into(),
        date: "2023-05-01".into(),
        vat_amount: "2".into(),
        vat_percent: "".into(),
        commentary: "".into(),
    })
    .unwrap();
    assert_eq!(form.submit(input).settled().await, Some(Ok(())));
    assert_eq!(nav.last(), Some(Route::Bills));

    let html = router.render(Route::Bills).await.unwrap();
    assert_eq!(rendered_dates(&html).first().map(String::as_str), Some("2023-05-01"));
    assert!(html.contains("abonnement"));
    assert!(html.contains("12.50 €"));
}
