use std::sync::Arc;

use crate::bills::BillsList;
use crate::error::{BilledError, Result};
use crate::model::SessionUser;
use crate::new_bill::NewBillForm;
use crate::routes::{Navigator, Route};
use crate::store::RemoteBillsClient;
use crate::views::Views;

/// Builds the page for a route, for the employee injected at construction.
pub struct Router {
    session: SessionUser,
    store: Arc<dyn RemoteBillsClient>,
    navigator: Arc<dyn Navigator>,
    views: Views,
    attachment_base_url: String,
}

impl Router {
    pub fn new(
        session: SessionUser,
        store: Arc<dyn RemoteBillsClient>,
        navigator: Arc<dyn Navigator>,
        attachment_base_url: impl Into<String>,
    ) -> Result<Self> {
        Ok(Self {
            session,
            store,
            navigator,
            views: Views::new()?,
            attachment_base_url: attachment_base_url.into(),
        })
    }

    pub fn views(&self) -> &Views {
        &self.views
    }

    pub fn bills(&self) -> BillsList {
        BillsList::new(Arc::clone(&self.store), Arc::clone(&self.navigator))
    }

    pub fn new_bill_form(&self) -> NewBillForm {
        NewBillForm::new(
            self.session.clone(),
            Arc::clone(&self.store),
            Arc::clone(&self.navigator),
            self.attachment_base_url.clone(),
        )
    }

    pub async fn render(&self, route: Route) -> Result<String> {
        if !self.session.is_employee() {
            return Err(BilledError::Forbidden(route));
        }
        tracing::debug!(route = %route, "render");

        match route {
            Route::Bills => {
                let page = self.bills().load_page().await;
                Ok(self.views.render_bills(&page)?)
            }
            Route::NewBill => Ok(self.new_bill_form().render(&self.views)?),
            Route::Login | Route::Dashboard => Err(BilledError::UnsupportedRoute(route)),
        }
    }
}
