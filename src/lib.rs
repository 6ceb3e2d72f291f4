//! billed: expense reports for employees.
//!
//! A bills list sorted most recent first, and a "new bill" form that gates
//! the receipt format, assembles the record and hands it to a bill store.

pub mod bills;
pub mod config;
pub mod error;
pub mod fixtures;
pub mod model;
pub mod new_bill;
pub mod router;
pub mod routes;
pub mod session;
pub mod store;
pub mod views;

pub use bills::{AttachmentPreview, BillsList, format_date, sort_by_date_desc};
pub use error::{
    AttachmentError, BilledError, FieldError, SessionError, StoreError, UNSUPPORTED_FORMAT_MESSAGE,
};
pub use model::{
    AttachedFile, BillRecord, BillStatus, NewBillInput, RawBillFields, SessionUser, UserType,
};
pub use new_bill::{AttachmentState, BlockReason, NewBillForm, StagedAttachment, Submission};
pub use router::Router;
pub use routes::{NavigationLog, Navigator, Route};
pub use store::{JsonFileStore, MockBillsStore, RemoteBillsClient};
pub use views::{BillsPage, Views};
