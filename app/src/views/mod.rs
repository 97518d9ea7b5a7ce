//! Derived views: pure computations over the ticket collection.
//!
//! Nothing here touches slice state or the backend; every function takes a
//! slice of tickets and returns display-ready data. The list page uses
//! [`list::TicketQuery`], the dashboard uses the count aggregations, and the
//! admin export uses [`export::export_csv`].

pub mod dashboard;
pub mod export;
pub mod list;

pub use dashboard::{priority_counts, status_counts};
pub use export::{CSV_HEADER, ExportScope, export_csv};
pub use list::{SortField, SortOrder, StatusFilter, TicketQuery};
