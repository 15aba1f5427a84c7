//! `billforge-invoicing` — the invoice record and the engine facade.
//!
//! [`invoice`] holds the persisted record; [`lifecycle`] is the state
//! machine gating every mutation; [`store`] defines the persistence and
//! clock seams; [`service`] wires computation, numbering, hashing, and the
//! guard into the operations the calling layer sees.

pub mod invoice;
pub mod lifecycle;
pub mod service;
pub mod store;

pub use invoice::{Invoice, InvoiceStatus, PaymentStatus};
pub use service::{CreateInvoice, InvoiceChanges, InvoiceEngine, IntegrityReport};
pub use store::{Clock, InvoiceStore};
