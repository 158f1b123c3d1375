//! Feature services: thin, typed bindings of backend resources.
//!
//! Each service pairs one backend resource with request/response DTOs and is
//! built entirely on [`crate::http::ApiClient`]. Services carry no error
//! handling of their own beyond the typed envelope - classification happens
//! once in the transport.

pub mod catalog;
pub mod complaints;
pub mod materials;
pub mod models;
pub mod orders;
pub mod payments;
pub mod printing;

pub use catalog::{CatalogService, Product, ProductInput};
pub use complaints::{Complaint, ComplaintInput, ComplaintService, IncidentReport, IncidentReportInput};
pub use materials::{Material, MaterialInput, MaterialService};
pub use models::{Model3D, ModelService, ModelUpload};
pub use orders::{Order, OrderLine, OrderService};
pub use payments::{PaymentConfirmation, PaymentIntent, PaymentService};
pub use printing::{PrintJob, PrintingService};
