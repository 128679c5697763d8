pub mod classifier;
pub mod events;
pub mod modal;
pub mod proxy;
pub mod scheduling;

pub use crate::domain::model::{ContactSubmission, ModalEvent, ModalStep, ProxyReply};
pub use crate::domain::ports::{ContactSubmitter, CrmContacts, ModalHost};
pub use crate::utils::error::Result;
