//! Core data model types: attachments, form drafts and email addresses.

pub mod address;
pub mod attachment;
pub mod draft;
