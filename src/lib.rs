//! `ctrlcraft-inquiry`: the inquiry pipeline of the CtrlCraft controller shop.
//!
//! Reference images are collected by [`intake::AttachmentIntake`], the form
//! is validated and turned into a sanitized message by [`submission`], and
//! the message is delivered through a [`relay::Relay`] (EmailJS in
//! production). [`page::InquiryPage`] ties the pieces together.

pub mod config;
pub mod error;
pub mod i18n;
pub mod intake;
pub mod message;
pub mod model;
pub mod notice;
pub mod page;
pub mod relay;
pub mod submission;
