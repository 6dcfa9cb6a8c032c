//! REDCap field-metadata sources and the multi-project driver.
//!
//! Metadata can be read from a data dictionary file ([`source::file`]),
//! exported through the REDCap API ([`source::api`]) or queried directly from
//! a REDCap MySQL database ([`source::db`]). Every source yields
//! [`FieldMetadata`] records for [`datamodels::run_redcap`].

pub mod client;
pub use client::{Client, ClientConfig, Content, HttpTransport, Transport};

mod run_all;
pub use run_all::run_all;

pub mod source;
pub use source::{
    api::Project,
    db::{Database, DbConfig},
    Catalog,
};

pub use datamodels_core::{Error, FieldMetadata, Result};
