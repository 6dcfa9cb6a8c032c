pub mod driver;
pub use driver::Introspect;

mod error;
pub use error::Error;

pub mod redcap;
pub use redcap::FieldMetadata;

pub mod schema;
pub use schema::DataModel;

/// A Result type alias that uses the data model [`Error`] type.
pub type Result<T> = core::result::Result<T, Error>;

pub use async_trait::async_trait;
