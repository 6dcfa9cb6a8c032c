mod config;
pub use config::Config;

mod coordinator;

pub mod driver;
pub use driver::Connection;

pub mod emit;

pub mod extract;

mod run;
pub use run::{default_output_dir, generate, reset_dir, run_redcap, run_relational};

pub use datamodels_core::{
    schema::{DataModel, Stamp, TableRecords},
    Error, FieldMetadata, Introspect, Result,
};
