//! Publishing the global p-code tables.

pub mod csv_io;
pub mod error;
pub mod metadata;
pub mod tables;
pub mod writer;

pub use csv_io::{read_pcodes_csv, write_lengths_csv, write_pcodes_csv};
pub use error::{OutputError, Result};
pub use metadata::{DatasetMetadata, GroupRef, ResourceMetadata};
pub use tables::{
    GlobalTables, LENGTH_HEADERS, LENGTH_HXL_TAGS, PCODE_HEADERS, PCODE_HXL_TAGS, assemble,
    compare_records,
};
pub use writer::{METADATA_FILE_NAME, OutputFiles, write_metadata, write_outputs};
