use std::fs::{self, File};
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use tracing::info;

use pcodes_config::ProjectConfig;

use crate::csv_io::{write_lengths_csv, write_pcodes_csv};
use crate::error::{OutputError, Result};
use crate::metadata::DatasetMetadata;
use crate::tables::GlobalTables;

pub const METADATA_FILE_NAME: &str = "dataset.json";

/// Paths of the files produced by [`write_outputs`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputFiles {
    pub all: PathBuf,
    pub adm_1_2: PathBuf,
    pub lengths: PathBuf,
    pub metadata: PathBuf,
}

impl OutputFiles {
    pub fn in_dir(dir: &Path, config: &ProjectConfig) -> Self {
        Self {
            all: dir.join(&config.resources.all.name),
            adm_1_2: dir.join(&config.resources.adm_1_2.name),
            lengths: dir.join(&config.resources.lengths.name),
            metadata: dir.join(METADATA_FILE_NAME),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Path> {
        [&self.all, &self.adm_1_2, &self.lengths, &self.metadata]
            .into_iter()
            .map(PathBuf::as_path)
    }
}

/// Write the three tables and the dataset metadata into `dir`.
pub fn write_outputs(dir: &Path, tables: &GlobalTables, config: &ProjectConfig) -> Result<OutputFiles> {
    fs::create_dir_all(dir).map_err(|e| OutputError::io(dir, e))?;
    let files = OutputFiles::in_dir(dir, config);

    let all = write_pcodes_csv(&files.all, &tables.all)?;
    let adm_1_2 = write_pcodes_csv(&files.adm_1_2, &tables.adm_1_2)?;
    let lengths = write_lengths_csv(&files.lengths, &tables.lengths)?;
    write_metadata(
        &files.metadata,
        &DatasetMetadata::new(config, tables.start_date.as_deref()),
    )?;

    info!(
        dir = %dir.display(),
        all,
        adm_1_2,
        lengths,
        "outputs written"
    );
    Ok(files)
}

pub fn write_metadata(path: &Path, metadata: &DatasetMetadata) -> Result<()> {
    let file = File::create(path).map_err(|e| OutputError::io(path, e))?;
    serde_json::to_writer_pretty(BufWriter::new(file), metadata).map_err(|source| {
        OutputError::Json {
            path: path.to_path_buf(),
            source,
        }
    })
}
