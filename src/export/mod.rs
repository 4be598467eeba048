// src/export/mod.rs
//! Writing long tables (and chart specs) to disk. Every writer goes through a
//! dot-prefixed temp file that is renamed over the target once complete.

use crate::error::Result;
use crate::reshape::LongTable;
use parquet::arrow::ArrowWriter;
use serde_json::Value;
use std::{
    fs::{self, File},
    io::Write,
    path::{Path, PathBuf},
};
use tracing::info;

pub fn write_parquet(long: &LongTable, path: impl AsRef<Path>) -> Result<()> {
    let batch = long.to_record_batch()?;
    let path = path.as_ref();
    write_atomically(path, |file| {
        let mut writer = ArrowWriter::try_new(file, batch.schema(), None)?;
        writer.write(&batch)?;
        writer.close()?;
        Ok(())
    })?;
    info!(path = %path.display(), rows = batch.num_rows(), "wrote parquet");
    Ok(())
}

pub fn write_csv(long: &LongTable, path: impl AsRef<Path>) -> Result<()> {
    let batch = long.to_record_batch()?;
    let path = path.as_ref();
    write_atomically(path, |file| {
        let mut writer = arrow::csv::WriterBuilder::new().with_header(true).build(file);
        writer.write(&batch)?;
        Ok(())
    })?;
    info!(path = %path.display(), rows = batch.num_rows(), "wrote csv");
    Ok(())
}

pub fn write_chart_spec(spec: &Value, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    write_atomically(path, |mut file| {
        serde_json::to_writer_pretty(&mut file, spec)?;
        file.write_all(b"\n")?;
        Ok(())
    })?;
    info!(path = %path.display(), "wrote chart spec");
    Ok(())
}

fn write_atomically<F>(path: &Path, write: F) -> Result<()>
where
    F: FnOnce(File) -> Result<()>,
{
    let tmp_path = tmp_path_for(path);
    let file = File::create(&tmp_path)?;
    if let Err(e) = write(file) {
        let _ = fs::remove_file(&tmp_path);
        return Err(e);
    }
    fs::rename(&tmp_path, path)?;
    Ok(())
}

fn tmp_path_for(path: &Path) -> PathBuf {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "output".to_string());
    path.with_file_name(format!(".{}.tmp", name))
}
