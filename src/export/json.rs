use crate::error::NoiseError;
use crate::generation::FieldMap;
use log::info;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Writes every sample of `map` as pretty-printed JSON.
pub fn export_json(map: &FieldMap, path: impl AsRef<Path>) -> Result<(), NoiseError> {
    let path = path.as_ref();
    let mut writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(&mut writer, map)?;
    writer.flush()?;
    info!("wrote {}", path.display());
    Ok(())
}
