use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use themesync_model::{Document, DocumentShape};

use crate::{document_name, StoreIoError};

pub(crate) fn read_json(path: &Path) -> Result<Document, StoreIoError> {
    let file = File::open(path).map_err(|source| StoreIoError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let shape: DocumentShape =
        serde_json::from_reader(BufReader::new(file)).map_err(|source| StoreIoError::Json {
            path: path.to_path_buf(),
            source,
        })?;
    Ok(Document::from_shape(document_name(path), shape)?)
}

pub(crate) fn write_json(path: &Path, document: &Document) -> Result<(), StoreIoError> {
    let io_err = |source| StoreIoError::Io {
        path: path.to_path_buf(),
        source,
    };
    let file = File::create(path).map_err(io_err)?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, &document.to_shape()).map_err(|source| {
        StoreIoError::Json {
            path: path.to_path_buf(),
            source,
        }
    })?;
    writer.flush().map_err(io_err)?;
    log::info!("wrote `{}`", path.display());
    Ok(())
}
