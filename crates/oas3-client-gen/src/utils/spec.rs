use std::{ffi::OsStr, path::Path};

use anyhow::Context;
use fmmap::tokio::{AsyncMmapFile, AsyncMmapFileExt};
use oas3_client_gen::SpecFormat;

/// An OpenAPI document mapped from disk.
pub struct SpecFile {
  file: AsyncMmapFile,
  format: SpecFormat,
}

impl SpecFile {
  pub async fn open(path: &Path) -> anyhow::Result<Self> {
    let file = AsyncMmapFile::open(path)
      .await
      .with_context(|| format!("failed to open {}", path.display()))?;
    let name = path.file_name().and_then(OsStr::to_str).unwrap_or_default();
    let format = SpecFormat::detect(name, file.as_slice());

    Ok(Self { file, format })
  }

  pub fn format(&self) -> SpecFormat {
    self.format
  }

  /// Copies the document out of the mapping so it can move to a worker thread.
  pub fn to_bytes(&self) -> Vec<u8> {
    self.file.as_slice().to_vec()
  }
}
