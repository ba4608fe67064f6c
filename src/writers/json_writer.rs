use crate::error::Result;
use serde::Serialize;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use tracing::info;

/// Serializes reports for the presentation layer.
pub struct JsonWriter {
    pretty: bool,
}

impl JsonWriter {
    pub fn new() -> Self {
        Self { pretty: true }
    }

    pub fn with_pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }

    pub fn to_string<T: Serialize>(&self, value: &T) -> Result<String> {
        let text = if self.pretty {
            serde_json::to_string_pretty(value)?
        } else {
            serde_json::to_string(value)?
        };
        Ok(text)
    }

    pub fn write<T: Serialize, W: Write>(&self, value: &T, mut writer: W) -> Result<()> {
        if self.pretty {
            serde_json::to_writer_pretty(&mut writer, value)?;
        } else {
            serde_json::to_writer(&mut writer, value)?;
        }
        writeln!(writer)?;
        writer.flush()?;
        Ok(())
    }

    /// Write to `path`, creating parent directories as needed.
    pub fn write_to_path<T: Serialize>(&self, value: &T, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        let file = File::create(path)?;
        self.write(value, BufWriter::new(file))?;

        info!(path = %path.display(), "Wrote JSON report");
        Ok(())
    }

    pub fn write_to_stdout<T: Serialize>(&self, value: &T) -> Result<()> {
        let stdout = std::io::stdout();
        self.write(value, stdout.lock())
    }
}

impl Default for JsonWriter {
    fn default() -> Self {
        Self::new()
    }
}
