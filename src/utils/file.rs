use chrono::{DateTime, Local};
use log::debug;
use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;

pub fn report_file_name(hostname: &str, captured_at: &DateTime<Local>) -> String {
    format!(
        "SystemReport-{}-{}.txt",
        hostname,
        captured_at.format("%Y%m%d_%H%M%S")
    )
}

/// Write the report once. An existing file with the same name is an error,
/// never appended to or truncated.
pub fn write_report(dir: &Path, file_name: &str, contents: &str) -> io::Result<PathBuf> {
    let start = Instant::now();
    let path = dir.join(file_name);
    let mut file = OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(&path)?;
    file.write_all(contents.as_bytes())?;
    file.flush()?;
    debug!("write_report took: {} ms", start.elapsed().as_millis());
    Ok(path)
}
