//! JSON rendering

use std::io::Write;

use anyhow::Result;
use serde::Serialize;

/// Pretty-print any serializable value as JSON, with a trailing newline.
pub fn render_json<T: Serialize>(value: &T, writer: &mut dyn Write) -> Result<()> {
    serde_json::to_writer_pretty(&mut *writer, value)?;
    writeln!(writer)?;
    Ok(())
}
