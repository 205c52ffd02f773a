//! Resume export: verbatim text and PDF.
//!
//! PDF export wraps the text in a `<pre>` block and hands the HTML to an
//! external converter, which writes the PDF to local disk.

use std::io::Write;
use std::path::Path;

use async_trait::async_trait;
use thiserror::Error;
use tokio::process::Command;
use tracing::{debug, info};

pub const TEXT_FILENAME: &str = "resume.txt";
pub const PDF_FILENAME: &str = "resume.pdf";

#[derive(Debug, Error)]
pub enum ConvertError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{program} exited with {status}: {stderr}")]
    Failed {
        program: String,
        status: std::process::ExitStatus,
        stderr: String,
    },
}

/// Turns an HTML document into a PDF file at `output`.
#[async_trait]
pub trait DocumentConverter: Send + Sync {
    async fn html_to_pdf(&self, html: &str, output: &Path) -> Result<(), ConvertError>;
}

/// Converter backed by the `wkhtmltopdf` binary.
#[derive(Debug, Clone)]
pub struct WkhtmltopdfConverter {
    program: String,
}

impl WkhtmltopdfConverter {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

#[async_trait]
impl DocumentConverter for WkhtmltopdfConverter {
    async fn html_to_pdf(&self, html: &str, output: &Path) -> Result<(), ConvertError> {
        // wkhtmltopdf picks its input parser from the extension.
        let mut input = tempfile::Builder::new().suffix(".html").tempfile()?;
        input.write_all(html.as_bytes())?;
        input.flush()?;

        debug!("Running {} -> {}", self.program, output.display());
        let result = Command::new(&self.program)
            .arg("--quiet")
            .arg(input.path())
            .arg(output)
            .output()
            .await?;

        if !result.status.success() {
            return Err(ConvertError::Failed {
                program: self.program.clone(),
                status: result.status,
                stderr: String::from_utf8_lossy(&result.stderr).trim().to_string(),
            });
        }
        Ok(())
    }
}

/// Wraps resume text in the minimal HTML document used for PDF conversion.
///
/// Markup characters are escaped so the text renders exactly as generated.
pub fn wrap_in_pre(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            _ => escaped.push(c),
        }
    }
    format!("<meta charset=\"utf-8\"><pre>{escaped}</pre>")
}

/// Plain-text export. Returns the stored text byte-for-byte.
pub fn export_text(text: &str) -> Vec<u8> {
    text.as_bytes().to_vec()
}

/// Renders `text` to a PDF under `export_dir` and returns the PDF bytes.
///
/// Each call converts into its own temporary `<file_stem>*.pdf`, removed once
/// read, so concurrent exports never share an output file.
pub async fn export_pdf(
    converter: &dyn DocumentConverter,
    text: &str,
    export_dir: &Path,
    file_stem: &str,
) -> Result<Vec<u8>, ConvertError> {
    tokio::fs::create_dir_all(export_dir).await?;
    let output = tempfile::Builder::new()
        .prefix(&format!("{file_stem}-"))
        .suffix(".pdf")
        .tempfile_in(export_dir)?
        .into_temp_path();

    converter.html_to_pdf(&wrap_in_pre(text), &output).await?;

    let bytes = tokio::fs::read(&output).await?;
    info!("Exported PDF {} ({} bytes)", output.display(), bytes.len());
    output.close()?;
    Ok(bytes)
}
