use std::io::Write;
use std::path::{Path, PathBuf};

use clap::Parser;
use regex::Regex;

use crate::brokerage::io::{load_export, ExportFormat};
use crate::qif::summary::render_summary;
use crate::qif::writer::{convert_txs, render_qif};
use crate::util::basic::SError;
use crate::util::rw::{DescribedReader, WriteHandle};
use crate::write_errln;

#[derive(clap::ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum FormatArg {
    Auto,
    Json,
    Csv,
}

impl std::fmt::Display for FormatArg {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = format!("{self:?}").to_lowercase();
        write!(f, "{s}")
    }
}

/// Converts a brokerage transaction history export to a QIF file, which can
/// be imported into an investment account.
///
/// By default, the QIF is written next to the export, with a .qif extension.
#[derive(Parser, Debug)]
#[command(author, version = crate::app::APP_VERSION, about)]
pub struct Args {
    /// Transaction history exported from your brokerage.
    /// A .json, or a .csv with the same columns.
    #[arg(required = true)]
    pub export_file: PathBuf,

    /// Write the QIF to this path, instead of next to the export file.
    #[arg(short = 'o', long)]
    pub output: Option<PathBuf>,

    /// Print the QIF to stdout instead of writing a file.
    #[arg(long, default_value_t = false, conflicts_with = "output")]
    pub stdout: bool,

    /// Format of the export file.
    ///
    /// auto treats files ending in .csv as CSV, and anything else as JSON.
    #[arg(short = 'f', long, default_value_t = FormatArg::Auto,
          ignore_case = true)]
    pub format: FormatArg,

    /// Only convert transactions for a symbol.
    ///
    /// Is treated as a regular expression, and must partially match.
    /// Transactions with no symbol (interest, cash transfers) will not match
    /// anything but an empty pattern.
    #[arg(long, alias = "security")]
    pub symbol: Option<Regex>,

    /// Print a table of converted record counts per action.
    #[arg(long, default_value_t = false)]
    pub summary: bool,

    /// Turn on debug tracing for the conversion.
    ///
    /// More control is available with the TRACE variable.
    #[arg(long)]
    pub debug: bool,
}

fn resolve_format(format: FormatArg, export_file: &Path) -> ExportFormat {
    match format {
        FormatArg::Json => ExportFormat::Json,
        FormatArg::Csv => ExportFormat::Csv,
        FormatArg::Auto => {
            let is_csv = export_file
                .extension()
                .map(|ext| ext.eq_ignore_ascii_case("csv"))
                .unwrap_or(false);
            if is_csv {
                ExportFormat::Csv
            } else {
                ExportFormat::Json
            }
        }
    }
}

/// The default output path: the export's path, with a .qif extension.
pub fn qif_output_path(export_file: &Path) -> PathBuf {
    export_file.with_extension("qif")
}

// Sibling of the output, in the same directory so the rename stays on one
// filesystem.
fn partial_output_path(path: &Path) -> PathBuf {
    let mut fname = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    fname.push(".partial");
    path.with_file_name(fname)
}

/// Writes the document to a temporary sibling file, then renames it over
/// path. An existing file at path is only replaced by a complete document.
fn write_qif_file(path: &Path, qif_text: &str) -> Result<(), SError> {
    let err = |e: std::io::Error| format!("Failed to write {}: {e}", path.display());
    let tmp_path = partial_output_path(path);

    let write_tmp = || -> std::io::Result<()> {
        let f = std::fs::File::create(&tmp_path)?;
        let mut w = WriteHandle::file_write_handle(f);
        w.write_all(qif_text.as_bytes())?;
        w.flush()
    };
    let res = write_tmp().and_then(|_| std::fs::rename(&tmp_path, path));
    if let Err(e) = res {
        if tmp_path.exists() {
            let _ = std::fs::remove_file(&tmp_path);
        }
        return Err(err(e));
    }
    Ok(())
}

pub fn run() -> Result<(), ()> {
    let args = Args::parse();
    run_with_args(
        args,
        WriteHandle::stdout_write_handle(),
        WriteHandle::stderr_write_handle(),
    )
}

/// Returned Err is for exit code determination only.
/// All errors are written to err_w.
pub fn run_with_args(
    args: Args,
    mut out_w: WriteHandle,
    mut err_w: WriteHandle,
) -> Result<(), ()> {
    if args.debug {
        crate::tracing::enable_trace_env("brokerage_qif=debug");
    }
    crate::tracing::setup_tracing();

    let format = resolve_format(args.format, &args.export_file);
    let reader = DescribedReader::from_file_path(args.export_file.clone());
    let export = load_export(&reader, format)
        .map_err(|e| write_errln!(err_w, "Error: {e}"))?;

    let mut txs = export.transactions;
    if let Some(pattern) = &args.symbol {
        txs.retain(|tx| pattern.is_match(&tx.symbol));
    }
    tracing::debug!("run_with_args: converting {} transactions", txs.len());

    let result = convert_txs(txs);
    for skipped in &result.skipped {
        write_errln!(err_w, "Warning: {skipped}");
    }

    let qif_text = render_qif(&result.records);

    if args.stdout {
        writeln!(out_w, "{qif_text}")
            .map_err(|e| write_errln!(err_w, "Error: {e}"))?;
        if args.summary {
            write_errln!(err_w, "{}", render_summary(&result));
        }
        return Ok(());
    }

    let out_path = match &args.output {
        Some(p) => p.clone(),
        None => qif_output_path(&args.export_file),
    };
    write_qif_file(&out_path, &qif_text)
        .map_err(|e| write_errln!(err_w, "Error: {e}"))?;

    writeln!(out_w, "QIF file written to: {}", out_path.display())
        .map_err(|e| write_errln!(err_w, "Error: {e}"))?;
    if args.summary {
        writeln!(out_w, "{}", render_summary(&result))
            .map_err(|e| write_errln!(err_w, "Error: {e}"))?;
    }
    Ok(())
}
