use crate::analyzer::{RankedList, SuspiciousSet, TopEntry};
use crate::error::AnalyzerError;
use std::fmt::Display;
use std::fs;
use std::io::{self, Write};
use std::path::Path;
use tempfile::NamedTempFile;
use tracing::{debug, info};

/// Which endpoints go into the CSV endpoint section
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndpointRows {
    /// Only the most accessed endpoint
    Top,
    /// Every endpoint in ranked order
    All,
}

/// Writes CSV records, plus the bare blank lines that separate sections
struct SectionWriter<W: Write> {
    out: W,
}

impl<W: Write> SectionWriter<W> {
    fn new(out: W) -> Self {
        SectionWriter { out }
    }

    /// Each record is encoded on its own since rows differ in length
    fn row<I, T>(&mut self, fields: I) -> io::Result<()>
    where
        I: IntoIterator<Item = T>,
        T: AsRef<[u8]>,
    {
        let mut record = csv::WriterBuilder::new()
            .terminator(csv::Terminator::Any(b'\n'))
            .from_writer(Vec::new());
        record.write_record(fields)?;
        let bytes = record.into_inner().map_err(|e| e.into_error())?;
        self.out.write_all(&bytes)
    }

    fn count_row(&mut self, key: impl Display, count: usize) -> io::Result<()> {
        self.row([key.to_string(), count.to_string()])
    }

    // csv encodes an empty record as `""`, so separators bypass it
    fn blank(&mut self) -> io::Result<()> {
        self.out.write_all(b"\n")
    }

    fn finish(mut self) -> io::Result<W> {
        self.out.flush()?;
        Ok(self.out)
    }
}

/// Render the three result sets as a sectioned CSV document into `out`.
///
/// Records end in `\n`, not the `\r\n` that Python's `csv.writer` emits,
/// and section separators are empty lines.
pub fn render_report<W, K, E>(
    out: W,
    ip_counts: &RankedList<K>,
    endpoint_counts: &RankedList<E>,
    suspicious: &SuspiciousSet<K>,
    endpoints: EndpointRows,
) -> io::Result<W>
where
    W: Write,
    K: Display + PartialEq,
    E: Display,
{
    let mut w = SectionWriter::new(out);

    w.row(["Requests per IP"])?;
    w.row(["IP Address", "Request Count"])?;
    for entry in ip_counts {
        w.count_row(&entry.key, entry.count)?;
    }
    w.blank()?;

    w.row(["Most Accessed Endpoint"])?;
    w.row(["Endpoint", "Access Count"])?;
    match (endpoint_counts.top(), endpoints) {
        (TopEntry::Empty, _) => w.row(["No endpoints found"])?,
        (TopEntry::Found(top), EndpointRows::Top) => w.count_row(&top.key, top.count)?,
        (TopEntry::Found(_), EndpointRows::All) => {
            for entry in endpoint_counts {
                w.count_row(&entry.key, entry.count)?;
            }
        }
    }
    w.blank()?;

    if suspicious.is_empty() {
        w.row(["No suspicious activity detected"])?;
    } else {
        w.row(["Suspicious Activity Detected:"])?;
        w.row(["IP Address", "Failed Login Count"])?;
        for entry in suspicious.entries() {
            w.count_row(&entry.key, entry.count)?;
        }
    }

    w.finish()
}

/// Write the CSV report to `path`, replacing any existing file.
///
/// The document is written to a temporary file next to `path` and renamed
/// into place, so a failed run never leaves a half-written report behind.
pub fn write_report<K, E>(
    path: &Path,
    ip_counts: &RankedList<K>,
    endpoint_counts: &RankedList<E>,
    suspicious: &SuspiciousSet<K>,
    endpoints: EndpointRows,
) -> Result<(), AnalyzerError>
where
    K: Display + PartialEq,
    E: Display,
{
    let write_error = |source: io::Error| AnalyzerError::WriteError {
        path: path.to_path_buf(),
        source,
    };

    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    let tmp = create_temp(dir, path).map_err(write_error)?;
    debug!(tmp = %tmp.path().display(), "rendering report");

    let tmp = render_report(tmp, ip_counts, endpoint_counts, suspicious, endpoints)
        .map_err(write_error)?;
    tmp.as_file().sync_all().map_err(write_error)?;
    tmp.persist(path).map_err(|e| write_error(e.error))?;

    info!(path = %path.display(), "report written");
    Ok(())
}

/// Temp file whose mode matches what a plain overwrite of `target` would leave:
/// the existing file's permissions, or 0o666 minus the umask for a new one.
fn create_temp(dir: &Path, target: &Path) -> io::Result<NamedTempFile> {
    let mut builder = tempfile::Builder::new();
    builder.prefix(".log_analysis");
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        builder.permissions(fs::Permissions::from_mode(0o666));
    }
    let tmp = builder.tempfile_in(dir)?;

    if let Ok(meta) = fs::metadata(target) {
        tmp.as_file().set_permissions(meta.permissions())?;
    }
    Ok(tmp)
}
