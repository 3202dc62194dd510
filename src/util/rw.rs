use std::{cell::RefCell, fs::File, io, path::PathBuf, rc::Rc};

// Shared, mutable, single-threaded.
pub type RcRefCell<T> = Rc<RefCell<T>>;

/// An in-memory io::Write sink, for capturing output in tests.
pub struct StringBuffer {
    s: String,
}

impl StringBuffer {
    pub fn new() -> StringBuffer {
        StringBuffer { s: String::new() }
    }

    pub fn as_str(&self) -> &str {
        &self.s
    }

    /// Takes the buffered text, leaving the buffer empty.
    pub fn export_string(&mut self) -> String {
        std::mem::take(&mut self.s)
    }
}

impl io::Write for StringBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let text = std::str::from_utf8(buf)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        self.s.push_str(text);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Reads the bytes of a borrowed str.
pub struct StrReader<'a>(io::Cursor<&'a [u8]>);

impl<'a> From<&'a str> for StrReader<'a> {
    fn from(value: &'a str) -> Self {
        StrReader(io::Cursor::new(value.as_bytes()))
    }
}

impl io::Read for StrReader<'_> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        io::Read::read(&mut self.0, buf)
    }
}

// A shared stream writer, cloned into whatever needs to print.
//
// QIF output, warnings and errors all go through these, so they land on
// stdout/stderr, a file, or a test's buffer.
#[derive(Clone)]
pub struct WriteHandle {
    w: RcRefCell<dyn io::Write>,
}

impl WriteHandle {
    fn new(w: impl io::Write + 'static) -> WriteHandle {
        WriteHandle { w: Rc::new(RefCell::new(w)) }
    }

    pub fn stdout_write_handle() -> WriteHandle {
        WriteHandle::new(io::stdout())
    }

    pub fn stderr_write_handle() -> WriteHandle {
        WriteHandle::new(io::stderr())
    }

    pub fn file_write_handle(f: File) -> WriteHandle {
        WriteHandle::new(f)
    }

    pub fn string_buff_write_handle() -> (WriteHandle, RcRefCell<StringBuffer>) {
        let buffer = Rc::new(RefCell::new(StringBuffer::new()));
        (WriteHandle { w: buffer.clone() }, buffer)
    }
}

impl io::Write for WriteHandle {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        // Test harnesses do not capture direct writes to stdout or stderr,
        // so these show up in traces instead.
        tracing::trace!("WriteHandle::write {}", String::from_utf8_lossy(buf));
        self.w.borrow_mut().write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.w.borrow_mut().flush()
    }
}

/// An input source, along with a name to use for it in error messages.
pub enum DescribedReader {
    Text { desc: String, data: String },
    File(PathBuf),
}

impl DescribedReader {
    pub fn from_string(desc: String, data: String) -> DescribedReader {
        DescribedReader::Text { desc, data }
    }

    pub fn from_file_path(path: PathBuf) -> DescribedReader {
        DescribedReader::File(path)
    }

    pub fn desc(&self) -> &str {
        match self {
            DescribedReader::Text { desc, .. } => desc,
            DescribedReader::File(path) => path.to_str().unwrap_or("<unknown path>"),
        }
    }

    /// Opens the source. For a file, this is where a missing file fails.
    pub fn reader(&self) -> io::Result<Box<dyn io::Read + '_>> {
        let r: Box<dyn io::Read + '_> = match self {
            DescribedReader::Text { data, .. } => Box::new(StrReader::from(data.as_str())),
            DescribedReader::File(path) => Box::new(File::open(path)?),
        };
        Ok(r)
    }
}
