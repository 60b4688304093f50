//! The append-only output surface.

use core::pin::pin;
use std::io::Write;

use futures_core::Stream;
use futures_lite::StreamExt;

use crate::{Error, Record};

/// An append-only sink which writes one JSON object per line.
///
/// # Example
///
/// ```rust
/// use flatten_concurrency::catalog::Person;
/// use flatten_concurrency::sink::Visor;
/// use flatten_concurrency::Record;
///
/// let mut visor = Visor::new(Vec::new());
/// let fer = Person::new("Fer", 47, "Escalada");
/// visor.append(&Record::new(&fer, "Roca")).unwrap();
/// assert_eq!(visor.lines(), 1);
/// assert_eq!(
///     String::from_utf8(visor.into_inner()).unwrap(),
///     "{\"usuario\":\"Fer\",\"aficion\":\"Escalada\",\"opcion\":\"Roca\"}\n",
/// );
/// ```
#[derive(Debug)]
pub struct Visor<W> {
    writer: W,
    lines: usize,
}

impl<W: Write> Visor<W> {
    /// Create a sink which appends to `writer`.
    pub fn new(writer: W) -> Self {
        Self { writer, lines: 0 }
    }

    /// Append a record as a new line.
    ///
    /// The whole line is serialized before any byte reaches the writer.
    /// Failures of the writer itself surface as [`Error::Io`].
    pub fn append(&mut self, record: &Record) -> Result<(), Error> {
        let mut line = serde_json::to_vec(record)?;
        line.push(b'\n');
        self.writer.write_all(&line)?;
        self.writer.flush()?;
        self.lines += 1;
        Ok(())
    }

    /// Returns how many lines have been appended so far.
    pub fn lines(&self) -> usize {
        self.lines
    }

    /// Returns the underlying writer.
    pub fn into_inner(self) -> W {
        self.writer
    }
}

/// Append every record of `stream` to `visor`, in arrival order.
///
/// Resolves to the number of records appended by this call.
pub async fn drain<S, W>(stream: S, visor: &mut Visor<W>) -> Result<usize, Error>
where
    S: Stream<Item = Record>,
    W: Write,
{
    let mut stream = pin!(stream);
    let mut count = 0;
    while let Some(record) = stream.next().await {
        tracing::trace!(user = %record.user, option = %record.option, "record appended");
        visor.append(&record)?;
        count += 1;
    }
    Ok(count)
}
