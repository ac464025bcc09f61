use crate::{Error, Result};
use flate2::read::GzDecoder;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// Lazy line stream over a possibly gzip-compressed log file.
///
/// Yields one `Result<String>` per raw line: decoded as UTF-8 first, then as
/// windows-1251 for legacy lines. A line that decodes under neither is a
/// line-scoped `Error::Decode` and iteration continues past it; an I/O
/// failure mid-stream is fatal and ends the iteration. The file and
/// decompressor handles are owned by the iterator and released when it is
/// dropped, on every exit path.
pub struct LogLines {
    reader: Box<dyn BufRead>,
    line: usize,
    done: bool,
}

impl LogLines {
    /// Open `path`, decompressing when the filename ends in `.gz`.
    pub fn open(path: &Path) -> Result<Self> {
        let file = File::open(path)?;
        let gzip = path.extension().is_some_and(|ext| ext == "gz");
        tracing::debug!("Opened {} (gzip: {})", path.display(), gzip);

        let reader: Box<dyn BufRead> = if gzip {
            Box::new(BufReader::new(GzDecoder::new(file)))
        } else {
            Box::new(BufReader::new(file))
        };
        Ok(Self {
            reader,
            line: 0,
            done: false,
        })
    }

    /// Candidate decodings, tried in order: UTF-8, then windows-1251.
    fn decode(&self, raw: &[u8]) -> Result<String> {
        match std::str::from_utf8(raw) {
            Ok(text) => Ok(text.to_string()),
            Err(_) => {
                let (text, _, had_errors) = encoding_rs::WINDOWS_1251.decode(raw);
                if had_errors {
                    Err(Error::Decode { line: self.line })
                } else {
                    Ok(text.into_owned())
                }
            }
        }
    }
}

impl Iterator for LogLines {
    type Item = Result<String>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        let mut raw = Vec::new();
        match self.reader.read_until(b'\n', &mut raw) {
            Ok(0) => {
                self.done = true;
                None
            }
            Ok(_) => {
                self.line += 1;
                if raw.last() == Some(&b'\n') {
                    raw.pop();
                }
                if raw.last() == Some(&b'\r') {
                    raw.pop();
                }
                Some(self.decode(&raw))
            }
            Err(err) => {
                // unlike a decode failure, an I/O failure ends the stream
                self.done = true;
                Some(Err(Error::Io(err)))
            }
        }
    }
}
