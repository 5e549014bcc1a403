use crate::Result;
use flate2::read::MultiGzDecoder;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

pub struct LogReader;

impl LogReader {
    /// Open an access log, decompressing on the fly when `compressed` is set
    pub fn open(path: &Path, compressed: bool) -> Result<Box<dyn BufRead>> {
        tracing::debug!(
            "Opening log file {} (gzip: {})",
            path.display(),
            compressed
        );

        let file = File::open(path)?;
        let reader: Box<dyn BufRead> = if compressed {
            Box::new(BufReader::new(MultiGzDecoder::new(file)))
        } else {
            Box::new(BufReader::new(file))
        };

        tracing::info!("Opened log file {}", path.display());
        Ok(reader)
    }

    /// Open an access log, treating a `.gz` extension as gzip
    pub fn open_path(path: &Path) -> Result<Box<dyn BufRead>> {
        Self::open(path, is_gzip(path))
    }

    /// Iterate over the lines of a reader without buffering the whole stream
    pub fn lines<R: BufRead>(reader: R) -> LogLines<R> {
        LogLines {
            reader,
            buf: Vec::new(),
        }
    }
}

fn is_gzip(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == "gz")
}

/// Line iterator over a log stream.
///
/// Lines are decoded as lossy UTF-8 so that one bad byte only spoils its own
/// line. Line terminators (`\n` or `\r\n`) are stripped.
pub struct LogLines<R> {
    reader: R,
    buf: Vec<u8>,
}

impl<R: BufRead> Iterator for LogLines<R> {
    type Item = io::Result<String>;

    fn next(&mut self) -> Option<Self::Item> {
        self.buf.clear();
        match self.reader.read_until(b'\n', &mut self.buf) {
            Ok(0) => None,
            Ok(_) => {
                if self.buf.ends_with(b"\n") {
                    self.buf.pop();
                    if self.buf.ends_with(b"\r") {
                        self.buf.pop();
                    }
                }
                Some(Ok(String::from_utf8_lossy(&self.buf).into_owned()))
            }
            Err(e) => Some(Err(e)),
        }
    }
}
