//! Reading the plain-text embedding table.
//!
//! The first line is `<number of words> <length of vector>`, every further
//! line is `<word> <v1> ... <vN>`. Vectors are normalised to unit length as
//! they are read.

use std::io::BufRead;
use std::path::{Path, PathBuf};
use std::thread::{self, JoinHandle};
use std::time::Instant;

use chrono::Local;
use tracing::{debug, info, warn};

use crate::error::{Error, Result};
use crate::vector_math::normalize;
use crate::vocabulary::{LookupKind, Vocabulary};
use crate::word_vectors::WordVectors;

#[derive(Debug, Clone)]
pub struct LoadOptions {
    pub lookup: LookupKind,
    /// Emit a debug progress line every this many records; 0 disables it.
    pub progress_every: usize,
}

impl Default for LoadOptions {
    fn default() -> Self {
        LoadOptions {
            lookup: LookupKind::Hash,
            progress_every: 100_000,
        }
    }
}

fn parse_header(line: &str) -> Result<(usize, usize)> {
    let malformed = || Error::MalformedHeader {
        line: line.to_string(),
    };
    let mut parts = line.split(' ');
    let words = parts.next().and_then(|s| s.parse::<usize>().ok());
    let dims = parts.next().and_then(|s| s.parse::<usize>().ok());
    match (words, dims) {
        (Some(words), Some(dims)) if dims > 0 => Ok((words, dims)),
        _ => Err(malformed()),
    }
}

/// Parse one body line into `values`, returning the word.
///
/// Runs of spaces and trailing spaces are tolerated; any other deviation
/// from `dims + 1` fields is an error.
fn parse_record<'a>(
    line: &'a str,
    line_no: usize,
    dims: usize,
    values: &mut Vec<f32>,
) -> Result<&'a str> {
    let mut parts = line.split(' ').filter(|s| !s.is_empty());
    let Some(word) = parts.next() else {
        return Err(Error::MalformedRecord {
            line: line_no,
            reason: "missing word".to_string(),
        });
    };

    values.clear();
    for part in parts {
        let val = part.parse::<f32>().map_err(|e| Error::MalformedRecord {
            line: line_no,
            reason: format!("component {} ({part:?}) of '{word}': {e}", values.len() + 1),
        })?;
        if !val.is_finite() {
            return Err(Error::MalformedRecord {
                line: line_no,
                reason: format!(
                    "component {} ({part:?}) of '{word}' is not a finite number",
                    values.len() + 1
                ),
            });
        }
        values.push(val);
    }

    if values.len() != dims {
        return Err(Error::MalformedRecord {
            line: line_no,
            reason: format!(
                "vector for '{word}' has dimension {} which differs from declared dimension {dims}",
                values.len()
            ),
        });
    }
    Ok(word)
}

pub(crate) fn read_vocabulary<R: BufRead>(reader: R, options: &LoadOptions) -> Result<Vocabulary> {
    let start = Instant::now();
    let mut lines = reader.lines();

    let header = match lines.next() {
        Some(line) => line?,
        None => {
            return Err(Error::MalformedHeader {
                line: String::new(),
            });
        }
    };
    let (declared, dims) = parse_header(header.trim_end_matches('\r'))?;
    info!(words = declared, dims, "reading word vectors");

    let mut vocab = Vocabulary::new(declared, dims, options.lookup);
    let mut values: Vec<f32> = Vec::with_capacity(dims.min(1 << 16));

    // header is line 1
    for (line_no, line_result) in (2..).zip(lines) {
        let line = line_result?;
        let line = line.trim_end_matches('\r');
        if line.trim().is_empty() {
            continue;
        }

        let word = parse_record(line, line_no, dims, &mut values)?;
        // components are finite here, so only an all-zero row is degenerate
        if normalize(&mut values).is_err() {
            warn!(word, line = line_no, "zero vector left unnormalised");
        }
        vocab.push(word, &values)?;

        if options.progress_every > 0 && vocab.len() % options.progress_every == 0 {
            debug!(read = vocab.len(), of = declared, "reading word vectors");
        }
    }

    if vocab.len() != declared {
        return Err(Error::WordCountMismatch {
            declared,
            found: vocab.len(),
        });
    }

    let time_str = Local::now().format("%x - %I:%M.%S%p");
    info!(
        "{time_str}, loaded {} words of dimension {dims} in {:.2?}",
        vocab.len(),
        start.elapsed()
    );
    Ok(vocab)
}

/// Load a model on a background thread.
///
/// An empty `path` is rejected before any thread is started. Otherwise
/// `on_complete` runs exactly once, on the loader thread, with the loaded
/// model or the error that stopped the load.
pub fn load_model<P, F>(path: P, on_complete: F) -> Result<JoinHandle<()>>
where
    P: AsRef<Path>,
    F: FnOnce(Result<WordVectors>) + Send + 'static,
{
    let path: PathBuf = path.as_ref().to_path_buf();
    if path.as_os_str().is_empty() {
        return Err(Error::invalid_argument(
            "load_model expects a file name as its first parameter",
        ));
    }

    let handle = thread::Builder::new()
        .name("word-vectors-loader".to_string())
        .spawn(move || on_complete(WordVectors::from_file(&path)))?;
    Ok(handle)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn read(text: &str) -> Result<Vocabulary> {
        read_vocabulary(Cursor::new(text), &LoadOptions::default())
    }

    #[test]
    fn header_needs_two_integers() {
        assert_eq!(parse_header("3 2").unwrap(), (3, 2));
        assert_eq!(parse_header("3 2 extra").unwrap(), (3, 2));
        for bad in ["", "3", "three 2", "3 two", "3  2", "-1 2", "3 0", " 3 2"] {
            assert!(
                matches!(parse_header(bad), Err(Error::MalformedHeader { .. })),
                "{bad:?} should be rejected"
            );
        }
    }

    #[test]
    fn empty_source_is_a_malformed_header() {
        assert!(matches!(read(""), Err(Error::MalformedHeader { .. })));
    }

    #[test]
    fn record_tolerates_extra_spaces() {
        let mut values = Vec::new();
        let word = parse_record("cat  1.5 -2 3e-1 ", 2, 3, &mut values).unwrap();
        assert_eq!(word, "cat");
        assert_eq!(values, vec![1.5, -2.0, 0.3]);
    }

    #[test]
    fn record_rejects_wrong_field_count() {
        let mut values = Vec::new();
        let err = parse_record("cat 1 2", 7, 3, &mut values).unwrap_err();
        assert!(matches!(err, Error::MalformedRecord { line: 7, .. }));
        assert!(parse_record("cat 1 2 3 4", 7, 3, &mut values).is_err());
    }

    #[test]
    fn record_rejects_bad_number() {
        let mut values = Vec::new();
        let err = parse_record("cat 1 x 3", 4, 3, &mut values).unwrap_err();
        assert!(matches!(err, Error::MalformedRecord { line: 4, .. }));
    }

    #[test]
    fn reads_and_normalises() {
        let vocab = read("2 2\r\nup 3 4\r\n\ndown 0 -2\n").unwrap();
        assert_eq!(vocab.len(), 2);
        assert_eq!(vocab.declared_words(), 2);
        let up = vocab.get_vector("up").unwrap();
        assert!((up.values[0] - 0.6).abs() < 1e-6);
        assert!((up.values[1] - 0.8).abs() < 1e-6);
        assert_eq!(vocab.values(1), &[0.0, -1.0]);
    }

    #[test]
    fn record_rejects_non_finite_components() {
        let mut values = Vec::new();
        for line in ["cat NaN 1 2", "cat 1 inf 2", "cat 1 2 -infinity", "cat 1 2 1e39"] {
            assert!(
                matches!(
                    parse_record(line, 5, 3, &mut values),
                    Err(Error::MalformedRecord { line: 5, .. })
                ),
                "{line:?} should be rejected"
            );
        }
    }

    #[test]
    fn extreme_magnitudes_are_normalised() {
        let vocab = read("3 2\nbig 3e20 4e20\nsmall 3e-25 4e-25\ntiny 3e-44 4e-44\n").unwrap();
        for entry in vocab.iter() {
            let len = crate::vector_math::norm(entry.values);
            assert!((len - 1.0).abs() < 1e-5, "{}: {:?}", entry.word, entry.values);
        }
        let big = vocab.values(0);
        let small = vocab.values(1);
        let cos: f32 = big.iter().zip(small).map(|(a, b)| a * b).sum();
        assert!((cos - 1.0).abs() < 1e-5);
    }

    #[test]
    fn oversized_word_count_is_a_mismatch() {
        for text in ["18446744073709551615 2\na 1 0\n", "100000000000 300\n"] {
            assert!(matches!(read(text), Err(Error::WordCountMismatch { .. })));
        }
        assert!(matches!(
            read("1 18446744073709551615\na 1\n"),
            Err(Error::MalformedRecord { line: 2, .. })
        ));
    }

    #[test]
    fn zero_vector_is_kept() {
        let vocab = read("1 3\nnil 0 0 0\n").unwrap();
        assert_eq!(vocab.values(0), &[0.0, 0.0, 0.0]);
    }

    #[test]
    fn word_count_must_match_header() {
        assert!(matches!(
            read("3 1\na 1\nb 1\n"),
            Err(Error::WordCountMismatch {
                declared: 3,
                found: 2
            })
        ));
        assert!(matches!(
            read("1 1\na 1\nb 1\n"),
            Err(Error::WordCountMismatch {
                declared: 1,
                found: 2
            })
        ));
    }

    #[test]
    fn malformed_body_reports_line_number() {
        match read("2 2\na 1 0\nb 1\n") {
            Err(Error::MalformedRecord { line, .. }) => assert_eq!(line, 3),
            other => panic!("unexpected result: {:?}", other.map(|v| v.len())),
        }
    }

    #[test]
    fn load_model_rejects_empty_path() {
        let result = load_model("", |_| panic!("callback must not run"));
        assert!(matches!(result, Err(Error::InvalidArgument { .. })));
    }
}
