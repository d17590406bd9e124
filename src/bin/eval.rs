use anyhow::Context;
use clap::Parser;
use std::fs;
use std::io::{self, BufRead};
use std::path::{Path, PathBuf};
use tracing::info;
use word_vectors::{WordVectors, logging};

/// Score a word vector table on the google analogy corpus
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Word vector table
    #[arg(long, default_value = "vectors.txt")]
    vectors: PathBuf,

    /// Directory holding the question files
    #[arg(long = "question-dir", default_value = "DATA/question-data")]
    question_dir: PathBuf,

    /// Set verbosity level
    #[arg(short, long, default_value_t = 1)]
    verbose: i32,
}

// Read 4-word analogy test file like the ones used in the google analogy corpus:
// Efficient Estimation of Word Representations in Vector Space
// Tomas Mikolov et al, 2013
// e.g. "King is to Queen as Man is to Woman"
// one test per line
fn read_analogy_test(fname: &Path) -> io::Result<Vec<(String, String, String, String)>> {
    let file = fs::File::open(fname)?;
    let reader = io::BufReader::new(file);
    let mut r = Vec::new();

    for line in reader.lines() {
        let line = line?;
        // section headers like ": capital-common-countries"
        if line.starts_with(':') {
            continue;
        }

        let mut parts = line.split_whitespace().map(str::to_owned);
        if let (Some(a), Some(b), Some(c), Some(d)) =
            (parts.next(), parts.next(), parts.next(), parts.next())
        {
            r.push((a, b, c, d));
        }
    }

    Ok(r)
}

const SEMANTIC_TESTS: [&str; 5] = [
    "capital-common-countries.txt",
    "capital-world.txt",
    "currency.txt",
    "city-in-state.txt",
    "family.txt",
];

const SYNTACTIC_TESTS: [&str; 9] = [
    "gram1-adjective-to-adverb.txt",
    "gram2-opposite.txt",
    "gram3-comparative.txt",
    "gram4-superlative.txt",
    "gram5-present-participle.txt",
    "gram6-nationality-adjective.txt",
    "gram7-past-tense.txt",
    "gram8-plural.txt",
    "gram9-plural-verbs.txt",
];

#[derive(Debug, Default, Clone, Copy)]
struct Tally {
    correct: usize,
    seen: usize,
    total: usize,
}

impl Tally {
    fn merge(self, other: Tally) -> Tally {
        Tally {
            correct: self.correct + other.correct,
            seen: self.seen + other.seen,
            total: self.total + other.total,
        }
    }

    fn accuracy(&self) -> f64 {
        percent(self.correct, self.seen)
    }

    fn coverage(&self) -> f64 {
        percent(self.seen, self.total)
    }
}

fn percent(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        0.0
    } else {
        100.0 * part as f64 / whole as f64
    }
}

fn analogy_test_file(word_vectors: &WordVectors, fname: &Path) -> io::Result<Tally> {
    let mut tally = Tally::default();

    for (a, b, c, d) in read_analogy_test(fname)? {
        tally.total += 1;

        let Some(answer_idx) = word_vectors.get_index(&d) else {
            continue;
        };
        let Some(guess_idx) = word_vectors.analogy_best(&a, &b, &c) else {
            continue;
        };
        if guess_idx == answer_idx {
            tally.correct += 1
        }
        tally.seen += 1;
    }
    Ok(tally)
}

fn run_test_group(
    label: &str,
    files: &[&str],
    word_vectors: &WordVectors,
    question_dir: &Path,
) -> io::Result<Tally> {
    println!("\n{label} ANALOGY TESTS");
    let mut group = Tally::default();

    for fname in files {
        let tally = analogy_test_file(word_vectors, &question_dir.join(fname))?;
        println!(
            "File: {fname} - Accuracy: {:4.2}% ({}/{})",
            tally.accuracy(),
            tally.correct,
            tally.seen
        );
        group = group.merge(tally);
    }

    println!(
        "{label} Total Accuracy: {:4.2}% ({}/{})",
        group.accuracy(),
        group.correct,
        group.seen
    );
    println!(
        "{label} Questions seen/total: {:4.2}% ({}/{})",
        group.coverage(),
        group.seen,
        group.total
    );

    Ok(group)
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    logging::init(args.verbose);

    let word_vectors = WordVectors::from_file(&args.vectors)
        .with_context(|| format!("loading {}", args.vectors.display()))?;
    info!(words = word_vectors.len(), dims = word_vectors.dims(), "model ready");

    let semantic = run_test_group("SEMANTIC", &SEMANTIC_TESTS, &word_vectors, &args.question_dir)
        .context("semantic question files")?;
    let syntactic = run_test_group("SYNTACTIC", &SYNTACTIC_TESTS, &word_vectors, &args.question_dir)
        .context("syntactic question files")?;
    let overall = semantic.merge(syntactic);

    println!("\nOVERALL RESULTS:");
    println!(
        "Total Accuracy: {:4.2}% ({}/{})",
        overall.accuracy(),
        overall.correct,
        overall.seen
    );
    println!(
        "Total Questions seen/total: {:4.2}% ({}/{})",
        overall.coverage(),
        overall.seen,
        overall.total
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn percent_of_nothing_is_zero() {
        assert_eq!(percent(0, 0), 0.0);
        assert_eq!(percent(1, 4), 25.0);
    }

    #[test]
    fn tallies_merge_and_report() {
        let a = Tally {
            correct: 3,
            seen: 4,
            total: 8,
        };
        let b = Tally {
            correct: 1,
            seen: 4,
            total: 2,
        };
        let both = a.merge(b);
        assert_eq!((both.correct, both.seen, both.total), (4, 8, 10));
        assert_eq!(both.accuracy(), 50.0);
        assert_eq!(both.coverage(), 80.0);
        assert_eq!(Tally::default().accuracy(), 0.0);
    }

    #[test]
    fn question_files_skip_headers_and_short_lines() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            ": capital-common-countries\nAthens Greece Baghdad Iraq\nshort line\nBern Switzerland Cairo Egypt extra\n"
        )
        .unwrap();
        file.flush().unwrap();

        let questions = read_analogy_test(file.path()).unwrap();
        assert_eq!(questions.len(), 2);
        assert_eq!(questions[0].0, "Athens");
        assert_eq!(questions[1].3, "Egypt");
    }

    #[test]
    fn scores_a_question_file() {
        let table = "5 2\nman 1 0\nwoman 1 1\nking 2 0.1\nqueen 2 2.1\napple -1 0\n";
        let wv = WordVectors::from_reader(io::Cursor::new(table), &Default::default()).unwrap();

        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "man woman king queen\nman woman king apple\nman pear king queen\n").unwrap();
        file.flush().unwrap();

        let tally = analogy_test_file(&wv, file.path()).unwrap();
        assert_eq!((tally.correct, tally.seen, tally.total), (1, 2, 3));
    }
}
