use anyhow::Context;
use clap::Parser;
use std::io::{self, Write};
use std::path::PathBuf;
use word_vectors::{DEFAULT_ANALOGY, WordVectors, logging};

#[derive(Parser, Debug)]
#[command(author, version, about = "Complete 'A is to B as C is to ?' analogies", long_about = None)]
struct Args {
    /// Word vector table
    #[arg(long, default_value = "vectors.txt")]
    vectors: PathBuf,

    /// Number of candidates to list
    #[arg(long = "top-n", default_value_t = DEFAULT_ANALOGY)]
    top_n: usize,

    /// Set verbosity level
    #[arg(short, long, default_value_t = 1)]
    verbose: i32,
}

fn get_input() -> io::Result<String> {
    let mut s = String::new();
    io::stdin().read_line(&mut s)?;
    Ok(s.trim().to_string())
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    logging::init(args.verbose);

    let word_vectors = WordVectors::from_file(&args.vectors)
        .with_context(|| format!("loading {}", args.vectors.display()))?;

    loop {
        println!("\nWord analogy - KING is to QUEEN as MAN is to ?");
        print!("Enter 3 words: ");
        io::stdout().flush()?;
        let s = get_input()?;
        if s == "EXIT" {
            break;
        }
        let words: Vec<&str> = s.split_whitespace().collect();
        let &[a, b, c] = words.as_slice() else {
            println!("Expected exactly 3 words, but got {}. Try again.", words.len());
            continue;
        };

        let topn = match word_vectors.analogy(c, &[a, b], args.top_n) {
            Ok(topn) => topn,
            Err(e) => {
                println!("{e}");
                continue;
            }
        };

        if topn.is_empty() {
            println!("No analogies");
            continue;
        }
        for (i, scored) in topn.iter().enumerate() {
            println!("{:3}: {:>8.5} {}", i + 1, scored.score, scored.word);
        }
    }

    Ok(())
}
