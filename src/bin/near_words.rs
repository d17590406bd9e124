use anyhow::Context;
use clap::Parser;
use std::io::{self, Write};
use std::path::PathBuf;
use word_vectors::{DEFAULT_MOST_SIMILAR, LoadOptions, LookupKind, WordVectors, logging};

#[derive(Parser, Debug)]
#[command(author, version, about = "Rank the words nearest to a word or phrase", long_about = None)]
struct Args {
    /// Word vector table: '<words> <dims>' header, then one '<word> <v1> .. <vN>' line per word
    #[arg(long, default_value = "vectors.txt")]
    vectors: PathBuf,

    /// Number of words to list
    #[arg(long = "top-n", default_value_t = DEFAULT_MOST_SIMILAR)]
    top_n: usize,

    /// Resolve words by linear scan instead of a hash map
    #[arg(long = "linear-lookup")]
    linear_lookup: bool,

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

    let options = LoadOptions {
        lookup: if args.linear_lookup {
            LookupKind::Linear
        } else {
            LookupKind::Hash
        },
        ..LoadOptions::default()
    };
    let word_vectors = WordVectors::from_file_with(&args.vectors, &options)
        .with_context(|| format!("loading {}", args.vectors.display()))?;

    println!("Near Words Tool - Type 'EXIT' to quit\n");
    loop {
        println!("\nRanking nearest words to a word or sentence.");
        print!("Enter 1 or more words: ");
        io::stdout().flush()?;
        let s = get_input()?;
        if s == "EXIT" {
            println!("Goodbye!");
            break;
        }
        // single spaces separate phrase words
        let phrase = s.split_whitespace().collect::<Vec<_>>().join(" ");
        if phrase.is_empty() {
            println!("No words were input. Try again");
            continue;
        }

        let topn = match word_vectors.most_similar(&phrase, args.top_n) {
            Ok(Some(topn)) => topn,
            Ok(None) => {
                println!("No near words!");
                continue;
            }
            Err(e) => {
                println!("{e}");
                continue;
            }
        };

        println!("\nNearest words to '{}':", phrase.replace(' ', " + "));
        println!("{:>4} {:>10} Word", "Rank", "Score");
        println!("{}", "-".repeat(30));

        for (i, scored) in topn.iter().enumerate() {
            println!("{:4}: {:10.6} {}", i + 1, scored.score, scored.word);
        }
    }

    Ok(())
}
