//! Command-line driver: run the catalog ciphers and attack ciphertexts.

use std::{
    fs,
    io::{self, Read, Write},
    path::{Path, PathBuf},
};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use rand::{rngs::StdRng, SeedableRng};
use tracing_subscriber::EnvFilter;

use cryptanalysis::{
    analysis, bytes_to_hex, hex_to_bytes, random_pad, xor_bytes, Alphabet, AttackConfig, Catalog,
    CatalogCipher, ChiSquaredScorer, CombinedScorer, LanguageModel, ModelConfig, NgramScorer,
    StrategyChoice,
};

#[derive(Parser)]
#[command(name = "cryptanalysis")]
#[command(about = "Recover keys of classical ciphers by scored key-space search")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the available ciphers and their key-space sizes
    List,

    /// Encrypt INPUT (or stdin) under a key
    Encrypt {
        #[arg(short, long)]
        cipher: String,

        #[arg(short, long)]
        key: String,

        input: Option<PathBuf>,
    },

    /// Decrypt INPUT (or stdin) under a key
    Decrypt {
        #[arg(short, long)]
        cipher: String,

        #[arg(short, long)]
        key: String,

        input: Option<PathBuf>,
    },

    /// XOR two hex strings of equal length, or one with a fresh random pad
    Pad {
        /// Hex-encoded message
        message: String,

        /// Hex-encoded pad; a random one is drawn and printed when omitted
        pad: Option<String>,
    },

    /// Print information-theoretic statistics of INPUT (or stdin)
    Analyze { input: Option<PathBuf> },

    /// Search for the keys that best explain a ciphertext
    Attack(AttackArgs),
}

#[derive(clap::Args)]
struct AttackArgs {
    #[arg(short, long)]
    cipher: String,

    /// Reference text for the n-gram model
    #[arg(long)]
    corpus: Option<PathBuf>,

    #[arg(long, value_enum, default_value_t = ScorerKind::Ngram)]
    scorer: ScorerKind,

    /// n-gram order of the language model
    #[arg(long, default_value_t = 3)]
    order: usize,

    /// JSON file with attack settings; flags below override it
    #[arg(long)]
    config: Option<PathBuf>,

    #[arg(long)]
    strategy: Option<StrategyChoice>,

    #[arg(long)]
    top_k: Option<usize>,

    #[arg(long)]
    seed: Option<u64>,

    #[arg(long)]
    max_restarts: Option<u64>,

    /// Print the report as JSON
    #[arg(long)]
    json: bool,

    input: Option<PathBuf>,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum ScorerKind {
    Ngram,
    ChiSquared,
    /// Every n-gram order from 1 up to --order, equally weighted
    Combined,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let catalog = Catalog::standard();

    match cli.command {
        Commands::List => cmd_list(&catalog),
        Commands::Encrypt { cipher, key, input } => {
            let cipher = catalog.get(&cipher)?;
            let text = read_cipher_input(cipher, input.as_deref())?;
            write_output(cipher, &cipher.encrypt(&text, &key)?)
        }
        Commands::Decrypt { cipher, key, input } => {
            let cipher = catalog.get(&cipher)?;
            let text = read_cipher_input(cipher, input.as_deref())?;
            write_output(cipher, &cipher.decrypt(&text, &key)?)
        }
        Commands::Pad { message, pad } => cmd_pad(&message, pad.as_deref()),
        Commands::Analyze { input } => cmd_analyze(&read_input(input.as_deref())?),
        Commands::Attack(args) => cmd_attack(&catalog, args),
    }
}

fn cmd_list(catalog: &Catalog) -> Result<()> {
    for cipher in catalog.iter() {
        println!(
            "{:<14} {:>30} keys  {}",
            cipher.name(),
            cipher.cardinality().to_string(),
            cipher.description()
        );
    }
    Ok(())
}

fn cmd_pad(message: &str, pad: Option<&str>) -> Result<()> {
    let message = hex_to_bytes(message).context("decoding message")?;
    let pad = match pad {
        Some(pad) => hex_to_bytes(pad).context("decoding pad")?,
        None => {
            let pad = random_pad(&message, &mut StdRng::from_entropy());
            println!("pad:    {}", bytes_to_hex(&pad));
            pad
        }
    };
    println!("{}", bytes_to_hex(&xor_bytes(&message, &pad)?));
    Ok(())
}

fn cmd_analyze(text: &[u8]) -> Result<()> {
    let alphabet = Alphabet::english();
    let letters = alphabet.normalize(text);
    let entropy = analysis::entropy(analysis::symbol_frequencies(text, &alphabet), 2.0);

    let mut byte_counts = [0u64; 256];
    for &b in text {
        byte_counts[b as usize] += 1;
    }
    let byte_entropy = analysis::entropy(
        byte_counts.iter().map(|&c| c as f64 / text.len().max(1) as f64),
        2.0,
    );

    println!("bytes:                  {}", text.len());
    println!("letters:                {}", letters.len());
    println!("byte entropy:           {byte_entropy:.4} bits");
    println!("letter entropy:         {entropy:.4} bits");
    println!(
        "letter redundancy:      {:.4}",
        analysis::redundancy(alphabet.len(), entropy, 2.0)
    );
    println!(
        "index of coincidence:   {:.4}",
        analysis::index_of_coincidence(text, &alphabet)
    );
    Ok(())
}

fn cmd_attack(catalog: &Catalog, args: AttackArgs) -> Result<()> {
    let cipher = catalog.get(&args.cipher)?;
    let ciphertext = read_cipher_input(cipher, args.input.as_deref())?;

    let mut config = match &args.config {
        Some(path) => {
            let raw = fs::read_to_string(path)
                .with_context(|| format!("reading config {}", path.display()))?;
            serde_json::from_str::<AttackConfig>(&raw)
                .with_context(|| format!("parsing config {}", path.display()))?
        }
        None => AttackConfig::default(),
    };
    if let Some(strategy) = args.strategy {
        config.strategy = strategy;
    }
    if let Some(top_k) = args.top_k {
        config.top_k = top_k;
    }
    if let Some(seed) = args.seed {
        config.seed = Some(seed);
    }
    if let Some(max_restarts) = args.max_restarts {
        config.max_restarts = max_restarts;
    }

    let report = match args.scorer {
        ScorerKind::ChiSquared => cipher.attack(&ciphertext, &ChiSquaredScorer, &config)?,
        ScorerKind::Ngram => {
            let corpus = read_corpus(args.corpus.as_deref())?;
            let model = LanguageModel::from_corpus(&corpus, &ModelConfig::with_order(args.order))?;
            cipher.attack(&ciphertext, &NgramScorer::new(&model), &config)?
        }
        ScorerKind::Combined => {
            let corpus = read_corpus(args.corpus.as_deref())?;
            let models = (1..=args.order)
                .map(|order| LanguageModel::from_corpus(&corpus, &ModelConfig::with_order(order)))
                .collect::<cryptanalysis::Result<Vec<_>>>()?;
            let scorer = models
                .iter()
                .fold(CombinedScorer::new(), |scorer, model| {
                    scorer.with(1.0 / models.len() as f64, NgramScorer::new(model))
                });
            if scorer.is_empty() {
                bail!("--order must be at least 1");
            }
            cipher.attack(&ciphertext, &scorer, &config)?
        }
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!("{}", report.render_text());
    }
    Ok(())
}

fn read_corpus(path: Option<&Path>) -> Result<Vec<u8>> {
    let Some(path) = path else {
        bail!("the n-gram scorers need a --corpus");
    };
    fs::read(path).with_context(|| format!("reading corpus {}", path.display()))
}

fn read_input(path: Option<&Path>) -> Result<Vec<u8>> {
    match path {
        Some(path) => fs::read(path).with_context(|| format!("reading {}", path.display())),
        None => {
            let mut buf = Vec::new();
            io::stdin().read_to_end(&mut buf).context("reading stdin")?;
            Ok(buf)
        }
    }
}

/// Alphabet ciphers get their input case-folded and stripped of other
/// symbols; byte ciphers get it untouched.
fn read_cipher_input(cipher: &CatalogCipher, path: Option<&Path>) -> Result<Vec<u8>> {
    let raw = read_input(path)?;
    Ok(match cipher.alphabet() {
        Some(alphabet) => alphabet.normalize(&raw),
        None => raw,
    })
}

fn write_output(cipher: &CatalogCipher, bytes: &[u8]) -> Result<()> {
    let mut stdout = io::stdout().lock();
    stdout.write_all(bytes)?;
    if cipher.alphabet().is_some() {
        stdout.write_all(b"\n")?;
    }
    stdout.flush()?;
    Ok(())
}
