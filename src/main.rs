use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use name2gender::config::{AppConfig, LoggingConfig};
use name2gender::{
    ArtifactKind, ArtifactPair, ArtifactSet, Gender, GenderService, JsonLinesStore,
    PredictResponse, Predictor, dataset, overrides, training,
};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Names printed after training as a quick sanity check.
const SMOKE_NAMES: &[&str] = &[
    "srujeeth", "divyanshu", "michael", "aditya", "sabir", "joel", "roshni", "deena", "joice",
    "david", "emma", "james", "olivia",
];

#[derive(Parser)]
#[command(name = "name2gender")]
#[command(about = "Predict gender from names with an n-gram Naive Bayes model")]
#[command(version)]
struct Cli {
    /// Configuration file (TOML) [default: config/name2gender.toml]
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Train a model from a labeled CSV and save its artifacts
    Train {
        /// Dataset CSV (overrides the configured path)
        #[arg(short, long)]
        dataset: Option<PathBuf>,

        /// Random seed for the stratified split
        #[arg(long)]
        seed: Option<u64>,

        /// Share of each class held out for evaluation
        #[arg(long)]
        test_ratio: Option<f64>,

        /// Write the fallback pair instead of the primary pair
        #[arg(long)]
        fallback: bool,
    },

    /// Predict the gender of one name and record the result
    Predict {
        name: String,

        /// Print the response as JSON
        #[arg(long)]
        json: bool,
    },

    /// Classify names typed on stdin until `exit`
    Interactive,

    /// Show model details and the most informative n-grams
    Info {
        /// Number of n-grams to list
        #[arg(short = 'n', long, default_value = "10")]
        top: usize,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => AppConfig::load_from_path(path)?,
        None => AppConfig::load()?,
    };
    init_logging(&config.logging)?;

    match cli.command {
        Commands::Train {
            dataset,
            seed,
            test_ratio,
            fallback,
        } => train(&config, dataset, seed, test_ratio, fallback),
        Commands::Predict { name, json } => predict(&config, &name, json),
        Commands::Interactive => interactive(&config),
        Commands::Info { top } => show_info(&config, top),
    }
}

fn init_logging(logging: &LoggingConfig) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&logging.level))
        .context("Invalid log level")?;

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr);
    if logging.format == "json" {
        builder.json().init();
    } else {
        builder.init();
    }
    Ok(())
}

fn train(
    config: &AppConfig,
    dataset: Option<PathBuf>,
    seed: Option<u64>,
    test_ratio: Option<f64>,
    fallback: bool,
) -> Result<()> {
    let mut options = config.training.options();
    if let Some(seed) = seed {
        options.seed = seed;
    }
    if let Some(ratio) = test_ratio {
        options.test_ratio = ratio;
    }
    options.validate().context("Invalid training options")?;
    let dataset_path = dataset.unwrap_or_else(|| PathBuf::from(&config.training.dataset));

    println!("🔄 Loading dataset {}...", dataset_path.display());
    let data = dataset::load_csv(&dataset_path)
        .with_context(|| format!("Failed to load dataset {}", dataset_path.display()))?;
    println!("✅ Dataset size: {} ({} rows dropped)", data.len(), data.dropped);
    println!(
        "✅ Gender distribution: male {}, female {}",
        data.count(Gender::Male),
        data.count(Gender::Female)
    );

    println!("🧠 Training model...");
    let trained = training::train(&data.records, &options).context("Training failed")?;
    println!(
        "✅ Vocabulary size: {} n-grams, train {} / test {}",
        trained.predictor.vectorizer().vocabulary_size(),
        trained.train_size,
        trained.test_size
    );

    println!("\n📊 Model Performance:");
    println!("Accuracy: {:.3}", trained.report.accuracy);
    println!("\nClassification Report:\n{}", trained.report);

    println!("\n🧪 Testing with common names:");
    for name in SMOKE_NAMES {
        match trained.predictor.classify(name) {
            Ok(r) => println!("{}: {} ({:.1}%)", name, r.gender, r.confidence),
            Err(e) => warn!(name = %name, error = %e, "smoke test failed"),
        }
    }

    let set = ArtifactSet::from_config(&config.artifacts);
    let pair: &ArtifactPair = if fallback { &set.fallback } else { &set.primary };
    println!("\n💾 Saving model and vectorizer...");
    pair.save(&trained.predictor).context("Failed to save artifacts")?;
    println!(
        "📁 Files created: {}, {}",
        pair.vectorizer.display(),
        pair.classifier.display()
    );
    Ok(())
}

fn load_predictor(config: &AppConfig) -> Result<Arc<Predictor>> {
    let set = ArtifactSet::from_config(&config.artifacts);
    let (predictor, kind) = set.load().context("Failed to load model artifacts")?;
    match kind {
        ArtifactKind::Primary => info!("using clean model"),
        ArtifactKind::Fallback => warn!("using fallback model"),
    }
    Ok(Arc::new(predictor))
}

fn open_service(config: &AppConfig) -> Result<GenderService<JsonLinesStore>> {
    let predictor = load_predictor(config)?;
    let store = JsonLinesStore::open(&config.store.path)
        .with_context(|| format!("Failed to open prediction store {}", config.store.path))?;
    info!(path = %store.path().display(), "recording predictions");
    Ok(GenderService::new(predictor, store))
}

fn predict(config: &AppConfig, name: &str, json: bool) -> Result<()> {
    let service = open_service(config)?;
    let response = service.handle(name);
    if json {
        println!("{}", serde_json::to_string_pretty(&response)?);
    } else {
        print_response(&response);
    }
    Ok(())
}

fn interactive(config: &AppConfig) -> Result<()> {
    let service = open_service(config)?;
    println!("📁 Recording predictions to {}", service.store().path().display());
    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    loop {
        print!("Enter a name to classify (or 'exit'): ");
        io::stdout().flush()?;

        let Some(line) = lines.next() else { break };
        let line = line?;
        let name = line.trim();
        if name.eq_ignore_ascii_case("exit") {
            break;
        }

        print_response(&service.handle(name));
    }
    Ok(())
}

fn print_response(response: &PredictResponse) {
    match response {
        PredictResponse::Predicted(r) => {
            println!("{} is classified as {} ({:.2}%)", r.name, r.gender, r.confidence)
        }
        PredictResponse::Failed { message } => println!("❌ {message}"),
    }
}

fn show_info(config: &AppConfig, top: usize) -> Result<()> {
    let predictor = load_predictor(config)?;
    let classifier = predictor.classifier();
    let priors = classifier.priors();

    println!("Vocabulary: {} n-grams", predictor.vectorizer().vocabulary_size());
    println!("Smoothing alpha: {}", classifier.alpha());
    println!(
        "Priors: male {:.4}, female {:.4}",
        priors.male, priors.female
    );
    println!("Overrides:");
    for (name, gender) in overrides::entries() {
        println!("{:>25} | {}", name, gender);
    }

    println!("Most Informative Features (based on freq ratio):");
    for f in classifier.informative_ngrams(predictor.vectorizer(), top) {
        println!(
            "{:>25} | male: {:>6}, female: {:>6}, ratio(f/m): {:.2}",
            format!("{:?}", f.ngram),
            f.male,
            f.female,
            f.ratio
        );
    }
    Ok(())
}
