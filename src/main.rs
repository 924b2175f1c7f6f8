use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use kinship_engine::{
    config::Config,
    family::{FamilyDocument, FamilyTree},
    kinship::Classifier,
    phrase::parse_phrase_with,
    reports::{KinshipReport, OutputFormat, ReportGenerator},
    types::PersonId,
};
use std::path::PathBuf;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "kinship")]
#[command(about = "Kinship inference over family graphs and Russian kinship phrases")]
#[command(version = "0.1.0")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Log level (overrides the configured one)
    #[arg(short, long)]
    log_level: Option<String>,

    /// Configuration file path
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Classify how two persons of a family file are related
    Classify {
        /// Family file in interchange format
        #[arg(short, long)]
        file: PathBuf,

        /// First person (id or exact name)
        #[arg(short, long)]
        a: String,

        /// Second person (id or exact name)
        #[arg(short, long)]
        b: String,

        /// Output format (json, markdown, text)
        #[arg(short, long)]
        output: Option<String>,

        /// Output file path (defaults to stdout)
        #[arg(short = 'O', long)]
        output_file: Option<PathBuf>,
    },

    /// Compile a kinship phrase and classify Он against Она
    Parse {
        /// Phrase such as "его мать — младшая сестра её отца"
        phrase: String,

        /// Output format (json, markdown, text)
        #[arg(short, long)]
        output: Option<String>,

        /// Write the compiled graph to this family file
        #[arg(short, long)]
        export: Option<PathBuf>,
    },

    /// Check a family file: schema, cycles and statistics
    Validate {
        /// Family file in interchange format
        #[arg(short, long)]
        file: PathBuf,
    },

    /// Initialize configuration file
    Init {
        /// Configuration file path
        #[arg(short, long, default_value = "kinship.yml")]
        config_file: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    let cli = Cli::parse();

    let config = Config::load(cli.config.as_ref())?;

    let log_level = cli
        .log_level
        .clone()
        .unwrap_or_else(|| config.logging.level.clone());
    init_tracing(&log_level)?;

    info!("Starting kinship engine");

    match cli.command {
        Commands::Classify {
            file,
            a,
            b,
            output,
            output_file,
        } => {
            let format = resolve_format(output.as_deref(), &config)?;
            classify_file(file, a, b, format, output_file, &config).await?;
        }

        Commands::Parse {
            phrase,
            output,
            export,
        } => {
            let format = resolve_format(output.as_deref(), &config)?;
            compile_phrase(phrase, format, export, &config).await?;
        }

        Commands::Validate { file } => {
            validate_family(file).await?;
        }

        Commands::Init { config_file } => {
            init_config(config_file).await?;
        }
    }

    Ok(())
}

/// Initialize tracing with the specified log level
fn init_tracing(log_level: &str) -> Result<()> {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .or_else(|_| tracing_subscriber::EnvFilter::try_new(log_level))
        .context("Failed to create env filter")?;

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr)
                .with_level(true),
        )
        .with(env_filter)
        .init();

    Ok(())
}

fn resolve_format(flag: Option<&str>, config: &Config) -> Result<OutputFormat> {
    match flag {
        Some(format) => format.parse(),
        None => config.output_format(),
    }
}

fn resolve_person(tree: &FamilyTree, key: &str) -> Result<PersonId> {
    tree.resolve(key)
        .with_context(|| format!("No person with id or name '{}'", key))
}

/// Classify two persons of a family file
async fn classify_file(
    file: PathBuf,
    a: String,
    b: String,
    format: OutputFormat,
    output_file: Option<PathBuf>,
    config: &Config,
) -> Result<()> {
    let document = FamilyDocument::load(&file).await?;
    let tree = FamilyTree::from_document(document, config.id_generator());

    let id_a = resolve_person(&tree, &a)?;
    let id_b = resolve_person(&tree, &b)?;
    info!("Classifying {} against {}", id_a, id_b);

    let classifier = Classifier::new(config.classifier_options());
    let result = tree.classify_with(&classifier, &id_a, &id_b);
    if !result.is_found() {
        warn!("No kinship found between {} and {}", id_a, id_b);
    }

    let person_a = tree.person(&id_a).cloned().context("Person vanished from tree")?;
    let person_b = tree.person(&id_b).cloned().context("Person vanished from tree")?;
    let report = KinshipReport::new(person_a, person_b, result);

    output_report(&report, format, output_file.as_ref()).await
}

/// Compile a phrase, classify the two roots and optionally export the graph
async fn compile_phrase(
    phrase: String,
    format: OutputFormat,
    export: Option<PathBuf>,
    config: &Config,
) -> Result<()> {
    let mut ids = config.id_generator();
    let graph = parse_phrase_with(&phrase, &mut ids)
        .with_context(|| format!("Failed to parse phrase '{}'", phrase))?;

    if let Some(path) = &export {
        FamilyDocument::new(graph.persons.clone(), graph.edges.clone())
            .save(path)
            .await?;
        println!("Family graph exported to {:?}", path);
    }

    let roots = graph.root_he.clone().zip(graph.root_she.clone());
    let mut tree = FamilyTree::with_generator(ids);
    tree.replace_with(graph);

    let Some((he, she)) = roots else {
        warn!("Phrase mentions only one of Он/Она; nothing to classify");
        println!("Persons:");
        for person in tree.persons() {
            println!("  {} {} ({})", person.id, person.name, person.sex);
        }
        return Ok(());
    };

    let classifier = Classifier::new(config.classifier_options());
    let result = tree.classify_with(&classifier, &he, &she);

    let person_a = tree.person(&he).cloned().context("Root Он missing from graph")?;
    let person_b = tree.person(&she).cloned().context("Root Она missing from graph")?;
    let report = KinshipReport::new(person_a, person_b, result).with_phrase(phrase);

    output_report(&report, format, None).await
}

/// Validate a family file
async fn validate_family(file: PathBuf) -> Result<()> {
    info!("Validating family file: {:?}", file);

    let document = FamilyDocument::load(&file).await?;
    println!("✅ Schema valid: {} people, {} relations", document.people.len(), document.relations.len());

    let tree = FamilyTree::from_document(document, Default::default());
    let graph = tree.graph();
    let cycles = graph.find_cycles();

    let stats = graph.statistics();
    println!("📊 Family Statistics:");
    println!("  Persons: {}", stats.total_persons);
    println!("  Relations: {}", stats.total_edges);
    println!("  Founders: {}", stats.founders);
    println!("  Childless: {}", stats.childless);
    println!("  Average degree: {:.2}", stats.average_degree);

    if cycles.is_empty() {
        println!("\n✅ No ancestry cycles found");
        return Ok(());
    }

    for cycle in &cycles {
        let members: Vec<&str> = cycle.iter().map(PersonId::as_str).collect();
        println!("❌ Ancestry cycle: {}", members.join(", "));
    }
    Err(anyhow::anyhow!("{} ancestry cycle(s) found", cycles.len()))
}

/// Initialize configuration file
async fn init_config(config_file: PathBuf) -> Result<()> {
    info!("Initializing configuration file: {:?}", config_file);

    if config_file.exists() {
        warn!("Configuration file already exists: {:?}", config_file);
        print!("Overwrite existing file? (y/N): ");
        use std::io::{self, Write};
        io::stdout().flush()?;

        let mut input = String::new();
        io::stdin().read_line(&mut input)?;

        if !input.trim().to_lowercase().starts_with('y') {
            info!("Configuration initialization cancelled");
            return Ok(());
        }
    }

    Config::default()
        .save_to_file(&config_file)
        .await
        .with_context(|| format!("Failed to write configuration file: {:?}", config_file))?;

    println!("Configuration file created: {:?}", config_file);
    Ok(())
}

/// Output the report in the specified format
async fn output_report(
    report: &KinshipReport,
    format: OutputFormat,
    output_file: Option<&PathBuf>,
) -> Result<()> {
    let content = ReportGenerator::new().render(report, format)?;

    if let Some(file_path) = output_file {
        tokio::fs::write(file_path, &content)
            .await
            .with_context(|| format!("Failed to write output to: {:?}", file_path))?;
        info!("Report written to: {:?}", file_path);
    } else {
        println!("{}", content);
    }

    Ok(())
}
