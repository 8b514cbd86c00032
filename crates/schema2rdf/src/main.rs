use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;
use std::process;

use anyhow::{bail, Context};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use schema2rdf::dataset::Dataset;
use schema2rdf::emitter::ntriples::NTriplesEmitter;
use schema2rdf::emitter::turtle::TurtleEmitter;
use schema2rdf::emitter::{GraphAssembler, TriplesEmitter};
use schema2rdf::engine::{BuildSession, EngineOptions, DEFAULT_BASE_URI};
use schema2rdf::model::iri::IriMinter;
use schema2rdf::model::ontology::KNOWN_PREFIXES;
use schema2rdf::schema::export::schema_fragment;
use schema2rdf::schema::{Locale, SchemaRegistry, SchemaSource};

/// Build validated RDF triples from a class schema and a dataset.
#[derive(Parser)]
#[command(name = "schema2rdf", version, about)]
struct Cli {
    /// Class definition file (.yaml, .yml or .json).
    classes: PathBuf,

    /// Property definition file (inverse / functional / symmetric / transitive).
    #[arg(short, long, value_name = "FILE")]
    properties: Option<PathBuf>,

    /// Dataset file listing the resources to build.
    #[arg(short, long, value_name = "FILE")]
    data: Option<PathBuf>,

    /// Output file path [default: stdout].
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Output format: ntriples, turtle.
    #[arg(short, long, value_name = "FORMAT", default_value = "ntriples")]
    format: String,

    /// Base URI for minted IRIs.
    #[arg(short, long, value_name = "URI", default_value = DEFAULT_BASE_URI)]
    base_uri: String,

    /// Default locale for identifier selection (e.g. en, fr-FR).
    #[arg(short, long, value_name = "TAG")]
    locale: Option<String>,

    /// Don't emit the schema's own RDFS/OWL triples.
    #[arg(long)]
    no_schema: bool,

    /// Verbose output.
    #[arg(short, long)]
    verbose: bool,

    /// Quiet output.
    #[arg(short, long)]
    quiet: bool,
}

fn init_tracing(cli: &Cli) {
    let level = if cli.verbose {
        "debug"
    } else if cli.quiet {
        "error"
    } else {
        "warn"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

/// Emit the schema and the dataset through one emitter; returns the triple count.
fn write_graph<E: TriplesEmitter + GraphAssembler>(
    emitter: &mut E,
    registry: &SchemaRegistry,
    dataset: Option<&Dataset>,
    cli: &Cli,
    options: &EngineOptions,
) -> anyhow::Result<u64> {
    let iris = IriMinter::new(&options.base_uri);
    for (prefix, ns) in KNOWN_PREFIXES {
        emitter.add_prefix(prefix, ns)?;
    }
    emitter.add_prefix("", &format!("{}/ontology/", iris.base_uri()))?;

    if !cli.no_schema {
        emitter
            .assemble(&schema_fragment(registry, &iris))
            .context("writing schema triples")?;
    }

    if let Some(dataset) = dataset {
        let builder = BuildSession::new(registry).builder(options);
        let summary = dataset.build(&builder, emitter)?;
        tracing::info!(
            resources = summary.resources,
            embedded = summary.embedded,
            "dataset finalized"
        );
    }

    emitter.flush()?;
    Ok(emitter.triple_count())
}

fn run(cli: Cli) -> anyhow::Result<()> {
    if cli.verbose {
        eprintln!("Loading schema from: {}", cli.classes.display());
    }

    let mut source = SchemaSource::from_path(&cli.classes)
        .with_context(|| format!("loading {}", cli.classes.display()))?;
    if let Some(path) = &cli.properties {
        source = source
            .with_properties_path(path)
            .with_context(|| format!("loading {}", path.display()))?;
    }
    let registry = SchemaRegistry::load(source).context("resolving schema")?;

    let dataset = cli
        .data
        .as_deref()
        .map(|path| Dataset::from_path(path).with_context(|| format!("loading {}", path.display())))
        .transpose()?;

    let default_locale = cli
        .locale
        .as_deref()
        .map(Locale::parse)
        .transpose()
        .context("parsing --locale")?;
    let options = EngineOptions {
        base_uri: cli.base_uri.clone(),
        default_locale,
    };

    // Determine output writer
    let output_writer: Box<dyn Write> = match &cli.output {
        Some(path) => Box::new(BufWriter::new(
            File::create(path).with_context(|| format!("creating {}", path.display()))?,
        )),
        None => Box::new(BufWriter::new(io::stdout().lock())),
    };

    let format = cli.format.to_lowercase();
    let triple_count = match format.as_str() {
        "ntriples" | "nt" => {
            let mut emitter = NTriplesEmitter::new(output_writer);
            write_graph(&mut emitter, &registry, dataset.as_ref(), &cli, &options)?
        }
        "turtle" | "ttl" => {
            let mut emitter = TurtleEmitter::new(output_writer);
            write_graph(&mut emitter, &registry, dataset.as_ref(), &cli, &options)?
        }
        _ => bail!("Unknown format: {format}. Use 'ntriples' or 'turtle'."),
    };

    // Print summary to stderr (unless quiet)
    if !cli.quiet {
        eprintln!(
            "Wrote {triple_count} triples from {} classes",
            registry.classes().count()
        );
    }

    Ok(())
}

fn main() {
    let cli = Cli::parse();
    init_tracing(&cli);
    if let Err(e) = run(cli) {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
