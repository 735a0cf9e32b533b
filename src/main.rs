use std::path::PathBuf;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use log::info;
use mag_core::{Catalog, DefaultDescriptor, MetadataDescriptor};
use mag_persistence::PgCatalog;

use imap_mag::{copy_file_to_destination, logging, output_store_for, parse_date, AppConfig, LogConfig,
               PlacementReport};

#[derive(Parser, Debug)]
#[command(name = "imap-mag", version, about = "Almacén versionado de ficheros de salida")]
struct Cli {
    /// Activa logging a nivel debug.
    #[arg(short, long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Coloca un fichero con el descriptor por defecto.
    Add(AddArgs),
    /// Copia un fichero al nombre fijo del destino configurado.
    Copy(CopyArgs),
    /// Lista los registros del catálogo como líneas JSON.
    List,
}

#[derive(Args, Debug)]
struct AddArgs {
    #[arg(long)]
    config: PathBuf,
    #[arg(long)]
    descriptor: String,
    /// YYYY-MM-DD, YYYY-MM-DDTHH:MM:SS o YYYY-MM-DD HH:MM:SS
    #[arg(long)]
    date: String,
    #[arg(long)]
    extension: String,
    #[arg(long)]
    level: Option<String>,
    #[arg(long)]
    prefix: Option<String>,
    #[arg(long)]
    version: Option<u32>,
    file: PathBuf,
}

#[derive(Args, Debug)]
struct CopyArgs {
    #[arg(long)]
    config: PathBuf,
    file: PathBuf,
}

fn main() -> anyhow::Result<()> {
    mag_persistence::init_dotenv();
    let cli = Cli::parse();
    logging::init(&LogConfig { verbose: cli.verbose })?;

    match cli.command {
        Commands::Add(args) => run_add(args),
        Commands::Copy(args) => run_copy(args),
        Commands::List => run_list(),
    }
}

fn run_add(args: AddArgs) -> anyhow::Result<()> {
    let config = AppConfig::load(&args.config)?;
    let mut builder = DefaultDescriptor::builder().descriptor(args.descriptor)
                                                  .date(parse_date(&args.date)?)
                                                  .extension(args.extension);
    if let Some(level) = args.level {
        builder = builder.level(level);
    }
    if let Some(prefix) = args.prefix {
        builder = builder.prefix(prefix);
    }
    if let Some(version) = args.version {
        builder = builder.version(version);
    }
    let descriptor = builder.build().context("descriptor incompleto")?;

    let mut store = output_store_for(&config.destination)?;
    let (path, resolved) = store.add_default_file(&args.file, descriptor)
                                .with_context(|| format!("no se pudo colocar {}", args.file.display()))?;
    let report = PlacementReport { path, version: resolved.version() };
    println!("{}", serde_json::to_string(&report)?);
    Ok(())
}

fn run_copy(args: CopyArgs) -> anyhow::Result<()> {
    let config = AppConfig::load(&args.config)?;
    let mut store = output_store_for(&config.destination)?;
    let path = copy_file_to_destination(&args.file, &config.destination, Some(store.as_mut()))?;
    info!("copy:done path={}", path.display());
    Ok(())
}

fn run_list() -> anyhow::Result<()> {
    let catalog = PgCatalog::from_env().context("catálogo no disponible")?;
    for record in catalog.list_files()? {
        println!("{}", serde_json::to_string(&record)?);
    }
    Ok(())
}
