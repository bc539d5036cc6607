//! jtdrpc CLI - Schema inference and client generator
//!
//! Commands:
//! - `jtdrpc generate` - Generate a Go or TypeScript client from service metadata
//! - `jtdrpc validate` - Validate a service metadata document
//! - `jtdrpc schema` - Infer JTD schemas from Rust source

use clap::{Args, Parser, Subcommand};
use jtdrpc_codegen::{ClientFlavor, Target};
use jtdrpc_logging::{LogLevel, init_logging};
use std::path::PathBuf;

mod generate;
mod schema;
mod source;
mod validate;

#[derive(Parser)]
#[command(name = "jtdrpc")]
#[command(
    author,
    version,
    about = "JTD schema inference and RPC client generator",
    long_about = None
)]
struct Cli {
    /// Diagnostic verbosity (overridden by RUST_LOG)
    #[arg(long, global = true, default_value_t = LogLevel::Info)]
    log_level: LogLevel,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate client code from a service metadata document
    Generate(GenerateArgs),

    /// Validate a service metadata document
    Validate {
        /// Path to the metadata JSON
        #[arg(short, long)]
        meta: PathBuf,
    },

    /// Infer JTD schemas for types declared in a Rust source file
    Schema {
        /// Rust source file to scan
        #[arg(short, long)]
        source: PathBuf,

        /// Type to infer (repeatable; default: every serializable type)
        #[arg(short = 't', long = "type")]
        types: Vec<String>,

        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(Args)]
struct GenerateArgs {
    /// Target language (go, typescript)
    #[arg(short, long)]
    lang: Target,

    /// Path to the metadata JSON
    #[arg(short, long)]
    meta: PathBuf,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Path to jtdrpc.toml (default: ./jtdrpc.toml when present)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// TypeScript client flavor (context, plain)
    #[arg(long)]
    flavor: Option<ClientFlavor>,

    /// Module the TypeScript client base class is imported from
    #[arg(long)]
    client_module: Option<String>,

    /// Module TypeScript `Context` is imported from
    #[arg(long)]
    context_module: Option<String>,

    /// Go package name
    #[arg(long)]
    package: Option<String>,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.log_level);

    match cli.command {
        Commands::Generate(args) => {
            let overrides = generate::Overrides {
                flavor: args.flavor,
                client_module: args.client_module,
                context_module: args.context_module,
                package: args.package,
            };
            generate::run(args.lang, &args.meta, args.output, args.config, overrides)?;
        }
        Commands::Validate { meta } => {
            validate::check(&meta)?;
        }
        Commands::Schema {
            source,
            types,
            output,
        } => {
            schema::run(&source, &types, output)?;
        }
    }

    Ok(())
}
