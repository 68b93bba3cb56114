use std::path::{Path, PathBuf};
use std::process;

use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

use jsonschema_proto_gen::codegen::{self, ConvertOptions, DEFAULT_IMPORT_PREFIX};
use jsonschema_proto_gen::error::{Error, Result};
use jsonschema_proto_gen::{render, schema};

/// Generate Protocol Buffer definitions from JSON schema object descriptions.
///
/// Translates one JSON schema object into a proto3 message with its enums
/// and the imports of every referenced message type.
#[derive(Parser)]
#[command(name = "jsonschema-proto-gen", version, about)]
struct Cli {
    /// Log every translated field and import (overrides RUST_LOG).
    #[arg(long, short, global = true)]
    verbose: bool,

    /// Suppress non-error output.
    #[arg(long, short, global = true, conflicts_with = "verbose")]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert a JSON schema file into a .proto file.
    Convert {
        /// JSON schema file to convert.
        #[arg(long, short)]
        input: PathBuf,

        /// Proto package name.
        #[arg(long, short)]
        package: String,

        /// Output file. Writes to stdout when omitted.
        #[arg(long, short)]
        output: Option<PathBuf>,

        /// Output format.
        #[arg(long, value_enum, default_value_t = Emit::Proto)]
        emit: Emit,

        /// Prefix for generated import file names.
        #[arg(
            long,
            default_value = DEFAULT_IMPORT_PREFIX,
            env = "JSONSCHEMA_PROTO_IMPORT_PREFIX"
        )]
        import_prefix: String,

        /// Map scalar array item types through the type table
        /// (e.g. `integer` items become `uint32`).
        #[arg(long)]
        map_array_items: bool,
    },

    /// Write an umbrella .proto file that only imports other files.
    Combine {
        /// Proto package name.
        #[arg(long, short)]
        package: String,

        /// File to import. Repeat for each import, or pass a comma-separated list.
        #[arg(long = "import", value_delimiter = ',', required = true)]
        imports: Vec<String>,

        /// Output file. Writes to stdout when omitted.
        #[arg(long, short)]
        output: Option<PathBuf>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Emit {
    /// proto3 source text.
    Proto,
    /// The schema descriptor as JSON.
    Json,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.quiet);

    if let Err(e) = run(cli) {
        eprintln!("error: {e}");

        // Print cause chain.
        let mut source = std::error::Error::source(&e);
        while let Some(cause) = source {
            eprintln!("  caused by: {cause}");
            source = std::error::Error::source(cause);
        }

        process::exit(1);
    }
}

fn init_logging(verbose: bool, quiet: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        let default = if quiet { "error" } else { "warn" };
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Convert {
            input,
            package,
            output,
            emit,
            import_prefix,
            map_array_items,
        } => {
            if !cli.quiet {
                eprintln!("Loading schema from {}", input.display());
            }
            let root = schema::load_schema(&input)?;
            let options = ConvertOptions {
                import_prefix,
                map_array_item_types: map_array_items,
            };
            let descriptor = codegen::build_schema(&root, &package, &options)?;
            if !cli.quiet {
                eprintln!(
                    "Generated {} messages, {} enums, {} imports",
                    descriptor.messages.len(),
                    descriptor
                        .messages
                        .iter()
                        .map(|m| m.enums.len())
                        .sum::<usize>(),
                    descriptor.imports.len()
                );
            }

            let text = match emit {
                Emit::Proto => render::to_proto(&descriptor)?,
                Emit::Json => serde_json::to_string_pretty(&descriptor)? + "\n",
            };
            emit_output(output.as_deref(), &text, cli.quiet)?;
        }

        Commands::Combine {
            package,
            imports,
            output,
        } => {
            let text = codegen::combine(&imports, &package)?;
            emit_output(output.as_deref(), &text, cli.quiet)?;
        }
    }

    Ok(())
}

/// Write `text` to `path`, or to stdout when no path is given.
fn emit_output(path: Option<&Path>, text: &str, quiet: bool) -> Result<()> {
    let Some(path) = path else {
        print!("{text}");
        return Ok(());
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| Error::Write {
            path: parent.to_path_buf(),
            source: e,
        })?;
    }
    std::fs::write(path, text).map_err(|e| Error::Write {
        path: path.to_path_buf(),
        source: e,
    })?;

    if !quiet {
        eprintln!("Wrote {}", path.display());
    }
    Ok(())
}
