use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use interrogatedb::{DatabaseHandle, LoaderConfig, ResidentModule, dump};
use tracing::info;

#[derive(Parser)]
#[command(name = "interrogatedb")]
#[command(about = "Inspect interface databases", long_about = None)]
struct Cli {
    /// Loader configuration file (TOML).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Load database files and print their contents.
    Dump {
        /// Directory to search, in priority order.
        #[arg(long = "dir")]
        dirs: Vec<PathBuf>,
        /// Delimited search path, searched after every --dir.
        #[arg(long)]
        path: Option<String>,
        /// Database file to load.
        #[arg(long = "module", required = true)]
        modules: Vec<String>,
        /// Hosting library whose resident module is registered as well.
        #[arg(long = "library")]
        libraries: Vec<PathBuf>,
    },
}

fn main() -> Result<()> {
    idb_utils::init_logging();
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => LoaderConfig::from_file(path)
            .with_context(|| format!("failed to read {}", path.display()))?
            .merge_with_env(),
        None => LoaderConfig::from_env(),
    };

    match cli.command {
        Commands::Dump {
            dirs,
            path,
            modules,
            libraries,
        } => {
            let handle = DatabaseHandle::with_config(config);
            for dir in dirs {
                handle.add_search_directory(dir);
            }
            if let Some(path) = path {
                handle.add_search_path(&path);
            }
            for library in &libraries {
                handle
                    .register_library(library)
                    .with_context(|| format!("failed to register {}", library.display()))?;
            }
            for module in modules {
                let library = module
                    .split('.')
                    .next()
                    .unwrap_or(module.as_str())
                    .to_owned();
                handle.register_module(ResidentModule::without_table(library, module));
            }

            let db = handle.db();
            info!(modules = db.modules().len(), "database ready");
            let stdout = io::stdout();
            let mut out = stdout.lock();
            dump::dump(db, &mut out)?;
            out.flush()?;

            if handle.error_flag() {
                bail!("the database did not load cleanly, see the log above");
            }
        }
    }
    Ok(())
}
