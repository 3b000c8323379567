//! Native entry point: export a saved layout, or list the key bindings.

#[cfg(feature = "native")]
mod cli {
    use clap::{Parser, Subcommand};
    use kurbo::Size;
    use layoutink_app::{CliError, ExportFormat, ShortcutRegistry, export_layout, load_layout};
    use layoutink_core::EditorConfig;
    use layoutink_core::storage::FileBlobStore;
    use std::path::PathBuf;

    #[derive(Parser, Debug)]
    #[command(name = "layoutink", about = "LayoutInk layout editor tools")]
    struct Cli {
        #[command(subcommand)]
        command: Command,
    }

    #[derive(Subcommand, Debug)]
    enum Command {
        /// Export a saved layout as JSON or HTML.
        Export {
            #[arg(long, default_value_t = ExportFormat::Json)]
            format: ExportFormat,
            /// Directory holding saved layouts.
            #[arg(long, env = "LAYOUTINK_DATA_DIR")]
            dir: Option<PathBuf>,
            /// Key the layout is saved under.
            #[arg(long)]
            key: Option<String>,
            #[arg(long)]
            width: Option<f64>,
            #[arg(long)]
            height: Option<f64>,
            /// Editor config JSON file.
            #[arg(long, env = "LAYOUTINK_CONFIG")]
            config: Option<PathBuf>,
            /// Output file; stdout when omitted.
            #[arg(long, short)]
            out: Option<PathBuf>,
        },
        /// Print the keyboard shortcuts.
        Shortcuts,
    }

    #[allow(clippy::too_many_arguments)]
    fn export(
        format: ExportFormat,
        dir: Option<PathBuf>,
        key: Option<String>,
        width: Option<f64>,
        height: Option<f64>,
        config: Option<PathBuf>,
        out: Option<PathBuf>,
    ) -> Result<(), CliError> {
        let mut editor_config = match config {
            Some(path) => EditorConfig::from_json(&std::fs::read_to_string(path)?)?,
            None => EditorConfig::default(),
        };
        if let Some(key) = key {
            editor_config.storage_key = key;
        }
        let canvas = editor_config.canvas_size;
        editor_config.canvas_size = Size::new(width.unwrap_or(canvas.width), height.unwrap_or(canvas.height));

        let blobs = match dir {
            Some(dir) => FileBlobStore::new(dir)?,
            None => FileBlobStore::default_location()?,
        };
        log::info!("Reading {} from {}", editor_config.storage_key, blobs.base_path().display());

        let elements = load_layout(blobs, &editor_config)?;
        let rendered = export_layout(&elements, format, &editor_config)?;
        match out {
            Some(path) => {
                std::fs::write(&path, rendered)?;
                log::info!("Exported {} elements as {} to {}", elements.len(), format, path.display());
            }
            None => println!("{}", rendered),
        }
        Ok(())
    }

    pub fn run() -> Result<(), CliError> {
        let cli = Cli::parse();
        match cli.command {
            Command::Export {
                format,
                dir,
                key,
                width,
                height,
                config,
                out,
            } => export(format, dir, key, width, height, config, out),
            Command::Shortcuts => {
                ShortcutRegistry::print_all();
                Ok(())
            }
        }
    }
}

#[cfg(feature = "native")]
fn main() {
    env_logger::init();
    log::info!("Starting LayoutInk");

    if let Err(e) = cli::run() {
        log::error!("{}", e);
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}

#[cfg(not(feature = "native"))]
fn main() {
    panic!("Native feature not enabled. Use `cargo run --features native`");
}
