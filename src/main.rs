use std::path::PathBuf;
use std::process::ExitCode;

use bevy::prelude::*;
use clap::{Parser, Subcommand};

use pencilforge::config::ConfigPlugin;
use pencilforge::editor::EditorPlugin;
use pencilforge::file::{
    DocumentLoadError, DocumentSaveError, FileManager, FilePlugin, LoadDocumentRequest,
    SaveDocumentRequest,
};
use pencilforge::object::{Layer, LayerKind, Object};

#[derive(Parser, Debug)]
#[command(name = "pencilforge", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the layers of a document.
    Inspect {
        /// Document to read (.pcl or .pclx).
        file: PathBuf,
    },
    /// Load a document and save it again; the output suffix picks the format.
    Convert { input: PathBuf, output: PathBuf },
}

/// Set up file logging for debug builds
#[cfg(debug_assertions)]
fn setup_logging() -> Option<tracing_appender::non_blocking::WorkerGuard> {
    use std::fs::OpenOptions;
    use std::io::Write;
    use tracing_subscriber::prelude::*;

    let logs_dir = pencilforge::paths::logs_dir();
    if std::fs::create_dir_all(&logs_dir).is_err() {
        eprintln!("Failed to create logs directory");
        return None;
    }

    let log_file_path = logs_dir.join("pencilforge.log");

    // Append session separator to existing log file
    if let Ok(mut file) = OpenOptions::new().append(true).open(&log_file_path) {
        let timestamp = chrono::Local::now().format("%Y-%m-%d %H:%M:%S");
        let separator = "=".repeat(80);
        let _ = writeln!(
            file,
            "\n\n{}\n=== New Session Started at {} ===\n{}\n",
            separator, timestamp, separator
        );
    }

    let file_appender = tracing_appender::rolling::never(&logs_dir, "pencilforge.log");
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(non_blocking)
        .with_ansi(false)
        .with_target(true)
        .with_level(true);

    // stdout carries command output, logs go to stderr
    let stderr_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_ansi(true)
        .with_target(true)
        .with_level(true);

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info,pencilforge=debug"));

    tracing_subscriber::registry()
        .with(filter)
        .with(file_layer)
        .with(stderr_layer)
        .init();

    Some(guard)
}

#[cfg(not(debug_assertions))]
fn setup_logging() -> Option<()> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .init();
    None
}

fn main() -> ExitCode {
    // Keep the guard alive for the duration of the program
    let _log_guard = setup_logging();
    if let Err(e) = pencilforge::paths::ensure_directories() {
        warn!("Failed to create data directories: {}", e);
    }

    let cli = Cli::parse();
    let result = match cli.cmd {
        Command::Inspect { file } => inspect(file),
        Command::Convert { input, output } => convert(input, output),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            eprintln!("error: {}", message);
            ExitCode::FAILURE
        }
    }
}

fn inspect(file: PathBuf) -> Result<(), String> {
    let mut files = FileManager::default();
    let object = files.load(&file).map_err(|e| e.to_string())?;
    print!("{}", summary(&object));
    files.clean_up_working_folder();
    Ok(())
}

/// Runs the load and save through the plugins, the way the editor does.
fn convert(input: PathBuf, output: PathBuf) -> Result<(), String> {
    let mut app = App::new();
    app.add_plugins((ConfigPlugin, EditorPlugin, FilePlugin));

    app.world_mut()
        .write_message(LoadDocumentRequest { path: input });
    app.update();
    if let Some(message) = app.world().resource::<DocumentLoadError>().message.clone() {
        return Err(message);
    }

    app.world_mut().write_message(SaveDocumentRequest {
        path: output.clone(),
    });
    app.update();
    if let Some(message) = app.world().resource::<DocumentSaveError>().message.clone() {
        return Err(message);
    }

    app.world_mut()
        .resource_mut::<FileManager>()
        .clean_up_working_folder();
    println!("Wrote {}", output.display());
    Ok(())
}

fn summary(object: &Object) -> String {
    let mut out = format!(
        "{} layers, {} palette colours\n",
        object.layer_count(),
        object.palette.len()
    );
    for (index, layer) in object.layers().iter().enumerate() {
        out.push_str(&layer_line(index, layer));
    }
    if let Some(state) = &object.editor_state {
        out.push_str(&format!(
            "editor: frame {}, layer {}, {} fps, range {}-{}\n",
            state.current_frame,
            state.current_layer,
            state.fps,
            state.mark_in_frame,
            state.mark_out_frame
        ));
    }
    out
}

fn layer_line(index: usize, layer: &Layer) -> String {
    let keys = match layer.kind() {
        LayerKind::Sound => "clips",
        _ => "keys",
    };
    format!(
        "  [{}] {:<8} {:<24} {} {}{}\n",
        index,
        layer.kind().display_name(),
        layer.name,
        layer.key_count(),
        keys,
        if layer.visible { "" } else { " (hidden)" }
    )
}
