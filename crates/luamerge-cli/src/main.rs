use anyhow::Context;
use clap::Parser;
use luamerge_core::config::CONFIG_FILE_NAME;
use luamerge_core::{CliOverrides, PreprocessorConfig, RealFileSystem, WorkspaceCollector};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

/// luamerge - Flatten a Lua workspace into a single file
#[derive(Parser, Debug, Clone)]
#[command(name = "luamerge")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Workspace root directory
    #[arg(value_name = "DIR", default_value = ".")]
    root: PathBuf,

    /// Path to luamerge.yaml configuration file
    #[arg(short, long, value_name = "FILE")]
    project: Option<PathBuf>,

    /// Entry file, relative to the workspace root
    #[arg(long, value_name = "FILE")]
    entry: Option<String>,

    /// Module search paths (comma-separated)
    #[arg(long, value_name = "PATHS")]
    module_paths: Option<String>,

    /// Lua package.path string to derive module search paths from
    #[arg(long, value_name = "PATH")]
    package_path: Option<String>,

    /// Rewrite `function Name(...)` declarations as `Name = function(...)`
    #[arg(long)]
    rewrite_functions: bool,

    /// Keep comments and blank lines in the final output
    #[arg(long)]
    keep_comments: bool,

    /// Print the result instead of writing it to the output directory
    #[arg(long)]
    stdout: bool,

    /// Watch the workspace and rebuild on changes
    #[arg(short, long)]
    watch: bool,

    /// Initialize a new workspace
    #[arg(long)]
    init: bool,
}

fn main() -> anyhow::Result<()> {
    // Set RUST_LOG=debug for detailed logs; logs go to stderr so --stdout stays clean
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if cli.init {
        init_workspace(&cli.root)?;
        return Ok(());
    }

    let config = load_config(&cli)?;
    debug!("Search paths: {:?}", config.search_paths(&cli.root));

    if cli.watch {
        watch_mode(&cli, &config)?;
    } else {
        build(&cli, &config)?;
    }

    Ok(())
}

/// Write a default configuration and an entry file into `root`
fn init_workspace(root: &Path) -> anyhow::Result<()> {
    println!("Initializing new luamerge workspace...");

    std::fs::create_dir_all(root)?;

    let config_path = root.join(CONFIG_FILE_NAME);
    PreprocessorConfig::init_file(&config_path)
        .with_context(|| format!("Failed to write {}", config_path.display()))?;
    println!("Created {}", CONFIG_FILE_NAME);

    let main_path = root.join(luamerge_core::DEFAULT_ENTRY_FILE);
    if main_path.exists() {
        println!("Kept existing {}", luamerge_core::DEFAULT_ENTRY_FILE);
    } else {
        let sample = r#"-- Entry point. Modules required here are inlined in front of it.
print("Hello from luamerge!")
"#;
        std::fs::write(&main_path, sample)?;
        println!("Created {}", luamerge_core::DEFAULT_ENTRY_FILE);
    }

    println!("\nWorkspace initialized successfully!");
    Ok(())
}

/// Load configuration from file (if any) and apply CLI overrides
fn load_config(cli: &Cli) -> anyhow::Result<PreprocessorConfig> {
    let mut config = if let Some(ref project_path) = cli.project {
        PreprocessorConfig::from_file(project_path)
            .map_err(|e| anyhow::anyhow!("Failed to load config file: {}", e))?
    } else {
        let default_path = cli.root.join(CONFIG_FILE_NAME);
        if default_path.exists() {
            PreprocessorConfig::from_file(&default_path)
                .map_err(|e| anyhow::anyhow!("Failed to load {}: {}", CONFIG_FILE_NAME, e))?
        } else {
            PreprocessorConfig::default()
        }
    };

    let mut overrides = CliOverrides {
        entry_file: cli.entry.clone(),
        package_path: cli.package_path.clone(),
        ..Default::default()
    };
    if let Some(ref paths) = cli.module_paths {
        overrides.module_paths = Some(
            paths
                .split(',')
                .map(str::trim)
                .filter(|p| !p.is_empty())
                .map(str::to_string)
                .collect(),
        );
    }
    if cli.rewrite_functions {
        overrides.rewrite_functions = Some(true);
    }
    if cli.keep_comments {
        overrides.strip_comments = Some(false);
    }

    config.merge(&overrides);
    Ok(config)
}

/// Flatten the workspace once and emit the result
fn build(cli: &Cli, config: &PreprocessorConfig) -> anyhow::Result<()> {
    let collector = WorkspaceCollector::from_config(&cli.root, config, Arc::new(RealFileSystem));

    let code = collector
        .build()
        .with_context(|| format!("Failed to flatten workspace {}", cli.root.display()))?;

    if cli.stdout {
        println!("{}", code);
    } else {
        let path = collector.output(&code)?;
        println!("Wrote {}", path.display());
    }

    Ok(())
}

/// True for Lua files outside the output directory
fn is_watched_source(path: &Path, out_dir: &str) -> bool {
    let is_lua = path
        .extension()
        .is_some_and(|ext| ext == luamerge_core::SOURCE_EXTENSION);
    let in_out_dir = path
        .parent()
        .is_some_and(|dir| dir.iter().any(|part| part == out_dir));
    is_lua && !in_out_dir
}

/// Batches bursts of change events into one rebuild.
///
/// A save usually arrives as several events (create or truncate, then the
/// data write). The rebuild fires once no event has come in for `quiet`.
struct PendingRebuild {
    quiet: Duration,
    last_change: Option<Instant>,
}

impl PendingRebuild {
    fn new(quiet: Duration) -> Self {
        Self {
            quiet,
            last_change: None,
        }
    }

    fn mark(&mut self, now: Instant) {
        self.last_change = Some(now);
    }

    /// True once if a change is pending and the quiet window has passed
    fn take_ready(&mut self, now: Instant) -> bool {
        match self.last_change {
            Some(last) if now.duration_since(last) >= self.quiet => {
                self.last_change = None;
                true
            }
            _ => false,
        }
    }
}

/// Watch mode - rebuild on file changes
fn watch_mode(cli: &Cli, config: &PreprocessorConfig) -> anyhow::Result<()> {
    use notify::{Event, EventKind, RecursiveMode, Watcher};
    use std::sync::mpsc::channel;

    println!("Watching for changes... (Press Ctrl+C to stop)");

    println!("\nInitial build:");
    if let Err(e) = build(cli, config) {
        warn!("{:#}", e);
    }

    let (tx, rx) = channel();
    let mut watcher = notify::recommended_watcher(move |res: Result<Event, notify::Error>| {
        if let Ok(event) = res {
            let _ = tx.send(event);
        }
    })?;
    watcher.watch(&cli.root, RecursiveMode::Recursive)?;

    let out_dir = config.workspace_options.out_dir.as_str();
    let mut pending = PendingRebuild::new(Duration::from_millis(100));

    loop {
        match rx.recv_timeout(Duration::from_millis(50)) {
            Ok(event) => {
                let is_change = matches!(
                    event.kind,
                    EventKind::Modify(_) | EventKind::Create(_) | EventKind::Remove(_)
                );
                if is_change && event.paths.iter().any(|p| is_watched_source(p, out_dir)) {
                    debug!("Change detected: {:?}", event.paths);
                    pending.mark(Instant::now());
                }
            }
            Err(std::sync::mpsc::RecvTimeoutError::Timeout) => {}
            Err(std::sync::mpsc::RecvTimeoutError::Disconnected) => {
                return Err(anyhow::anyhow!("File watcher disconnected"));
            }
        }

        if pending.take_ready(Instant::now()) {
            info!("Rebuilding after source change");
            println!("\n\nFile changed, rebuilding...");
            if let Err(e) = build(cli, config) {
                warn!("{:#}", e);
            }
        }
    }
}
