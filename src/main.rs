//! # Bulk Transcode - Main Entry Point
//!
//! Questo è il punto di ingresso principale dell'applicazione.
//!
//! ## Responsabilità:
//! - Parsing degli argomenti della command line con `clap`
//! - Inizializzazione del sistema di logging con `tracing`
//! - Merge tra preferenze salvate e argomenti espliciti
//! - Scelta del reporter (righe, progress bar, JSON) e avvio della pipeline
//!
//! ## Flusso di esecuzione:
//! 1. Parsa gli argomenti CLI
//! 2. Carica le preferenze (`--config` o `~/.bulk-transcode/config.json`)
//! 3. Applica gli argomenti espliciti sopra le preferenze
//! 4. Pianifica i job ed eventualmente li esegue
//! 5. Stampa una riga per job e una riga finale di completamento
//!
//! ## Esempio di utilizzo:
//! ```bash
//! bulk-transcode --source-codec flac --target-codec opus \
//!     --source-folder ~/Music/flac --destination-folder ~/Music/opus --copy-others
//! ```

use anyhow::Result;
use bulk_transcode::json_output::JsonMessage;
use bulk_transcode::{
    BulkTranscoder, Codec, ConsoleReporter, JsonReporter, ProgressBarReporter, ProgressReporter,
    RenameStrategy, TranscodeConfig,
};
use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum ProgressMode {
    /// One line per job
    Line,
    /// Interactive progress bar
    Bar,
    /// One JSON object per line
    Json,
}

#[derive(Parser)]
#[command(name = "bulk-transcode")]
#[command(about = "Transcode audio files recursively into a mirrored folder")]
struct Args {
    /// Source codec (aac, flac, opus, mp3, vorbis)
    #[arg(long, value_parser = parse_codec)]
    source_codec: Option<Codec>,

    /// Target codec (aac, flac, opus, mp3, vorbis)
    #[arg(long, value_parser = parse_codec)]
    target_codec: Option<Codec>,

    /// Folder containing source audio files
    #[arg(long)]
    source_folder: Option<PathBuf>,

    /// Folder to output transcoded audio files
    #[arg(long)]
    destination_folder: Option<PathBuf>,

    /// Copy files that do not match the source codec extension
    #[arg(long)]
    copy_others: bool,

    /// Replace only the trailing extension (a.flac.flac -> a.flac.opus)
    #[arg(long)]
    suffix_rename: bool,

    /// Encoder executable
    #[arg(long)]
    encoder: Option<PathBuf>,

    /// Number of parallel jobs
    #[arg(short, long)]
    workers: Option<usize>,

    /// Plan and list the jobs without running them
    #[arg(long)]
    dry_run: bool,

    /// Progress output format
    #[arg(long, value_enum, default_value = "line")]
    progress: ProgressMode,

    /// Preferences file (JSON)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Save the effective configuration to the preferences file
    #[arg(long)]
    save_config: bool,

    /// Verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn parse_codec(value: &str) -> Result<Codec, String> {
    value.parse::<Codec>().map_err(|e| {
        let known: Vec<&str> = Codec::ALL.iter().map(|codec| codec.id()).collect();
        format!("{} (expected one of: {})", e, known.join(", "))
    })
}

impl Args {
    /// Explicit arguments override the saved preferences
    fn apply(&self, mut config: TranscodeConfig) -> TranscodeConfig {
        if let Some(codec) = self.source_codec {
            config.source_codec = Some(codec);
        }
        if let Some(codec) = self.target_codec {
            config.target_codec = Some(codec);
        }
        if let Some(ref folder) = self.source_folder {
            config.source_root = Some(folder.clone());
        }
        if let Some(ref folder) = self.destination_folder {
            config.destination_root = Some(folder.clone());
        }
        if self.copy_others {
            config.copy_unmatched = true;
        }
        if self.suffix_rename {
            config.rename = RenameStrategy::Suffix;
        }
        if let Some(ref encoder) = self.encoder {
            config.encoder_binary = encoder.clone();
        }
        if let Some(workers) = self.workers {
            config.workers = workers;
        }
        config
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    let default_level = match (args.verbose, args.progress) {
        (true, _) => "debug",
        (false, ProgressMode::Line) => "info",
        (false, _) => "warn",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    match run(&args).await {
        Ok(true) => Ok(()),
        Ok(false) => std::process::exit(2),
        Err(e) => {
            if args.progress == ProgressMode::Json {
                JsonMessage::error(format!("{:#}", e)).emit();
            }
            Err(e)
        }
    }
}

/// Plan and execute the run, `Ok(false)` when some job failed
async fn run(args: &Args) -> Result<bool> {
    let config_path = args.config.clone().or_else(TranscodeConfig::default_path);
    let saved = match config_path {
        Some(ref path) => TranscodeConfig::from_file(path).await?,
        None => TranscodeConfig::default(),
    };
    let config = args.apply(saved);

    if args.save_config {
        let path = config_path
            .as_ref()
            .ok_or_else(|| anyhow::anyhow!("Could not find home directory, pass --config"))?;
        config.save_to_file(path).await?;
        info!("Saved preferences to {}", path.display());
    }

    let transcoder = BulkTranscoder::new(&config)?;

    let jobs = transcoder.plan()?;
    info!(
        "Found {} jobs to process ({})",
        jobs.len(),
        BulkTranscoder::input_size(&jobs)
    );

    if args.dry_run {
        for job in &jobs {
            println!("{}: {} -> {}", job.action, job.input.display(), job.output.display());
        }
        println!("{} jobs planned, nothing executed.", jobs.len());
        return Ok(true);
    }

    let cancel = transcoder.cancel_flag();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupted, finishing the current job");
            cancel.cancel();
        }
    });

    if args.progress == ProgressMode::Json {
        JsonMessage::start(transcoder.config(), &jobs).emit();
    }

    let reporter: Box<dyn ProgressReporter> = match args.progress {
        ProgressMode::Line => Box::new(ConsoleReporter),
        ProgressMode::Bar => Box::new(ProgressBarReporter::new(jobs.len() as u64)),
        ProgressMode::Json => Box::new(JsonReporter),
    };

    let summary = transcoder.execute(jobs, reporter.as_ref()).await?;

    if args.progress == ProgressMode::Line {
        if summary.cancelled {
            println!("Transcoding cancelled.");
        } else {
            println!("Transcoding completed.");
        }
    }

    if !summary.failures.is_empty() {
        warn!("{} jobs failed, run again to retry them", summary.failed());
        return Ok(false);
    }

    Ok(true)
}
