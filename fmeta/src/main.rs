use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use fmeta_core::{FileState, Repository};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

mod output;

use output::{
    AddOutput, AddedFile, CommentOutput, InitOutput, MetaOutput, OutputWriter, ShowOutput,
    StatusOutput, TagOutput,
};

/// Fmeta - track files by content, annotate them by hash
#[derive(Parser)]
#[command(name = "fmeta")]
#[command(about = "Content-addressed file metadata tracker", long_about = None)]
#[command(version)]
struct Cli {
    /// Repository root (defaults to FMETA_ROOT env var or the user data dir)
    #[arg(short, long, global = true)]
    root: Option<PathBuf>,

    /// Emit JSON instead of text
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize a new repository
    Init,

    /// Show the tracking state of a file
    Status {
        /// File to classify
        path: PathBuf,

        /// Print a sentence instead of the one-letter code
        #[arg(short, long)]
        long: bool,
    },

    /// Track files (registering, re-staging, or updating as needed)
    Add {
        /// Files to track
        #[arg(required = true)]
        paths: Vec<PathBuf>,
    },

    /// Append a comment to a tracked file's content
    Comment {
        /// Tracked file
        path: PathBuf,

        /// Comment text
        text: String,
    },

    /// Set a key/value annotation on a tracked file's content
    Meta {
        /// Tracked file
        path: PathBuf,

        /// Annotation key
        key: String,

        /// Annotation value
        value: String,
    },

    /// Add a tag to a tracked file's content
    Tag {
        /// Tracked file
        path: PathBuf,

        /// Tag to add
        tag: String,
    },

    /// Show everything recorded for a tracked file's content
    Show {
        /// Tracked file
        path: PathBuf,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let out = OutputWriter::new(cli.json);

    // Determine repository root: CLI arg > FMETA_ROOT env var > user data dir
    let root = cli
        .root
        .or_else(|| std::env::var("FMETA_ROOT").ok().map(PathBuf::from))
        .unwrap_or_else(|| {
            dirs::data_local_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("fmeta")
        });

    let result = match cli.command {
        Commands::Init => cmd_init(&root, &out),
        Commands::Status { path, long } => cmd_status(&root, &path, long, &out),
        Commands::Add { paths } => cmd_add(&root, paths, &out),
        Commands::Comment { path, text } => cmd_comment(&root, &path, &text, &out),
        Commands::Meta { path, key, value } => cmd_meta(&root, &path, &key, &value, &out),
        Commands::Tag { path, tag } => cmd_tag(&root, &path, &tag, &out),
        Commands::Show { path } => cmd_show(&root, &path, &out),
    };

    if let Err(e) = result {
        out.write_error(&e);
        std::process::exit(1);
    }
}

fn open_repo(root: &Path) -> Result<Repository> {
    Repository::open(root)
        .with_context(|| format!("Failed to open repository at {}", root.display()))
}

fn cmd_init(root: &Path, out: &OutputWriter) -> Result<()> {
    Repository::init(root)
        .with_context(|| format!("Failed to initialize repository at {}", root.display()))?;

    out.write(
        &InitOutput {
            success: true,
            root: root.display().to_string(),
        },
        || format!("Initialized fmeta repository at {}\n", root.display()),
    )
}

fn cmd_status(root: &Path, path: &Path, long: bool, out: &OutputWriter) -> Result<()> {
    let repo = open_repo(root)?;
    let state = repo
        .query(path)
        .with_context(|| format!("Failed to query {}", path.display()))?;

    out.write(
        &StatusOutput {
            success: true,
            path: path.display().to_string(),
            state,
            code: state.code(),
        },
        || {
            if long {
                let sentence = match state {
                    FileState::New => "never seen before",
                    FileState::Same => "tracked and unchanged",
                    FileState::Dirty => "tracked but content changed",
                    FileState::NewName => "new name for already-known content",
                };
                format!("{} {} ({})\n", state.code(), path.display(), sentence)
            } else {
                format!("{} {}\n", state.code(), path.display())
            }
        },
    )
}

fn cmd_add(root: &Path, paths: Vec<PathBuf>, out: &OutputWriter) -> Result<()> {
    let repo = open_repo(root)?;
    let mut files = Vec::new();

    for path in paths {
        let tracker = repo
            .tracker(&path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let state = tracker.state()?;

        let action = match state {
            FileState::New => {
                tracker.create_infos()?;
                "registered"
            }
            FileState::NewName => {
                tracker.add_staging_info()?;
                "linked"
            }
            FileState::Dirty => {
                tracker.replace_infos()?;
                "updated"
            }
            FileState::Same => "unchanged",
        };

        files.push(AddedFile {
            path: path.display().to_string(),
            state,
            action,
        });
    }

    out.write(&AddOutput {
        success: true,
        files: files.clone(),
    }, || {
        let mut text = String::new();
        for file in &files {
            text.push_str(&format!("{} {} ({})\n", file.state.code(), file.path, file.action));
        }
        text
    })
}

fn cmd_comment(root: &Path, path: &Path, text: &str, out: &OutputWriter) -> Result<()> {
    let repo = open_repo(root)?;
    let tracker = repo
        .tracker(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    let comment = tracker
        .add_comment(text)
        .with_context(|| format!("Failed to comment on {} (is it tracked?)", path.display()))?;

    out.write(
        &CommentOutput {
            success: true,
            path: path.display().to_string(),
            id: comment.id.clone(),
            timestamp: comment.timestamp,
        },
        || format!("Added comment {} to {}\n", comment.id, path.display()),
    )
}

fn cmd_meta(root: &Path, path: &Path, key: &str, value: &str, out: &OutputWriter) -> Result<()> {
    let repo = open_repo(root)?;
    let tracker = repo
        .tracker(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    tracker
        .add_meta(key, value)
        .with_context(|| format!("Failed to set meta on {} (is it tracked?)", path.display()))?;

    out.write(
        &MetaOutput {
            success: true,
            path: path.display().to_string(),
            key: key.to_string(),
            value: value.to_string(),
        },
        || format!("Set {} = {} on {}\n", key, value, path.display()),
    )
}

fn cmd_tag(root: &Path, path: &Path, tag: &str, out: &OutputWriter) -> Result<()> {
    let repo = open_repo(root)?;
    let tracker = repo
        .tracker(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    tracker
        .add_tag(tag)
        .with_context(|| format!("Failed to tag {} (is it tracked?)", path.display()))?;

    out.write(
        &TagOutput {
            success: true,
            path: path.display().to_string(),
            tag: tag.to_string(),
        },
        || format!("Tagged {} with {}\n", path.display(), tag),
    )
}

fn cmd_show(root: &Path, path: &Path, out: &OutputWriter) -> Result<()> {
    let repo = open_repo(root)?;
    let tracker = repo
        .tracker(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    let record = tracker
        .object_record()
        .with_context(|| format!("Nothing recorded for {} (is it tracked?)", path.display()))?;

    out.write(
        &ShowOutput {
            success: true,
            path: path.display().to_string(),
            record: record.clone(),
        },
        || output::render_object_record(&record),
    )
}
