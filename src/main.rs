//! coqdoc: render annotated `.v` sources to HTML, jsCoq pages or a debug
//! trace, with cross-reference links taken from `.glob` files.
//!
//! - **multi-file** (default): `coqdoc -d html -R theories Lib theories/*.v`
//! - **single file**: `coqdoc -o all.html --toc theories/*.v`
//! - **stdout**: `coqdoc --stdout --backend=debug Foo.v`

mod config;
mod error;
mod index;
mod literate;
mod orchestrate;
mod paths;
mod preload;
mod render;
mod source;
mod toc;

use anyhow::{Context, Result};
use clap::builder::NonEmptyStringValueParser;
use clap::error::ErrorKind;
use clap::Parser;
use config::{GlobSource, OutputMode, RenderOptions, TargetFormat};
use index::CrossRefIndex;
use orchestrate::OutputPlan;
use paths::PathMapper;
use std::io::IsTerminal;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser)]
#[command(
    name = "coqdoc",
    version,
    about = "Generate documentation from annotated Coq sources"
)]
struct Cli {
    /// Input files, rendered in the order given
    #[arg(required = true)]
    files: Vec<PathBuf>,

    /// Output backend
    #[arg(long, value_enum, value_name = "NAME", conflicts_with = "html")]
    backend: Option<TargetFormat>,

    /// Same as --backend=html
    #[arg(long)]
    html: bool,

    /// Write one document to standard output
    #[arg(long, overrides_with = "output")]
    stdout: bool,

    /// Write one document to FILE (relative paths are taken under --directory)
    #[arg(
        short = 'o',
        long,
        value_name = "FILE",
        value_parser = NonEmptyStringValueParser::new(),
        overrides_with = "stdout"
    )]
    output: Option<String>,

    /// Directory for generated documents, and base of a relative --output
    #[arg(short = 'd', long, value_name = "DIR", default_value = ".")]
    directory: PathBuf,

    /// Short page titles (no "Library" prefix)
    #[arg(short = 's', long)]
    short: bool,

    /// Light mode: leave out proofs
    #[arg(short = 'l', long)]
    light: bool,

    /// Document title
    #[arg(short = 't', long, value_name = "TITLE", default_value = "")]
    title: String,

    /// Emit document bodies without header and trailer
    #[arg(long)]
    body_only: bool,

    /// Do not produce an index
    #[arg(long)]
    no_index: bool,

    /// Split the index into one page per letter
    #[arg(long)]
    multi_index: bool,

    /// Base name of the index page
    #[arg(long, value_name = "NAME", default_value = "index")]
    index: String,

    /// Produce a table of contents
    #[arg(long)]
    toc: bool,

    /// Deepest heading level listed in the table of contents
    #[arg(long, value_name = "DEPTH")]
    toc_depth: Option<u8>,

    /// Do not read any glob file
    #[arg(long, overrides_with = "glob_from")]
    no_glob: bool,

    /// Read cross-references from FILE instead of per-file globs
    #[arg(long, value_name = "FILE", overrides_with = "no_glob")]
    glob_from: Option<PathBuf>,

    /// Map physical directory DIR to logical name NAME (repeatable; first match wins)
    #[arg(short = 'R', short_alias = 'Q', num_args = 2, value_names = ["DIR", "NAME"])]
    bindings: Vec<String>,

    /// Link modules under NAME to documentation at URL (repeatable)
    #[arg(long, num_args = 2, value_names = ["URL", "NAME"])]
    external: Vec<String>,

    /// URL of the Coq standard library documentation
    #[arg(long, value_name = "URL", default_value = index::DEFAULT_COQLIB)]
    coqlib: String,

    /// Directory holding stylesheet and script assets
    #[arg(long, value_name = "DIR", env = "COQDOC_ASSETS")]
    assets: Option<PathBuf>,

    /// Only report errors
    #[arg(short = 'q', long, conflicts_with = "verbose")]
    quiet: bool,

    /// Report progress details
    #[arg(short = 'v', long)]
    verbose: bool,
}

impl Cli {
    fn target_format(&self) -> TargetFormat {
        if self.html {
            TargetFormat::Html
        } else {
            self.backend.unwrap_or_default()
        }
    }

    fn output_mode(&self) -> OutputMode {
        match (&self.output, self.stdout) {
            (_, true) => OutputMode::Stdout,
            (Some(path), false) => OutputMode::SingleFile(self.directory.join(path)),
            (None, false) => OutputMode::MultiFile,
        }
    }

    fn glob_source(&self) -> GlobSource {
        match (&self.glob_from, self.no_glob) {
            (_, true) => GlobSource::None,
            (Some(path), false) => GlobSource::Combined(path.clone()),
            (None, false) => GlobSource::PerUnit,
        }
    }

    fn render_options(&self) -> RenderOptions {
        RenderOptions {
            table_of_contents: self.toc,
            index: !self.no_index,
            split_index: self.multi_index,
            standalone: !self.body_only,
            toc_depth: self.toc_depth,
            title: self.title.clone(),
            short_titles: self.short,
            light: self.light,
            index_name: self.index.clone(),
        }
    }
}

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => return parse_failure(e),
    };

    init_tracing(&cli);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("coqdoc: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

/// Help exits 1 on stderr, version exits 0 on stdout, anything else is a
/// usage error (exit 1).
fn parse_failure(e: clap::Error) -> ExitCode {
    match e.kind() {
        ErrorKind::DisplayVersion => {
            let _ = e.print();
            ExitCode::SUCCESS
        }
        ErrorKind::DisplayHelp | ErrorKind::DisplayHelpOnMissingArgumentOrSubcommand => {
            eprint!("{}", e.render());
            ExitCode::FAILURE
        }
        _ => {
            let _ = e.print();
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(cli: &Cli) {
    let level = if cli.quiet {
        "error"
    } else if cli.verbose {
        "debug"
    } else {
        "warn"
    };
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)))
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_ansi(std::io::stderr().is_terminal())
                .with_target(false),
        )
        .init();
}

fn run(cli: Cli) -> Result<()> {
    let mut mapper = PathMapper::new();
    for pair in cli.bindings.chunks_exact(2) {
        mapper.add_binding(&pair[0], &pair[1]);
    }

    // Every input is checked before anything is written.
    let units = source::classify_all(&cli.files, &mapper).context("invalid input")?;

    let mut index = CrossRefIndex::new();
    index.add_external_root(&cli.coqlib, "Coq");
    for pair in cli.external.chunks_exact(2) {
        index.add_external_root(&pair[0], &pair[1]);
    }
    preload::preload(&mut index, &units, &cli.glob_source());
    tracing::debug!(
        units = units.len(),
        definitions = index.definition_count(),
        references = index.reference_count(),
        "index loaded"
    );

    let format = cli.target_format();
    let options = cli.render_options();
    let plan = OutputPlan {
        mode: cli.output_mode(),
        output_dir: cli.directory.clone(),
        assets_dir: cli.assets.clone().unwrap_or_else(default_assets_dir),
    };

    let mut backend = render::select(format);
    orchestrate::produce(backend.as_mut(), &units, &plan, &options, &index)
        .context("documentation generation failed")?;
    Ok(())
}

/// `<exe dir>/../share/coqdoc`, where installs put the support files.
fn default_assets_dir() -> PathBuf {
    std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(|dir| dir.join("../share/coqdoc")))
        .unwrap_or_else(|| PathBuf::from("assets"))
}
