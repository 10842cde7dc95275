//! yaml-template CLI
//!
//! Usage:
//!   yaml-template [OPTIONS] [FILE]
//!
//! Options:
//!   -r, --root <NAME>      Struct to render (first declared struct by default)
//!   -c, --config <FILE>    Generator configuration file (TOML format)
//!   -o, --output <FILE>    Write the template to a file instead of stdout
//!       --align <MODE>     Comment alignment: block or document
//!       --indent <N>       Spaces per nesting level
//!   -v, --verbose          Debug logging
//!   -h, --help             Print help

use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use log::debug;

use yaml_template::{render_with_config, CommentAlignment, GeneratorConfig, RenderConfig};

#[derive(Parser)]
#[command(name = "yaml-template")]
#[command(about = "Generate commented YAML configuration templates from a schema")]
struct Cli {
    /// Schema file (reads from stdin if not provided)
    input: Option<PathBuf>,

    /// Struct to render (first declared struct by default)
    #[arg(short, long)]
    root: Option<String>,

    /// Generator configuration file (TOML format)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Write the template to a file instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Comment alignment strategy
    #[arg(long, value_enum)]
    align: Option<AlignArg>,

    /// Spaces per nesting level
    #[arg(long)]
    indent: Option<usize>,

    /// Debug logging
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum AlignArg {
    /// One comment column per struct
    Block,
    /// One comment column for the whole document
    Document,
}

impl From<AlignArg> for CommentAlignment {
    fn from(arg: AlignArg) -> Self {
        match arg {
            AlignArg::Block => CommentAlignment::Block,
            AlignArg::Document => CommentAlignment::Document,
        }
    }
}

fn main() {
    let cli = Cli::parse();

    let level = if cli.verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Warn
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();

    // Load generator configuration, then apply flag overrides
    let mut config = match &cli.config {
        Some(path) => match GeneratorConfig::from_file(path) {
            Ok(c) => c,
            Err(e) => fail(&format!("Error loading config '{}': {}", path.display(), e)),
        },
        None => GeneratorConfig::default(),
    };
    if let Some(align) = cli.align {
        config = config.with_alignment(align.into());
    }
    if let Some(indent) = cli.indent {
        config = config.with_indent_width(indent);
    }
    debug!("generator config: {:?}", config);

    // Read input
    let (source, filename) = match &cli.input {
        Some(path) => match fs::read_to_string(path) {
            Ok(content) => (content, path.display().to_string()),
            Err(e) => fail(&format!("Error reading file '{}': {}", path.display(), e)),
        },
        None => {
            let mut buffer = String::new();
            match io::stdin().read_to_string(&mut buffer) {
                Ok(_) => (buffer, "<stdin>".to_string()),
                Err(e) => fail(&format!("Error reading from stdin: {}", e)),
            }
        }
    };

    let mut render_config = RenderConfig::new().with_generator(config);
    if let Some(root) = &cli.root {
        render_config = render_config.with_root(root.as_str());
    }

    let template = match render_with_config(&source, render_config) {
        Ok(template) => template,
        Err(e) => {
            eprint!("{}", e.format(&source, &filename));
            fail(&format!("Failed to render template from '{}'", filename))
        }
    };

    match &cli.output {
        Some(path) => {
            if let Err(e) = fs::write(path, &template) {
                fail(&format!("Error writing file '{}': {}", path.display(), e));
            }
            debug!("wrote template to {}", path.display());
        }
        None => print!("{}", template),
    }
}

fn fail(message: &str) -> ! {
    eprintln!("{}", message);
    std::process::exit(1);
}
