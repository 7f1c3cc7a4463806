use clap::{CommandFactory, Parser, ValueEnum};
use jscld::{Config, Converter};
use log::error;
use oxigraph::io::RdfFormat;
use std::path::PathBuf;
use std::process::ExitCode;

/// Convert JSON Schema documents into an RDFS vocabulary and SHACL shapes
#[derive(Parser, Debug)]
#[command(name = "jscld", author, version, about, long_about = None)]
struct Cli {
    /// JSON Schema file, or a directory whose .json files are all converted
    #[arg(short, long, value_name = "PATH")]
    source: Option<PathBuf>,

    /// JSON configuration file holding the namespace prefix and URI
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Output directory [default: out]
    #[arg(short, long, value_name = "DIR")]
    out: Option<PathBuf>,

    /// Serialization format of both output files [default: turtle]
    #[arg(short, long, value_enum)]
    format: Option<OutputFormat>,
}

#[derive(ValueEnum, Clone, Copy, Debug, Default)]
enum OutputFormat {
    #[default]
    Turtle,
    NTriples,
    RdfXml,
    N3,
}

impl From<OutputFormat> for RdfFormat {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Turtle => RdfFormat::Turtle,
            OutputFormat::NTriples => RdfFormat::NTriples,
            OutputFormat::RdfXml => RdfFormat::RdfXml,
            OutputFormat::N3 => RdfFormat::N3,
        }
    }
}

fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    let (source, config_path) = match (&cli.source, &cli.config) {
        (Some(source), Some(config)) => (source, config),
        _ => {
            Cli::command().print_help()?;
            println!();
            return Ok(ExitCode::SUCCESS);
        }
    };

    let config = match Config::from_file(
        config_path,
        source,
        cli.out.clone(),
        cli.format.map(RdfFormat::from),
    ) {
        Ok(config) => config,
        Err(e) => {
            error!("{}", e);
            return Ok(ExitCode::FAILURE);
        }
    };

    let report = Converter::new(config).run();
    report.log_summary();
    Ok(if report.is_success() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
