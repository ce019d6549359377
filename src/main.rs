use anyhow::Result;
use camino::Utf8PathBuf;
use clap::{Parser, ValueEnum};
use env_logger::Env;
use topolink::ImportOptions;
use topolink::generator::{generate_plain, generate_topology_xml};
use topolink::parser::{FsSource, TopologyFormat, TopologyParser};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum InputFormat {
    Plain,
    Xml,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    Plain,
    Xml,
    Json,
}

#[derive(Parser, Debug)]
#[command(author, version, about = "Convert topology files between plain text, XML and JSON", long_about = None)]
struct Cli {
    /// Topology file (`.xml` is read as XML, anything else as plain text)
    #[arg(value_name = "TOPOLOGY_FILE")]
    file: Utf8PathBuf,

    /// Override input format detection
    #[arg(long, value_enum)]
    from: Option<InputFormat>,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
    to: OutputFormat,

    /// Fail on the first malformed node or link instead of skipping it
    #[arg(long)]
    strict: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let format = cli.from.map(|f| match f {
        InputFormat::Plain => TopologyFormat::Plain,
        InputFormat::Xml => TopologyFormat::Xml,
    });
    let mut parser = TopologyParser::new(FsSource).with_options(ImportOptions { strict: cli.strict });
    let (tp, report) = parser.load_file(&cli.file, format)?;
    if !report.is_clean() {
        log::warn!(
            "{} entities skipped while reading {}",
            report.diagnostics.len(),
            cli.file
        );
    }

    let out = match cli.to {
        OutputFormat::Plain => generate_plain(&tp)?,
        OutputFormat::Xml => generate_topology_xml(&tp),
        OutputFormat::Json => serde_json::to_string_pretty(&tp)? + "\n",
    };
    print!("{}", out);
    Ok(())
}
