use std::io::Write;
use std::process::ExitCode;

use clap::Parser;
use clap_verbosity_flag::WarnLevel;
use fconv_core::{Config, DEFAULT_TIMEOUT, Options};

mod args;
mod fetch;

#[derive(Parser)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Input file path or URL, reads standard input when empty
    #[arg(short, long, value_name = "PATH_OR_URL", default_value = "")]
    input: String,

    /// Encoding to convert from (json, toml, yml, msgpack).
    /// Inferred from the input's file extension when omitted.
    #[arg(short, long, value_name = "FORMAT")]
    from: Option<String>,

    /// Encoding to convert to (json, toml, yml, msgpack)
    #[arg(short, long, value_name = "FORMAT")]
    to: String,

    /// Timeout for HTTP requests, e.g. 30s, 500ms, 1m30s
    #[arg(
        long,
        value_name = "DURATION",
        default_value = DEFAULT_TIMEOUT,
        env = "FCONV_TIMEOUT"
    )]
    timeout: String,

    #[command(flatten)]
    verbosity: clap_verbosity_flag::Verbosity<WarnLevel>,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let Cli {
        input,
        from,
        to,
        timeout,
        verbosity,
    } = Cli::parse_from(args::normalize(std::env::args_os()));

    // stdout carries the converted document, so logs go to stderr
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(verbosity)
        .init();

    let options = Options {
        input,
        from,
        to,
        timeout,
    };
    match run(options).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("fconv: {err:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run(options: Options) -> anyhow::Result<()> {
    let config = Config::resolve(options)?;
    let input = fetch::fetch_content(&config).await?;
    let output = fconv_core::convert(&input, config.from(), config.to())?;

    let mut stdout = std::io::stdout().lock();
    stdout.write_all(&output)?;
    stdout.write_all(b"\n")?;
    stdout.flush()?;
    Ok(())
}
