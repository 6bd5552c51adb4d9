use std::path::PathBuf;

use miette::{IntoDiagnostic, WrapErr};
use svg_digitize::{DigitizeOptions, Headers, Mode, digitize, export};

const USAGE: &str = "\
Usage: svg-digitize <input.svg> <label>... [options]

Options:
  --mode <path|group>   how labeled elements become points (default: path)
  --xref <prefix>       label prefix of the x reference path (default: xref)
  --yref <prefix>       label prefix of the y reference path (default: yref)
  --xheader <name>      x column header in the output tables (default: x)
  --yheader <name>      y column header in the output tables (default: y)";

#[derive(Debug, Clone, PartialEq)]
struct Args {
    input: PathBuf,
    options: DigitizeOptions,
    headers: Headers,
}

fn parse_args<I>(args: I) -> miette::Result<Args>
where
    I: IntoIterator<Item = String>,
{
    let mut args = args.into_iter();
    let mut positional = Vec::new();
    let mut mode = Mode::default();
    let mut x_reference = None;
    let mut y_reference = None;
    let mut headers = Headers::default();

    while let Some(arg) = args.next() {
        let mut value = |flag: &str| {
            args.next()
                .ok_or_else(|| miette::miette!(help = USAGE, "missing value for {flag}"))
        };
        match arg.as_str() {
            "--mode" => mode = value("--mode")?.parse()?,
            "--xref" => x_reference = Some(value("--xref")?),
            "--yref" => y_reference = Some(value("--yref")?),
            "--xheader" => headers.x = value("--xheader")?,
            "--yheader" => headers.y = value("--yheader")?,
            flag if flag.starts_with("--") => {
                return Err(miette::miette!(help = USAGE, "unknown option: {flag}"));
            }
            _ => positional.push(arg),
        }
    }

    let mut positional = positional.into_iter();
    let input = positional
        .next()
        .map(PathBuf::from)
        .ok_or_else(|| miette::miette!(help = USAGE, "missing input file"))?;
    let labels: Vec<String> = positional.collect();
    if labels.is_empty() {
        return Err(miette::miette!(help = USAGE, "no labels requested"));
    }

    let mut options = DigitizeOptions::new(labels).with_mode(mode);
    if let Some(prefix) = x_reference {
        options = options.with_x_reference(prefix);
    }
    if let Some(prefix) = y_reference {
        options = options.with_y_reference(prefix);
    }
    Ok(Args {
        input,
        options,
        headers,
    })
}

fn run(args: &Args) -> miette::Result<Vec<PathBuf>> {
    let markup = std::fs::read_to_string(&args.input)
        .into_diagnostic()
        .wrap_err_with(|| format!("reading {}", args.input.display()))?;
    let digitized = digitize(markup.lines(), &args.options)?;
    for (label, series) in digitized.series.iter() {
        if series.is_empty() {
            tracing::warn!(label, "no points found");
        }
    }
    export::write_all(&args.input, &digitized, &args.headers)
        .into_diagnostic()
        .wrap_err("writing output tables")
}

fn main() -> miette::Result<()> {
    // stdout is reserved for the list of written files
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = parse_args(std::env::args().skip(1))?;
    for path in run(&args)? {
        println!("{}", path.display());
    }
    Ok(())
}
