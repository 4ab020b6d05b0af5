mod scenario;
mod svg;

use narwhal::{Animator, Engine, EngineOptions, Motion};
use scenario::ScenarioKind;
use serde::Serialize;
use std::io::Write;
use std::str::FromStr;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Debug)]
enum CliError {
    Usage(&'static str),
    Io(std::io::Error),
    Engine(narwhal::Error),
    Json(serde_json::Error),
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CliError::Usage(msg) => write!(f, "{msg}"),
            CliError::Io(err) => write!(f, "I/O error: {err}"),
            CliError::Engine(err) => write!(f, "engine error: {err}"),
            CliError::Json(err) => write!(f, "JSON error: {err}"),
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<narwhal::Error> for CliError {
    fn from(value: narwhal::Error) -> Self {
        Self::Engine(value)
    }
}

impl From<serde_json::Error> for CliError {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}

#[derive(Debug, Clone, Copy, Default)]
enum OutputFormat {
    #[default]
    Json,
    Svg,
}

impl FromStr for OutputFormat {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "svg" => Ok(Self::Svg),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Default)]
struct Args {
    scenario: ScenarioKind,
    frames: u64,
    every: u64,
    seed: u64,
    config: Option<String>,
    format: OutputFormat,
    pretty: bool,
    out: Option<String>,
}

#[derive(Serialize)]
struct NodeOut<'a> {
    id: &'a str,
    x: f64,
    y: f64,
    motion: &'static str,
}

#[derive(Serialize)]
struct LinkOut<'a> {
    a: &'a str,
    b: &'a str,
    from: [f64; 2],
    to: [f64; 2],
}

#[derive(Serialize)]
struct FrameOut<'a> {
    frame: u64,
    time: f64,
    nodes: Vec<NodeOut<'a>>,
    links: Vec<LinkOut<'a>>,
}

#[derive(Serialize)]
struct RunOut<'a> {
    scenario: &'static str,
    options: &'a EngineOptions,
    frames: &'a [serde_json::Value],
}

fn usage() -> &'static str {
    "narwhal-cli\n\
\n\
USAGE:\n\
  narwhal-cli [chain|hub|churn] [--frames <n>] [--every <n>] [--seed <n>] [--config <path>] [--format json|svg] [--pretty] [--out <path>|-]\n\
\n\
NOTES:\n\
  - `--format json` (default) writes every `--every`-th frame plus the last one.\n\
  - `--format svg` writes a snapshot of the last frame.\n\
  - `--config` reads engine options (dt, friction, default_mass, movement) from a JSON file.\n\
  - Logs go to stderr; set RUST_LOG=narwhal=debug to see structural changes.\n"
}

fn parse_args(argv: &[String]) -> Result<Args, CliError> {
    let mut args = Args {
        frames: 200,
        every: 1,
        seed: 42,
        ..Default::default()
    };

    let mut it = argv.iter().skip(1);
    while let Some(a) = it.next() {
        match a.as_str() {
            "--help" | "-h" => return Err(CliError::Usage(usage())),
            "--pretty" => args.pretty = true,
            "--frames" => args.frames = parse_number(it.next())?,
            "--every" => {
                args.every = parse_number(it.next())?;
                if args.every == 0 {
                    return Err(CliError::Usage(usage()));
                }
            }
            "--seed" => args.seed = parse_number(it.next())?,
            "--config" => {
                let Some(path) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.config = Some(path.clone());
            }
            "--format" => {
                let Some(fmt) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.format = fmt
                    .parse::<OutputFormat>()
                    .map_err(|_| CliError::Usage(usage()))?;
            }
            "--out" | "-o" => {
                let Some(path) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.out = Some(path.clone());
            }
            other if other.starts_with('-') => return Err(CliError::Usage(usage())),
            other => {
                args.scenario = other
                    .parse::<ScenarioKind>()
                    .map_err(|_| CliError::Usage(usage()))?;
            }
        }
    }

    Ok(args)
}

fn parse_number(value: Option<&String>) -> Result<u64, CliError> {
    value
        .and_then(|v| v.parse::<u64>().ok())
        .ok_or(CliError::Usage(usage()))
}

fn load_options(path: Option<&str>) -> Result<EngineOptions, CliError> {
    let Some(path) = path else {
        return Ok(EngineOptions::default());
    };
    let text = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str::<EngineOptions>(&text)?)
}

fn motion_name(motion: Motion) -> &'static str {
    match motion {
        Motion::Static => "static",
        Motion::Settled => "settled",
        Motion::Moving => "moving",
    }
}

fn snapshot(engine: &Engine<()>) -> Result<serde_json::Value, CliError> {
    let graph = engine.graph();
    let frame = FrameOut {
        frame: engine.frame(),
        time: engine.time(),
        nodes: graph
            .nodes()
            .map(|n| {
                let p = n.position();
                NodeOut {
                    id: n.id().as_str(),
                    x: p.x,
                    y: p.y,
                    motion: motion_name(n.motion()),
                }
            })
            .collect(),
        links: graph
            .links()
            .map(|(key, link)| LinkOut {
                a: key.a().as_str(),
                b: key.b().as_str(),
                from: [link.a().x, link.a().y],
                to: [link.b().x, link.b().y],
            })
            .collect(),
    };
    Ok(serde_json::to_value(frame)?)
}

fn write_output(out: Option<&str>, bytes: &[u8]) -> Result<(), CliError> {
    match out {
        None | Some("-") => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(bytes)?;
            stdout.flush()?;
        }
        Some(path) => std::fs::write(path, bytes)?,
    }
    Ok(())
}

fn run(args: Args) -> Result<(), CliError> {
    let opts = load_options(args.config.as_deref())?;
    let (engine, manager) = scenario::build(args.scenario, opts, args.seed)?;
    info!(
        scenario = args.scenario.name(),
        frames = args.frames,
        seed = args.seed,
        "running scenario"
    );

    let mut animator = Animator::new(engine, manager);
    let mut palette = svg::Palette::default();
    let mut frames = Vec::new();
    let mut failed = None;
    let (total, every, format) = (args.frames, args.every, args.format);
    animator.run(total, |engine, report| {
        match format {
            OutputFormat::Json => {
                if report.frame % every == 0 || report.frame == total {
                    match snapshot(engine) {
                        Ok(frame) => frames.push(frame),
                        Err(err) => failed = Some(err),
                    }
                }
            }
            OutputFormat::Svg => palette.observe(engine),
        }
    })?;
    if let Some(err) = failed {
        return Err(err);
    }

    let engine = animator.engine();
    info!(
        frame = engine.frame(),
        nodes = engine.node_count(),
        links = engine.graph().link_count(),
        "scenario finished"
    );

    match format {
        OutputFormat::Json => {
            let doc = RunOut {
                scenario: args.scenario.name(),
                options: engine.options(),
                frames: &frames,
            };
            let mut text = if args.pretty {
                serde_json::to_string_pretty(&doc)?
            } else {
                serde_json::to_string(&doc)?
            };
            text.push('\n');
            write_output(args.out.as_deref(), text.as_bytes())
        }
        OutputFormat::Svg => {
            let text = svg::render(engine, &mut palette, &svg::SvgOptions::default());
            write_output(args.out.as_deref(), text.as_bytes())
        }
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn main() {
    let args = match parse_args(&std::env::args().collect::<Vec<_>>()) {
        Ok(v) => v,
        Err(CliError::Usage(msg)) => {
            eprintln!("{msg}");
            std::process::exit(2);
        }
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(1);
        }
    };

    init_tracing();
    if let Err(err) = run(args) {
        eprintln!("{err}");
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn argv(args: &[&str]) -> Vec<String> {
        std::iter::once("narwhal-cli")
            .chain(args.iter().copied())
            .map(String::from)
            .collect()
    }

    #[test]
    fn defaults_run_the_chain_as_json() {
        let args = parse_args(&argv(&[])).unwrap();
        assert_eq!(args.scenario, ScenarioKind::Chain);
        assert_eq!(args.frames, 200);
        assert!(matches!(args.format, OutputFormat::Json));
    }

    #[test]
    fn flags_are_parsed() {
        let args = parse_args(&argv(&[
            "churn", "--frames", "30", "--every", "5", "--format", "svg", "--seed", "9",
        ]))
        .unwrap();
        assert_eq!(args.scenario, ScenarioKind::Churn);
        assert_eq!((args.frames, args.every, args.seed), (30, 5, 9));
        assert!(matches!(args.format, OutputFormat::Svg));
    }

    #[test]
    fn bad_input_is_a_usage_error() {
        for bad in [
            &["--frames"][..],
            &["--frames", "x"],
            &["--every", "0"],
            &["--format", "png"],
            &["spiral"],
            &["--nope"],
        ] {
            assert!(matches!(parse_args(&argv(bad)), Err(CliError::Usage(_))));
        }
    }
}
