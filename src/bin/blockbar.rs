//! Preview generated bar conditions in the terminal.
//!
//! Uses a small hand-rolled parser instead of a CLI framework, like the rest
//! of the crate's tooling.

use std::io::{self, IsTerminal, Write};
use std::process::ExitCode;

use blockbar::color::{ColorMapper, ColorTriplet, DEFAULT_BUCKET_WIDTH, Palette};
use blockbar::generator::{BarConfig, generate};
use blockbar::logging::BarLogger;
use blockbar::markup::ColorOutput;
use blockbar::presets::science_pack_bars;
use blockbar::preview::preview_lines;

const HELP_TEXT: &str = "\
blockbar - preview pre-computed progress bar conditions

USAGE:
    blockbar [OPTIONS]

OPTIONS:
    --length N            Full cells at maximum value (default 10)
    --step N              Threshold step in eighths of a cell (default 1)
    --prefix TEXT         Text placed before the bar
    --font NAME           Font tag wrapped around the bar
    --signal NAME         Signal the conditions compare against
    --color #RRGGBB       Constant bar color
    --palette NAME        Gradient palette: red-blue | grayscale
    --stepped [WIDTH]     Quantize the palette lookup (default width 0.1)
    --samples N           Show N evenly spaced conditions (default 5)
    --all                 Show every condition
    --presets             Preview the built-in science pack bars
    --no-color            Print without ANSI escapes
    --log-level LEVEL     off | error | warn | info | debug | trace (default warn)
    -h, --help            Print this help
";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum LogLevel {
    Off,
    Error,
    #[default]
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    fn parse(value: &str) -> Result<Self, String> {
        match value.trim().to_ascii_lowercase().as_str() {
            "off" | "none" => Ok(Self::Off),
            "error" => Ok(Self::Error),
            "warn" | "warning" => Ok(Self::Warn),
            "info" => Ok(Self::Info),
            "debug" => Ok(Self::Debug),
            "trace" => Ok(Self::Trace),
            _ => Err(format!(
                "Invalid --log-level value `{value}` (expected: off|error|warn|info|debug|trace)."
            )),
        }
    }

    fn to_level_filter(self) -> log::LevelFilter {
        match self {
            Self::Off => log::LevelFilter::Off,
            Self::Error => log::LevelFilter::Error,
            Self::Warn => log::LevelFilter::Warn,
            Self::Info => log::LevelFilter::Info,
            Self::Debug => log::LevelFilter::Debug,
            Self::Trace => log::LevelFilter::Trace,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PaletteName {
    RedBlue,
    Grayscale,
}

impl PaletteName {
    fn parse(value: &str) -> Result<Self, String> {
        match value.trim().to_ascii_lowercase().as_str() {
            "red-blue" | "rdbu" => Ok(Self::RedBlue),
            "grayscale" | "gray" | "grey" => Ok(Self::Grayscale),
            _ => Err(format!(
                "Invalid --palette value `{value}` (expected: red-blue|grayscale)."
            )),
        }
    }

    fn palette(self) -> Palette {
        match self {
            Self::RedBlue => Palette::red_blue(),
            Self::Grayscale => Palette::grayscale(),
        }
    }
}

#[derive(Debug, Clone, Default)]
struct Config {
    help: bool,
    length: Option<i64>,
    step: Option<i64>,
    prefix: Option<String>,
    font: Option<String>,
    signal: Option<String>,
    color: Option<ColorTriplet>,
    palette: Option<PaletteName>,
    stepped: Option<f64>,
    samples: Option<usize>,
    all: bool,
    presets: bool,
    no_color: bool,
    log_level: LogLevel,
}

impl Config {
    fn color_mapper(&self) -> Option<ColorMapper> {
        if let Some(color) = self.color {
            return Some(ColorMapper::constant(color));
        }
        let palette = self.palette?.palette();
        Some(match self.stepped {
            Some(bucket_width) => ColorMapper::Stepped {
                palette,
                bucket_width,
            },
            None => ColorMapper::continuous(palette),
        })
    }

    fn bar_config(&self) -> BarConfig {
        let mut builder = BarConfig::builder();
        if let Some(length) = self.length {
            builder = builder.length(length);
        }
        if let Some(step) = self.step {
            builder = builder.step_size(step);
        }
        if let Some(prefix) = &self.prefix {
            builder = builder.prefix(prefix.as_str());
        }
        if let Some(font) = &self.font {
            builder = builder.font(font.as_str());
        }
        if let Some(signal) = &self.signal {
            builder = builder.signal(signal.as_str());
        }
        if let Some(mapper) = self.color_mapper() {
            builder = builder.color_mapper(mapper);
        }
        builder.build()
    }

    fn samples(&self) -> Option<usize> {
        if self.all {
            None
        } else {
            Some(self.samples.unwrap_or(5))
        }
    }
}

fn parse_args<I: IntoIterator<Item = String>>(args: I) -> Result<Config, String> {
    let mut cfg = Config::default();
    let mut args = args.into_iter().skip(1).peekable();

    while let Some(arg) = args.next() {
        let (flag, mut inline_value) = match arg.split_once('=') {
            Some((flag, value)) if flag.starts_with("--") => {
                (flag.to_string(), Some(value.to_string()))
            }
            _ => (arg.clone(), None),
        };

        let mut value = |name: &str| take_value(&mut inline_value, &mut args, name);
        match flag.as_str() {
            "-h" | "--help" => cfg.help = true,
            "--length" => cfg.length = Some(parse_number(&value("--length")?, "--length")?),
            "--step" => cfg.step = Some(parse_number(&value("--step")?, "--step")?),
            "--prefix" => cfg.prefix = Some(value("--prefix")?),
            "--font" => cfg.font = Some(value("--font")?),
            "--signal" => cfg.signal = Some(value("--signal")?),
            "--color" => {
                let raw = value("--color")?;
                let color = raw
                    .parse::<ColorTriplet>()
                    .map_err(|err| format!("Invalid --color value `{raw}`: {err}."))?;
                cfg.color = Some(color);
            }
            "--palette" => cfg.palette = Some(PaletteName::parse(&value("--palette")?)?),
            "--stepped" => {
                cfg.stepped = Some(match take_optional_value(&mut inline_value, &mut args) {
                    Some(raw) => parse_width(&raw)?,
                    None => DEFAULT_BUCKET_WIDTH,
                });
            }
            "--samples" => {
                let raw = value("--samples")?;
                let count = raw
                    .parse::<usize>()
                    .map_err(|_| format!("Invalid --samples value `{raw}`."))?;
                cfg.samples = Some(count);
            }
            "--all" => cfg.all = true,
            "--presets" => cfg.presets = true,
            "--no-color" => cfg.no_color = true,
            "--log-level" => cfg.log_level = LogLevel::parse(&value("--log-level")?)?,
            other => return Err(format!("Unknown argument `{other}`. Try --help.")),
        }
    }

    if cfg.color.is_some() && cfg.palette.is_some() {
        return Err("--color and --palette are mutually exclusive.".to_string());
    }
    if cfg.stepped.is_some() && cfg.palette.is_none() {
        return Err("--stepped requires --palette.".to_string());
    }
    Ok(cfg)
}

fn take_value<I: Iterator<Item = String>>(
    inline_value: &mut Option<String>,
    args: &mut I,
    name: &str,
) -> Result<String, String> {
    inline_value
        .take()
        .or_else(|| args.next())
        .ok_or_else(|| format!("Missing value for {name}."))
}

/// Value for a flag whose argument may be omitted.
fn take_optional_value<I: Iterator<Item = String>>(
    inline_value: &mut Option<String>,
    args: &mut std::iter::Peekable<I>,
) -> Option<String> {
    inline_value
        .take()
        .or_else(|| args.next_if(|next| !next.starts_with("--")))
}

fn parse_number(raw: &str, name: &str) -> Result<i64, String> {
    raw.trim()
        .parse::<i64>()
        .map_err(|_| format!("Invalid {name} value `{raw}` (expected an integer)."))
}

fn parse_width(raw: &str) -> Result<f64, String> {
    match raw.trim().parse::<f64>() {
        Ok(width) if width.is_finite() && width > 0.0 => Ok(width),
        _ => Err(format!(
            "Invalid --stepped value `{raw}` (expected a positive number)."
        )),
    }
}

fn init_logger(level: LogLevel, color: bool) {
    if level == LogLevel::Off {
        return;
    }
    let logger = BarLogger::new()
        .level(level.to_level_filter())
        .color(color)
        .show_target(matches!(level, LogLevel::Debug | LogLevel::Trace));
    if let Err(err) = logger.init() {
        eprintln!("Failed to install logger: {err}");
    }
}

fn run(cfg: &Config, output: ColorOutput) -> Result<(), String> {
    let base = cfg.bar_config();
    let bars = if cfg.presets {
        science_pack_bars(&base).map_err(|err| err.to_string())?
    } else {
        vec![base]
    };

    let stdout = io::stdout();
    let mut out = stdout.lock();
    for (index, bar) in bars.iter().enumerate() {
        let conditions = generate(bar).map_err(|err| err.to_string())?;
        log::info!("{}: {} conditions", bar.signal(), conditions.len());

        let write = |out: &mut io::StdoutLock<'_>, line: &str| {
            writeln!(out, "{line}").map_err(|err| format!("Failed to write output: {err}"))
        };
        if bars.len() > 1 {
            if index > 0 {
                write(&mut out, "")?;
            }
            write(&mut out, bar.signal())?;
        }
        for line in preview_lines(&conditions, cfg.samples(), output) {
            write(&mut out, &line)?;
        }
    }
    Ok(())
}

fn main() -> ExitCode {
    let cfg = match parse_args(std::env::args()) {
        Ok(cfg) => cfg,
        Err(message) => {
            eprintln!("{message}");
            return ExitCode::from(2);
        }
    };

    if cfg.help {
        print!("{HELP_TEXT}");
        return ExitCode::SUCCESS;
    }

    let color = !cfg.no_color && io::stdout().is_terminal();
    init_logger(cfg.log_level, color && io::stderr().is_terminal());

    let output = if color {
        ColorOutput::TrueColor
    } else {
        ColorOutput::None
    };
    match run(&cfg, output) {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            eprintln!("{message}");
            ExitCode::FAILURE
        }
    }
}
