use anyhow::{Context, Result, anyhow, bail};
use richspan_config::Config;
use richspan_engine::{
    AttributedText, BoundaryMode, Color, FontSize, StyleKind, StyleOptions, StyleSet,
    export_markup, import_markup,
};
use serde::Serialize;
use std::{
    env,
    path::{Path, PathBuf},
    process,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    /// Import only; the exit code tells whether the markup is valid.
    Check,
    Export,
    Spans,
    Dump,
}

impl Command {
    fn parse(name: &str) -> Option<Self> {
        match name {
            "check" => Some(Command::Check),
            "export" => Some(Command::Export),
            "spans" => Some(Command::Spans),
            "dump" => Some(Command::Dump),
            _ => None,
        }
    }
}

#[derive(Serialize)]
struct Dump {
    text: String,
    spans: Vec<SpanRecord>,
}

#[derive(Serialize)]
struct SpanRecord {
    kind: StyleKind,
    style: String,
    start: usize,
    end: usize,
    mode: BoundaryMode,
}

impl From<&AttributedText> for Dump {
    fn from(text: &AttributedText) -> Self {
        Self {
            text: text.text(),
            spans: text
                .iter_spans()
                .map(|entry| SpanRecord {
                    kind: entry.kind(),
                    style: entry.style.to_string(),
                    start: entry.range.start,
                    end: entry.range.end,
                    mode: entry.mode,
                })
                .collect(),
        }
    }
}

fn style_options(config: &Config) -> Result<StyleOptions> {
    let default_color = Color::parse(&config.defaults.color)
        .ok_or_else(|| anyhow!("invalid default color {:?} in config", config.defaults.color))?;
    if config.defaults.font_size == 0 {
        bail!("default font size in config must be positive");
    }
    Ok(StyleOptions {
        default_font_size: FontSize(config.defaults.font_size),
        default_color,
        link_auto_url_fix: config.link.auto_url_fix,
        link_inseparable: config.link.inseparable,
    })
}

fn render(command: Command, text: &AttributedText, styles: &StyleSet) -> Result<String> {
    let output = match command {
        Command::Check => String::new(),
        Command::Export => {
            let mut markup = export_markup(text, &styles.markup_controllers());
            markup.push('\n');
            markup
        }
        Command::Spans => text
            .iter_spans()
            .map(|entry| {
                format!(
                    "{}..{} {:?} {}\n",
                    entry.range.start, entry.range.end, entry.mode, entry.style
                )
            })
            .collect(),
        Command::Dump => toml::to_string_pretty(&Dump::from(text))?,
    };
    Ok(output)
}

fn program_name(args: &[String]) -> &str {
    args.first().map_or("richspan-cli", String::as_str)
}

fn usage(program: &str) -> ! {
    eprintln!("Usage: {program} <check|export|spans|dump> <file>");
    process::exit(1);
}

fn main() -> Result<()> {
    env_logger::Builder::new()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();

    let args: Vec<String> = env::args().collect();
    let program = program_name(&args);
    let [_, command, file] = args.as_slice() else {
        usage(program);
    };
    let Some(command) = Command::parse(command) else {
        usage(program);
    };
    let path = Config::expand_path(Path::new(file)).unwrap_or_else(|| PathBuf::from(file));

    let config = match Config::load() {
        Ok(Some(config)) => {
            log::debug!("Loaded config from {}", Config::config_path().display());
            config
        }
        Ok(None) => Config::default(),
        Err(e) => {
            eprintln!("Error: Failed to load config file: {e}");
            process::exit(1);
        }
    };
    let options = style_options(&config)?;

    let source = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let styles = StyleSet::new(&options);
    let text = match import_markup(&source, &styles.markup_controllers()) {
        Ok(text) => text,
        Err(e) => {
            eprintln!("{}: {e}", path.display());
            process::exit(1);
        }
    };
    log::info!(
        "{}: {} bytes, {} spans",
        path.display(),
        text.len(),
        text.spans_len()
    );

    print!("{}", render(command, &text, &styles)?);
    Ok(())
}
