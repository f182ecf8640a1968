//! Payload Inspector CLI
//!
//! Command-line tool for inspecting clipboard and drag-and-drop payloads.

use anyhow::{anyhow, Context};
use clap::{Parser, ValueEnum};
use payload_inspector::formatter::default_save_name;
use payload_inspector::{
    build_report_with_options, drop_source, render_failure, DataSource, HumanFormatter,
    InspectorError, InspectorOptions, JsonFormatter, ManifestSource, ReportFormatter,
    ShortFormatter, CLIPBOARD_LABEL, DRAG_DROP_LABEL,
};
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

/// Clipboard and drag-and-drop payload inspector.
///
/// Lists every format offered by a payload, retrieves each value and
/// describes it: text statistics, file listings, markup previews, image
/// geometry, stream and byte dumps.
#[derive(Parser, Debug)]
#[command(name = "payload-inspect")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// JSON manifest(s) describing a payload
    #[arg(required_unless_present_any = ["drop", "clipboard"])]
    manifests: Vec<PathBuf>,

    /// Inspect a file drop of these paths
    #[arg(short, long, num_args = 1..)]
    drop: Vec<PathBuf>,

    /// Inspect the system clipboard
    #[arg(short, long)]
    clipboard: bool,

    /// Output format
    #[arg(short, long, default_value = "human")]
    format: OutputFormat,

    /// Analysis mode
    #[arg(short, long, default_value = "normal")]
    mode: AnalysisMode,

    /// Override the report label
    #[arg(short, long)]
    label: Option<String>,

    /// Append rendered output to this file
    #[arg(short, long, env = "PAYLOAD_INSPECT_OUTPUT")]
    output: Option<PathBuf>,

    /// Also save rendered output; without a path, DataTransferAnalysis_<timestamp>.txt
    #[arg(long, value_name = "PATH", num_args = 0..=1)]
    save: Option<Option<PathBuf>>,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Quiet mode (only output essential info)
    #[arg(short, long)]
    quiet: bool,
}

/// Output format options.
#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    /// Human-readable report
    Human,
    /// JSON output
    Json,
    /// Compact one-line-per-format output
    Short,
}

/// Analysis mode options.
#[derive(Debug, Clone, Copy, ValueEnum)]
enum AnalysisMode {
    /// Normal analysis (default)
    Normal,
    /// Longer previews and larger dumps
    Verbose,
}

fn main() -> ExitCode {
    let args = Args::parse();

    // Initialize logging if verbose
    if args.verbose {
        tracing_subscriber::fmt()
            .with_env_filter("payload_inspector=debug")
            .with_writer(std::io::stderr)
            .init();
    }

    let options = match args.mode {
        AnalysisMode::Normal => InspectorOptions::new(),
        AnalysisMode::Verbose => InspectorOptions::verbose(),
    };

    let mut transcript = String::new();
    let mut success = true;

    if args.clipboard {
        if let Err(e) = analyze_clipboard(&options, &args, &mut transcript) {
            report_error(&e, &args);
            success = false;
        }
    }

    if !args.drop.is_empty() {
        let source = drop_source(args.drop.as_slice());
        let label = args.label.as_deref().unwrap_or(DRAG_DROP_LABEL);
        if let Err(e) = analyze(&source, label, &options, &args, &mut transcript) {
            report_error(&e, &args);
            success = false;
        }
    }

    for path in &args.manifests {
        if let Err(e) = analyze_manifest(path, &options, &args, &mut transcript) {
            report_error(&e, &args);
            success = false;
        }
    }

    if let Err(e) = persist(&transcript, &args) {
        eprintln!("{e:#}");
        success = false;
    }

    if success {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

/// Print an analysis error to stderr unless quiet.
///
/// Messages already embed their cause, so only the outermost one is shown.
fn report_error(error: &anyhow::Error, args: &Args) {
    if !args.quiet {
        eprintln!("{error}");
    }
}

fn analyze_manifest(
    path: &Path,
    options: &InspectorOptions,
    args: &Args,
    transcript: &mut String,
) -> anyhow::Result<()> {
    let source = ManifestSource::load(path)
        .map_err(|e| anyhow!("cannot load manifest {}: {e}", path.display()))?;
    let label = args
        .label
        .as_deref()
        .or(source.label())
        .unwrap_or(CLIPBOARD_LABEL)
        .to_string();
    analyze(&source, &label, options, args, transcript)
}

#[cfg(feature = "clipboard")]
fn analyze_clipboard(
    options: &InspectorOptions,
    args: &Args,
    transcript: &mut String,
) -> anyhow::Result<()> {
    let source = payload_inspector::ClipboardSource::open()?;
    let label = args.label.as_deref().unwrap_or(CLIPBOARD_LABEL);
    analyze(&source, label, options, args, transcript)
}

#[cfg(not(feature = "clipboard"))]
fn analyze_clipboard(
    _options: &InspectorOptions,
    _args: &Args,
    _transcript: &mut String,
) -> anyhow::Result<()> {
    anyhow::bail!("this build has no clipboard support (enable the `clipboard` feature)")
}

/// Build a report, render it to stdout and append it to `transcript`.
///
/// In human mode an enumeration failure is rendered as an error block in
/// place of the report, and still returned as an error.
fn analyze<S: DataSource + ?Sized>(
    source: &S,
    label: &str,
    options: &InspectorOptions,
    args: &Args,
    transcript: &mut String,
) -> anyhow::Result<()> {
    let (text, outcome): (String, anyhow::Result<()>) =
        match build_report_with_options(source, label, options) {
            Ok(report) => (formatter_for(args).format_report(&report), Ok(())),
            Err(e @ InspectorError::Enumeration { .. })
                if matches!(args.format, OutputFormat::Human) =>
            {
                (render_failure(&e), Err(e.into()))
            }
            Err(e) => return Err(e.into()),
        };

    print!("{text}");
    transcript.push_str(&text);
    outcome
}

fn formatter_for(args: &Args) -> Box<dyn ReportFormatter> {
    match args.format {
        OutputFormat::Human if args.quiet => Box::new(HumanFormatter::quiet()),
        OutputFormat::Human => Box::new(HumanFormatter::new()),
        OutputFormat::Json => Box::new(JsonFormatter::new()),
        OutputFormat::Short => Box::new(ShortFormatter::new()),
    }
}

/// Write the transcript to `--output` (appending) and `--save` targets.
fn persist(transcript: &str, args: &Args) -> anyhow::Result<()> {
    if transcript.is_empty() {
        return Ok(());
    }

    if let Some(path) = &args.output {
        append_to(path, transcript)?;
    }

    if let Some(target) = &args.save {
        let path = target
            .clone()
            .unwrap_or_else(|| PathBuf::from(default_save_name(chrono::Local::now())));
        std::fs::write(&path, transcript)
            .with_context(|| format!("cannot save report to {}", path.display()))?;
        if !args.quiet {
            eprintln!("Saved report to {}", path.display());
        }
    }

    Ok(())
}

fn append_to(path: &Path, text: &str) -> anyhow::Result<()> {
    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("cannot open {}", path.display()))?;
    file.write_all(text.as_bytes())
        .with_context(|| format!("cannot write {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use payload_inspector::MemorySource;

    #[test]
    fn test_args_parsing() {
        let args = Args::try_parse_from(["payload-inspect", "payload.json"]).unwrap();
        assert_eq!(args.manifests.len(), 1);
        assert!(!args.verbose);
        assert!(!args.clipboard);
    }

    #[test]
    fn test_source_required() {
        assert!(Args::try_parse_from(["payload-inspect"]).is_err());
        let args = Args::try_parse_from(["payload-inspect", "--clipboard"]).unwrap();
        assert!(args.clipboard);
    }

    #[test]
    fn test_drop_paths() {
        let args =
            Args::try_parse_from(["payload-inspect", "--drop", "a.txt", "b.txt"]).unwrap();
        assert_eq!(args.drop.len(), 2);
        assert!(args.manifests.is_empty());
    }

    #[test]
    fn test_save_target() {
        let args = Args::try_parse_from(["payload-inspect", "--clipboard", "--save"]).unwrap();
        assert!(matches!(args.save, Some(None)));

        let args =
            Args::try_parse_from(["payload-inspect", "--clipboard", "--save", "out.txt"]).unwrap();
        assert_eq!(args.save, Some(Some(PathBuf::from("out.txt"))));

        let args = Args::try_parse_from(["payload-inspect", "--clipboard"]).unwrap();
        assert!(args.save.is_none());
    }

    #[test]
    fn test_format_options() {
        let args =
            Args::try_parse_from(["payload-inspect", "-f", "json", "-m", "verbose", "p.json"])
                .unwrap();
        assert!(matches!(args.format, OutputFormat::Json));
        assert!(matches!(args.mode, AnalysisMode::Verbose));
    }

    #[test]
    fn test_enumeration_failure_reaches_output_file() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("out.txt");
        let out_arg = out.to_string_lossy().into_owned();
        let args =
            Args::try_parse_from(["payload-inspect", "--clipboard", "--output", &out_arg]).unwrap();
        let source = MemorySource::new().failing("OpenClipboard failed");

        let mut transcript = String::new();
        let err = analyze(
            &source,
            CLIPBOARD_LABEL,
            &InspectorOptions::new(),
            &args,
            &mut transcript,
        )
        .unwrap_err();
        assert_eq!(err.to_string(), "Error analyzing CLIPBOARD: OpenClipboard failed");

        persist(&transcript, &args).unwrap();
        let expected = format!(
            "ERROR: Error analyzing CLIPBOARD: OpenClipboard failed\n{}\n\n",
            "=".repeat(80)
        );
        assert_eq!(std::fs::read_to_string(&out).unwrap(), expected);
    }

    #[test]
    fn test_reports_accumulate_in_transcript() {
        let args = Args::try_parse_from(["payload-inspect", "--clipboard", "-f", "short"]).unwrap();
        let source = MemorySource::new().with_text("Text", "hello");

        let mut transcript = String::new();
        for _ in 0..2 {
            analyze(&source, CLIPBOARD_LABEL, &InspectorOptions::new(), &args, &mut transcript)
                .unwrap();
        }
        assert_eq!(transcript, "Text\tstring\t3\nText\tstring\t3\n");
    }

    #[test]
    fn test_append_to() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("log.txt");
        append_to(&path, "first\n").unwrap();
        append_to(&path, "second\n").unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "first\nsecond\n");
    }
}
