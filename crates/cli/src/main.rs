//! CLI tool that turns a topic into an illustrated PowerPoint deck.

mod opener;
mod pipeline;

use anyhow::{Context, Result};
use clap::Parser;
use deckgen_core::{ListParsing, RetryPolicy, SubtopicParser, Topic};
use deckgen_genai::{ContentClient, GeminiClient, GeminiConfig, ImageFetcher};
use pipeline::Orchestrator;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::time::Duration;

const TOPIC_PROMPT: &str = "Enter the main topic for the presentation: ";

/// Generate a six-slide illustrated presentation about a topic.
#[derive(Parser, Debug)]
#[command(name = "deckgen")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Main topic (prompted for when omitted)
    topic: Option<String>,

    /// Directory the deck is written to
    #[arg(short, long, default_value = ".")]
    output_dir: PathBuf,

    /// Model used for subtopics and descriptions
    #[arg(long)]
    text_model: Option<String>,

    /// Model used for illustrations
    #[arg(long)]
    image_model: Option<String>,

    /// Attempts per illustration before the slide goes without one
    #[arg(long, default_value = "5")]
    max_attempts: u32,

    /// Seconds to wait between illustration attempts
    #[arg(long, default_value = "5")]
    backoff_secs: u64,

    /// Per-request timeout in seconds
    #[arg(long, default_value = "120")]
    timeout_secs: u64,

    /// Reject subtopic lines that are not numbered
    #[arg(long)]
    strict_subtopics: bool,

    /// Do not open the deck after saving it
    #[arg(long)]
    no_open: bool,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    if args.verbose {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("debug")).init();
    } else {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    }

    let raw_topic = match args.topic.clone() {
        Some(topic) => topic,
        None => {
            let stdin = io::stdin();
            read_topic(&mut stdin.lock(), &mut io::stdout())
                .context("Failed to read the topic")?
        }
    };
    let topic = Topic::from_input(&raw_topic);

    let client = GeminiClient::new(gemini_config(&args)?)
        .context("Failed to create the Gemini client")?;
    let config = client.config();

    let parser = if args.strict_subtopics {
        SubtopicParser::new().with_mode(ListParsing::Strict)
    } else {
        SubtopicParser::new()
    };
    let content = ContentClient::new(&client, config.text_model()).with_parser(parser);

    let policy = RetryPolicy::new()
        .with_max_attempts(args.max_attempts)
        .with_backoff(Duration::from_secs(args.backoff_secs));
    let images = ImageFetcher::new(&client, config.image_model()).with_policy(policy);

    std::fs::create_dir_all(&args.output_dir).with_context(|| {
        format!(
            "Failed to create output directory: {}",
            args.output_dir.display()
        )
    })?;

    let path = Orchestrator::new(content, images, &args.output_dir)
        .run(&topic)
        .with_context(|| format!("Failed to build the presentation for '{}'", topic))?;

    log::info!("Presentation saved as {}", path.display());

    if !args.no_open {
        opener::open_file(&path);
    }

    Ok(())
}

/// Environment configuration with command-line overrides applied.
fn gemini_config(args: &Args) -> Result<GeminiConfig> {
    let mut config = GeminiConfig::from_env().context("Gemini is not configured")?;

    if let Some(model) = &args.text_model {
        config = config.with_text_model(model);
    }
    if let Some(model) = &args.image_model {
        config = config.with_image_model(model);
    }

    Ok(config.with_timeout(Duration::from_secs(args.timeout_secs)))
}

/// Prompt for the topic and read one line. End of input gives an empty
/// topic, which falls back to the default.
fn read_topic<R: BufRead, W: Write>(input: &mut R, output: &mut W) -> io::Result<String> {
    write!(output, "{}", TOPIC_PROMPT)?;
    output.flush()?;

    let mut line = String::new();
    input.read_line(&mut line)?;
    Ok(line)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_read_topic_prompts_and_reads_line() {
        let mut input = Cursor::new(b"Ocean Currents\nignored\n".to_vec());
        let mut output = Vec::new();

        let topic = read_topic(&mut input, &mut output).unwrap();
        assert_eq!(Topic::from_input(&topic).as_str(), "Ocean Currents");
        assert_eq!(String::from_utf8(output).unwrap(), TOPIC_PROMPT);
    }

    #[test]
    fn test_read_topic_at_end_of_input() {
        let mut input = Cursor::new(Vec::new());
        let topic = read_topic(&mut input, &mut Vec::new()).unwrap();
        assert_eq!(Topic::from_input(&topic).as_str(), "Sustainable Energy");
    }

    #[test]
    fn test_default_args() {
        let args = Args::parse_from(["deckgen"]);
        assert!(args.topic.is_none());
        assert_eq!(args.output_dir, PathBuf::from("."));
        assert_eq!(args.max_attempts, 5);
        assert_eq!(args.backoff_secs, 5);
        assert_eq!(args.timeout_secs, 120);
        assert!(!args.strict_subtopics);
        assert!(!args.no_open);
    }

    #[test]
    fn test_topic_and_flags() {
        let args = Args::parse_from([
            "deckgen",
            "Rust Lifetimes",
            "--output-dir",
            "out",
            "--strict-subtopics",
            "--max-attempts",
            "2",
            "--no-open",
        ]);
        assert_eq!(args.topic.as_deref(), Some("Rust Lifetimes"));
        assert_eq!(args.output_dir, PathBuf::from("out"));
        assert_eq!(args.max_attempts, 2);
        assert!(args.strict_subtopics);
        assert!(args.no_open);
    }
}
