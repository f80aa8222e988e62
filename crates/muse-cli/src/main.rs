//! Muse CLI - Gemini text generation, image analysis and chat
//!
//! Terminal front end over the `muse-core` library.

mod config;
mod sinks;
mod storage;

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use chrono::{DateTime, Local, Utc};
use clap::{Parser, Subcommand};
use colored::Colorize;
use dialoguer::{Input, Password};
use muse_core::{
    ChatSession, ContentKind, CredentialStore, GeminiClient, GenerativeModel, ImageAnalyzer,
    ImageAttachment, LifecycleError, LifecycleState, ModelSettings, OutputSink, Sender,
    Submission, TemplateCatalog, TextGenerator,
};
use tracing_subscriber::EnvFilter;

use config::Config;
use sinks::{ClipboardSink, FileSink};
use storage::ConfigCredentialStorage;

#[derive(Parser)]
#[command(name = "muse")]
#[command(about = "Muse CLI - Gemini text generation, image analysis and chat", long_about = None)]
#[command(version)]
struct Cli {
    /// Log lifecycle details to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Store the Gemini API key
    Login {
        /// API key (will prompt if not provided)
        #[arg(short, long)]
        key: Option<String>,
    },

    /// Forget the stored API key
    Logout,

    /// Generate text from a prompt
    Generate {
        /// Prompt (will prompt if not provided)
        prompt: Option<String>,
        /// Content kind: article, story, email, social, blog, product
        #[arg(short, long, default_value = "article")]
        kind: ContentKind,
        #[command(flatten)]
        output: OutputArgs,
    },

    /// Analyze an image file
    Analyze {
        /// Path to a PNG, JPEG, GIF or WebP image
        image: PathBuf,
        #[command(flatten)]
        output: OutputArgs,
    },

    /// Interactive chat (type /exit to leave)
    Chat,

    /// Browse and use prompt templates
    Templates {
        #[command(subcommand)]
        action: TemplateAction,
    },

    /// Show current configuration
    Config,
}

#[derive(clap::Args)]
struct OutputArgs {
    /// Copy the result to the clipboard
    #[arg(short, long)]
    copy: bool,
    /// Save the result to generated-<kind>.txt
    #[arg(short, long)]
    save: bool,
    /// Directory for --save (overrides config)
    #[arg(long)]
    out_dir: Option<PathBuf>,
}

#[derive(Subcommand)]
enum TemplateAction {
    /// List templates
    List {
        /// Only show one category
        #[arg(short, long)]
        category: Option<String>,
    },
    /// Show a template and its placeholders
    Show {
        /// Template id
        id: String,
    },
    /// Fill a template and generate text from it
    Use {
        /// Template id
        id: String,
        /// Placeholder values, e.g. --set TOPIC="home brewing"
        #[arg(long = "set", value_parser = parse_assignment)]
        values: Vec<(String, String)>,
        /// Content kind for the generated text
        #[arg(short, long, default_value = "article")]
        kind: ContentKind,
        #[command(flatten)]
        output: OutputArgs,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Login { key } => cmd_login(key),
        Commands::Logout => cmd_logout(),
        Commands::Generate { prompt, kind, output } => cmd_generate(prompt, kind, output).await,
        Commands::Analyze { image, output } => cmd_analyze(image, output).await,
        Commands::Chat => cmd_chat().await,
        Commands::Templates { action } => cmd_templates(action).await,
        Commands::Config => cmd_config(),
    }
}

fn init_tracing(verbose: bool) {
    let default_filter = if verbose { "muse_core=debug,muse=debug,info" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

// ============================================
// Wiring
// ============================================

struct App {
    config: Config,
    models: ModelSettings,
    credentials: Arc<CredentialStore>,
    model: Arc<dyn GenerativeModel>,
}

impl App {
    fn load() -> Result<Self> {
        let config = Config::load()?;
        let storage = Arc::new(ConfigCredentialStorage::new(Config::config_path()?));
        let credentials = Arc::new(CredentialStore::load(storage));
        let model: Arc<dyn GenerativeModel> = Arc::new(GeminiClient::with_base_url(&config.base_url));
        tracing::debug!(
            base_url = %config.base_url,
            has_credential = credentials.has_credential(),
            "Loaded configuration"
        );

        Ok(Self {
            models: config.model_settings(),
            config,
            credentials,
            model,
        })
    }

    fn text_generator(&self) -> TextGenerator {
        TextGenerator::new(self.credentials.clone(), self.model.clone())
            .with_model(&self.models.text_model)
    }

    fn image_analyzer(&self) -> ImageAnalyzer {
        ImageAnalyzer::new(self.credentials.clone(), self.model.clone())
            .with_model(&self.models.vision_model)
    }

    fn chat_session(&self) -> ChatSession {
        ChatSession::new(self.credentials.clone(), self.model.clone())
            .with_model(&self.models.chat_model)
    }

    /// Sinks requested on the command line
    fn sinks(&self, output: &OutputArgs) -> Vec<Box<dyn OutputSink>> {
        let mut sinks: Vec<Box<dyn OutputSink>> = Vec::new();
        if output.copy {
            sinks.push(Box::new(ClipboardSink));
        }
        if output.save {
            let dir = output
                .out_dir
                .clone()
                .unwrap_or_else(|| self.config.download_dir());
            sinks.push(Box::new(FileSink::new(dir)));
        }
        sinks
    }
}

// ============================================
// Command Implementations
// ============================================

fn cmd_login(key: Option<String>) -> Result<()> {
    let app = App::load()?;

    let api_key = match key {
        Some(k) => k,
        None => Password::new()
            .with_prompt("Gemini API Key")
            .interact()
            .context("Failed to read API key")?,
    };

    app.credentials.set(api_key.trim());

    if app.credentials.has_credential() {
        println!(
            "{} API key {} saved to {:?}",
            "✓".green(),
            app.credentials.get().masked().dimmed(),
            Config::config_path()?
        );
    } else {
        println!("{} Empty key given, API key cleared", "!".yellow());
    }

    Ok(())
}

fn cmd_logout() -> Result<()> {
    let app = App::load()?;
    app.credentials.set("");
    println!("{} API key removed", "✓".green());
    Ok(())
}

async fn cmd_generate(prompt: Option<String>, kind: ContentKind, output: OutputArgs) -> Result<()> {
    let app = App::load()?;

    let prompt = match prompt {
        Some(p) => p,
        None => Input::new()
            .with_prompt(format!("Describe the {}", kind.label().to_lowercase()))
            .allow_empty(true)
            .interact_text()
            .context("Failed to read prompt")?,
    };

    run_generation(&app, &prompt, kind, &output).await
}

async fn run_generation(app: &App, prompt: &str, kind: ContentKind, output: &OutputArgs) -> Result<()> {
    let generator = app.text_generator();

    eprintln!("{}", format!("Generating {}...", kind.label()).dimmed());
    let submission = generator.generate(prompt, kind).await;
    let text = settled_text(submission)?;

    println!("{}", text);

    for sink in app.sinks(output) {
        report_export(sink.as_ref(), generator.export(sink.as_ref()));
    }

    Ok(())
}

async fn cmd_analyze(image: PathBuf, output: OutputArgs) -> Result<()> {
    let app = App::load()?;
    let analyzer = app.image_analyzer();

    let attachment = ImageAttachment::from_path(&image)
        .await
        .map_err(|e| anyhow::anyhow!(e.user_message()))?;

    eprintln!("{}", format!("Analyzing {}...", image.display()).dimmed());
    let text = settled_text(analyzer.analyze_image(attachment).await)?;

    println!("{}", text);

    for sink in app.sinks(&output) {
        report_export(sink.as_ref(), analyzer.export(sink.as_ref()));
    }

    Ok(())
}

async fn cmd_chat() -> Result<()> {
    let app = App::load()?;
    if !app.credentials.has_credential() {
        bail!("{} Run 'muse login' first.", LifecycleError::MissingCredential.user_message());
    }

    let chat = app.chat_session();
    for message in chat.messages() {
        print_chat_message(message.sender, &message.text, message.timestamp);
    }
    println!("{}", "Type /exit to leave.".dimmed());

    loop {
        let line: String = match Input::new()
            .with_prompt("you")
            .allow_empty(true)
            .interact_text()
        {
            Ok(line) => line,
            Err(_) => break,
        };

        let trimmed = line.trim();
        if trimmed == "/exit" || trimmed == "/quit" {
            break;
        }

        eprintln!("{}", "Thinking...".dimmed());
        match chat.send(&line).await {
            Ok(Submission::Settled(_)) => {
                if let Some(reply) = chat.last_message() {
                    print_chat_message(reply.sender, &reply.text, reply.timestamp);
                }
            }
            Ok(_) => {}
            Err(e) => println!("{} {}", "!".yellow(), e.user_message()),
        }
    }

    chat.teardown();
    tracing::debug!(messages = chat.messages().len(), "Chat session closed");
    Ok(())
}

async fn cmd_templates(action: TemplateAction) -> Result<()> {
    let catalog = TemplateCatalog::builtin();

    match action {
        TemplateAction::List { category } => {
            let templates = match &category {
                Some(c) => catalog.by_category(c),
                None => catalog.all().iter().collect(),
            };

            if templates.is_empty() {
                println!("No templates found.");
                println!("\n{}", "Categories:".dimmed());
                println!("  {}", catalog.categories().join(", "));
                return Ok(());
            }

            println!("{}", "Templates:".bold());
            for template in templates {
                println!(
                    "  {} {} [{}] {}",
                    template.id.dimmed(),
                    template.title.cyan().bold(),
                    template.category,
                    template.description.dimmed()
                );
            }

            println!("\n{}", "Use one:".dimmed());
            println!("  muse templates use <ID> --set TOPIC=\"...\"");
        }

        TemplateAction::Show { id } => {
            let template = catalog
                .find(&id)
                .with_context(|| format!("Template '{}' not found", id))?;

            println!("{} ({})", template.title.cyan().bold(), template.category);
            println!("{}", template.description.dimmed());
            println!("\n{}", template.prompt);

            let placeholders = template.placeholders();
            if !placeholders.is_empty() {
                println!("\n{} {}", "Placeholders:".bold(), placeholders.join(", "));
            }
        }

        TemplateAction::Use { id, values, kind, output } => {
            let template = catalog
                .find(&id)
                .with_context(|| format!("Template '{}' not found", id))?;

            let mut filled_values: HashMap<String, String> = values.into_iter().collect();
            for name in template.placeholders() {
                if !filled_values.contains_key(&name) {
                    let value: String = Input::new()
                        .with_prompt(name.as_str())
                        .interact_text()
                        .with_context(|| format!("Failed to read value for {}", name))?;
                    filled_values.insert(name, value);
                }
            }

            let prompt = template.fill(&filled_values);
            let app = App::load()?;
            run_generation(&app, &prompt, kind, &output).await?;
        }
    }

    Ok(())
}

fn cmd_config() -> Result<()> {
    let app = App::load()?;
    let config = &app.config;

    println!("{}", "Configuration:".bold());
    println!("  Path: {:?}", Config::config_path()?);
    println!("  Base URL: {}", config.base_url);
    println!(
        "  API Key: {}",
        if app.credentials.has_credential() {
            format!("Set ({})", app.credentials.get().masked()).green()
        } else {
            "Not set".red()
        }
    );
    println!("  Text model: {}", app.models.text_model.cyan());
    println!("  Vision model: {}", app.models.vision_model.cyan());
    println!("  Chat model: {}", app.models.chat_model.cyan());
    println!("  Download dir: {:?}", config.download_dir());

    Ok(())
}

// ============================================
// Helpers
// ============================================

/// Turn a submission into its output text, or a user-facing error
fn settled_text(submission: std::result::Result<Submission, LifecycleError>) -> Result<String> {
    match submission {
        Ok(Submission::Settled(LifecycleState::Succeeded(text))) => Ok(text),
        Ok(Submission::Settled(LifecycleState::Failed(message))) => bail!(message),
        Ok(other) => bail!("Request did not complete: {:?}", other),
        Err(LifecycleError::MissingCredential) => bail!(
            "{} Run 'muse login' first.",
            LifecycleError::MissingCredential.user_message()
        ),
        Err(e) => bail!(e.user_message()),
    }
}

fn report_export(sink: &dyn OutputSink, delivered: bool) {
    if delivered {
        eprintln!("{} Sent to {}", "✓".green(), sink.name());
    } else {
        eprintln!("{} Could not send to {}", "!".yellow(), sink.name());
    }
}

fn print_chat_message(sender: Sender, text: &str, timestamp: DateTime<Utc>) {
    let time = timestamp.with_timezone(&Local).format("%H:%M:%S").to_string();
    match sender {
        Sender::User => println!("{} {} {}", time.dimmed(), "you:".blue().bold(), text),
        Sender::Assistant => println!("{} {} {}", time.dimmed(), "muse:".cyan().bold(), text),
    }
}

/// Parse `KEY=VALUE`
fn parse_assignment(raw: &str) -> std::result::Result<(String, String), String> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=VALUE, got '{}'", raw))?;
    let key = key.trim().trim_start_matches('[').trim_end_matches(']');
    if key.is_empty() {
        return Err(format!("empty placeholder name in '{}'", raw));
    }
    Ok((key.to_string(), value.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_assignment() {
        assert_eq!(
            parse_assignment("TOPIC=home brewing").unwrap(),
            ("TOPIC".to_string(), "home brewing".to_string())
        );
        assert_eq!(
            parse_assignment("[PRODUCT]=a=b").unwrap(),
            ("PRODUCT".to_string(), "a=b".to_string())
        );
        assert!(parse_assignment("novalue").is_err());
        assert!(parse_assignment("=x").is_err());
    }

    #[test]
    fn test_settled_text_maps_outcomes() {
        let ok = settled_text(Ok(Submission::Settled(LifecycleState::Succeeded("hi".to_string()))));
        assert_eq!(ok.unwrap(), "hi");

        let failed = settled_text(Ok(Submission::Settled(LifecycleState::Failed("nope".to_string()))));
        assert_eq!(failed.unwrap_err().to_string(), "nope");

        let missing = settled_text(Err(LifecycleError::MissingCredential));
        assert!(missing.unwrap_err().to_string().contains("muse login"));
    }

    #[test]
    fn test_cli_parses_generate() {
        let cli = Cli::try_parse_from(["muse", "generate", "rain", "--kind", "story", "--save"]).unwrap();
        match cli.command {
            Commands::Generate { prompt, kind, output } => {
                assert_eq!(prompt.as_deref(), Some("rain"));
                assert_eq!(kind, ContentKind::Story);
                assert!(output.save);
                assert!(!output.copy);
            }
            _ => panic!("expected generate"),
        }
    }
}
