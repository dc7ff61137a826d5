//! colloquy: chat with a language model inside your markdown notes.
#![allow(clippy::multiple_crate_versions)]

use clap::{Args, Parser, Subcommand};
use colloquy::app_state::{AppState, TitleChoice};
use colloquy::config::Config;
use colloquy::document::{Document, Editor, Position};
use colloquy::error::ChatError;
use colloquy::picker::{Picker, TerminalPicker};
use colloquy::template::list_folders;
use colloquy::title::renamed_path;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "colloquy")]
#[command(about = "Chat with a language model inside your markdown notes", long_about = None)]
struct Cli {
    /// Settings file to use instead of ./colloquy.toml
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Args)]
struct Target {
    /// Markdown document holding the chat
    #[arg(value_name = "FILE")]
    file: PathBuf,

    /// Cursor line, counting from 1 (default: last line)
    #[arg(long, short = 'l')]
    line: Option<usize>,

    /// Cursor column, counting from 1 (default: end of the line)
    #[arg(long, short = 'c')]
    column: Option<usize>,
}

#[derive(Subcommand)]
enum Command {
    /// Answer the chat around the cursor and write the reply into the document
    Chat(Target),
    /// Print the request that `chat` would send, without sending it
    Request(Target),
    /// Start a new chat at the cursor
    New {
        #[command(flatten)]
        target: Target,
        /// Template to start the chat with
        #[arg(long, short = 't', conflicts_with = "pick")]
        template: Option<String>,
        /// Choose the template interactively
        #[arg(long)]
        pick: bool,
    },
    /// Suggest titles for the chat and set the one you pick
    Title {
        #[command(flatten)]
        target: Target,
        /// Rename the document instead of titling the chat
        #[arg(long)]
        document: bool,
    },
    /// Insert keywords for the chat (or the whole document) at the cursor
    Keywords(Target),
    /// List the available templates
    Templates,
    /// Choose and save a setting
    #[command(subcommand)]
    Settings(Setting),
}

#[derive(Subcommand)]
enum Setting {
    /// Choose the folder holding templates
    TemplateFolder {
        /// Folder to choose from
        #[arg(long, default_value = ".")]
        root: PathBuf,
    },
    /// Choose the template used by chats that name none
    DefaultTemplate,
}

fn main() -> ExitCode {
    let filter = EnvFilter::try_from_env("COLLOQUY_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("colloquy: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), ChatError> {
    let config_path = cli
        .config
        .unwrap_or_else(|| PathBuf::from(Config::FILE_NAME));
    let config = Config::load_from(&config_path);
    let mut app = AppState::new(config);

    match cli.command {
        Command::Chat(target) => {
            let mut doc = open(&target)?;
            app.chat(&mut doc)?;
            doc.save()?;
        }
        Command::Request(target) => {
            let doc = open(&target)?;
            let (_, request) = app.prepare_request(&doc)?;
            let json = serde_json::to_string_pretty(&request)?;
            println!("{json}");
        }
        Command::New {
            target,
            template,
            pick,
        } => {
            let mut doc = open(&target)?;
            if pick {
                app.new_chat_with_template(&mut doc, &mut TerminalPicker)?;
            } else {
                app.new_chat(&mut doc, template.as_deref());
            }
            doc.save()?;
            report_cursor(&doc);
        }
        Command::Title { target, document } => {
            let mut doc = open(&target)?;
            match app.infer_title(&mut doc, &mut TerminalPicker, document)? {
                TitleChoice::Section(_) => doc.save()?,
                TitleChoice::Document(title) => rename(&target.file, &title)?,
            }
        }
        Command::Keywords(target) => {
            let mut doc = open(&target)?;
            app.infer_keywords(&mut doc)?;
            doc.save()?;
        }
        Command::Templates => {
            for name in app.templates()? {
                println!("{name}");
            }
        }
        Command::Settings(setting) => {
            let mut config = app.config().clone();
            choose_setting(&mut config, &setting, &mut TerminalPicker, &app)?;
            config.save(&config_path)?;
            app.apply_config(config);
        }
    }
    Ok(())
}

fn choose_setting(
    config: &mut Config,
    setting: &Setting,
    picker: &mut dyn Picker,
    app: &AppState,
) -> Result<(), ChatError> {
    match setting {
        Setting::TemplateFolder { root } => {
            let folders = list_folders(root)?;
            let folder = picker
                .pick("Template folder", &folders)?
                .ok_or(ChatError::Cancelled)?;
            let path = if folder == "/" {
                root.clone()
            } else {
                root.join(folder)
            };
            config.template_folder = Some(path.to_string_lossy().into_owned());
        }
        Setting::DefaultTemplate => {
            let names = app.templates()?;
            if names.is_empty() {
                return Err(ChatError::NoTemplates);
            }
            let name = picker
                .pick("Default template", &names)?
                .ok_or(ChatError::Cancelled)?;
            config.default_template = Some(name);
        }
    }
    Ok(())
}

/// Load the document with the cursor placed as requested.
fn open(target: &Target) -> Result<Document, ChatError> {
    let doc = Document::open(&target.file)?;
    let line = target
        .line
        .map_or(doc.last_line(), |line| line.saturating_sub(1));
    let column = target
        .column
        .map_or(usize::MAX, |column| column.saturating_sub(1));
    Ok(doc.with_cursor(Position::new(line, column)))
}

fn report_cursor(doc: &Document) {
    let cursor = doc.cursor();
    eprintln!("cursor: line {}, column {}", cursor.line + 1, cursor.column + 1);
}

fn rename(path: &Path, title: &str) -> Result<(), ChatError> {
    let target = renamed_path(path, title);
    if target.exists() {
        return Err(io::Error::new(
            io::ErrorKind::AlreadyExists,
            format!("{} already exists", target.display()),
        )
        .into());
    }
    fs::rename(path, &target)?;
    tracing::info!(from = %path.display(), to = %target.display(), "document renamed");
    println!("{}", target.display());
    Ok(())
}
