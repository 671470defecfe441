//! Command handlers: load settings, call the client, render the result

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use knowledge_ox::{
    ApiResult, ChatMessage, Clock, FileUpload, IdGenerator, JsonFileStore, KnowledgeClient,
    KnowledgeFile, Role, Settings, SystemClock, UuidGenerator, format_bytes, format_date,
};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};

use crate::cli::{ConfigCommand, FilesCommand, StoreCommand};

/// Settings file under the user's config directory
pub fn default_settings_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("knowledge-ox").join("settings.json"))
}

/// Stored settings, with `OPENAI_API_KEY` filling an empty key
pub fn load_settings(store: &JsonFileStore) -> Settings {
    let mut settings = Settings::load(store);
    if !settings.has_api_key() {
        if let Ok(key) = std::env::var("OPENAI_API_KEY") {
            settings.api_key = key;
        }
    }
    settings
}

fn into_anyhow<T>(result: ApiResult<T>) -> Result<T> {
    result.into_result().map_err(|message| anyhow!(message))
}

pub fn handle_config(store: &JsonFileStore, action: ConfigCommand) -> Result<()> {
    match action {
        ConfigCommand::Show => {
            let settings = load_settings(store);
            println!("settings file:   {}", store.path().display());
            println!("api key:         {}", mask_key(&settings.api_key));
            println!("model:           {}", settings.effective_model());
            println!("vector store id: {}", settings.vector_store_id);
        }
        ConfigCommand::Set {
            api_key,
            model,
            vector_store_id,
        } => {
            let mut settings = Settings::load(store);
            if let Some(api_key) = api_key {
                settings.api_key = api_key.trim().to_string();
            }
            if let Some(model) = model {
                settings.model = model.trim().to_string();
            }
            if let Some(id) = vector_store_id {
                settings.vector_store_id = id.trim().to_string();
            }
            settings.save(store)?;
            println!("Saved settings to {}", store.path().display());
        }
    }
    Ok(())
}

pub async fn handle_files(
    client: &KnowledgeClient,
    settings: &Settings,
    action: FilesCommand,
) -> Result<()> {
    match action {
        FilesCommand::List => {
            let files = into_anyhow(client.list_files(settings).await)?;
            print_files(&files);
        }
        FilesCommand::Upload { path } => {
            let upload = read_upload(&path).await?;
            let file = into_anyhow(client.upload_file(&upload, settings).await)?;
            println!("Uploaded {} as {} ({})", file.filename, file.id, file.status);
        }
        FilesCommand::Replace { file_id, path } => {
            let upload = read_upload(&path).await?;
            let file = into_anyhow(client.replace_file(&file_id, &upload, settings).await)?;
            println!("Replaced {file_id} with {} ({})", file.id, file.status);
        }
        FilesCommand::Delete { file_id, yes } => {
            if !yes && !confirm(&format!("Delete {file_id} from the vector store?")).await? {
                println!("Cancelled");
                return Ok(());
            }
            into_anyhow(client.delete_file(&file_id, settings).await)?;
            println!("Deleted {file_id}");
        }
    }
    Ok(())
}

pub async fn handle_store(
    client: &KnowledgeClient,
    store: &JsonFileStore,
    settings: &Settings,
    action: StoreCommand,
) -> Result<()> {
    match action {
        StoreCommand::Create { name, use_store } => {
            let created = into_anyhow(client.create_vector_store(&name, settings).await?)?;
            println!(
                "Created vector store {} ({})",
                created.id,
                created.name.as_deref().unwrap_or("unnamed")
            );

            if use_store {
                let mut stored = Settings::load(store);
                stored.vector_store_id = created.id;
                stored.save(store)?;
                println!("Now using it as the configured vector store");
            }
        }
    }
    Ok(())
}

pub async fn handle_ask(client: &KnowledgeClient, settings: &Settings, question: &str) -> Result<()> {
    let answer = into_anyhow(client.ask(question, &[], settings).await)?;
    println!("{}", answer.content);
    Ok(())
}

/// Read questions from stdin, threading the conversation through each call
pub async fn handle_chat(client: &KnowledgeClient, settings: &Settings) -> Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = tokio::io::stdout();
    let mut history: Vec<ChatMessage> = Vec::new();

    loop {
        stdout.write_all(b"> ").await?;
        stdout.flush().await?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        let question = line.trim();
        if question.is_empty() {
            break;
        }

        match client.ask(question, &history, settings).await {
            ApiResult::Ok(answer) => {
                println!("{}\n", answer.content);
                history.push(ChatMessage::new(
                    UuidGenerator.next_id(),
                    Role::User,
                    question,
                    SystemClock.now_millis(),
                ));
                history.push(answer);
            }
            ApiResult::Err(message) => eprintln!("error: {message}\n"),
        }
    }
    Ok(())
}

async fn read_upload(path: &Path) -> Result<FileUpload> {
    let data = tokio::fs::read(path)
        .await
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .context("Upload path has no file name")?;
    Ok(FileUpload::new(name, data))
}

async fn confirm(prompt: &str) -> Result<bool> {
    let mut stdout = tokio::io::stdout();
    stdout.write_all(format!("{prompt} [y/N] ").as_bytes()).await?;
    stdout.flush().await?;

    let mut answer = String::new();
    BufReader::new(tokio::io::stdin()).read_line(&mut answer).await?;
    Ok(matches!(answer.trim(), "y" | "Y" | "yes"))
}

fn print_files(files: &[KnowledgeFile]) {
    if files.is_empty() {
        println!("No files in the vector store");
        return;
    }

    let width = files.iter().map(|f| f.filename.len()).max().unwrap_or(0).max(8);
    println!("{:<width$}  {:>9}  {:<12}  {:<16}  ID", "FILENAME", "SIZE", "STATUS", "CREATED");
    for file in files {
        println!(
            "{:<width$}  {:>9}  {:<12}  {:<16}  {}",
            file.filename,
            format_bytes(file.bytes),
            file.status,
            format_date(file.created_at),
            file.id
        );
    }
}

/// Key reduced to its last four characters
fn mask_key(key: &str) -> String {
    let key = key.trim();
    if key.is_empty() {
        return "(not set)".to_string();
    }
    let tail: String = key.chars().rev().take(4).collect::<Vec<_>>().into_iter().rev().collect();
    format!("****{tail}")
}
