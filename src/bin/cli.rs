//! Memoir CLI
//!
//! Command-line front end for the memory journal: record and manage
//! entries, or chat with the companion about them.

use std::io::{self, BufRead, Write};

use chrono::Utc;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use memoir::chat::ChatSession;
use memoir::error::{MemoirError, Result};
use memoir::storage::{
    count_memories, count_memories_this_month, create_memory, delete_memory, get_memory,
    list_memories, Storage, StorageConfig,
};
use memoir::types::{Emotion, Memory, NewMemory};

#[derive(Parser)]
#[command(name = "memoir")]
#[command(about = "Personal memory journal with natural-language retrieval")]
#[command(version)]
struct Cli {
    /// Database path
    #[arg(
        long,
        env = "MEMOIR_DB_PATH",
        default_value = "~/.local/share/memoir/journal.db"
    )]
    db_path: String,

    /// Owner account the commands act on
    #[arg(long, env = "MEMOIR_OWNER", default_value = "default")]
    owner: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Record a new memory
    Add {
        /// Title of the memory
        title: String,
        /// Longer description
        #[arg(short, long, default_value = "")]
        description: String,
        /// Emotion tag (happy, sad, nostalgic, proud, peaceful, grateful, excited, bittersweet)
        #[arg(short, long)]
        emotion: Option<String>,
        /// Mark an attached audio recording
        #[arg(long)]
        audio: bool,
        /// Mark attached photos
        #[arg(long)]
        photos: bool,
    },
    /// Show a memory by ID
    Get {
        /// Memory ID
        id: i64,
    },
    /// List memories, newest first
    List {
        /// Maximum number to return
        #[arg(short, long, default_value = "20")]
        limit: i64,
    },
    /// Delete a memory
    Delete {
        /// Memory ID
        id: i64,
    },
    /// Show journal statistics
    Stats,
    /// Chat with the memory companion
    Chat,
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    let db_path = shellexpand::tilde(&cli.db_path).to_string();
    let storage = Storage::open(StorageConfig { db_path })?;

    match cli.command {
        Commands::Add {
            title,
            description,
            emotion,
            audio,
            photos,
        } => {
            let emotion = emotion
                .map(|e| {
                    e.parse::<Emotion>()
                        .map_err(MemoirError::InvalidInput)
                })
                .transpose()?;

            let memory = storage.with_transaction(|conn| {
                create_memory(
                    conn,
                    &NewMemory {
                        owner_id: cli.owner.clone(),
                        title,
                        description,
                        emotion,
                        has_audio: audio,
                        has_photos: photos,
                        ..Default::default()
                    },
                )
            })?;
            println!("Recorded memory {}: {}", memory.id, memory.title);
        }

        Commands::Get { id } => {
            let memory = storage.with_connection(|conn| get_memory(conn, id))?;
            print_memory(&memory);
        }

        Commands::List { limit } => {
            let memories =
                storage.with_connection(|conn| list_memories(conn, &cli.owner, limit))?;
            if memories.is_empty() {
                println!("No memories recorded yet.");
            }
            for memory in &memories {
                print_memory(memory);
            }
        }

        Commands::Delete { id } => {
            storage.with_connection(|conn| delete_memory(conn, id))?;
            println!("Deleted memory {}", id);
        }

        Commands::Stats => {
            let (total, this_month) = storage.with_connection(|conn| {
                let total = count_memories(conn, &cli.owner)?;
                let this_month = count_memories_this_month(conn, &cli.owner, Utc::now())?;
                Ok((total, this_month))
            })?;
            println!(
                "{} memories recorded for {} ({} this month)",
                total, cli.owner, this_month
            );
        }

        Commands::Chat => run_chat(storage, &cli.owner)?,
    }

    Ok(())
}

/// Interactive companion loop; empty line or "quit" exits
fn run_chat(storage: Storage, owner: &str) -> Result<()> {
    let mut session = ChatSession::new(storage, owner);
    println!("{}\n", session.messages()[0].text);

    let stdin = io::stdin();
    let mut stdout = io::stdout();

    loop {
        print!("> ");
        stdout.flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        let line = line.trim();
        if line.is_empty() || line == "quit" || line == "exit" {
            break;
        }

        let reply = session.submit(line);
        println!("\n{}\n", reply.text);
        for memory in &reply.memories {
            print_memory(memory);
        }
        if !reply.memories.is_empty() {
            println!();
        }
    }

    Ok(())
}

fn print_memory(memory: &Memory) {
    let mut extras = Vec::new();
    if let Some(emotion) = memory.emotion {
        extras.push(emotion.to_string());
    }
    if memory.has_audio {
        extras.push("audio".to_string());
    }
    if memory.has_photos {
        extras.push("photos".to_string());
    }
    if memory.has_files {
        extras.push("files".to_string());
    }
    let suffix = if extras.is_empty() {
        String::new()
    } else {
        format!(" [{}]", extras.join(", "))
    };

    println!(
        "  #{} {} ({}){}",
        memory.id,
        memory.title,
        memory.created_at.format("%Y-%m-%d"),
        suffix
    );
    if !memory.description.is_empty() {
        println!("      {}", memory.description);
    }
}
