use clap::{Parser, Subcommand};
use std::sync::Arc;
use uhura_core::{
    db::open_location,
    presentation::{address_url, metadata_text},
    CoreConfig, Note, NoteDirection, NoteId, NoteInput, NoteService, NoteStatus, NoteType,
    SqliteNoteRepository,
};

#[derive(Parser)]
#[command(name = "uhura")]
#[command(about = "Uhura note-taking CLI")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// List notes, newest first
    List {
        /// Only notes whose title or content contains this text
        #[arg(long)]
        search: Option<String>,
    },
    /// Show one note
    Show {
        /// Note UUID
        id: String,
    },
    /// Create a note
    Create {
        #[arg(long)]
        title: String,
        /// Between 20 and 300 characters
        #[arg(long)]
        content: String,
        /// call, fax, email, mail, meeting, submission or other
        #[arg(long = "type")]
        kind: Option<NoteType>,
        #[arg(long)]
        address: Option<String>,
        /// inbound or outbound
        #[arg(long)]
        direction: Option<NoteDirection>,
        /// success, pending, failed or incomplete
        #[arg(long)]
        status: Option<NoteStatus>,
    },
    /// Change fields of an existing note
    Edit {
        /// Note UUID
        id: String,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        content: Option<String>,
        #[arg(long = "type")]
        kind: Option<NoteType>,
        #[arg(long)]
        address: Option<String>,
        #[arg(long, conflicts_with = "clear_direction")]
        direction: Option<NoteDirection>,
        /// Remove the note's direction
        #[arg(long)]
        clear_direction: bool,
        #[arg(long)]
        status: Option<NoteStatus>,
    },
    /// Delete a note
    Delete {
        /// Note UUID
        id: String,
    },
}

fn main() {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let Some(command) = cli.command else {
        println!("No command given. Run with --help for usage.");
        return Ok(());
    };

    let cfg = CoreConfig::from_env()?;
    let conn = open_location(cfg.database())?;
    let service = NoteService::new(Arc::new(SqliteNoteRepository::new(conn)));

    match command {
        Commands::List { search } => {
            let notes = service.get_many(search.as_deref())?;
            if notes.is_empty() {
                println!("No notes found.");
            } else {
                for note in notes {
                    println!(
                        "{}  {}  [{}] {}",
                        note.id,
                        note.created.format("%Y-%m-%d %H:%M"),
                        note.status,
                        note.title
                    );
                }
            }
        }
        Commands::Show { id } => {
            let note = service.get_one(NoteId::parse(&id)?)?;
            print_note(&note);
        }
        Commands::Create {
            title,
            content,
            kind,
            address,
            direction,
            status,
        } => {
            let new_note = NoteInput {
                title: Some(title),
                content: Some(content),
                kind,
                address,
                direction: Some(direction),
                status,
            }
            .into_new_note()?;
            let note = service.create(new_note)?;
            println!("Created note with UUID: {}", note.id);
        }
        Commands::Edit {
            id,
            title,
            content,
            kind,
            address,
            direction,
            clear_direction,
            status,
        } => {
            let id = NoteId::parse(&id)?;
            let patch = NoteInput {
                title,
                content,
                kind,
                address,
                direction: direction_update(direction, clear_direction),
                status,
            }
            .into_patch()?;
            let note = service.update(id, patch)?;
            println!("Updated note {}", note.id);
        }
        Commands::Delete { id } => {
            let id = NoteId::parse(&id)?;
            service.delete(id)?;
            println!("Deleted note {}", id);
        }
    }

    Ok(())
}

fn direction_update(
    direction: Option<NoteDirection>,
    clear: bool,
) -> Option<Option<NoteDirection>> {
    if clear {
        Some(None)
    } else {
        direction.map(Some)
    }
}

fn print_note(note: &Note) {
    println!("{}", note.title);
    println!("  {}", metadata_text(note));
    if let Some(url) = address_url(note) {
        println!("  {}", url);
    }
    println!("  status:  {}", note.status);
    println!("  created: {}", note.created.to_rfc3339());
    println!("  updated: {}", note.updated.to_rfc3339());
    println!();
    println!("{}", note.content);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_parses_enum_flags() {
        let cli = Cli::try_parse_from([
            "uhura",
            "create",
            "--title",
            "Hail",
            "--content",
            "Hailing frequencies are open.",
            "--type",
            "call",
            "--direction",
            "inbound",
        ])
        .expect("valid arguments");

        match cli.command {
            Some(Commands::Create {
                kind, direction, ..
            }) => {
                assert_eq!(kind, Some(NoteType::Call));
                assert_eq!(direction, Some(NoteDirection::Inbound));
            }
            _ => panic!("expected create"),
        }
    }

    #[test]
    fn unknown_type_is_rejected() {
        let result = Cli::try_parse_from([
            "uhura", "create", "--title", "T", "--content", "C", "--type", "pigeon",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn direction_and_clear_direction_conflict() {
        let result = Cli::try_parse_from([
            "uhura",
            "edit",
            "00000000-0000-0000-0000-000000000000",
            "--direction",
            "inbound",
            "--clear-direction",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn direction_update_distinguishes_clear_from_unchanged() {
        assert_eq!(direction_update(None, false), None);
        assert_eq!(direction_update(None, true), Some(None));
        assert_eq!(
            direction_update(Some(NoteDirection::Outbound), false),
            Some(Some(NoteDirection::Outbound))
        );
    }
}
