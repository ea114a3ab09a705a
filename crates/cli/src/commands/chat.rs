//! `campusbuddy chat`: Interactive or single-message chat mode.

use std::io::{BufRead, Write};

use campusbuddy_agent::Assistant;
use campusbuddy_config::AppConfig;
use tracing::info;

pub fn run(
    config: &AppConfig,
    message: Option<String>,
    session: Option<String>,
) -> Result<(), Box<dyn std::error::Error>> {
    let assistant = Assistant::from_config(config);
    let session_id = session.unwrap_or_else(|| uuid::Uuid::new_v4().to_string());
    info!(session = %session_id, "Chat session started");

    if assistant.is_fallback_only() {
        eprintln!(
            "  No knowledge loaded from {}; run `campusbuddy onboard` or `campusbuddy doctor`.",
            config.knowledge.resolved_path().display()
        );
    }

    if let Some(msg) = message {
        println!("{}", assistant.respond(&session_id, &msg));
        return Ok(());
    }

    println!();
    println!("  CampusBuddy — Interactive Mode");
    println!("  Session:   {session_id}");
    if let Some(index) = assistant.current_index() {
        println!(
            "  Knowledge: {} records ({} embedder)",
            index.len(),
            index.embedder_name()
        );
    }
    println!();
    println!("  Ask about professors, courses, food, housing, events, clubs, or campus spots.");
    println!("  Type 'exit' or Ctrl+D to quit.");
    println!();

    let stdin = std::io::stdin();
    let mut stdout = std::io::stdout();
    let mut line = String::new();
    loop {
        print!("  You > ");
        stdout.flush()?;

        line.clear();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        let input = line.trim();
        if input.is_empty() {
            continue;
        }
        if matches!(input, "exit" | "quit") {
            break;
        }

        let reply = assistant.respond(&session_id, input);
        println!();
        for reply_line in reply.lines() {
            println!("  Buddy > {reply_line}");
        }
        println!();
    }

    assistant.end_session(&session_id);
    println!("  Bye!");
    Ok(())
}
