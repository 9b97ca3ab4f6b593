//! CLI session host — one line in, one engine step, full transcript out.

use tokio::io::{AsyncBufReadExt, BufReader};

use crate::flow::GuideEngine;
use crate::session::{Role, Session};

/// Render the full transcript in insertion order. Pure: rendering twice
/// yields identical output.
pub fn render_transcript(session: &Session) -> String {
    let mut out = String::new();
    for msg in &session.messages {
        let glyph = match msg.role {
            Role::Bot => "🤖",
            Role::User => "🧑",
        };
        out.push_str(glyph);
        out.push_str(": ");
        out.push_str(&msg.content);
        out.push('\n');
    }
    out
}

/// Run a single-session REPL over stdin/stdout until EOF or `/quit`.
pub async fn run(engine: &GuideEngine) -> std::io::Result<()> {
    let mut session = Session::new();
    engine.greet(&mut session);
    println!("{}", render_transcript(&session));
    eprint!("> ");

    let stdin = tokio::io::stdin();
    let reader = BufReader::new(stdin);
    let mut lines = reader.lines();

    while let Some(line) = lines.next_line().await? {
        let line = line.trim().to_string();
        if line.is_empty() {
            eprint!("> ");
            continue;
        }
        if line == "/quit" {
            break;
        }

        engine.handle_message(&mut session, &line).await;
        println!("{}", render_transcript(&session));
        eprint!("> ");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn render_orders_and_tags_messages() {
        let mut session = Session::new();
        session.push_bot("hello");
        session.push_user("hi");

        let rendered = render_transcript(&session);
        assert_eq!(rendered, "🤖: hello\n🧑: hi\n");
    }

    #[test]
    fn render_is_idempotent() {
        let mut session = Session::new();
        session.push_bot("hello");
        session.push_user("take me to Rome");
        session.push_bot("Got it!");

        let first = render_transcript(&session);
        let second = render_transcript(&session);
        assert_eq!(first, second);
    }

    #[test]
    fn render_empty_session() {
        let session = Session::new();
        assert_eq!(render_transcript(&session), "");
    }
}
