use anyhow::Result;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;

use mocha_agent::{ConversationEngine, StatusCallback};

const PROMPT: &str = "> ";

pub fn is_exit(line: &str) -> bool {
    matches!(line.trim().to_ascii_lowercase().as_str(), "exit" | "quit")
}

pub fn narrate(text: &str) -> String {
    format!("*{text}*")
}

/// Greets, then reads lines until `exit`, `quit`, Ctrl-C or Ctrl-D.
///
/// A failed turn is reported and the loop keeps going.
pub async fn run(mut engine: ConversationEngine) -> Result<()> {
    match engine.greet().await {
        Ok(greeting) => println!("{greeting}"),
        Err(err) => eprintln!("Error: {err}"),
    }

    let mut editor = DefaultEditor::new()?;
    let on_status: &StatusCallback = &|text: &str| println!("{}", narrate(text));

    loop {
        let line = match tokio::task::block_in_place(|| editor.readline(PROMPT)) {
            Ok(line) => line,
            Err(ReadlineError::Interrupted | ReadlineError::Eof) => break,
            Err(err) => return Err(err.into()),
        };
        if is_exit(&line) {
            break;
        }
        let input = line.trim();
        if input.is_empty() {
            continue;
        }
        let _ = editor.add_history_entry(input);

        match engine.chat(input, Some(on_status)).await {
            Ok(answer) => println!("{answer}"),
            Err(err) => eprintln!("Error: {err}"),
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_words_are_case_insensitive() {
        assert!(is_exit("exit"));
        assert!(is_exit("  QUIT "));
        assert!(!is_exit("exit the room"));
    }

    #[test]
    fn narration_is_wrapped_in_asterisks() {
        assert_eq!(narrate("Turning it off"), "*Turning it off*");
    }
}
