//! Ask command handler.

use clap::Args;
use gita_core::{config::AppConfig, AppError, AppResult};
use gita_knowledge::{Quote, WisdomResponse};
use serde::Serialize;
use std::io::{BufRead, Write};

/// Ask the Gita a question
#[derive(Args, Debug)]
pub struct AskCommand {
    /// The question to ask (read from stdin when omitted)
    pub question: Option<String>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// JSON output: the response plus attribution.
#[derive(Serialize)]
struct AskOutput<'a> {
    #[serde(flatten)]
    response: &'a WisdomResponse,
    source: &'a str,
}

impl AskCommand {
    /// Execute the ask command.
    pub async fn execute(&self, config: &AppConfig) -> AppResult<()> {
        tracing::info!("Executing ask command");

        let question = match &self.question {
            Some(question) => question.clone(),
            None => prompt_stdin()?,
        };

        let question = question.trim();
        if question.is_empty() {
            return Err(AppError::Config("No question provided".to_string()));
        }

        let engine = super::load_engine(config).await?;
        let response = engine.answer_query(question).await?;

        tracing::debug!("Outcome: {:?}", response.outcome);

        if self.json {
            let output = AskOutput {
                response: &response,
                source: &config.source,
            };
            println!("{}", serde_json::to_string_pretty(&output)?);
        } else {
            print!("{}", render_text(&response));
        }

        Ok(())
    }
}

/// Prompt on stderr and read one line from stdin.
fn prompt_stdin() -> AppResult<String> {
    eprint!("Ask the Gita: ");
    std::io::stderr().flush()?;

    let mut line = String::new();
    std::io::stdin().lock().read_line(&mut line)?;
    Ok(line)
}

fn render_quote(quote: &Quote) -> String {
    let mut out = format!("Chapter {}, Verse {}\n", quote.chapter, quote.verse);
    for text in [&quote.sanskrit, &quote.translation, &quote.explanation] {
        if !text.is_empty() {
            out.push_str(text);
            out.push('\n');
        }
    }
    out
}

fn render_text(response: &WisdomResponse) -> String {
    let mut out = format!("{}\n", response.guidance);
    for quote in &response.quotes {
        out.push('\n');
        out.push_str(&render_quote(quote));
    }
    out
}
