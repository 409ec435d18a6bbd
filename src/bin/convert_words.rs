//! Convert the raw word list into the JSON card data loaded by the server.
//!
//! Usage: convert-words <raw_words.txt> <cards.json>

use std::process::ExitCode;

use wordcards::words::parse_raw;

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "convert_words=info,wordcards=info".into()),
        )
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let [input, output] = args.as_slice() else {
        eprintln!("Usage: convert-words <raw_words.txt> <cards.json>");
        return ExitCode::from(2);
    };

    let raw = match std::fs::read_to_string(input) {
        Ok(raw) => raw,
        Err(e) => {
            tracing::error!("Failed to read {}: {}", input, e);
            return ExitCode::FAILURE;
        }
    };

    let cards = match parse_raw(&raw) {
        Ok(cards) => cards,
        Err(e) => {
            tracing::error!("Failed to parse {}: {}", input, e);
            return ExitCode::FAILURE;
        }
    };

    let json = match serde_json::to_string_pretty(&cards) {
        Ok(json) => json,
        Err(e) => {
            tracing::error!("Failed to serialize cards: {}", e);
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = std::fs::write(output, json) {
        tracing::error!("Failed to write {}: {}", output, e);
        return ExitCode::FAILURE;
    }

    tracing::info!(cards = cards.len(), "Wrote {}", output);
    ExitCode::SUCCESS
}
