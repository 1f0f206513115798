use clap::{Arg, Command};
use ja2en::{Ja2En, MachineTranslator, MockMode, MockTranslator, RemoteEngine, pre_filter};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let matches = Command::new("ja2en")
        .version("0.1.0")
        .about("Translate Japanese text to English")
        .arg(
            Arg::new("text")
                .help("Japanese text to translate (\\uXXXX escapes are decoded)")
                .required(true)
                .index(1),
        )
        .arg(
            Arg::new("mock")
                .long("mock")
                .short('m')
                .help("Use the echo mock engine instead of JA2EN_ENGINE_URL")
                .action(clap::ArgAction::SetTrue),
        )
        .arg(
            Arg::new("split")
                .long("split")
                .short('s')
                .help("Translate sentence by sentence")
                .action(clap::ArgAction::SetTrue),
        )
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .short('v')
                .help("Show each pipeline stage")
                .action(clap::ArgAction::SetTrue),
        )
        .get_matches();

    let text = matches
        .get_one::<String>("text")
        .ok_or("missing text argument")?;
    let use_mock = matches.get_flag("mock");
    let split = matches.get_flag("split");
    let verbose = matches.get_flag("verbose");

    let default_level = if verbose { "ja2en=debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    let engine: Arc<dyn MachineTranslator> = if use_mock {
        Arc::new(MockTranslator::new(MockMode::NoOp))
    } else {
        if std::env::var("JA2EN_ENGINE_URL").is_err() {
            eprintln!("❌ JA2EN_ENGINE_URL environment variable not set");
            eprintln!("   Set it with: export JA2EN_ENGINE_URL=http://host:port/translate");
            eprintln!("   Or use --mock to use the echo engine");
            return Err("Missing engine URL".into());
        }
        Arc::new(RemoteEngine::from_env()?)
    };

    let ja2en = Ja2En::new(engine).with_sentence_split(split);

    if verbose {
        let decoded = ja2en::decode_escapes(text)?;
        let pre = pre_filter(&decoded);
        println!("📝 Source: \"{}\"", decoded);
        println!("🧹 Filtered: \"{}\" (bracketed: {})", pre.text, pre.is_bracket);
        println!("⚙️  Engine: {}", ja2en.provider_name());
        println!();
    }

    match ja2en.translate_request(text).await {
        Ok(result) => {
            println!("{}", result);
            Ok(())
        }
        Err(e) => {
            eprintln!("❌ Translation failed: {}", e);
            Err(e.into())
        }
    }
}
