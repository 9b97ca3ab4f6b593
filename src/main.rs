use std::sync::Arc;

use monument_guide::config::GuideConfig;
use monument_guide::extract::HeuristicExtractor;
use monument_guide::flow::GuideEngine;
use monument_guide::host;
use monument_guide::info::MonumentInfo;
use monument_guide::llm::create_generator;
use monument_guide::mail::SmtpMailer;
use monument_guide::otp::{OtpAuthenticator, OtpStore};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Install rustls crypto provider before any TLS usage
    rustls::crypto::ring::default_provider()
        .install_default()
        .expect("Failed to install rustls crypto provider");

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let config = GuideConfig::from_env().unwrap_or_else(|e| {
        eprintln!("Error: {e}");
        eprintln!("  export GEMINI_API_KEY=...");
        eprintln!("  export EMAIL_ADDRESS=... EMAIL_PASSWORD=...");
        std::process::exit(1);
    });

    eprintln!("🗺️  Monument Guide v{}", env!("CARGO_PKG_VERSION"));
    eprintln!("   Model: {}", config.llm.model);
    eprintln!("   SMTP: {}:{}", config.smtp.host, config.smtp.port);
    eprintln!("   Type a message and press Enter. /quit to exit.\n");

    let generator = create_generator(&config.llm)?;

    let extractor = Arc::new(HeuristicExtractor::new());
    let auth = OtpAuthenticator::new(
        Arc::new(OtpStore::new()),
        Arc::new(SmtpMailer::new(config.smtp.clone())),
    );
    let info = Arc::new(MonumentInfo::new(generator));

    let engine = GuideEngine::new(extractor, auth, info, config.timeouts.clone());
    host::run(&engine).await?;

    Ok(())
}
