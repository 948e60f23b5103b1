use clap::Parser;
use std::error::Error;
use std::time::Duration;
use tracing::{error, info, warn};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

use newshound::api::gemini_with_backoff;
use newshound::cli::Cli;
use newshound::compose;
use newshound::config::Config;
use newshound::fetch::HttpFetcher;
use newshound::models::{Attempt, Discovery};
use newshound::pipeline::{self, Pipeline};
use newshound::publish::{Publisher, RestPublisher};
use newshound::store::seen::SeenLedger;
use newshound::store::topics::TopicHistory;
use newshound::topics;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let start_time = std::time::Instant::now();
    info!("newshound starting up");

    let args = Cli::parse();
    let mut config = Config::load(args.config.as_deref())?;
    if let Some(days) = args.window_days {
        config.window_days = days;
    }

    let ledger = SeenLedger::new(&args.seen_store);
    let history = TopicHistory::new(&args.topic_history, config.history_cap);

    let api_key = args.gemini_api_key.unwrap_or_else(|| {
        warn!("GEMINI_API_KEY not set; suggestion falls back and the gate fails open");
        String::new()
    });
    let model = gemini_with_backoff(
        &config.gemini_base_url,
        &config.model,
        &api_key,
        Duration::from_secs(config.llm_timeout_secs),
    )?;
    let fetcher = HttpFetcher::new()?;

    // --- Plan the attempts ---
    let plan = match &args.topic {
        Some(manual) => {
            info!(topic = %manual, "Using manually supplied topic");
            vec![Attempt::new(manual.clone(), config.suggested_strict)]
        }
        None => {
            let banned = history.banned_topics(config.window_days);
            info!(
                banned = banned.len(),
                window_days = config.window_days,
                "Consulting model for a trending topic"
            );
            let suggested = topics::suggest_topic(&model, &banned).await;
            pipeline::build_plan(suggested, &config)
        }
    };
    info!(tiers = plan.len(), "Attempt plan ready");

    // --- Discover ---
    let pipeline = Pipeline {
        fetcher: &fetcher,
        model: &model,
        ledger: &ledger,
        config: &config,
    };
    let (article, topic) = match pipeline.run(&plan).await {
        Discovery::Accepted { article, topic } => (article, topic),
        Discovery::Exhausted => {
            warn!("No new content found after all fallbacks");
            return Ok(());
        }
    };

    // --- Compose ---
    let post = match compose::compose_post(&model, &article).await {
        Ok(post) => post,
        Err(e) => {
            error!(error = %e, "Failed to generate post text; nothing to publish");
            return Ok(());
        }
    };

    println!("\n{:=<50}", "");
    println!("PREVIEW:");
    println!("{post}");
    println!("{:=<50}", "");
    println!("ATTACHMENT: {}", article.source_url);

    if args.dry_run {
        info!("Dry run; skipping publish, ledger, and history updates");
        return Ok(());
    }

    // --- Publish, then record ---
    let (Some(access_token), Some(author_urn)) = (args.access_token, args.author_urn) else {
        error!("LINKEDIN_ACCESS_TOKEN and LINKEDIN_AUTHOR_URN are required to publish");
        return Ok(());
    };
    let publisher = RestPublisher::new(&config.publish_base_url, access_token, author_urn)?;

    match publisher.publish(&post, Some(&article.source_url)).await {
        Ok(()) => {
            // Dedup state reflects what actually happened, so these writes
            // wait for a confirmed publish.
            ledger.mark_seen(&article.source_url);
            history.log_topic(&topic);
            info!(source = %article.source_url, %topic, "Published and recorded");
        }
        Err(e) => {
            error!(error = %e, "Publish failed; ledger and history left untouched");
        }
    }

    let elapsed = start_time.elapsed();
    info!(
        secs = elapsed.as_secs(),
        millis = elapsed.subsec_millis(),
        "Execution complete"
    );
    Ok(())
}
