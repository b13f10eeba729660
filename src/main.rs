//! Command-line entry point.
//!
//! A thin wrapper around the `pulserank_ingest` library that handles:
//! - Command-line argument parsing
//! - Environment variable loading (.env file)
//! - Logger initialization
//! - JSON output of report results

use std::process;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use serde::Serialize;
use serde_json::{json, Value};

use pulserank_ingest::config::{Command, Opt};
use pulserank_ingest::domain::{apex_domain, extract_domain_from_url};
use pulserank_ingest::initialization::{init_logger_with, init_resolver};
use pulserank_ingest::provider::Report;
use pulserank_ingest::storage::{
    cache_stats, cleanup_expired_cache, domain_history, get_cache_config, init_db_pool_with_path,
    invalidate_cache, list_cache_configs, now_ms, upsert_cache_config, CacheConfigUpdate,
    EndpointCacheConfig,
};
use pulserank_ingest::{
    BacklinkQuery, CacheOptions, CachedMajesticClient, Config, HostResolver, MajesticClient,
    MajesticReports, Page, RankIngest,
};

#[tokio::main]
async fn main() -> Result<()> {
    // A missing .env file is fine; the key may already be exported
    let _ = dotenvy::dotenv();

    let opt = Opt::parse();
    init_logger_with(opt.log_level.into(), opt.log_format)
        .context("Failed to initialize logger")?;

    let config = Config::from(&opt);
    match run(opt, config).await {
        Ok(output) => {
            println!("{}", serde_json::to_string_pretty(&output)?);
            Ok(())
        }
        Err(e) => {
            eprintln!("pulserank-ingest error: {e:#}");
            process::exit(1);
        }
    }
}

async fn run(opt: Opt, config: Config) -> Result<Value> {
    let pool = init_db_pool_with_path(&config.db_path)
        .await
        .with_context(|| format!("Failed to open database {}", config.db_path.display()))?;

    match &opt.command {
        Command::History {
            domain,
            limit,
            offset,
        } => {
            let host = extract_domain_from_url(domain)?;
            let domain = apex_domain(&host).unwrap_or_else(|| host.to_ascii_lowercase());
            to_json(&domain_history(&pool, &domain, *limit, *offset).await?)
        }
        Command::CacheStats { endpoint } => {
            to_json(&cache_stats(&pool, endpoint.as_deref(), None).await?)
        }
        Command::CacheInvalidate { pattern } => {
            let removed = invalidate_cache(&pool, pattern).await?;
            Ok(json!({ "removed": removed }))
        }
        Command::CacheCleanup => {
            let removed = cleanup_expired_cache(&pool, now_ms()).await?;
            Ok(json!({ "removed": removed }))
        }
        Command::CacheConfig { endpoint: None, .. } => {
            to_json(&list_cache_configs(&pool).await?)
        }
        Command::CacheConfig {
            endpoint: Some(endpoint),
            ttl_secs,
            max_hits,
            active,
            priority,
        } => {
            let report = Report::from_endpoint(endpoint)
                .with_context(|| format!("Unknown endpoint '{endpoint}'"))?;
            let update = CacheConfigUpdate {
                ttl_secs: ttl_secs.map(|secs| i64::try_from(secs).unwrap_or(i64::MAX)),
                max_hits: *max_hits,
                is_active: *active,
                priority: *priority,
            };
            if update.is_empty() {
                let config = get_cache_config(&pool, endpoint)
                    .await?
                    .unwrap_or_else(|| {
                        EndpointCacheConfig::default_for(endpoint, report.default_ttl())
                    });
                return to_json(&config);
            }
            let config =
                upsert_cache_config(&pool, endpoint, &update, report.default_ttl(), now_ms())
                    .await?;
            to_json(&config)
        }
        _ => {
            let client =
                MajesticClient::new(config.provider.clone()).context("Failed to build client")?;
            let resolver: Arc<dyn HostResolver> = init_resolver();
            if config.use_cache {
                let options = CacheOptions {
                    force_refresh: config.force_refresh,
                    ..Default::default()
                };
                let cached = CachedMajesticClient::with_options(client, pool.clone(), options);
                run_report(&opt, &config, RankIngest::new(cached, pool, resolver)).await
            } else {
                run_report(&opt, &config, RankIngest::new(client, pool, resolver)).await
            }
        }
    }
}

async fn run_report<C: MajesticReports>(
    opt: &Opt,
    config: &Config,
    ingest: RankIngest<C>,
) -> Result<Value> {
    let freshness = opt.datasource;
    let client = ingest.client();

    match &opt.command {
        Command::IndexInfo { urls, no_enrich } => {
            if *no_enrich {
                return to_json(&client.index_item_info(urls, freshness).await?);
            }
            let outcome = ingest.index_item_info(urls, freshness).await?;
            Ok(json!({
                "data": to_json(&outcome.data)?,
                "enrichment": to_json(&outcome.persistence.summary())?,
            }))
        }
        Command::Backlinks {
            url,
            mode,
            ref_domain,
            max_per_ref_domain,
            count,
            from,
        } => {
            let query = BacklinkQuery {
                mode: *mode,
                ref_domain: ref_domain.clone(),
                max_source_urls_per_ref_domain: *max_per_ref_domain,
                page: Page {
                    count: *count,
                    from: *from,
                },
                ..BacklinkQuery::new(url.clone()).freshness(freshness)
            };
            to_json(&client.backlink_data(&query).await?)
        }
        Command::BatchBacklinks { urls } => to_json(
            &client
                .batch_backlink_data(urls, freshness, &config.rate_limit)
                .await?,
        ),
        Command::RefDomains {
            domains,
            count,
            from,
            no_persist,
        } => {
            let page = Page {
                count: *count,
                from: *from,
            };
            if *no_persist {
                return to_json(&client.ref_domains(domains, freshness, page).await?);
            }
            let outcome = ingest.ref_domains(domains, freshness, page).await?;
            let persistence = match outcome.persistence {
                Ok(report) => to_json(&report)?,
                Err(e) => json!({ "error": e.to_string() }),
            };
            Ok(json!({ "data": to_json(&outcome.data)?, "persistence": persistence }))
        }
        Command::AnchorText { url, count } => {
            to_json(&client.anchor_text(url, freshness, *count).await?)
        }
        Command::Topics { url, count } => to_json(&client.topics(url, freshness, *count).await?),
        Command::TopPages { url, count, from } => {
            let page = Page {
                count: *count,
                from: *from,
            };
            to_json(&client.top_pages(url, freshness, page).await?)
        }
        Command::NewLost { url, mode } => {
            to_json(&client.new_lost_backlinks(url, freshness, *mode).await?)
        }
        Command::HostedDomains { domain } => {
            to_json(&client.hosted_domains(domain, freshness).await?)
        }
        Command::Subscription => to_json(&client.subscription_info(freshness).await?),
        Command::History { .. }
        | Command::CacheStats { .. }
        | Command::CacheInvalidate { .. }
        | Command::CacheCleanup
        | Command::CacheConfig { .. } => anyhow::bail!("not a report command"),
    }
}

fn to_json<T: Serialize>(value: &T) -> Result<Value> {
    serde_json::to_value(value).context("Failed to encode output")
}
