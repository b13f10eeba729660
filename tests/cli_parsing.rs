//! Tests for CLI option and subcommand parsing.

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use pulserank_ingest::config::{Command, Opt, DEFAULT_BATCH_PAUSE};
use pulserank_ingest::{Config, Freshness};

#[test]
fn test_defaults() {
    let opt = Opt::try_parse_from(["pulserank-ingest", "subscription"]).expect("parse");
    assert!(matches!(opt.command, Command::Subscription));
    assert_eq!(opt.db_path, PathBuf::from("./pulserank.db"));
    assert_eq!(opt.datasource, Freshness::Fresh);
    assert_eq!(opt.batch_size, 10);
    assert_eq!(opt.batch_pause_ms, 1000);
    assert_eq!(Config::from(&opt).rate_limit.window, DEFAULT_BATCH_PAUSE);
    assert!(!opt.no_cache);
    assert!(!opt.refresh);
}

#[test]
fn test_global_options_after_subcommand() {
    let opt = Opt::try_parse_from([
        "pulserank-ingest",
        "batch-backlinks",
        "https://a.com/",
        "https://b.com/",
        "--batch-size",
        "5",
        "--batch-pause-ms",
        "250",
        "--datasource",
        "historic",
        "--db-path",
        "/tmp/metrics.db",
    ])
    .expect("parse");

    match &opt.command {
        Command::BatchBacklinks { urls } => assert_eq!(urls.len(), 2),
        other => panic!("unexpected command {other:?}"),
    }
    assert_eq!(opt.datasource, Freshness::Historic);

    let config = Config::from(&opt);
    assert_eq!(config.rate_limit.requests_per_window, 5);
    assert_eq!(config.rate_limit.window, Duration::from_millis(250));
    assert_eq!(config.db_path, PathBuf::from("/tmp/metrics.db"));
    assert!(config.use_cache);
}

#[test]
fn test_report_subcommand_defaults() {
    let opt = Opt::try_parse_from(["pulserank-ingest", "new-lost", "example.com"]).expect("parse");
    match opt.command {
        Command::NewLost { url, mode } => {
            assert_eq!(url, "example.com");
            assert_eq!(mode, 1);
        }
        other => panic!("unexpected command {other:?}"),
    }

    let opt = Opt::try_parse_from(["pulserank-ingest", "anchor-text", "example.com"])
        .expect("parse");
    assert!(matches!(opt.command, Command::AnchorText { count: 10, .. }));

    let opt = Opt::try_parse_from(["pulserank-ingest", "history", "example.com"]).expect("parse");
    assert!(matches!(
        opt.command,
        Command::History {
            limit: 30,
            offset: 0,
            ..
        }
    ));
}

#[test]
fn test_backlinks_options() {
    let opt = Opt::try_parse_from([
        "pulserank-ingest",
        "backlinks",
        "https://example.com/",
        "--mode",
        "1",
        "--ref-domain",
        "example.net",
        "--max-per-ref-domain",
        "5",
        "--count",
        "25",
    ])
    .expect("parse");
    match opt.command {
        Command::Backlinks {
            mode,
            ref_domain,
            max_per_ref_domain,
            count,
            from,
            ..
        } => {
            assert_eq!(mode, 1);
            assert_eq!(ref_domain.as_deref(), Some("example.net"));
            assert_eq!(max_per_ref_domain, Some(5));
            assert_eq!(count, 25);
            assert_eq!(from, 0);
        }
        other => panic!("unexpected command {other:?}"),
    }
}

#[test]
fn test_cache_flags() {
    let opt = Opt::try_parse_from(["pulserank-ingest", "--no-cache", "topics", "example.com"])
        .expect("parse");
    assert!(!Config::from(&opt).use_cache);

    let opt = Opt::try_parse_from(["pulserank-ingest", "topics", "example.com", "--refresh"])
        .expect("parse");
    let config = Config::from(&opt);
    assert!(config.use_cache);
    assert!(config.force_refresh);

    assert!(Opt::try_parse_from([
        "pulserank-ingest",
        "--no-cache",
        "--refresh",
        "topics",
        "example.com"
    ])
    .is_err());
}

#[test]
fn test_index_info_requires_urls() {
    assert!(Opt::try_parse_from(["pulserank-ingest", "index-info"]).is_err());
    let opt = Opt::try_parse_from([
        "pulserank-ingest",
        "index-info",
        "example.com",
        "example.org",
        "--no-enrich",
    ])
    .expect("parse");
    assert!(matches!(
        opt.command,
        Command::IndexInfo { ref urls, no_enrich: true } if urls.len() == 2
    ));
}

#[test]
fn test_cache_config_options() {
    let opt = Opt::try_parse_from(["pulserank-ingest", "cache-config"]).expect("parse");
    assert!(matches!(opt.command, Command::CacheConfig { endpoint: None, .. }));

    let opt = Opt::try_parse_from([
        "pulserank-ingest",
        "cache-config",
        "majestic.topics",
        "--ttl-secs",
        "3600",
        "--max-hits",
        "0",
        "--active",
        "false",
    ])
    .expect("parse");
    match opt.command {
        Command::CacheConfig {
            endpoint,
            ttl_secs,
            max_hits,
            active,
            priority,
        } => {
            assert_eq!(endpoint.as_deref(), Some("majestic.topics"));
            assert_eq!(ttl_secs, Some(3600));
            assert_eq!(max_hits, Some(0));
            assert_eq!(active, Some(false));
            assert_eq!(priority, None);
        }
        other => panic!("unexpected command {other:?}"),
    }

    // Settings need an endpoint to apply to
    assert!(Opt::try_parse_from(["pulserank-ingest", "cache-config", "--ttl-secs", "60"]).is_err());
}
