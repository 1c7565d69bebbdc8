use scanhealth::cli::Cli;
use scanhealth::config::{Config, MAX_TIMEOUT_MS};
use scanhealth::core::network::{
    init_debug_logger, ServerHealthService, StatusBadge, StatusRenderer,
};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse_args();

    if cli.init {
        let path = Config::init()?;
        println!("✓ Wrote default configuration to {}", path.display());
        return Ok(());
    }

    let mut config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };

    if let Some(timeout_ms) = cli.timeout_ms {
        let timeout_ms = timeout_ms.min(MAX_TIMEOUT_MS);
        config.timeouts.health_ms = timeout_ms;
        config.timeouts.stats_ms = timeout_ms;
    }

    if cli.print {
        config.print()?;
        return Ok(());
    }

    if cli.check {
        config.check()?;
        println!("✓ Configuration valid");
        return Ok(());
    }

    init_debug_logger(config.debug);

    let service = ServerHealthService::from_config(&config)?;
    let renderer = StatusRenderer::new();

    if cli.diagnose {
        let report = service.run_diagnostics().await;
        if cli.json {
            println!("{}", serde_json::to_string_pretty(&report)?);
        } else {
            for result in &report.results {
                let mark = if result.passed { "✓" } else { "✗" };
                let detail = result.error.as_deref().unwrap_or("ok");
                println!(
                    "{} {:<15} {:>6}ms  attempts:{}  {}",
                    mark, result.name, result.duration_ms, result.attempts, detail
                );
            }
            println!(
                "{} ({} passed, {} failed)",
                report.overall.label(),
                report.passed,
                report.failed
            );
        }
        if !report.all_passed() {
            std::process::exit(1);
        }
        return Ok(());
    }

    if cli.stats {
        let stats = service.fetch_stats().await;
        if cli.json {
            println!("{}", serde_json::to_string_pretty(&stats)?);
        } else {
            println!("{}", renderer.render_stats(&stats));
        }
        return Ok(());
    }

    if cli.categories {
        let breakdown = service.fetch_category_breakdown().await;
        if cli.json {
            println!("{}", serde_json::to_string_pretty(&breakdown)?);
        } else {
            for (name, count) in &breakdown {
                println!("{}: {}", name, count);
            }
        }
        return Ok(());
    }

    // Default action: health check
    let status = service.check_health().await;
    if cli.json {
        println!("{}", serde_json::to_string_pretty(&status)?);
    } else {
        println!("{}", renderer.render(Some(&status)));
        if let Some(banner) = renderer.render_banner(&status) {
            eprintln!("{}", banner);
        }
    }

    if StatusBadge::from_status(Some(&status)) != StatusBadge::Healthy {
        std::process::exit(1);
    }

    Ok(())
}
