use std::sync::Arc;

use anyhow::Context;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::EnvFilter;

use fact_metrics::fact::fact_channel;
use fact_metrics::metrics::InMemoryRecorder;
use fact_metrics::settings::InMemorySettings;
use fact_metrics::{create, Consent, ControllerConfig, ControllerDeps, Fact, FactBus, MetricServiceType, MetricsService};

/// Backend that only logs its transitions. Stands in for a real SDK.
struct LoggingService {
    name: &'static str,
    kind: MetricServiceType,
}

impl MetricsService for LoggingService {
    fn name(&self) -> &str {
        self.name
    }

    fn service_type(&self) -> MetricServiceType {
        self.kind
    }

    fn start(&self) -> anyhow::Result<()> {
        tracing::info!("[{}] started", self.name);
        Ok(())
    }

    fn stop(&self) -> anyhow::Result<()> {
        tracing::info!("[{}] stopped", self.name);
        Ok(())
    }
}

fn env_flag(name: &str) -> bool {
    std::env::var(name).is_ok_and(|v| v == "1" || v.eq_ignore_ascii_case("true"))
}

/// Reads JSON-lines facts from stdin, routes them through a release
/// controller backed by in-memory stores, and prints what got recorded.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).init();

    let config = match std::env::args().nth(1) {
        Some(path) => ControllerConfig::from_path(&path).with_context(|| format!("loading {path}"))?,
        None => ControllerConfig::default(),
    };
    tracing::info!(?config, "Fact metrics demo booting");

    let recorder = Arc::new(InMemoryRecorder::new());
    let settings = Arc::new(InMemorySettings::new());
    let services: Vec<Arc<dyn MetricsService>> = vec![
        Arc::new(LoggingService { name: "glean", kind: MetricServiceType::Data }),
        Arc::new(LoggingService { name: "adjust", kind: MetricServiceType::Marketing }),
    ];
    // Marketing stays off unless explicitly granted
    let consent = Consent::new(|| !env_flag("FACT_METRICS_NO_DATA"), || env_flag("FACT_METRICS_MARKETING"));

    let bus = Arc::new(FactBus::new());
    let controller = create(
        &config,
        ControllerDeps {
            services,
            consent,
            recorder: recorder.clone(),
            settings: settings.clone(),
        },
        &bus,
    );

    controller.start(MetricServiceType::Data)?;
    controller.start(MetricServiceType::Marketing)?;

    let (sender, pump) = fact_channel(config.channel_capacity, bus.clone());
    let pump_task = tokio::spawn(pump.run());

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut line_no = 0usize;
    while let Some(line) = lines.next_line().await? {
        line_no += 1;
        if line.trim().is_empty() {
            continue;
        }
        match serde_json::from_str::<Fact>(&line) {
            Ok(fact) => sender.send(fact).await?,
            Err(e) => tracing::warn!(line = line_no, "Skipping malformed fact: {}", e),
        }
    }

    drop(sender);
    let delivered = pump_task.await?;

    controller.stop(MetricServiceType::Marketing)?;
    controller.stop(MetricServiceType::Data)?;

    tracing::info!(delivered, "All facts processed");
    println!("{}", serde_json::to_string_pretty(&recorder.snapshot())?);
    println!("{}", serde_json::to_string_pretty(&settings.snapshot())?);

    Ok(())
}
