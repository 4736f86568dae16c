//! Scan command implementation

use anyhow::{bail, Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use shelfscan_core::{
    ImageFileSource, Notification, Notifier, ScanConfig, ScanOrchestrator, ScanOutcome,
    SessionContext,
};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

/// Prints the run's notification to stdout, clear of the spinner
struct ConsoleNotifier {
    pb: ProgressBar,
}

impl Notifier for ConsoleNotifier {
    fn notify(&self, notification: Notification) {
        self.pb.suspend(|| {
            println!("{}", notification.title);
            println!("{}", notification.message);
        });
    }
}

/// Run one scan of `image` for the signed-in user
pub async fn scan(
    config: &ScanConfig,
    session: &SessionContext,
    image: &Path,
    camera_permitted: bool,
) -> Result<()> {
    // Spinner follows the pipeline's state transitions
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .context("Invalid progress template")?,
    );

    let notifier = Arc::new(ConsoleNotifier { pb: pb.clone() });
    let orchestrator = ScanOrchestrator::from_config(config, session, notifier)
        .context("Cannot set up the scan pipeline")?;

    pb.enable_steady_tick(Duration::from_millis(100));

    let mut events = orchestrator.subscribe();
    let progress = {
        let pb = pb.clone();
        tokio::spawn(async move {
            while let Ok(state) = events.recv().await {
                pb.set_message(state.label());
                if state.is_terminal() {
                    break;
                }
            }
        })
    };

    let source = ImageFileSource::new(image);
    let result = orchestrator.run(session, camera_permitted, &source).await;

    progress.abort();
    pb.finish_and_clear();

    match result.context("Scan could not start")? {
        ScanOutcome::Done(record) => {
            tracing::info!(id = %record.id, "Added '{}' to {}", record.title, orchestrator.store().key());
            Ok(())
        }
        ScanOutcome::Aborted(reason) => bail!("Scan aborted: {}", reason),
    }
}
