// Front-end glue shared by the two binaries: load once, then render pages.

pub mod interactive;
pub mod render;

use crate::adapters::csv_export::export_rows;
use crate::adapters::csv_source::CsvSource;
use crate::config::OutputFormat;
use crate::core::engine::{DashboardEngine, Session, ViewOptions};
use crate::core::{ConfigProvider, FilterCriteria, Storage};
use crate::utils::error::Result;
use std::io::{BufRead, Write};

/// What to do with the session once it is loaded.
#[derive(Debug, Clone, Default)]
pub struct RunSettings {
    pub page: usize,
    pub format: OutputFormat,
    pub export: Option<String>,
    pub interactive: bool,
}

/// Load both datasets through `storage` and open a session with `criteria`.
pub async fn open_session<S, C>(
    storage: S,
    config: C,
    criteria: FilterCriteria,
    monitor_enabled: bool,
) -> Result<Session>
where
    S: Storage,
    C: ConfigProvider,
{
    let options = ViewOptions::from_config(&config);
    let engine = DashboardEngine::new_with_monitoring(CsvSource::new(storage, config), monitor_enabled);
    let store = engine.load().await?;

    let mut session = Session::new(store, options);
    session.set_criteria(criteria);
    engine.monitor().log_stats("Session ready");
    Ok(session)
}

/// Render the requested page, write the export if asked, then hand over to
/// the command loop when interactive.
pub async fn present<S, R, W>(
    session: &mut Session,
    storage: &S,
    delimiter: u8,
    settings: &RunSettings,
    input: R,
    out: &mut W,
) -> anyhow::Result<()>
where
    S: Storage,
    R: BufRead,
    W: Write,
{
    session.go_to_page(settings.page);
    let page = session.render()?;
    render::render(&page, settings.format, out)?;

    if let Some(path) = &settings.export {
        let rows = session.projection();
        let bytes = export_rows(storage, path, &rows, delimiter).await?;
        tracing::info!("💾 Exported {} rows ({} bytes) to {}", rows.len(), bytes, path);
    }

    if settings.interactive {
        interactive::run(session, input, out, settings.format)?;
    }
    Ok(())
}
