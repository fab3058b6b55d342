use std::path::PathBuf;
use std::time::SystemTime;

use color_eyre::Result;
use fern::colors::{Color, ColoredLevelConfig};

/// Wire up fern: colored console output at `console_level`, plus an
/// optional plain-text file sink at `file_level`.
pub fn setup_logging(
    console_level: log::LevelFilter,
    log_file: Option<PathBuf>,
    file_level: log::LevelFilter,
) -> Result<()> {
    let colors = ColoredLevelConfig::new()
        .error(Color::Red)
        .warn(Color::Yellow)
        .info(Color::Green)
        .debug(Color::BrightBlack)
        .trace(Color::Magenta);

    let console = fern::Dispatch::new()
        .format(move |out, message, record| {
            out.finish(format_args!(
                "[{} {} {}] {}",
                humantime::format_rfc3339_seconds(SystemTime::now()),
                colors.color(record.level()),
                record.target(),
                message
            ))
        })
        .level(console_level)
        .chain(std::io::stderr());

    let mut dispatch = fern::Dispatch::new().chain(console);

    if let Some(path) = log_file {
        let file = fern::Dispatch::new()
            .format(|out, message, record| {
                out.finish(format_args!(
                    "[{} {} {}] {}",
                    humantime::format_rfc3339_seconds(SystemTime::now()),
                    record.level(),
                    record.target(),
                    message
                ))
            })
            .level(file_level)
            .chain(fern::log_file(path)?);
        dispatch = dispatch.chain(file);
    }

    dispatch.apply()?;
    Ok(())
}
