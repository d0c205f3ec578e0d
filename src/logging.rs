use std::io::Write;
use std::sync::OnceLock;
use std::time::Instant;

static START_TIME: OnceLock<Instant> = OnceLock::new();

/// Initialize the logger with custom formatting showing elapsed time.
///
/// Verbose mode lowers the level to Info so per-stream progress is shown;
/// otherwise only warnings and errors appear. Output format:
/// `[MM:SS] LEVEL: message`, all on stderr so artifact paths printed on
/// stdout stay clean.
pub fn init_logger(verbose: bool) {
    START_TIME.set(Instant::now()).ok();

    let level = if verbose {
        log::LevelFilter::Info
    } else {
        log::LevelFilter::Warn
    };

    env_logger::Builder::from_default_env()
        .filter_level(level)
        .format(|buf, record| {
            let elapsed = START_TIME.get().unwrap().elapsed();
            writeln!(
                buf,
                "[{:02}:{:02}] {}: {}",
                elapsed.as_secs() / 60,
                elapsed.as_secs() % 60,
                record.level(),
                record.args()
            )
        })
        .target(env_logger::Target::Stderr)
        .init();
}
