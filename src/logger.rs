//! Log setup shared by the binaries.

use chrono;
use env_logger;
use log;
use std::io::Write;

/// Installs an `env_logger` that honors `RUST_LOG` and prefixes every line
/// with a millisecond timestamp, the level and the module.
pub fn init_logger() -> ::std::result::Result<(), log::SetLoggerError> {
    env_logger::Builder::from_default_env()
        .format(|buf, record| {
            writeln!(
                buf,
                "{} {}:{}: {}",
                chrono::Local::now().format("%Y-%m-%d %H:%M:%S%.3f"),
                record.level(),
                record.module_path().unwrap_or("?"),
                record.args()
            )
        })
        .try_init()
}
