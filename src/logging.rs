use std::fs;

use log4rs::append::console::ConsoleAppender;
use log4rs::append::file::FileAppender;
use log4rs::config::{Appender, Config as LogConfig, Root};
use log4rs::encode::pattern::PatternEncoder;

use crate::config::Config;
use crate::error::{Error, Result};

const PATTERN: &str = "{d(%Y-%m-%d %H:%M:%S)} {h({l:<5})} [{T}] {m}{n}";
const LOG_FILE: &str = "unroll.log";

/// Log to both the console and `<log.dir>/unroll.log`.
pub fn init(config: &Config) -> Result<()> {
    let level = config.log_level()?;
    fs::create_dir_all(&config.log.dir)?;

    let stdout = ConsoleAppender::builder()
        .encoder(Box::new(PatternEncoder::new(PATTERN)))
        .build();
    let file = FileAppender::builder()
        .encoder(Box::new(PatternEncoder::new(PATTERN)))
        .build(config.log.dir.join(LOG_FILE))?;

    let log_config = LogConfig::builder()
        .appender(Appender::builder().build("stdout", Box::new(stdout)))
        .appender(Appender::builder().build("file", Box::new(file)))
        .build(Root::builder().appender("stdout").appender("file").build(level))
        .map_err(|e| Error::Logging(e.to_string()))?;

    log4rs::init_config(log_config).map_err(|e| Error::Logging(e.to_string()))?;
    return Ok(());
}
