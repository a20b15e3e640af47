//! Logger module
//!
//! Provides logging utilities for the book service including:
//! - Server lifecycle logging
//! - Access logging with multiple formats
//! - Error, warning and debug logging
//! - File-based logging support

mod format;
pub mod writer;

pub use format::AccessLogEntry;

use crate::config::Config;
use chrono::Local;
use std::net::SocketAddr;

/// Initialize the logger with configuration
///
/// Should be called once at application startup.
pub fn init(config: &Config) -> std::io::Result<()> {
    writer::init(
        config.logging.access_log_file.as_deref(),
        config.logging.error_log_file.as_deref(),
        &config.logging.level,
    )
}

fn timestamp() -> String {
    Local::now().format("%Y-%m-%d %H:%M:%S%.3f").to_string()
}

/// Write to info/access log
fn write_info(message: &str) {
    match writer::get() {
        Some(w) => w.write_info(message),
        None => println!("{message}"),
    }
}

/// Write to error log
fn write_error(message: &str) {
    match writer::get() {
        Some(w) => w.write_error(message),
        None => eprintln!("{message}"),
    }
}

pub fn log_server_start(addr: &SocketAddr, config: &Config) {
    write_info("======================================");
    write_info("Book service started successfully");
    write_info(&format!("Listening on: http://{addr}{}", crate::api::BASE_PATH));
    write_info(&format!("Log level: {}", config.logging.level));
    if let Some(workers) = config.server.workers {
        write_info(&format!("Worker threads: {workers}"));
    }
    if let Some(max) = config.performance.max_connections {
        write_info(&format!("Max connections: {max}"));
    }
    write_info(&format!(
        "Store: {:?} {}.{} (deadline {}ms)",
        config.store.backend,
        config.store.database,
        config.store.collection,
        config.store.request_timeout_ms
    ));
    if let Some(ref path) = config.logging.access_log_file {
        write_info(&format!("Access log: {path}"));
    }
    if let Some(ref path) = config.logging.error_log_file {
        write_info(&format!("Error log: {path}"));
    }
    write_info("======================================");
}

pub fn log_info(message: &str) {
    write_info(&format!("{} [INFO] {message}", timestamp()));
}

pub fn log_debug(message: &str) {
    if writer::get().is_some_and(writer::LogWriter::debug_enabled) {
        write_info(&format!("{} [DEBUG] {message}", timestamp()));
    }
}

pub fn log_warning(message: &str) {
    write_error(&format!("{} [WARN] {message}", timestamp()));
}

pub fn log_error(message: &str) {
    write_error(&format!("{} [ERROR] {message}", timestamp()));
}

pub fn log_connection_accepted(peer_addr: &SocketAddr) {
    log_debug(&format!("[Connection] Accepted from: {peer_addr}"));
}

pub fn log_connection_error(err: &impl std::fmt::Debug) {
    log_error(&format!("Failed to serve connection: {err:?}"));
}

/// Log a failed request together with the status it was answered with
pub fn log_request_failure(method: &str, path: &str, status: u16, message: &str) {
    log_error(&format!("{method} {path} - {status}: {message}"));
}

/// Log formatted access log entry
pub fn log_access(entry: &AccessLogEntry, format: &str) {
    write_info(&entry.format(format));
}

pub fn log_shutdown(active: usize) {
    log_info(&format!(
        "[SHUTDOWN] Listener closed, waiting for {active} active connection(s)"
    ));
}
