// File: ./src/logging.rs
// The terminal belongs to the TUI, so log records go to a file.
use directories::ProjectDirs;
use std::fs::{self, File, OpenOptions};
use std::path::PathBuf;

pub fn log_dir() -> Option<PathBuf> {
    let proj = ProjectDirs::from("com", "classease", "classease")?;
    let dir = proj.data_dir();
    if !dir.exists() {
        let _ = fs::create_dir_all(dir);
    }
    Some(dir.to_path_buf())
}

fn open_log(name: &str) -> Option<File> {
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_dir()?.join(name))
        .ok()
}

/// Starts `env_logger` (`RUST_LOG`, default `info`) writing to
/// `classease.log`. Without a writable data dir logging stays off.
pub fn init() {
    let Some(file) = open_log("classease.log") else {
        return;
    };
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Pipe(Box::new(file)))
        .try_init();
}

/// Records panics in `classease_panic.log` before the default hook runs.
pub fn install_panic_hook() {
    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        use std::io::Write;
        if let Some(mut file) = open_log("classease_panic.log") {
            let _ = writeln!(file, "PANIC: {:?}", info);
        }
        log::error!("panic: {}", info);
        default_hook(info);
    }));
}
