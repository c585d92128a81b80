//! RAX file manager storage - command-line entry point
//!
//! Runs one storage command against the configured files root.

use log::info;
use std::env;
use std::process;

use rax_fm_storage::commands::{execute, parse_command};
use rax_fm_storage::error::CommandError;
use rax_fm_storage::error::handlers::{error_to_exit_code, handle_error};
use rax_fm_storage::utils::logging::setup_logging;
use rax_fm_storage::{HostEnvironment, LocalStorage, Settings};

const CONFIG_PATH_VAR: &str = "RFM_CONFIG";
const DEFAULT_CONFIG_PATH: &str = "filemanager";

fn main() {
    // env_logger picks up the RUST_LOG environment variable
    setup_logging();

    let args: Vec<String> = env::args().skip(1).collect();
    let config_path = env::var(CONFIG_PATH_VAR).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());

    let result = Settings::load(&config_path)
        .map_err(|e| CommandError::from(rax_fm_storage::StorageError::from(e)))
        .and_then(|settings| {
            let storage = LocalStorage::new(settings, &HostEnvironment::from_env());
            info!("Running storage command against {}", storage.root());
            execute(&storage, parse_command(&args))
        });

    match result {
        Ok(output) => println!("{output}"),
        Err(e) => {
            handle_error(&e);
            eprintln!("{e}");
            process::exit(error_to_exit_code(&e));
        }
    }
}
