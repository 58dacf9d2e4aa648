//! Check pointer injection capabilities.

use std::path::Path;

use airpoint_common::config::{config_file_path, AppConfig};
use airpoint_pointer_injector::capabilities::{check_capabilities, print_capability_report};

pub fn run(config: &AppConfig, config_override: Option<&Path>) -> anyhow::Result<()> {
    println!("Airpoint System Check");
    println!("{}", "=".repeat(50));

    let config_path = config_override
        .map(Path::to_path_buf)
        .unwrap_or_else(config_file_path);
    if config_path.exists() {
        println!("[OK] Config: {}", config_path.display());
    } else {
        println!("[INFO] Config: using defaults ({} not found)", config_path.display());
    }
    match config.validate() {
        Ok(()) => println!("[OK] Config values are valid"),
        Err(e) => println!("[WARN] Config values are invalid: {e}"),
    }
    println!(
        "[INFO] Screen: {}x{}, injector: {:?}",
        config.screen.width, config.screen.height, config.injector.backend
    );

    let capabilities = check_capabilities(config);
    println!();
    print_capability_report(&capabilities);

    let all_required_ok = capabilities
        .iter()
        .filter(|c| c.required)
        .all(|c| c.available);

    println!();
    if all_required_ok {
        println!("All required capabilities are available. Airpoint is ready.");
    } else {
        println!("Some required capabilities are missing. See above for fixes.");
    }

    Ok(())
}
