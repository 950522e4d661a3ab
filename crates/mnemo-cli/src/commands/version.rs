//! Version command implementation.

use console::style;

/// Execute the version command.
pub fn execute() {
    let version = env!("CARGO_PKG_VERSION");

    println!(
        "{} {} - non-Markovianity from process tomography",
        style("mnemo").cyan().bold(),
        style(format!("v{version}")).yellow()
    );
    println!();
    println!("Components:");
    println!("  mnemo-channel  Channel representations and matrix utilities");
    println!("  mnemo-tomo     Tomography batch results and experiment layout");
    println!("  mnemo-nm       Intermediate maps and non-Markovianity measures");
    println!("  mnemo-cli      Command-line interface");
    println!();
    println!("Report schema: {}", style(mnemo_nm::SCHEMA_VERSION).dim());
}
