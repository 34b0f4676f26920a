use auszug_core::error::AuszugError;
use auszug_core::model::BankFormat;

pub fn run() -> Result<(), AuszugError> {
    println!("Supported statement formats (auto-detection priority order):\n");
    for format in BankFormat::ALL {
        println!("  {:<14} {}", format.as_str(), format.description());
    }
    println!("\nUse --format auto to pick the format with the most transactions.");
    Ok(())
}
