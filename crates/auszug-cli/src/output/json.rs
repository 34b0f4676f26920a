use auszug_core::error::AuszugError;
use auszug_core::model::Statement;

pub fn print(statement: &Statement) -> Result<(), AuszugError> {
    let json = serde_json::to_string_pretty(statement)?;
    println!("{json}");
    Ok(())
}
