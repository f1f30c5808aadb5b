use color_eyre::eyre::eyre;
use color_eyre::Result;
use dialoguer::{Confirm, Input, Password};

/// Prompt for a string value with optional default
pub fn prompt_string(prompt: &str, default: Option<&str>) -> Result<String> {
    let mut input = Input::<String>::new().with_prompt(prompt).allow_empty(true);
    if let Some(default_value) = default {
        input = input.default(default_value.to_string());
    }
    input.interact_text().map_err(|e| eyre!("Failed to read input: {}", e))
}

/// Existing password, read without echo
pub fn prompt_password(prompt: &str) -> Result<String> {
    rpassword::prompt_password(format!("{}: ", prompt)).map_err(|e| eyre!("Failed to read password: {}", e))
}

/// New password, entered twice
pub fn prompt_new_password(prompt: &str) -> Result<String> {
    Password::new()
        .with_prompt(prompt)
        .with_confirmation("Repeat password", "Passwords don't match")
        .interact()
        .map_err(|e| eyre!("Failed to read password: {}", e))
}

pub fn prompt_yes_no(prompt: &str, default: bool) -> Result<bool> {
    Confirm::new()
        .with_prompt(prompt)
        .default(default)
        .interact()
        .map_err(|e| eyre!("Failed to read confirmation: {}", e))
}

/// Prompt until the input parses as a number in `range`
pub fn prompt_number_in(prompt: &str, range: std::ops::RangeInclusive<u8>) -> Result<u8> {
    loop {
        let raw = prompt_string(prompt, None)?;
        match raw.trim().parse::<u8>() {
            Ok(n) if range.contains(&n) => return Ok(n),
            _ => eprintln!("Please enter a number from {} to {}.", range.start(), range.end()),
        }
    }
}
