//! Interactive prompt wizard.
//!
//! Collects the same `RunConfig` shape as the flag surface, with the
//! friendlier units the prompts advertise (minutes/seconds instead of
//! milliseconds).

use std::io::{self, BufRead, Write};
use std::time::Duration;

use figbak_core::{Credentials, RunConfig};

pub(crate) fn collect() -> io::Result<RunConfig> {
    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    println!("figbak interactive setup");
    println!();

    let email = prompt_required(&mut lines, "Email address of your Figma account", |v| {
        v.contains('@')
    })?;
    let password = prompt_required(&mut lines, "Password of your Figma account", |v| {
        !v.is_empty()
    })?;
    let token = prompt_required(&mut lines, "Figma access token", |v| !v.is_empty())?;

    let ids_line = prompt(
        &mut lines,
        "Ids of your Figma projects (separate with spaces)",
    )?;
    let project_ids: Vec<String> = ids_line.split_whitespace().map(String::from).collect();

    let download_timeout_min = prompt_number(
        &mut lines,
        "Download timeout in minutes (max wait for one file)",
        5,
    )?;
    let interaction_delay_s =
        prompt_number(&mut lines, "Interaction delay in seconds", 2)?;
    let typing_delay_ms = prompt_number(&mut lines, "Typing delay in milliseconds", 100)?;

    let mut config = RunConfig::new(Credentials { email, password }, token, project_ids);
    config.download_timeout = Duration::from_secs(download_timeout_min * 60);
    config.interaction_delay = Duration::from_secs(interaction_delay_s);
    config.typing_delay = Duration::from_millis(typing_delay_ms);
    Ok(config)
}

fn prompt<B: BufRead>(lines: &mut io::Lines<B>, message: &str) -> io::Result<String> {
    print!("{}: ", message);
    io::stdout().flush()?;
    match lines.next() {
        Some(line) => Ok(line?.trim().to_string()),
        None => Err(io::Error::new(io::ErrorKind::UnexpectedEof, "stdin closed")),
    }
}

fn prompt_required<B: BufRead>(
    lines: &mut io::Lines<B>,
    message: &str,
    valid: impl Fn(&str) -> bool,
) -> io::Result<String> {
    loop {
        let value = prompt(lines, message)?;
        if valid(&value) {
            return Ok(value);
        }
        println!("This argument is required and must be valid.");
    }
}

fn prompt_number<B: BufRead>(
    lines: &mut io::Lines<B>,
    message: &str,
    default: u64,
) -> io::Result<u64> {
    loop {
        let value = prompt(lines, &format!("{} [{}]", message, default))?;
        if value.is_empty() {
            return Ok(default);
        }
        match value.parse() {
            Ok(n) => return Ok(n),
            Err(_) => println!("Please enter a number."),
        }
    }
}
