//! Command-line interface: offline training and the interactive screening
//! session.

use crate::error::Error;
use crate::inference::{Answer, Predictor};
use crate::pipeline::config::Config;
use crate::pipeline::train::train_model;
use crate::schema::{Domain, FEATURES};
use crate::session::{ScreeningSession, SessionState};
use std::io::{BufRead, Write};
use std::path::Path;

/// Print command-line usage information.
pub fn print_usage() {
    println!("Usage:");
    println!("  neurolens [COMMAND] [OPTIONS]\n");
    println!("Commands:");
    println!("  train              Train the screening model (saves to models/)");
    println!("  screen             Run an interactive screening session");
    println!("  help               Show this help\n");
    println!("Options:");
    println!("  --config PATH      Configuration file (default: config.toml)\n");
    println!("Examples:");
    println!("  neurolens train");
    println!("  neurolens screen --config config.toml");
}

/// Main CLI entry point.
///
/// # Arguments
///
/// * `args` - Command-line arguments (including program name)
pub fn run(args: Vec<String>) -> anyhow::Result<()> {
    let command = if args.len() > 1 { args[1].as_str() } else { "help" };

    let config_path = args
        .iter()
        .position(|a| a == "--config")
        .and_then(|i| args.get(i + 1))
        .map_or("config.toml", String::as_str);

    match command {
        "train" => {
            let config = load_config(config_path);
            train_model(&config)?;
            Ok(())
        }
        "screen" => {
            let config = load_config(config_path);
            let predictor = load_predictor(&config)?;
            let stdin = std::io::stdin();
            screen(
                &predictor,
                &mut stdin.lock(),
                &mut std::io::stdout(),
                Path::new("."),
            )?;
            Ok(())
        }
        "help" | "--help" | "-h" => {
            print_usage();
            Ok(())
        }
        _ => {
            println!("Unknown command: {command}\n");
            print_usage();
            Ok(())
        }
    }
}

fn load_config(path: &str) -> Config {
    Config::load(path).unwrap_or_else(|e| {
        eprintln!("Warning: Could not load {path}: {e}");
        eprintln!("Using default configuration\n");
        Config::default()
    })
}

/// Load the two artifacts named by the configuration. Aborts with a clear
/// diagnostic when either is missing: the screening flow cannot run
/// without them.
fn load_predictor(config: &Config) -> Result<Predictor, Error> {
    let dir = Path::new(&config.output.model_dir);
    Predictor::load(
        dir.join(&config.output.model_file),
        dir.join(&config.output.encoders_file),
    )
}

/// Drive one or more screening sessions over a line-based terminal,
/// writing each generated report into `report_dir`.
///
/// Each answer is validated against its field's domain at entry, so the
/// encoder's unknown-category error stays a safety net rather than a user
/// facing crash.
pub fn screen<R: BufRead, W: Write>(
    predictor: &Predictor,
    input: &mut R,
    output: &mut W,
    report_dir: &Path,
) -> anyhow::Result<()> {
    loop {
        let mut session = ScreeningSession::new();

        writeln!(output, "\nNeuroLens mental health screening")?;
        while session.state() == SessionState::Idle {
            let name = prompt(input, output, "Enter your name: ")?;
            match session.enter_name(&name) {
                Ok(()) => {}
                Err(Error::MissingName) => {
                    writeln!(output, "Please enter your name to proceed.")?;
                }
                Err(e) => return Err(e.into()),
            }
        }

        writeln!(output, "\nPlease answer the following questions:\n")?;
        for field in FEATURES {
            let answer = ask(input, output, field)?;
            session.record_answer(field.name, answer)?;
        }

        let prediction = session.submit(predictor)?.clone();
        writeln!(output)?;
        if prediction.needs_support() {
            writeln!(output, "You may Need Mental Health Support.")?;
            writeln!(
                output,
                "It looks like you might be experiencing some challenges related to mental \
                 health. You're not alone - it's okay to ask for help. Please consider \
                 reaching out to a mental health professional."
            )?;
        } else {
            writeln!(output, "You are Mentally Healthy.")?;
            writeln!(
                output,
                "Well done! You have shown signs of maintaining good mental health. Keep \
                 taking care of yourself and others!"
            )?;
        }

        let filename = session
            .report_filename()
            .expect("session has a subject name");
        match session.generate_report() {
            Ok(bytes) => {
                std::fs::write(report_dir.join(&filename), bytes)?;
                writeln!(output, "\nYour report has been saved to {filename}")?;
            }
            Err(e) => {
                // Session stays in Predicted; a rendering failure should not
                // cost the subject their answers.
                writeln!(output, "\nCould not generate the report: {e}")?;
            }
        }

        let again = prompt(input, output, "\nRetake the assessment? [y/N] ")?;
        if !again.eq_ignore_ascii_case("y") {
            return Ok(());
        }
    }
}

/// Ask one schema question until the answer fits the field's domain.
fn ask<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    field: &crate::schema::Field,
) -> anyhow::Result<Answer> {
    loop {
        match field.domain {
            Domain::Range { min, max } => {
                let text = prompt(input, output, &format!("{} [{min}-{max}]: ", field.question))?;
                match text.parse::<i64>() {
                    Ok(age) if (min..=max).contains(&age) => {
                        return Ok(Answer::Number(age as f64))
                    }
                    _ => writeln!(output, "Please enter a number between {min} and {max}.")?,
                }
            }
            Domain::Choice(options) => {
                writeln!(output, "{}", field.question)?;
                for (i, option) in options.iter().enumerate() {
                    writeln!(output, "  {}) {option}", i + 1)?;
                }
                let text = prompt(input, output, "> ")?;
                if let Ok(idx) = text.parse::<usize>() {
                    if idx >= 1 && idx <= options.len() {
                        return Ok(Answer::Choice(options[idx - 1].to_string()));
                    }
                }
                if let Some(option) = options.iter().find(|o| o.eq_ignore_ascii_case(&text)) {
                    return Ok(Answer::Choice(option.to_string()));
                }
                writeln!(output, "Please pick one of the listed options.")?;
            }
        }
    }
}

fn prompt<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    text: &str,
) -> std::io::Result<String> {
    write!(output, "{text}")?;
    output.flush()?;
    let mut line = String::new();
    input.read_line(&mut line)?;
    Ok(line.trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::fixture_predictor;
    use std::io::Cursor;

    /// Scripted stdin for a full session: name, 23 answers (always the
    /// first option / age 29), no retake.
    fn scripted_input() -> Vec<String> {
        let mut lines = vec!["Alex".to_string()];
        for field in FEATURES {
            match field.domain {
                Domain::Range { .. } => lines.push("29".to_string()),
                Domain::Choice(_) => lines.push("1".to_string()),
            }
        }
        lines.push("n".to_string());
        lines
    }

    fn run_screen(lines: Vec<String>) -> (String, tempfile::TempDir) {
        let predictor = fixture_predictor();
        let dir = tempfile::tempdir().unwrap();
        let input = lines.join("\n") + "\n";
        let mut output = Vec::new();
        screen(
            &predictor,
            &mut Cursor::new(input),
            &mut output,
            dir.path(),
        )
        .unwrap();
        (String::from_utf8(output).unwrap(), dir)
    }

    #[test]
    fn scripted_session_runs_to_completion() {
        let (transcript, dir) = run_screen(scripted_input());
        assert!(transcript.contains("Enter your name:"));
        assert!(transcript.contains("What is your age?"));
        assert!(
            transcript.contains("Mentally Healthy")
                || transcript.contains("Need Mental Health Support")
        );
        assert!(transcript.contains("Alex_mental_health_report.pdf"));
        assert!(dir.path().join("Alex_mental_health_report.pdf").exists());
    }

    #[test]
    fn blank_name_reprompts() {
        let mut lines = vec![String::new()];
        lines.extend(scripted_input());
        let (transcript, _dir) = run_screen(lines);
        assert!(transcript.contains("Please enter your name to proceed."));
    }

    #[test]
    fn out_of_range_age_reprompts() {
        let mut lines = scripted_input();
        lines.insert(1, "250".to_string());
        let (transcript, _dir) = run_screen(lines);
        assert!(transcript.contains("Please enter a number between 18 and 100."));
    }

    #[test]
    fn option_answers_accept_text_as_well_as_index() {
        let mut lines = scripted_input();
        lines[2] = "male".to_string(); // Gender, case-insensitive match
        let (transcript, dir) = run_screen(lines);
        assert!(transcript.contains("report has been saved"));
        assert!(dir.path().join("Alex_mental_health_report.pdf").exists());
    }
}
