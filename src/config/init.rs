use anyhow::{Context, Result};
use atomic_write_file::AtomicWriteFile;
use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};

use crate::catalogue::Indicator;
use crate::config::{get_config_path, Config};
use crate::risk::validation::{WEIGHT_MAX, WEIGHT_MIN};
use crate::risk::WeightVector;
use crate::portfolio::DEFAULT_VOLUME;

/// Prompt user with a message and return their trimmed input.
fn prompt(message: &str) -> Result<String> {
    print!("{}", message);
    std::io::stdout()
        .flush()
        .context("Failed to flush stdout")?;
    let mut input = String::new();
    std::io::stdin()
        .lock()
        .read_line(&mut input)
        .context("Failed to read input")?;
    Ok(input.trim().to_string())
}

/// Prompt user with a message and a default value. Returns default if input is empty.
fn prompt_with_default(message: &str, default: &str) -> Result<String> {
    let input = prompt(&format!("{} [{}]: ", message, default))?;
    if input.is_empty() {
        Ok(default.to_string())
    } else {
        Ok(input)
    }
}

/// Prompt user with a yes/no question. Returns bool based on input and default.
fn prompt_yes_no(message: &str, default_yes: bool) -> Result<bool> {
    let hint = if default_yes { "Y/n" } else { "y/N" };
    let input = prompt(&format!("{} [{}]: ", message, hint))?;
    let input = input.to_lowercase();
    if input.is_empty() {
        Ok(default_yes)
    } else {
        Ok(input == "y" || input == "yes")
    }
}

/// Print text with a typewriter effect, one character at a time.
fn typewriter(text: &str) {
    use std::thread;
    use std::time::Duration;
    for c in text.chars() {
        print!("{}", c);
        std::io::stdout().flush().ok();
        thread::sleep(Duration::from_millis(18));
    }
    println!();
}

/// Parse a single weight as typed by the user.
fn parse_weight_input(s: &str) -> Result<f64, String> {
    let value: f64 = s
        .trim()
        .parse()
        .map_err(|_| format!("'{}' is not a number", s))?;
    if !value.is_finite() || !(WEIGHT_MIN..=WEIGHT_MAX).contains(&value) {
        return Err(format!("must be between {} and {}", WEIGHT_MIN, WEIGHT_MAX));
    }
    Ok(value)
}

fn parse_volume_input(s: &str) -> Result<f64, String> {
    let value: f64 = s
        .trim()
        .parse()
        .map_err(|_| format!("'{}' is not a number", s))?;
    if !value.is_finite() || value < 0.0 {
        return Err("must be a non-negative number".to_string());
    }
    Ok(value)
}

/// Run the interactive init wizard to create a config file.
///
/// If `default_path` is Some, uses that as the suggested config file path.
pub fn run_init_wizard(default_path: Option<PathBuf>) -> Result<()> {
    println!();
    typewriter("HRDD Risk Configuration Wizard");
    println!("==============================");
    println!();

    // 1. Catalogue
    typewriter("The catalogue is a CSV file with one row per country and eight columns:");
    typewriter("  name, isoCode, five indicators, baseRiskScore");
    let catalogue_input = prompt("Catalogue path (leave empty to pass --catalogue each run): ")?;
    let catalogue = if catalogue_input.is_empty() {
        None
    } else {
        Some(PathBuf::from(catalogue_input))
    };

    // 2. Weights
    println!();
    let weights = if prompt_yes_no("Configure indicator weights? (n accepts defaults)", false)? {
        typewriter("Each weight sets how much an indicator counts, from 0 to 100.");
        typewriter("Weights don't need to add up to 100. Indicators a country doesn't report are skipped.");
        let mut values = Vec::with_capacity(Indicator::ALL.len());
        for indicator in Indicator::ALL {
            let default = WeightVector::DEFAULT.weight(indicator).to_string();
            let value = loop {
                let input = prompt_with_default(indicator.label(), &default)?;
                match parse_weight_input(&input) {
                    Ok(v) => break v,
                    Err(e) => println!("  Invalid: {}. Try again.", e),
                }
            };
            values.push(value);
        }
        Some(values)
    } else {
        None
    };

    // 3. Default volume
    println!();
    typewriter("Volume is how much business you do in a country; it weights the portfolio baseline.");
    let default_volume = loop {
        let input = prompt_with_default("Default volume for new countries", &DEFAULT_VOLUME.to_string())?;
        match parse_volume_input(&input) {
            Ok(v) => break v,
            Err(e) => println!("  Invalid: {}. Try again.", e),
        }
    };

    // 4. Config path
    let default_config_path = match default_path {
        Some(p) => p,
        None => get_config_path()?,
    };
    println!();
    let path_str = prompt_with_default(
        "Where should the config be saved?",
        &default_config_path.display().to_string(),
    )?;
    let config_path = PathBuf::from(&path_str);

    if config_path.exists() {
        let overwrite = prompt_yes_no(
            &format!(
                "Config already exists at {}. Overwrite?",
                config_path.display()
            ),
            false,
        )?;
        if !overwrite {
            println!("Aborted.");
            return Ok(());
        }
    }

    // 5. Write config
    let config = Config {
        catalogue,
        weights,
        default_volume: (default_volume != DEFAULT_VOLUME).then_some(default_volume),
    };

    write_config(&config_path, &config)?;

    println!();
    println!("Config written to {}", config_path.display());
    println!("Run `hrdd-risk` to score the catalogue.");

    Ok(())
}

/// Serialize a config to YAML and replace `path` atomically.
fn write_config(path: &Path, config: &Config) -> Result<()> {
    let yaml = serde_saphyr::to_string(config)
        .map_err(|e| anyhow::anyhow!("Failed to serialize config: {}", e))?;

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory {}", parent.display()))?;
    }

    let mut file = AtomicWriteFile::open(path)
        .with_context(|| format!("Failed to open config file at {}", path.display()))?;
    file.write_all(yaml.as_bytes())
        .with_context(|| format!("Failed to write config to {}", path.display()))?;
    file.commit()
        .with_context(|| format!("Failed to commit config file at {}", path.display()))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_weight_input() {
        assert_eq!(parse_weight_input("20"), Ok(20.0));
        assert_eq!(parse_weight_input(" 0 "), Ok(0.0));
        assert_eq!(parse_weight_input("100"), Ok(100.0));
        assert!(parse_weight_input("100.5").is_err());
        assert!(parse_weight_input("-1").is_err());
        assert!(parse_weight_input("abc").is_err());
        assert!(parse_weight_input("NaN").is_err());
    }

    #[test]
    fn test_parse_volume_input() {
        assert_eq!(parse_volume_input("10"), Ok(10.0));
        assert_eq!(parse_volume_input("0"), Ok(0.0));
        assert!(parse_volume_input("-5").is_err());
        assert!(parse_volume_input("inf").is_err());
    }

    #[test]
    fn test_wizard_config_serializes() {
        let config = Config {
            catalogue: Some(PathBuf::from("countries.csv")),
            weights: Some(vec![20.0, 20.0, 5.0, 10.0, 10.0]),
            default_volume: None,
        };
        let yaml = serde_saphyr::to_string(&config).unwrap();
        let parsed: Config = serde_saphyr::from_str(&yaml).unwrap();
        assert_eq!(config, parsed);
    }

    #[test]
    fn test_write_config_replaces_existing_file() {
        let dir = std::env::temp_dir().join("hrdd_risk_test_init_write");
        let _ = std::fs::remove_dir_all(&dir);
        let path = dir.join("nested").join("config.yaml");

        let first = Config {
            catalogue: Some(PathBuf::from("old.csv")),
            weights: None,
            default_volume: Some(3.0),
        };
        write_config(&path, &first).unwrap();
        assert_eq!(crate::config::load_config(Some(path.clone())).unwrap(), first);

        let second = Config {
            catalogue: Some(PathBuf::from("new.csv")),
            weights: Some(vec![1.0, 2.0, 3.0, 4.0, 5.0]),
            default_volume: None,
        };
        write_config(&path, &second).unwrap();
        assert_eq!(crate::config::load_config(Some(path.clone())).unwrap(), second);

        // Only the committed file remains; no temporary siblings are left behind
        let entries: Vec<_> = std::fs::read_dir(path.parent().unwrap())
            .unwrap()
            .collect();
        assert_eq!(entries.len(), 1);

        let _ = std::fs::remove_dir_all(&dir);
    }
}
