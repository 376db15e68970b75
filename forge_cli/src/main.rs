//! # Forgewright CLI
//!
//! Prompts for chamber dimensions (or takes them from flags or a saved
//! design), prints a design summary and writes the PDF build guide.
//!
//! ```text
//! forge_cli [--debug] [--json] [--config FILE] [--design FILE]
//!           [--save-design FILE] [--output DIR]
//!           [--width N] [--height N] [--length N] [--insulation N]
//!           [--doors front|front-rear|side]
//! ```
//!
//! Exit status: 0 on success, 2 when the input or configuration is invalid,
//! 1 for anything else.

use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::str::FromStr;

use chrono::Local;
use forge_core::calculations::door::DoorConfiguration;
use forge_core::calculations::geometry::ChamberInput;
use forge_core::calculations::specification::{SpecField, Specification};
use forge_core::config::ForgeConfig;
use forge_core::errors::{ForgeError, ForgeResult};
use forge_core::file_io::{load_config, load_design_with_lock_check, save_design, OutputFile};
use forge_core::pdf::{render_build_guide, RenderOptions};
use forge_core::pipeline::build;
use forge_core::project::ForgeProject;

const USAGE: &str = "\
Usage: forge_cli [OPTIONS]

Options:
  --debug              Verbose logging
  --json               Also write the specification as JSON
  --config FILE        Load policy overrides from a JSON file
  --design FILE        Load a saved .forge design
  --save-design FILE   Save the design used for this run
  --output DIR         Directory for generated files [default: .]
  --width N            Internal width (in)
  --height N           Internal height (in)
  --length N           Internal length (in)
  --insulation N       Insulation thickness (in)
  --doors KIND         front | front-rear | side
  -h, --help           Show this help";

// ============================================================================
// Arguments
// ============================================================================

#[derive(Debug, Default)]
struct Args {
    debug: bool,
    json: bool,
    help: bool,
    config: Option<PathBuf>,
    design: Option<PathBuf>,
    save_design: Option<PathBuf>,
    output: Option<PathBuf>,
    width: Option<f64>,
    height: Option<f64>,
    length: Option<f64>,
    insulation: Option<f64>,
    doors: Option<DoorConfiguration>,
}

fn parse_args(raw: impl IntoIterator<Item = String>) -> ForgeResult<Args> {
    let mut args = Args::default();
    let mut raw = raw.into_iter();

    while let Some(flag) = raw.next() {
        match flag.as_str() {
            "--debug" => args.debug = true,
            "--json" => args.json = true,
            "-h" | "--help" => args.help = true,
            "--config" => args.config = Some(PathBuf::from(value_for(&flag, raw.next())?)),
            "--design" => args.design = Some(PathBuf::from(value_for(&flag, raw.next())?)),
            "--save-design" => args.save_design = Some(PathBuf::from(value_for(&flag, raw.next())?)),
            "--output" => args.output = Some(PathBuf::from(value_for(&flag, raw.next())?)),
            "--width" => args.width = Some(number_for("internal_width_in", &value_for(&flag, raw.next())?)?),
            "--height" => args.height = Some(number_for("internal_height_in", &value_for(&flag, raw.next())?)?),
            "--length" => args.length = Some(number_for("internal_length_in", &value_for(&flag, raw.next())?)?),
            "--insulation" => args.insulation = Some(number_for("insulation_in", &value_for(&flag, raw.next())?)?),
            "--doors" => args.doors = Some(DoorConfiguration::from_str(&value_for(&flag, raw.next())?)?),
            other => return Err(ForgeError::validation("arguments", other, "Unknown option")),
        }
    }

    Ok(args)
}

fn value_for(flag: &str, value: Option<String>) -> ForgeResult<String> {
    value.ok_or_else(|| ForgeError::validation("arguments", flag, "Option requires a value"))
}

fn number_for(field: &str, text: &str) -> ForgeResult<f64> {
    text.trim()
        .parse()
        .map_err(|_| ForgeError::validation(field, text, "Not a number"))
}

// ============================================================================
// Prompts
// ============================================================================

/// Prompt for a number; an empty answer or end of input takes the default.
fn prompt_f64(field: &str, prompt: &str, default: f64) -> ForgeResult<f64> {
    match read_answer(&format!("  {prompt} [{default}]: "))? {
        Some(answer) => number_for(field, &answer),
        None => Ok(default),
    }
}

fn prompt_doors() -> ForgeResult<DoorConfiguration> {
    println!();
    println!("  Door Configuration:");
    for (i, doors) in DoorConfiguration::ALL.iter().enumerate() {
        println!("    {}. {}", i + 1, doors.label());
    }
    let Some(answer) = read_answer("  Select [1]: ")? else {
        return Ok(DoorConfiguration::FrontOnly);
    };
    answer
        .parse::<usize>()
        .ok()
        .and_then(|n| n.checked_sub(1))
        .and_then(|i| DoorConfiguration::ALL.get(i).copied())
        .map_or_else(|| DoorConfiguration::from_str(&answer), Ok)
}

fn read_answer(prompt: &str) -> ForgeResult<Option<String>> {
    print!("{prompt}");
    io::stdout()
        .flush()
        .map_err(|e| ForgeError::file_error("flush", "stdout", e.to_string()))?;

    let mut line = String::new();
    io::stdin()
        .lock()
        .read_line(&mut line)
        .map_err(|e| ForgeError::file_error("read", "stdin", e.to_string()))?;

    let answer = line.trim();
    Ok((!answer.is_empty()).then(|| answer.to_string()))
}

/// Fill in the chamber input: flags win over the design file, prompts cover the rest.
fn chamber_input(args: &Args, saved: Option<ChamberInput>) -> ForgeResult<ChamberInput> {
    let interactive = saved.is_none()
        && [args.width, args.height, args.length, args.insulation]
            .iter()
            .any(Option::is_none);
    if interactive {
        println!("Enter your desired INTERNAL chamber dimensions.");
        println!("(Press Enter to accept default values shown in brackets)");
        println!();
    }

    let from_saved = |pick: fn(&ChamberInput) -> f64| saved.as_ref().map(pick);

    let internal_width_in = match args.width.or_else(|| from_saved(|s| s.internal_width_in)) {
        Some(v) => v,
        None => prompt_f64("internal_width_in", "Internal Width  (inches)", 6.0)?,
    };
    let internal_height_in = match args.height.or_else(|| from_saved(|s| s.internal_height_in)) {
        Some(v) => v,
        None => prompt_f64("internal_height_in", "Internal Height (inches)", 6.0)?,
    };
    let internal_length_in = match args.length.or_else(|| from_saved(|s| s.internal_length_in)) {
        Some(v) => v,
        None => prompt_f64("internal_length_in", "Internal Length (inches)", 14.0)?,
    };
    let insulation_in = match args.insulation.or_else(|| from_saved(|s| s.insulation_in)) {
        Some(v) => v,
        None => prompt_f64("insulation_in", "Insulation Thickness (inches)", 2.0)?,
    };
    let door_configuration = match args.doors.or_else(|| saved.as_ref().map(|s| s.door_configuration)) {
        Some(doors) => doors,
        None if interactive => prompt_doors()?,
        None => DoorConfiguration::FrontOnly,
    };

    Ok(ChamberInput {
        internal_width_in,
        internal_height_in,
        internal_length_in,
        insulation_in,
        door_configuration,
    })
}

// ============================================================================
// Run
// ============================================================================

fn user_id() -> String {
    std::env::var("USER")
        .or_else(|_| std::env::var("USERNAME"))
        .unwrap_or_else(|_| "forgewright".to_string())
}

fn print_summary(spec: &Specification) {
    let line = |label: &str, text: String| println!("   {label:<19}{text}");

    println!();
    println!("{}", "=".repeat(60));
    println!("   FORGE DESIGN SUMMARY");
    println!("{}", "=".repeat(60));
    line("Chamber Volume:", spec.value(SpecField::Volume).to_string());
    line("External Size:", spec.geometry.summary());
    line(
        "Ribbon Burner:",
        format!("{} holes, {} long", spec.burner.hole_count, spec.value(SpecField::BurnerLength)),
    );
    line(
        "Blower Required:",
        format!("{} @ {}", spec.value(SpecField::RecommendedCfm), spec.value(SpecField::StaticPressure)),
    );
    line(
        "Refractory:",
        format!("{} bags {}", spec.refractory.bags, spec.refractory.product),
    );
    line("Ceramic Blanket:", spec.value(SpecField::BlanketArea).to_string());
    line("Estimated Cost:", spec.value(SpecField::EstimatedCost).to_string());
    println!("{}", "=".repeat(60));
}

fn write_output(path: &Path, bytes: &[u8]) -> ForgeResult<PathBuf> {
    let mut out = OutputFile::create(path, user_id())?;
    out.write_all(bytes)?;
    out.commit()
}

fn run(args: &Args) -> ForgeResult<()> {
    let mut config = match &args.config {
        Some(path) => Some(load_config(path)?),
        None => None,
    };

    let mut saved = None;
    if let Some(path) = &args.design {
        let (project, lock) = load_design_with_lock_check(path)?;
        if let Some(lock) = lock {
            tracing::warn!(path = %path.display(), holder = %lock.user_id, "design is open elsewhere");
        }
        tracing::info!(path = %path.display(), builder = %project.meta.builder, "loaded design");
        config.get_or_insert(project.config);
        saved = Some(project.input);
    }
    let config = config.unwrap_or_default();

    let input = chamber_input(args, saved)?;
    tracing::debug!(?input, "chamber input");

    println!();
    println!("[*] Calculating forge specifications...");
    let package = build(&input, &config)?;
    let spec = &package.specification;
    print_summary(spec);

    for degraded in &package.diagrams.degraded {
        println!("[!] {degraded}");
    }

    let output_dir = args.output.clone().unwrap_or_else(|| PathBuf::from("."));
    let volume = spec.geometry.volume_ci.round();

    if let Some(path) = &args.save_design {
        save_design(&ForgeProject::new(user_id(), input, config.clone()), path)?;
        println!("[*] Design saved to: {}", path.display());
    }

    if args.json {
        let json = serde_json::to_string_pretty(&spec.export_map())
            .map_err(|e| ForgeError::SerializationError { reason: e.to_string() })?;
        let written = write_output(&output_dir.join(format!("forge_specs_{volume}ci.json")), json.as_bytes())?;
        println!("[*] Specs exported to: {}", written.display());
    }

    println!("[*] Generating PDF build guide...");
    let options = RenderOptions::new(Local::now().date_naive(), &config.layout);
    let pdf = render_build_guide(&package.document, &package.diagrams, &options)?;
    let written = write_output(&output_dir.join(format!("Forge_Build_Guide_{volume}ci.pdf")), &pdf)?;

    println!();
    println!("[SUCCESS] Build guide generated: {}", written.display());
    Ok(())
}

fn main() -> ExitCode {
    let args = match parse_args(std::env::args().skip(1)) {
        Ok(args) => args,
        Err(e) => {
            eprintln!("Error: {e}");
            eprintln!();
            eprintln!("{USAGE}");
            return ExitCode::from(2);
        }
    };
    if args.help {
        println!("{USAGE}");
        return ExitCode::SUCCESS;
    }

    forge_core::logging::init(args.debug);

    println!("{}", "=".repeat(70));
    println!("   FORGEWRIGHT - Ribbon Burner Forge Designer");
    println!("{}", "=".repeat(70));
    println!();

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!();
            eprintln!("[ERROR] {e}");
            if args.json {
                if let Ok(json) = serde_json::to_string_pretty(&e) {
                    eprintln!("{json}");
                }
            }
            tracing::debug!(code = e.error_code(), "run failed");
            if e.is_validation() {
                ExitCode::from(2)
            } else {
                ExitCode::from(1)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> ForgeResult<Args> {
        parse_args(list.iter().map(|s| s.to_string()))
    }

    #[test]
    fn test_parse_full_flags() {
        let parsed = args(&[
            "--debug", "--json", "--width", "7", "--height", "8", "--length", "14",
            "--insulation", "2", "--doors", "front-rear", "--output", "out",
        ])
        .unwrap();
        assert!(parsed.debug && parsed.json);
        assert_eq!(parsed.width, Some(7.0));
        assert_eq!(parsed.length, Some(14.0));
        assert_eq!(parsed.doors, Some(DoorConfiguration::FrontAndRear));
        assert_eq!(parsed.output, Some(PathBuf::from("out")));
    }

    #[test]
    fn test_bad_number_is_validation() {
        let err = args(&["--width", "wide"]).unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn test_missing_value_and_unknown_flag() {
        assert!(args(&["--height"]).unwrap_err().is_validation());
        assert!(args(&["--colour", "red"]).unwrap_err().is_validation());
    }

    #[test]
    fn test_flags_override_saved_design() {
        let saved = ChamberInput {
            internal_width_in: 7.0,
            internal_height_in: 8.0,
            internal_length_in: 14.0,
            insulation_in: 2.0,
            door_configuration: DoorConfiguration::SideLoading,
        };
        let parsed = args(&["--length", "18"]).unwrap();
        let input = chamber_input(&parsed, Some(saved)).unwrap();
        assert_eq!(input.internal_length_in, 18.0);
        assert_eq!(input.internal_width_in, 7.0);
        assert_eq!(input.door_configuration, DoorConfiguration::SideLoading);
    }

    #[test]
    fn test_all_flags_need_no_prompt() {
        let parsed = args(&["--width", "6", "--height", "6", "--length", "12", "--insulation", "1"]).unwrap();
        let input = chamber_input(&parsed, None).unwrap();
        assert_eq!(input.door_configuration, DoorConfiguration::FrontOnly);
        assert_eq!(input.insulation_in, 1.0);
    }
}
