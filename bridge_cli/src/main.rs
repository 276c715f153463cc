//! # Slab Bridge Design CLI
//!
//! Command-line front end for `bridge_core`: run a saved `.sbd` project
//! through the design pipeline, validate it, or scaffold new projects and
//! configuration files.
//!
//! ```text
//! bridge_cli template kherwara -o kherwara.sbd
//! bridge_cli run kherwara.sbd
//! bridge_cli run kherwara.sbd --config office.json --json
//! ```

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing::{info, warn};

use bridge_core::file_io::{load_config, load_project, save_config, save_project, PROJECT_EXTENSION};
use bridge_core::{pipeline, BridgeProject, CalcResult, DesignConfig, DesignReport, Template};

#[derive(Parser)]
#[command(name = "bridge_cli")]
#[command(about = "Slab bridge design - hydraulics, stability, foundations and estimate", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the full design for a project
    Run {
        /// Path to the .sbd project file
        project_path: PathBuf,
        /// Configuration file overriding the project's own configuration
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Print the full JSON report instead of the text summary
        #[arg(long)]
        json: bool,
    },
    /// Check a project file without running the design
    Validate {
        /// Path to the .sbd project file
        project_path: PathBuf,
    },
    /// Create a project from a built-in template (uit, chittorgarh, kherwara)
    Template {
        /// Template name
        name: Template,
        /// Output project path
        #[arg(short, long)]
        output: PathBuf,
        /// Responsible engineer
        #[arg(long, default_value = "")]
        engineer: String,
        /// Job number
        #[arg(long, default_value = "")]
        job_id: String,
        /// Client
        #[arg(long, default_value = "")]
        client: String,
    },
    /// Write the default design configuration
    Config {
        /// Output path (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn main() -> ExitCode {
    // stdout carries the report, logs go to stderr
    tracing_subscriber::fmt().with_writer(std::io::stderr).init();

    let cli = Cli::parse();

    let outcome = match cli.command {
        Commands::Run {
            project_path,
            config,
            json,
        } => cmd_run(&project_path, config.as_deref(), json),
        Commands::Validate { project_path } => cmd_validate(&project_path),
        Commands::Template {
            name,
            output,
            engineer,
            job_id,
            client,
        } => cmd_template(name, &output, engineer, job_id, client),
        Commands::Config { output } => cmd_config(output.as_deref()),
    };

    match outcome {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {}", e);
            if let Ok(json) = serde_json::to_string_pretty(&e) {
                eprintln!();
                eprintln!("Error JSON:");
                eprintln!("{}", json);
            }
            ExitCode::FAILURE
        }
    }
}

fn cmd_run(project_path: &Path, config_path: Option<&Path>, json: bool) -> CalcResult<ExitCode> {
    let project = load_project(project_path)?;
    let config = match config_path {
        Some(path) => {
            info!(path = %path.display(), "using configuration file");
            load_config(path)?
        }
        None => project.config.clone(),
    };
    info!(
        path = %project_path.display(),
        bridge = %project.input.project.bridge_name,
        "running design"
    );

    let report = pipeline::run(&project.input, &config)?;
    if report.passes() {
        info!(fingerprint = %report.fingerprint, "design passes");
    } else {
        warn!(
            failures = report.design_status.failures().len(),
            fingerprint = %report.fingerprint,
            "design has failing checks"
        );
    }

    if json {
        let text = serde_json::to_string_pretty(&report).map_err(|e| {
            bridge_core::CalcError::SerializationError {
                reason: e.to_string(),
            }
        })?;
        println!("{}", text);
    } else {
        print_summary(&project, &report);
    }

    Ok(if report.passes() {
        ExitCode::SUCCESS
    } else {
        ExitCode::from(2)
    })
}

fn cmd_validate(project_path: &Path) -> CalcResult<ExitCode> {
    let project = load_project(project_path)?;
    project.config.validate()?;
    project.input.validate()?;
    info!(path = %project_path.display(), version = %project.meta.version, "project is valid");

    println!(
        "[OK] {} ({}) - schema {}",
        project.input.project.bridge_name,
        project_path.display(),
        project.meta.version
    );
    Ok(ExitCode::SUCCESS)
}

fn cmd_template(
    template: Template,
    output: &Path,
    engineer: String,
    job_id: String,
    client: String,
) -> CalcResult<ExitCode> {
    let output = match output.extension() {
        Some(_) => output.to_path_buf(),
        None => output.with_extension(PROJECT_EXTENSION),
    };
    let project = template.project(engineer, job_id, client);
    save_project(&project, &output)?;
    info!(template = %template, path = %output.display(), "project created");

    println!("Created {} from the {} template", output.display(), template);
    println!("  {}", template.description());
    Ok(ExitCode::SUCCESS)
}

fn cmd_config(output: Option<&Path>) -> CalcResult<ExitCode> {
    let config = DesignConfig::default();
    match output {
        Some(path) => {
            save_config(&config, path)?;
            info!(path = %path.display(), edition = %config.constants.edition, "configuration written");
            println!("Wrote default configuration to {}", path.display());
        }
        None => {
            let text = serde_json::to_string_pretty(&config).map_err(|e| {
                bridge_core::CalcError::SerializationError {
                    reason: e.to_string(),
                }
            })?;
            println!("{}", text);
        }
    }
    Ok(ExitCode::SUCCESS)
}

fn print_summary(project: &BridgeProject, report: &DesignReport) {
    let params = &report.project;

    println!("═══════════════════════════════════════");
    println!("  {}", params.bridge_name.to_uppercase());
    println!("═══════════════════════════════════════");
    println!();
    println!("Project:");
    println!("  Job:      {} ({})", project.meta.job_id, project.meta.client);
    println!("  Engineer: {}", project.meta.engineer);
    println!(
        "  Spans:    {} x {:.2} m, width {:.2} m",
        params.num_spans, params.effective_span_m, params.bridge_width_m
    );
    println!("  Code:     {}", report.constants_edition);
    println!();

    let h = &report.hydraulics;
    println!("Hydraulics:");
    println!("  Q = {:.2} cumec, V = {:.3} m/s", h.discharge_cumecs, h.design_velocity_m_s);
    println!("  Regime width = {:.2} m", h.regime_width_m);
    println!(
        "  Afflux:   {:.3} m (limit {:.3} m) {}",
        h.afflux_m,
        h.allowable_afflux_m,
        status_icon(h.afflux_ok)
    );
    println!();

    let s = &report.scour;
    println!("Scour:");
    println!(
        "  Normal {:.2} m, design {:.2} m",
        s.normal_scour_depth_m, s.design_scour_depth_m
    );
    println!(
        "  Founding: {:.3} m provided vs {:.3} m required {}",
        s.provided_foundation_level_m,
        s.required_foundation_level_m,
        status_icon(s.foundation_adequate)
    );
    println!();

    let loads = &report.loads;
    println!("Pier loads:");
    println!("  Dead load = {:.1} kN", loads.total_dead_load_kn);
    println!(
        "  Live load = {:.1} kN ({}, impact {:.3})",
        loads.live_load.total_kn,
        loads.live_load.irc_class.display_name(),
        loads.live_load.impact_factor
    );
    println!(
        "  Governing: {} = {:.1} kN",
        loads.governing.combination.name, loads.governing.value_kn
    );
    println!();

    let st = &report.pier_stability;
    println!("Pier stability:");
    println!(
        "  Overturning: {:.2} (min {:.2}, {}) {}",
        st.overturning_sf,
        st.min_overturning_sf,
        st.critical_overturning_combination,
        status_icon(st.overturning_ok)
    );
    println!(
        "  Sliding:     {:.2} (min {:.2}, {}) {}",
        st.sliding_sf,
        st.min_sliding_sf,
        st.critical_sliding_combination,
        status_icon(st.sliding_ok)
    );
    println!();

    let f = &report.foundation;
    println!("Pier footing:");
    println!(
        "  {:.2} m x {:.2} m ({:?}, {} iteration(s))",
        f.length_m, f.width_m, f.mode, f.iterations
    );
    println!(
        "  Pressure: {:.1} / {:.1} kN/m² (SBC {:.0}) {}",
        f.max_pressure_kn_m2,
        f.min_pressure_kn_m2,
        f.safe_bearing_capacity_kn_m2,
        status_icon(f.bearing_ok)
    );
    if f.area_in_tension {
        println!("  Tension area: {:.2} m² ({:.1}%)", f.tension_area_m2, f.tension_fraction * 100.0);
    }
    println!();

    println!("Abutments:");
    for design in [&report.abutments.battered, &report.abutments.cantilever] {
        println!(
            "  {:<18} SF_ot {:.2}, SF_sl {:.2}, σmax {:.1} kN/m² {}",
            design.variant.display_name(),
            design.overturning_sf,
            design.sliding_sf,
            design.bearing.max_pressure_kn_m2,
            status_icon(design.passes())
        );
    }
    let summary = &report.abutments.summary;
    println!(
        "  Cost (2 nos): battered ₹{:.0}, cantilever ₹{:.0}",
        summary.battered_cost, summary.cantilever_cost
    );
    println!(
        "  Recommended: {} by load, {} by cost (selected: {})",
        summary.recommended.display_name(),
        summary.economical.display_name(),
        summary.selected.display_name()
    );
    println!();

    let r = &report.reinforcement;
    println!("Reinforcement:");
    for schedule in &r.schedules {
        println!(
            "  {:<14} {} nos {}φ @ {:.0} mm, {:.0} kg",
            schedule.component.description(),
            schedule.bar_count,
            schedule.bar_diameter_mm,
            schedule.spacing_mm,
            schedule.total_weight_kg
        );
    }
    println!("  Total steel = {:.0} kg", r.total_weight_kg);
    println!();

    let e = &report.estimate;
    println!("Estimate:");
    for share in &e.distribution {
        println!(
            "  {:<22} ₹{:>14.0} ({:.1}%)",
            share.component.description(),
            share.amount,
            share.percent
        );
    }
    println!("  Total cost = ₹{:.0} (₹{:.0}/m²)", e.total_cost, e.cost_per_m2);
    println!();

    println!("═══════════════════════════════════════");
    println!("  RESULT: {}", if report.passes() { "PASS" } else { "FAIL" });
    for failure in report.design_status.failures() {
        println!("  [FAIL] {} - {}: {}", failure.stage, failure.check, failure.detail);
    }
    println!("═══════════════════════════════════════");
    println!("  Fingerprint: {}", report.fingerprint);
}

fn status_icon(pass: bool) -> &'static str {
    if pass { "[OK]" } else { "[FAIL]" }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env::temp_dir;

    #[test]
    fn test_template_then_validate() {
        let path = temp_dir().join(format!("bridge_cli_test_{}", std::process::id()));
        assert!(cmd_template(Template::Kherwara, &path, "Engineer".into(), "SB-9".into(), "PWD".into()).is_ok());

        let saved = path.with_extension(PROJECT_EXTENSION);
        assert!(saved.exists());
        assert!(cmd_validate(&saved).is_ok());
        assert_eq!(load_project(&saved).unwrap().meta.job_id, "SB-9");

        let _ = std::fs::remove_file(&saved);
    }

    #[test]
    fn test_validate_missing_project_fails() {
        let err = cmd_validate(Path::new("/nonexistent/bridge.sbd")).unwrap_err();
        assert_eq!(err.error_code(), "FILE_ERROR");
    }
}
