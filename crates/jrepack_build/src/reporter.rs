use std::io::{self, Write};

use colored::Colorize;
use log::debug;

use crate::{plan::Stage, types::BuildReport};

pub fn print_plan<W: Write>(writer: &mut W, stages: &[Stage]) -> io::Result<()> {
    writeln!(
        writer,
        "{} Planned {} stages\n",
        "●".bright_blue(),
        stages.len().to_string().cyan()
    )?;
    for (i, stage) in stages.iter().enumerate() {
        writeln!(writer, "  {}. {}", i + 1, stage.to_string().bold())?;
    }
    writer.flush()?;
    Ok(())
}

pub fn print_report<W: Write>(writer: &mut W, report: &BuildReport) -> io::Result<()> {
    debug!("Printing report for {} stages", report.stages.len());
    for (i, stage) in report.stages.iter().enumerate() {
        let is_last = i == report.stages.len() - 1;
        let branch = if is_last { "└─" } else { "├─" };
        writeln!(
            writer,
            "{} {} {}",
            branch.dimmed(),
            stage.stage.to_string().bold(),
            format!("({}ms)", stage.elapsed_ms).dimmed()
        )?;
        let indent = if is_last { "   " } else { "│  " };
        for output in &stage.outputs {
            writeln!(writer, "{}{} {}", indent.dimmed(), "→".cyan(), output.display())?;
        }
    }

    if let Some(modules) = &report.modules {
        writeln!(writer, "\n{} Runtime modules: {}", "●".bright_blue(), modules.green())?;
    }
    writeln!(writer, "\n{} Build succeeded", "✓".green().bold())?;
    writer.flush()?;
    Ok(())
}

pub fn print_report_json<W: Write>(writer: &mut W, report: &BuildReport) -> io::Result<()> {
    serde_json::to_writer_pretty(&mut *writer, report)?;
    writeln!(writer)?;
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::StageReport;
    use std::path::PathBuf;

    fn sample_report() -> BuildReport {
        BuildReport {
            stages: vec![
                StageReport {
                    stage: Stage::FatJar,
                    outputs: vec![PathBuf::from("build/libs/app.jar")],
                    elapsed_ms: 12,
                },
                StageReport {
                    stage: Stage::JarDependencies,
                    outputs: vec![PathBuf::from("build/jar-dependencies/dependencies.txt")],
                    elapsed_ms: 800,
                },
            ],
            modules: Some("java.base,java.desktop".to_string()),
        }
    }

    #[test]
    fn test_print_report_lists_stages_and_outputs() {
        colored::control::set_override(false);
        let mut out = Vec::new();
        print_report(&mut out, &sample_report()).unwrap();
        let text = String::from_utf8(out).unwrap();

        assert!(text.contains("├─ fat-jar (12ms)"));
        assert!(text.contains("│  → build/libs/app.jar"));
        assert!(text.contains("└─ jar-dependencies (800ms)"));
        assert!(text.contains("Runtime modules: java.base,java.desktop"));
        assert!(text.contains("Build succeeded"));
    }

    #[test]
    fn test_json_report() {
        let mut out = Vec::new();
        print_report_json(&mut out, &sample_report()).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&out).unwrap();

        assert_eq!(value["stages"][0]["stage"], "fat-jar");
        assert_eq!(value["stages"][1]["outputs"][0], "build/jar-dependencies/dependencies.txt");
        assert_eq!(value["modules"], "java.base,java.desktop");
    }

    #[test]
    fn test_json_report_omits_missing_modules() {
        let mut out = Vec::new();
        print_report_json(&mut out, &BuildReport::default()).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert!(value.get("modules").is_none());
        assert_eq!(value["stages"], serde_json::json!([]));
    }

    #[test]
    fn test_print_plan() {
        colored::control::set_override(false);
        let mut out = Vec::new();
        print_plan(&mut out, &[Stage::FatJar, Stage::WindowsExecutable]).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("Planned 2 stages"));
        assert!(text.contains("  2. windows-executable"));
    }
}
