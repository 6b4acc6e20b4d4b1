//! Helpers for rendering plans and anomalies.

use std::io::Write;

use eyre::{Context, Result};
use gherkin_wire::{Plan, PlanAnomaly, PlanNode, ResolvedStep, ScenarioProgram};
use serde_json::Value;

const INDENT: &str = "  ";

pub(crate) fn write_plan(writer: &mut dyn Write, plan: &Plan) -> Result<()> {
    write_nodes(writer, plan.nodes(), 0)?;
    let summary = plan.summary();
    writeln!(
        writer,
        "{} test(s), {} unresolved step(s), {} anomaly(ies)",
        summary.tests,
        summary.unresolved,
        plan.anomalies().len()
    )
    .wrap_err("failed to write plan summary")
}

fn write_nodes(writer: &mut dyn Write, nodes: &[PlanNode], depth: usize) -> Result<()> {
    let indent = INDENT.repeat(depth);
    for node in nodes {
        match node {
            PlanNode::Group { name, children } => {
                writeln!(writer, "{indent}{name}")
                    .wrap_err_with(|| format!("failed to write group '{name}'"))?;
                write_nodes(writer, children, depth + 1)?;
            }
            PlanNode::Background(program) => write_program(writer, "background", program, depth)?,
            PlanNode::Test(program) => write_program(writer, "test", program, depth)?,
        }
    }
    Ok(())
}

fn write_program(
    writer: &mut dyn Write,
    label: &str,
    program: &ScenarioProgram,
    depth: usize,
) -> Result<()> {
    let indent = INDENT.repeat(depth);
    let mut line = format!("{indent}{label}");
    if !program.name().is_empty() {
        line.push(' ');
        line.push_str(program.name());
    }
    if !program.fixtures().is_empty() {
        line.push_str(&format!(" {}", program.fixtures()));
    }
    writeln!(writer, "{line}")
        .wrap_err_with(|| format!("failed to write {label} '{}'", program.name()))?;
    for step in program.steps() {
        writeln!(writer, "{indent}{INDENT}{}", describe_step(step))
            .wrap_err_with(|| format!("failed to write step '{}'", step.step().label()))?;
    }
    Ok(())
}

fn describe_step(step: &ResolvedStep) -> String {
    let label = step.step().label();
    if step.anomaly().is_some() {
        return format!("{label} (anomaly)");
    }
    let Some(resolved) = step.handler() else {
        return format!("{label} (unresolved)");
    };
    let handler = resolved.handler();
    handler.location().map_or_else(
        || format!("{label} -> {}", handler.pattern()),
        |location| format!("{label} -> {} ({location})", handler.pattern()),
    )
}

pub(crate) fn write_anomalies(writer: &mut dyn Write, anomalies: &[PlanAnomaly]) -> Result<()> {
    for found in anomalies {
        writeln!(writer, "{}: {}", found.path.join(" > "), found.anomaly)
            .wrap_err("failed to write anomaly")?;
    }
    Ok(())
}

pub(crate) fn write_json(writer: &mut dyn Write, value: &Value) -> Result<()> {
    serde_json::to_writer_pretty(&mut *writer, value).wrap_err("failed to serialize JSON output")?;
    writer
        .write_all(b"\n")
        .wrap_err("failed to terminate JSON output with newline")
}
