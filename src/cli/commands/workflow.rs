//! Workflow command implementation
//!
//! Handles `contractflow workflow`: prints the lifecycle order and gates.

use anyhow::Result;
use contractflow_phases::{EntryRule, contract_lifecycle};

use super::json_emit::{WorkflowJsonOutput, emit_workflow_json};

pub fn execute_workflow_command(json: bool) -> Result<()> {
    let graph = contract_lifecycle();

    if json {
        let output = WorkflowJsonOutput::from_graph(&graph);
        println!("{}", emit_workflow_json(&output)?);
        return Ok(());
    }

    println!("Contract lifecycle:");
    for (index, phase) in graph.phases().iter().enumerate() {
        let entry = match phase.entry() {
            EntryRule::Activation => " (entered by contract activation)",
            EntryRule::Advance => "",
        };
        println!("  {}. {}{entry}", index + 1, phase.label());
        for sub in phase.sub_phases() {
            let gate = if sub.is_gated() {
                "  [gated: unanimous approval]"
            } else {
                ""
            };
            println!("     - {} ({}){gate}", sub.label(), sub.id());
        }
    }

    println!();
    let order: Vec<String> = graph.leaves().into_iter().map(ToString::to_string).collect();
    println!("Advance order: {}", order.join(" → "));
    Ok(())
}
