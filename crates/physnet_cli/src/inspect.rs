//! `physnet inspect`: summarise a graph file.

use std::collections::BTreeMap;

use physnet_checkpoint::load_file;
use physnet_netlist::NetlistGraph;

use crate::{GlobalArgs, InspectArgs};

/// Runs the `physnet inspect` command.
pub fn run(args: &InspectArgs, _global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let graph = load_file(&args.input)?;
    if args.json {
        println!("{}", serde_json::to_string_pretty(&summary_json(&graph))?);
    } else {
        print!("{}", summary_text(&graph));
    }
    Ok(0)
}

fn summary_json(graph: &NetlistGraph) -> serde_json::Value {
    let kinds: BTreeMap<String, usize> = graph.kind_histogram();
    serde_json::json!({
        "design": graph.design_name(),
        "cells": graph.cell_count(),
        "nets": graph.net_count(),
        "sites": graph.site_count(),
        "kinds": kinds,
    })
}

fn summary_text(graph: &NetlistGraph) -> String {
    let mut out = format!(
        "design {}: {} cells, {} nets, {} sites\n",
        graph.design_name(),
        graph.cell_count(),
        graph.net_count(),
        graph.site_count()
    );
    for (kind, count) in graph.kind_histogram() {
        out.push_str(&format!("  {kind:<10} {count}\n"));
    }
    out
}
