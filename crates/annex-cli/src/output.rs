//! Output formatting for the annex CLI.

use annex_core::{GraphStats, SearchHit, VectorRef};
use anyhow::Result;
use clap::ValueEnum;
use colored::Colorize;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Cell, Color, ContentArrangement, Table};
use serde_json::json;

/// Output format option
#[derive(Debug, Clone, Copy, ValueEnum, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
}

fn row_label(reference: &VectorRef) -> serde_json::Value {
    match reference.position() {
        Some(position) => json!(position),
        None => json!(reference.to_string()),
    }
}

/// Renders search hits as JSON.
pub fn hits_to_json(hits: &[SearchHit]) -> serde_json::Value {
    hits.iter()
        .map(|hit| {
            json!({
                "row": row_label(&hit.row.reference),
                "distance": hit.distance,
                "payload": hit.row.payload,
            })
        })
        .collect()
}

/// Print search hits in the specified format
pub fn print_hits(hits: &[SearchHit], format: OutputFormat) -> Result<()> {
    if format == OutputFormat::Json {
        println!("{}", serde_json::to_string_pretty(&hits_to_json(hits))?);
        return Ok(());
    }

    if hits.is_empty() {
        println!("{}", "No results.".dimmed());
        return Ok(());
    }

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(
            ["rank", "row", "distance", "payload"]
                .into_iter()
                .map(|c| Cell::new(c).fg(Color::Cyan)),
        );

    for (rank, hit) in hits.iter().enumerate() {
        let payload = hit
            .row
            .payload
            .as_ref()
            .map_or_else(String::new, serde_json::Value::to_string);
        table.add_row(vec![
            Cell::new(rank + 1),
            Cell::new(row_label(&hit.row.reference)),
            Cell::new(format!("{:.6}", hit.distance)),
            Cell::new(payload),
        ]);
    }

    println!("{table}");
    println!("{} row(s)", hits.len().to_string().green());
    Ok(())
}

/// Print per-layer graph statistics
#[allow(clippy::cast_precision_loss)]
pub fn print_stats(rows: usize, stats: &GraphStats, format: OutputFormat) -> Result<()> {
    if format == OutputFormat::Json {
        let value = json!({
            "rows": rows,
            "max_layer": stats.max_layer(),
            "layers": stats.layers,
        });
        println!("{}", serde_json::to_string_pretty(&value)?);
        return Ok(());
    }

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(
            ["layer", "nodes", "edges", "max degree", "avg degree"]
                .into_iter()
                .map(|c| Cell::new(c).fg(Color::Cyan)),
        );

    for layer in stats.layers.iter().rev() {
        let average = if layer.nodes == 0 {
            0.0
        } else {
            layer.edges as f64 / layer.nodes as f64
        };
        table.add_row(vec![
            Cell::new(layer.layer),
            Cell::new(layer.nodes),
            Cell::new(layer.edges),
            Cell::new(layer.max_degree),
            Cell::new(format!("{average:.2}")),
        ]);
    }

    println!("{}", "Graph Statistics".green().bold());
    println!("  Rows:       {rows}");
    match stats.max_layer() {
        Some(max_layer) => println!("  Max layer:  {max_layer}"),
        None => println!("  Max layer:  {}", "empty".dimmed()),
    }
    println!("{table}");
    Ok(())
}
