use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};
use gsip_wire::{ops, MessageClass};
use serde::Serialize;

use crate::cmd::OpsArgs;
use crate::exit::{CliResult, SUCCESS};
use crate::output::{class_name, OutputFormat};

#[derive(Serialize)]
struct OpRow {
    class: &'static str,
    operation: u8,
    name: &'static str,
    payload: String,
}

fn rows() -> Vec<OpRow> {
    let mut rows = Vec::new();
    for class in [MessageClass::Command, MessageClass::Telemetry] {
        for op in 0..=ops::max_operation(class) {
            let shape = ops::shape(class, op).expect("assigned codes have shapes");
            rows.push(OpRow {
                class: class_name(class),
                operation: op,
                name: ops::name(class, op),
                payload: format!("{shape:?}"),
            });
        }
    }
    rows
}

pub fn run(_args: OpsArgs, format: OutputFormat) -> CliResult<i32> {
    let rows = rows();
    match format {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::to_string(&rows).unwrap_or_else(|_| "[]".to_string())
            );
        }
        _ => {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec!["CLASS", "OP", "NAME", "PAYLOAD"]);
            for row in &rows {
                table.add_row(vec![
                    row.class.to_string(),
                    format!("0x{:02X}", row.operation),
                    row.name.to_string(),
                    row.payload.clone(),
                ]);
            }
            println!("{table}");
        }
    }

    Ok(SUCCESS)
}
