//! Blueprint presentation: one table row per primitive.

use super::shared::format_section_heading;
use crate::types::BlueprintPart;
use comfy_table::presets::UTF8_BORDERS_ONLY;
use comfy_table::Table;

fn format_vector(v: &[f64; 3]) -> String {
    format!("{:.2}, {:.2}, {:.2}", v[0], v[1], v[2])
}

pub fn format_blueprint_text(parts: &[BlueprintPart]) -> String {
    let mut out = String::new();
    out.push_str(&format!("{}\n\n", format_section_heading("Blueprint")));
    if parts.is_empty() {
        out.push_str("No parts generated.\n");
        return out;
    }

    let mut table = Table::new();
    table.load_preset(UTF8_BORDERS_ONLY);
    table.set_header(vec!["Id", "Name", "Type", "Position", "Rotation", "Scale", "Color"]);
    for part in parts {
        table.add_row(vec![
            part.id.clone(),
            part.name.clone(),
            part.primitive.as_str().to_string(),
            format_vector(&part.position),
            format_vector(&part.rotation),
            format_vector(&part.scale),
            part.color.clone(),
        ]);
    }
    out.push_str(&format!("{}\n", table));
    out.push_str(&format!("{} part(s)", parts.len()));
    out
}
