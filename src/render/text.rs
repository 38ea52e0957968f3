//! Terminal output for the page.

use super::{Badge, ClientRow, DisplaySlot, RenderedDetail};
use crate::constants::CLIENT_COLUMNS;
use crate::page::{Page, StatusKind};
use colored::*;
use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{Attribute, Cell, Color, ContentArrangement, Table};

/// Render the page for a terminal
pub fn render_page(page: &Page) -> String {
    let mut out = String::new();

    if !page.status().is_empty() {
        let status = match page.status_kind() {
            StatusKind::Info => page.status().normal(),
            StatusKind::Warning => page.status().yellow(),
            StatusKind::Error => page.status().bright_red().bold(),
        };
        out.push_str(&format!("{}\n", status));
    }

    if let Some(results) = page.results() {
        out.push_str(&render_results(results));
    }

    out
}

fn render_results(results: &RenderedDetail) -> String {
    let mut summary = slot_table(&results.slots);
    summary.add_row(vec![Cell::new("Estado"), badge_cell(&results.badge)]);

    format!(
        "{}\n{summary}\n\n{}\n{}\n\n{}\n{}\n",
        "Transformador".bright_green().bold(),
        "Ubicación y equipo".bright_green().bold(),
        slot_table(&results.equipment),
        "Clientes".bright_green().bold(),
        client_table(&results.client_rows),
    )
}

fn new_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table
}

/// Two-column label/value table
fn slot_table(slots: &[DisplaySlot]) -> Table {
    let mut table = new_table();
    for slot in slots {
        table.add_row(vec![
            Cell::new(slot.label).fg(Color::DarkGrey),
            Cell::new(&slot.value).fg(Color::Cyan),
        ]);
    }
    table
}

fn badge_cell(badge: &Badge) -> Cell {
    let background = if badge.flagged {
        Color::Red
    } else {
        Color::Green
    };
    Cell::new(&badge.label)
        .fg(Color::White)
        .bg(background)
        .add_attribute(Attribute::Bold)
}

fn client_table(rows: &[ClientRow]) -> Table {
    let mut table = new_table();
    table.set_header(
        CLIENT_COLUMNS
            .iter()
            .map(|header| Cell::new(header).add_attribute(Attribute::Bold)),
    );

    for row in rows {
        match row {
            ClientRow::Entry(cells) => {
                table.add_row(cells.iter().map(Cell::new));
            }
            ClientRow::Placeholder { message, .. } => {
                table.add_row(vec![Cell::new(message).add_attribute(Attribute::Italic)]);
            }
        }
    }
    table
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BadgeRules;
    use crate::render::render_results as build_results;
    use serde_json::json;

    #[test]
    fn test_text_page_lists_slots_and_clients() {
        colored::control::set_override(false);

        let record = serde_json::from_value(json!({
            "CODIGO_TRANSFORMADOR": "65701527",
            "LEVANTAR_STATUS": "NO LEVANTAR",
            "TOTAL_CLIENTES": 1,
            "CLIENTES": [{"NOMBRE_CLIENTE": "MARÍA", "MEDIDOR": "99"}]
        }))
        .unwrap();
        let mut page = Page::new();
        page.show_results(build_results(&record, &BadgeRules::default()));

        let text = render_page(&page);

        assert!(text.contains("65701527"));
        assert!(text.contains("NO LEVANTAR"));

        let header = text.lines().find(|line| line.contains("Nombre")).unwrap();
        assert!(header.contains("Medidor"));
        assert!(header.find("Nombre") < header.find("Medidor"));

        let client = text.lines().find(|line| line.contains("MARÍA")).unwrap();
        assert!(client.contains("99"));
        assert!(!text.contains("No hay clientes"));
    }

    #[test]
    fn test_slot_values_line_up_across_rows() {
        colored::control::set_override(false);

        let mut page = Page::new();
        page.show_results(build_results(
            &serde_json::from_value(json!({"CODIGO_TRANSFORMADOR": "T-001"})).unwrap(),
            &BadgeRules::default(),
        ));

        let text = render_page(&page);
        let column_of = |label: &str, value: &str| {
            let line = text
                .lines()
                .find(|line| line.contains(label) && line.contains(value))
                .unwrap();
            line[..line.find(value).unwrap()].chars().count()
        };

        assert_eq!(
            column_of("Código", "T-001"),
            column_of("Potencia Nominal", "-")
        );
    }

    #[test]
    fn test_placeholder_row_in_client_table() {
        colored::control::set_override(false);

        let mut page = Page::new();
        page.show_results(build_results(&Default::default(), &BadgeRules::default()));

        let text = render_page(&page);

        assert_eq!(
            text.matches("No hay clientes registrados en este transformador.")
                .count(),
            1
        );
    }

    #[test]
    fn test_status_only_page() {
        colored::control::set_override(false);

        let mut page = Page::new();
        page.set_status(StatusKind::Error, "Error al cargar detalles del Transformador.");

        assert_eq!(
            render_page(&page),
            "Error al cargar detalles del Transformador.\n"
        );
    }
}
