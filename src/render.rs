//! Detail record rendering.
//!
//! [`render_results`] turns a [`DetailRecord`] into display-ready values:
//! scalar slots with placeholders applied, the status badge and the client
//! table. The [`html`] and [`text`] surfaces then draw a [`Page`] holding
//! those values; neither surface ever interprets record content as markup.
//!
//! [`Page`]: crate::page::Page

pub mod html;
pub mod text;

use crate::config::BadgeRules;
use crate::constants::{COUNT_PLACEHOLDER, TEXT_PLACEHOLDER, messages};
use crate::models::{ClientEntry, DetailRecord, FieldValue};
use serde::Serialize;

/// Number of columns in the client table
pub const CLIENT_COLUMN_COUNT: usize = 7;

/// A labelled scalar value written to a fixed display slot
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DisplaySlot {
    /// Stable slot identifier (used as the HTML element id)
    pub id: &'static str,
    pub label: &'static str,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Badge {
    /// Raw status value, empty when the record has none
    pub label: String,
    pub class: String,
    /// Whether the status matched the follow-up sentinel
    pub flagged: bool,
}

/// A row of the client table; serializes as a plain cell list, or as a
/// `{message, colspan}` map for the placeholder
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ClientRow {
    Entry([String; CLIENT_COLUMN_COUNT]),
    Placeholder { message: String, colspan: usize },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderedDetail {
    pub slots: Vec<DisplaySlot>,
    pub equipment: Vec<DisplaySlot>,
    pub badge: Badge,
    pub client_rows: Vec<ClientRow>,
}

impl RenderedDetail {
    pub fn slot(&self, id: &str) -> Option<&DisplaySlot> {
        self.slots
            .iter()
            .chain(self.equipment.iter())
            .find(|slot| slot.id == id)
    }
}

fn text_slot(id: &'static str, label: &'static str, value: &FieldValue) -> DisplaySlot {
    DisplaySlot {
        id,
        label,
        value: value.or(TEXT_PLACEHOLDER).to_string(),
    }
}

/// Build the display values for one detail record.
///
/// The client table is rebuilt from the record alone, so a previous
/// render never leaks rows into this one.
pub fn render_results(record: &DetailRecord, badge_rules: &BadgeRules) -> RenderedDetail {
    let slots = vec![
        text_slot("t_codigo", "Código", &record.code),
        text_slot("t_matricula_ct", "Matrícula CT", &record.ct_registration),
        text_slot(
            "t_matricula_trafo",
            "Matrícula Transformador",
            &record.trafo_registration,
        ),
        text_slot("t_censo", "Matrícula Censo", &record.census_registration),
        text_slot("t_direccion", "Dirección", &record.address),
        text_slot("t_potencia", "Potencia Nominal", &record.rated_power),
        DisplaySlot {
            id: "t_total_clientes",
            label: "Total Clientes",
            value: record.total_clients.or(COUNT_PLACEHOLDER).to_string(),
        },
    ];

    let equipment = vec![
        text_slot("t_latitud", "Latitud", &record.latitude),
        text_slot("t_longitud", "Longitud", &record.longitude),
        text_slot("t_modelo", "Modelo", &record.model),
        text_slot("t_tipo_ct", "Tipo CT", &record.ct_type),
        text_slot("t_tipo_conexion", "Tipo Conexión", &record.connection_type),
    ];

    let status = record.status.as_deref();
    let badge = Badge {
        label: status.unwrap_or_default().to_string(),
        class: badge_rules.class_for(status).to_string(),
        flagged: badge_rules.is_sentinel(status),
    };

    RenderedDetail {
        slots,
        equipment,
        badge,
        client_rows: client_rows(record.clients.as_deref()),
    }
}

fn client_rows(clients: Option<&[ClientEntry]>) -> Vec<ClientRow> {
    match clients {
        Some(clients) if !clients.is_empty() => clients
            .iter()
            .map(|client| ClientRow::Entry(client.cells().map(|cell| cell.or("").to_string())))
            .collect(),
        _ => vec![ClientRow::Placeholder {
            message: messages::NO_CLIENTS.to_string(),
            colspan: CLIENT_COLUMN_COUNT,
        }],
    }
}
