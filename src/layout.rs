// Layout Builder - static description of the dashboard page
//
// Built once from the loaded table. Only chart contents change afterwards,
// through the controller.

use crate::dataset::TransactionTable;
use chrono::NaiveDate;
use serde::Serialize;

pub const DASHBOARD_TITLE: &str = "Tablero de Ventas - Superstore";

/// Bootstrap grid columns per panel (two panels per 12-column row)
pub const PANEL_WIDTH: u8 = 6;

// Component ids shared by the page, the layout and the dispatcher
pub const LINE_GRAPH: &str = "line-graph";
pub const BAR_GRAPH: &str = "bar-graph";
pub const PIE_GRAPH: &str = "pie-graph";
pub const SCATTER_GRAPH: &str = "scatter-graph";

pub const DATE_RANGE: &str = "date-range";
pub const REGION_DROPDOWN: &str = "region-dropdown";
pub const CATEGORY_RADIO: &str = "category-radio";
pub const BG_BUTTON: &str = "bg-btn";

pub const BG_BUTTON_LABEL: &str = "Cambiar color de fondo";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardLayout {
    pub title: String,
    pub rows: Vec<Row>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Row {
    pub panels: Vec<Panel>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Panel {
    pub heading: String,
    pub graph_id: String,
    pub width: u8,
    pub control: Control,
}

/// A selectable option; label and value are the same data value
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SelectOption {
    pub label: String,
    pub value: String,
}

impl SelectOption {
    fn of(value: &str) -> Self {
        SelectOption {
            label: value.to_string(),
            value: value.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Control {
    DateRange {
        id: String,
        min_date_allowed: NaiveDate,
        max_date_allowed: NaiveDate,
        start_date: NaiveDate,
        end_date: NaiveDate,
    },
    Dropdown {
        id: String,
        options: Vec<SelectOption>,
        value: String,
    },
    RadioItems {
        id: String,
        options: Vec<SelectOption>,
        value: String,
        inline: bool,
    },
    Button {
        id: String,
        label: String,
        n_clicks: u64,
    },
}

impl Control {
    pub fn id(&self) -> &str {
        match self {
            Control::DateRange { id, .. }
            | Control::Dropdown { id, .. }
            | Control::RadioItems { id, .. }
            | Control::Button { id, .. } => id.as_str(),
        }
    }
}

impl DashboardLayout {
    /// Derive the page from the table: date bounds for the picker, distinct
    /// regions and categories (first-seen order) for the selectors
    pub fn build(table: &TransactionTable) -> Self {
        let (min_date, max_date) = table.date_bounds();
        let regions = table.regions();
        let categories = table.categories();

        let line_panel = Panel {
            heading: "Gráfico de líneas: Ventas por fecha".to_string(),
            graph_id: LINE_GRAPH.to_string(),
            width: PANEL_WIDTH,
            control: Control::DateRange {
                id: DATE_RANGE.to_string(),
                min_date_allowed: min_date,
                max_date_allowed: max_date,
                start_date: min_date,
                end_date: max_date,
            },
        };

        let bar_panel = Panel {
            heading: "Gráfico de barras: Ventas por categoría".to_string(),
            graph_id: BAR_GRAPH.to_string(),
            width: PANEL_WIDTH,
            control: Control::Dropdown {
                id: REGION_DROPDOWN.to_string(),
                options: regions.iter().copied().map(SelectOption::of).collect(),
                value: regions.first().copied().unwrap_or_default().to_string(),
            },
        };

        let pie_panel = Panel {
            heading: "Gráfico de pastel: Segmento de clientes".to_string(),
            graph_id: PIE_GRAPH.to_string(),
            width: PANEL_WIDTH,
            control: Control::RadioItems {
                id: CATEGORY_RADIO.to_string(),
                options: categories.iter().copied().map(SelectOption::of).collect(),
                value: categories.first().copied().unwrap_or_default().to_string(),
                inline: true,
            },
        };

        let scatter_panel = Panel {
            heading: "Dispersión: Ventas vs Ganancias".to_string(),
            graph_id: SCATTER_GRAPH.to_string(),
            width: PANEL_WIDTH,
            control: Control::Button {
                id: BG_BUTTON.to_string(),
                label: BG_BUTTON_LABEL.to_string(),
                n_clicks: 0,
            },
        };

        DashboardLayout {
            title: DASHBOARD_TITLE.to_string(),
            rows: vec![
                Row {
                    panels: vec![line_panel, bar_panel],
                },
                Row {
                    panels: vec![pie_panel, scatter_panel],
                },
            ],
        }
    }

    pub fn panels(&self) -> impl Iterator<Item = &Panel> {
        self.rows.iter().flat_map(|row| row.panels.iter())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::Transaction;

    fn tx(date: (i32, u32, u32), region: &str, category: &str) -> Transaction {
        Transaction {
            order_date: NaiveDate::from_ymd_opt(date.0, date.1, date.2).unwrap(),
            region: region.to_string(),
            category: category.to_string(),
            sub_category: "Chairs".to_string(),
            segment: "Consumer".to_string(),
            sales: 1.0,
            profit: 0.5,
        }
    }

    fn table() -> TransactionTable {
        TransactionTable::from_records(vec![
            tx((2016, 3, 2), "South", "Technology"),
            tx((2014, 1, 3), "West", "Furniture"),
            tx((2017, 12, 30), "South", "Office Supplies"),
        ])
        .unwrap()
    }

    #[test]
    fn test_layout_structure() {
        let layout = DashboardLayout::build(&table());

        assert_eq!(layout.title, DASHBOARD_TITLE);
        assert_eq!(layout.rows.len(), 2);
        assert!(layout.rows.iter().all(|r| r.panels.len() == 2));

        let graphs: Vec<&str> = layout.panels().map(|p| p.graph_id.as_str()).collect();
        assert_eq!(graphs, vec![LINE_GRAPH, BAR_GRAPH, PIE_GRAPH, SCATTER_GRAPH]);

        let controls: Vec<&str> = layout.panels().map(|p| p.control.id()).collect();
        assert_eq!(controls, vec![DATE_RANGE, REGION_DROPDOWN, CATEGORY_RADIO, BG_BUTTON]);
    }

    #[test]
    fn test_date_range_spans_data() {
        let layout = DashboardLayout::build(&table());
        let min = NaiveDate::from_ymd_opt(2014, 1, 3).unwrap();
        let max = NaiveDate::from_ymd_opt(2017, 12, 30).unwrap();

        assert_eq!(
            layout.rows[0].panels[0].control,
            Control::DateRange {
                id: DATE_RANGE.to_string(),
                min_date_allowed: min,
                max_date_allowed: max,
                start_date: min,
                end_date: max,
            }
        );
    }

    #[test]
    fn test_selectors_default_to_first_seen_value() {
        let layout = DashboardLayout::build(&table());

        match &layout.rows[0].panels[1].control {
            Control::Dropdown { options, value, .. } => {
                assert_eq!(value, "South");
                let values: Vec<&str> = options.iter().map(|o| o.value.as_str()).collect();
                assert_eq!(values, vec!["South", "West"]);
            }
            other => panic!("expected dropdown, got {:?}", other),
        }

        match &layout.rows[1].panels[0].control {
            Control::RadioItems { value, inline, options, .. } => {
                assert_eq!(value, "Technology");
                assert!(*inline);
                assert_eq!(options.len(), 3);
            }
            other => panic!("expected radio items, got {:?}", other),
        }
    }

    #[test]
    fn test_button_starts_at_zero_and_serializes_kind() {
        let layout = DashboardLayout::build(&table());
        let value = serde_json::to_value(&layout.rows[1].panels[1].control).unwrap();

        assert_eq!(value["kind"], "button");
        assert_eq!(value["n_clicks"], 0);
        assert_eq!(value["label"], BG_BUTTON_LABEL);
    }
}
