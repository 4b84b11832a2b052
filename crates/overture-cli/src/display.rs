//! Table rendering for CLI output.

use tabled::{Table, Tabled};

use overture_core::SpatialTable;
use overture_core::catalog::FeatureType;
use overture_core::table::WGS84_AUTHORITY_CODE;

/// Table row representation for one catalog entry.
#[derive(Tabled)]
pub struct FeatureTypeRow {
    /// Feature type name as used in queries.
    #[tabled(rename = "Type")]
    name: &'static str,
    /// Distribution theme the type is partitioned under.
    #[tabled(rename = "Theme")]
    theme: &'static str,
}

/// Renders the feature-type catalog as a table.
pub fn render_feature_types(types: &[FeatureType]) -> String {
    let rows: Vec<FeatureTypeRow> = types
        .iter()
        .map(|t| FeatureTypeRow {
            name: t.name,
            theme: t.theme,
        })
        .collect();
    Table::new(rows).to_string()
}

/// Table row representation for a fetch summary.
#[derive(Tabled)]
struct SummaryRow {
    #[tabled(rename = "Property")]
    property: &'static str,
    #[tabled(rename = "Value")]
    value: String,
}

/// Renders a one-table summary of a completed fetch.
pub fn render_fetch_summary(overture_type: &str, table: &SpatialTable) -> String {
    let rows = vec![
        SummaryRow {
            property: "Type",
            value: overture_type.to_string(),
        },
        SummaryRow {
            property: "Rows",
            value: table.num_rows().to_string(),
        },
        SummaryRow {
            property: "Columns",
            value: table.schema().fields().len().to_string(),
        },
        SummaryRow {
            property: "Geometry column",
            value: table.geometry_column_name().to_string(),
        },
        SummaryRow {
            property: "CRS",
            value: WGS84_AUTHORITY_CODE.to_string(),
        },
    ];
    Table::new(rows).to_string()
}
