use super::{page_header, value_cells, year_columns, ReportContext, CONTENT_TOP, NO_DATA};
use crate::domain::lenient::{SeriesGroup, YearSeries};
use crate::domain::model::{self, BalanceSheet};
use crate::render::canvas::Canvas;
use crate::render::charts::{self, Row, RowStyle};
use crate::render::fonts::Font;
use crate::render::theme;

const CURRENT_LIABILITIES: [(&str, &str); 4] = [
    ("Loans and financing", "emprestimos_financiamentos_curto_prazo"),
    ("Customer advances", "adiantamentos_clientes"),
    ("Tax obligations", "impostos_taxas"),
    ("Other obligations", "outros_passivos_circulantes"),
];

const NON_CURRENT_LIABILITIES: [(&str, &str); 4] = [
    ("Loans and financing", "emprestimos_financiamentos_longo_prazo"),
    ("Land financing", "financiamentos_terras"),
    ("Leases payable", "arrendamentos"),
    ("Other obligations", "outros_passivos_nao_circulantes"),
];

const EQUITY: [(&str, &str); 3] = [
    ("Share capital", "capital_social"),
    ("Reserves", "reservas"),
    ("Retained earnings", "lucros_acumulados"),
];

pub(crate) fn balance_rows(sheet: &BalanceSheet) -> Vec<Row> {
    let years = &sheet.anos;
    let group_row = |label: &str, group: &SeriesGroup, key: &str, style: RowStyle| {
        Row::new(
            value_cells(label, years.iter().map(|y| model::lookup(group, key, y))),
            style,
        )
    };
    let series_row = |label: &str, series: &YearSeries, style: RowStyle| {
        Row::new(value_cells(label, years.iter().map(|y| model::at(series, y))), style)
    };

    let assets = &sheet.ativo;
    let liabilities = &sheet.passivo;
    let mut rows = vec![
        Row::section("ASSETS"),
        group_row("Current assets", &assets.circulante, "total", RowStyle::Normal),
        group_row("Non-current assets", &assets.nao_circulante, "total", RowStyle::Normal),
        series_row("TOTAL ASSETS", &assets.total, RowStyle::Total),
        Row::section("LIABILITIES"),
        group_row("Current liabilities", &liabilities.circulante, "total", RowStyle::Highlight),
    ];

    for (label, key) in CURRENT_LIABILITIES {
        rows.push(group_row(label, &liabilities.circulante, key, RowStyle::Normal));
    }
    rows.push(group_row(
        "Non-current liabilities",
        &liabilities.nao_circulante,
        "total",
        RowStyle::Highlight,
    ));
    for (label, key) in NON_CURRENT_LIABILITIES {
        rows.push(group_row(label, &liabilities.nao_circulante, key, RowStyle::Normal));
    }

    rows.push(Row::section("EQUITY"));
    for (label, key) in EQUITY {
        rows.push(group_row(label, &liabilities.patrimonio_liquido, key, RowStyle::Normal));
    }
    rows.push(group_row(
        "Total equity",
        &liabilities.patrimonio_liquido,
        "total",
        RowStyle::Highlight,
    ));
    rows.push(series_row(
        "TOTAL LIABILITIES AND EQUITY",
        &liabilities.total,
        RowStyle::Total,
    ));
    rows
}

pub(super) fn draw(canvas: &mut Canvas, ctx: &ReportContext) {
    page_header(
        canvas,
        "Balance Sheet",
        "Assets, liabilities and equity at the end of each season",
    );
    let sheet = &ctx.data.balance_sheet;

    if sheet.anos.is_empty() {
        canvas.set_fill(theme::LIGHTER);
        canvas.text(theme::MARGIN, CONTENT_TOP, Font::Oblique, 11.0, NO_DATA);
        return;
    }

    let columns = year_columns("Balance sheet (R$)", 160.0, &sheet.anos);
    charts::table(canvas, theme::MARGIN, CONTENT_TOP, &columns, &balance_rows(sheet), 18.0);
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_balance_rows() {
        let sheet: BalanceSheet = serde_json::from_value(json!({
            "anos": ["2024/2025"],
            "ativo": {
                "circulante": {"total": {"2024/2025": 4000000}},
                "total": {"2024/2025": 10000000}
            },
            "passivo": {
                "nao_circulante": {"financiamentos_terras": {"2024/2025": 750000}},
                "patrimonio_liquido": {"total": {"2024/2025": 6000000}},
                "total": {"2024/2025": 10000000}
            }
        }))
        .unwrap();

        let rows = balance_rows(&sheet);
        assert_eq!(rows.len(), 21);
        assert_eq!(rows[1].cells, vec!["Current assets", "4.0M"]);
        assert_eq!(rows[2].cells, vec!["Non-current assets", "-"]);
        assert_eq!(rows[3].style, RowStyle::Total);

        let land = rows.iter().find(|r| r.cells[0] == "Land financing").unwrap();
        assert_eq!(land.cells[1], "750K");

        let last = rows.last().unwrap();
        assert_eq!(last.cells, vec!["TOTAL LIABILITIES AND EQUITY", "10.0M"]);
    }
}
