use super::{page_header, value_cells, year_columns, ReportContext, CONTENT_TOP, NO_DATA};
use crate::domain::model::DreRow;
use crate::render::canvas::Canvas;
use crate::render::charts::{self, Row, RowStyle};
use crate::render::fonts::Font;
use crate::render::{format, theme};

/// Income statement laid out by year.
pub(crate) struct IncomeStatement {
    /// Display headers (`21/22`), one per year.
    pub years: Vec<String>,
    pub rows: Vec<Row>,
}

type Field = fn(&DreRow) -> f64;

impl IncomeStatement {
    pub fn from_rows(dre: &[DreRow]) -> Self {
        let mut by_year: Vec<&DreRow> = dre.iter().filter(|r| !r.ano.is_empty()).collect();
        by_year.sort_by(|a, b| a.ano.cmp(&b.ano));

        let sections: [(&str, &str, Field, bool); 10] = [
            ("Gross operating revenue", "Total gross revenue", |r: &DreRow| r.receita_bruta, false),
            ("(-) Sales taxes", "(-) Total taxes and deductions", |r: &DreRow| r.deducoes, false),
            ("Net operating revenue", "Total net revenue", |r: &DreRow| r.receita_liquida, true),
            ("Costs", "Total costs", |r: &DreRow| r.custos_vendas, false),
            ("Gross profit", "Total gross profit", |r: &DreRow| r.lucro_bruto, true),
            ("Operating expenses", "Total operating expenses", |r: &DreRow| r.despesas_operacionais, false),
            ("EBITDA", "Total EBITDA", |r: &DreRow| r.lucro_operacional, true),
            ("Financial result", "Total financial result", |r: &DreRow| r.resultado_financeiro, false),
            ("Profit before income tax", "Total profit before tax", |r: &DreRow| r.lucro_antes_impostos, true),
            ("", "Income taxes", |r: &DreRow| r.impostos, false),
        ];

        let mut rows = Vec::new();
        for (title, label, field, highlight) in sections {
            if !title.is_empty() {
                rows.push(Row::section(title));
            }
            let style = if highlight {
                RowStyle::Highlight
            } else {
                RowStyle::Normal
            };
            rows.push(Row::new(value_cells(label, by_year.iter().map(|r| field(r))), style));
        }

        rows.push(Row::new(
            value_cells("NET PROFIT", by_year.iter().map(|r| r.lucro_liquido)),
            RowStyle::Total,
        ));

        let margins = std::iter::once("Net margin (%)".to_string())
            .chain(by_year.iter().map(|r| {
                if r.receita_bruta > 0.0 {
                    format!("{:.1}%", r.net_margin())
                } else {
                    "-".to_string()
                }
            }))
            .collect();
        rows.push(Row::new(margins, RowStyle::Total));

        Self {
            years: by_year.iter().map(|r| format::season_from_year(&r.ano)).collect(),
            rows,
        }
    }
}

pub(super) fn draw(canvas: &mut Canvas, ctx: &ReportContext) {
    page_header(
        canvas,
        "Income Statement",
        "Statement of results for each season",
    );
    let statement = IncomeStatement::from_rows(&ctx.data.dre);

    if statement.years.is_empty() {
        canvas.set_fill(theme::LIGHTER);
        canvas.text(theme::MARGIN, CONTENT_TOP, Font::Oblique, 11.0, NO_DATA);
        return;
    }

    let columns = year_columns("Income statement", 160.0, &statement.years);
    charts::table(canvas, theme::MARGIN, CONTENT_TOP, &columns, &statement.rows, 18.0);
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_years_sorted_and_shown_as_seasons() {
        let dre: Vec<DreRow> = serde_json::from_value(json!([
            {"ano": 2022, "receita_bruta": 2000000, "lucro_liquido": 500000},
            {"ano": "2021", "receita_bruta": 0, "lucro_liquido": -1000},
            {"ano": null, "receita_bruta": 99}
        ]))
        .unwrap();

        let statement = IncomeStatement::from_rows(&dre);
        assert_eq!(statement.years, vec!["21/22", "22/23"]);

        // 9 section rows + 10 lines + net profit + margin
        assert_eq!(statement.rows.len(), 21);
        assert_eq!(statement.rows[1].cells, vec!["Total gross revenue", "-", "2.0M"]);

        let net = &statement.rows[19];
        assert_eq!(net.cells, vec!["NET PROFIT", "-1K", "500K"]);
        let margin = statement.rows.last().unwrap();
        assert_eq!(margin.cells, vec!["Net margin (%)", "-", "25.0%"]);
    }

    #[test]
    fn test_empty_statement() {
        let statement = IncomeStatement::from_rows(&[]);
        assert!(statement.years.is_empty());
        assert_eq!(statement.rows.len(), 21);
    }
}
