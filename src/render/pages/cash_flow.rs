use super::{page_header, value_cells, year_columns, ReportContext, CONTENT_TOP, NO_DATA};
use crate::domain::lenient::{SeriesGroup, YearSeries};
use crate::domain::model::{self, CashFlowProjection};
use crate::render::canvas::Canvas;
use crate::render::charts::{self, Row, RowStyle};
use crate::render::fonts::Font;
use crate::render::theme;

const TOTAL_BY_YEAR: &str = "total_por_ano";

enum Line<'a> {
    Group(&'a SeriesGroup, &'static str),
    GrossMargin,
}

/// Table rows grouped by section, closing with the net and accumulated flow.
pub(crate) fn cash_flow_rows(flow: &CashFlowProjection) -> Vec<Row> {
    let years = &flow.anos;
    let sections: [(&str, Vec<(&str, Line)>); 5] = [
        (
            "Agricultural revenue",
            vec![("Total agricultural revenue", Line::Group(&flow.receitas_agricolas, TOTAL_BY_YEAR))],
        ),
        (
            "Agricultural expenses",
            vec![
                ("Total agricultural expenses", Line::Group(&flow.despesas_agricolas, TOTAL_BY_YEAR)),
                ("Agricultural gross margin", Line::GrossMargin),
            ],
        ),
        (
            "Other expenses",
            vec![
                ("Leases", Line::Group(&flow.outras_despesas, "arrendamento")),
                ("Owner's draw", Line::Group(&flow.outras_despesas, "pro_labore")),
                ("Profit sharing", Line::Group(&flow.outras_despesas, "divisao_lucros")),
                ("Financial", Line::Group(&flow.outras_despesas, "financeiras")),
                ("Taxes", Line::Group(&flow.outras_despesas, "tributarias")),
                ("Other", Line::Group(&flow.outras_despesas, "outras")),
                ("Total other expenses", Line::Group(&flow.outras_despesas, TOTAL_BY_YEAR)),
            ],
        ),
        (
            "Investments",
            vec![
                ("Land", Line::Group(&flow.investimentos, "terras")),
                ("Machinery", Line::Group(&flow.investimentos, "maquinarios")),
                ("Other", Line::Group(&flow.investimentos, "outros")),
                ("Total investments", Line::Group(&flow.investimentos, "total")),
            ],
        ),
        (
            "Financing",
            vec![
                ("Debt service", Line::Group(&flow.financeiras, "servico_divida")),
                ("Bank payments", Line::Group(&flow.financeiras, "pagamentos_bancos")),
                ("New credit lines", Line::Group(&flow.financeiras, "novas_linhas_credito")),
                ("Total financing", Line::Group(&flow.financeiras, TOTAL_BY_YEAR)),
            ],
        ),
    ];

    let mut rows = Vec::new();
    for (title, lines) in sections {
        rows.push(Row::section(title));
        for (label, line) in lines {
            let values = years.iter().map(|year| match &line {
                Line::Group(group, key) => model::lookup(group, key, year),
                Line::GrossMargin => {
                    model::lookup(&flow.receitas_agricolas, TOTAL_BY_YEAR, year)
                        - model::lookup(&flow.despesas_agricolas, TOTAL_BY_YEAR, year)
                }
            });
            let style = if label.starts_with("Total") {
                RowStyle::Highlight
            } else {
                RowStyle::Normal
            };
            rows.push(Row::new(value_cells(label, values), style));
        }
    }

    let closing = |label: &str, series: &YearSeries| {
        Row::new(
            value_cells(label, years.iter().map(|y| model::at(series, y))),
            RowStyle::Total,
        )
    };
    rows.push(closing("Final cash flow", &flow.fluxo_liquido));
    rows.push(closing("Accumulated cash flow", &flow.fluxo_acumulado));
    rows
}

pub(super) fn draw(canvas: &mut Canvas, ctx: &ReportContext) {
    page_header(
        canvas,
        "Projected Cash Flow",
        "Detailed projection of inflows and outflows per season",
    );
    let flow = &ctx.data.cash_flow;

    if flow.anos.is_empty() {
        canvas.set_fill(theme::LIGHTER);
        canvas.text(theme::MARGIN, CONTENT_TOP, Font::Oblique, 11.0, NO_DATA);
        return;
    }

    let columns = year_columns("Cash flow (R$)", 140.0, &flow.anos);
    charts::table(canvas, theme::MARGIN, CONTENT_TOP, &columns, &cash_flow_rows(flow), 16.0);
}
