use super::{page_header, section_heading, ReportContext, CONTENT_TOP, NO_DATA};
use crate::domain::model::Organization;
use crate::render::canvas::{Canvas, Paint};
use crate::render::fonts::Font;
use crate::render::{format, theme};

/// Registration fields ready to print.
pub(crate) struct RegistrationView {
    pub fields: Vec<(&'static str, String)>,
    pub address: Vec<String>,
    pub individuals: Vec<String>,
    pub companies: Vec<String>,
}

impl RegistrationView {
    pub fn from_organization(org: &Organization, fallback_name: &str) -> Self {
        let mut fields = vec![(
            "NAME",
            if org.nome.is_empty() {
                fallback_name.to_string()
            } else {
                org.nome.clone()
            },
        )];
        if !org.cpf.is_empty() {
            fields.push(("CPF", format::cpf(&org.cpf)));
        }
        if !org.cnpj.is_empty() {
            fields.push(("CNPJ", format::cnpj(&org.cnpj)));
        }
        if !org.telefone.is_empty() {
            fields.push(("PHONE", format::phone(&org.telefone)));
        }
        if !org.email.is_empty() {
            fields.push(("E-MAIL", org.email.clone()));
        }

        let (individuals, companies): (Vec<_>, Vec<_>) = org
            .estrutura_societaria
            .iter()
            .filter(|p| !p.nome.is_empty())
            .partition(|p| p.is_individual());

        Self {
            fields,
            address: address_lines(org),
            individuals: individuals.into_iter().map(|p| p.nome.clone()).collect(),
            companies: companies
                .into_iter()
                .map(|p| format::truncate(&p.nome, 50, 47, "..."))
                .collect(),
        }
    }

    pub fn partner_count(&self) -> usize {
        self.individuals.len() + self.companies.len()
    }
}

fn address_lines(org: &Organization) -> Vec<String> {
    let a = &org.endereco;
    if a.is_empty() {
        return Vec::new();
    }

    let join = |parts: &[&str], sep: &str| -> String {
        parts
            .iter()
            .filter(|p| !p.is_empty())
            .copied()
            .collect::<Vec<_>>()
            .join(sep)
    };

    let street = join(&[a.logradouro.as_str(), a.numero.as_str()], ", ");
    let street = join(&[street.as_str(), a.complemento.as_str()], " - ");
    let city = join(&[a.cidade.as_str(), a.estado.as_str()], " - ");
    let cep = if a.cep.is_empty() {
        String::new()
    } else {
        format!("CEP {}", format::cep(&a.cep))
    };

    [street, a.bairro.clone(), city, cep]
        .into_iter()
        .filter(|line| !line.is_empty())
        .collect()
}

pub(super) fn draw(canvas: &mut Canvas, ctx: &ReportContext) {
    page_header(canvas, "Registration Data", "Identification of the organization and its partners");
    let view = RegistrationView::from_organization(&ctx.data.organization, ctx.organization_name);

    let col_width = theme::CONTENT_WIDTH / 2.0;
    let mut y = CONTENT_TOP - 10.0;
    for (i, (label, value)) in view.fields.iter().enumerate() {
        let x = theme::MARGIN + col_width * (i % 2) as f32;
        if i > 0 && i % 2 == 0 {
            y -= 48.0;
        }
        canvas.set_fill(theme::LIGHT);
        canvas.text(x, y, Font::Bold, 10.0, label);
        canvas.set_fill(theme::PRIMARY);
        let size = if i == 0 { 16.0 } else { 14.0 };
        let shown = format::truncate(value, 34, 31, "...");
        canvas.text(x, y - 18.0, Font::Regular, size, &shown);
    }
    y -= 60.0;

    canvas.set_fill(theme::LIGHT);
    canvas.text(theme::MARGIN, y, Font::Bold, 10.0, "BUSINESS ADDRESS");
    canvas.set_fill(theme::SECONDARY);
    if view.address.is_empty() {
        canvas.text(theme::MARGIN, y - 18.0, Font::Oblique, 12.0, NO_DATA);
        y -= 18.0;
    }
    for line in &view.address {
        y -= 18.0;
        canvas.text(theme::MARGIN, y, Font::Regular, 12.0, line);
    }

    y -= 50.0;
    section_heading(canvas, y, "Ownership Structure");
    canvas.fill_rect(theme::MARGIN, y - 10.0, 60.0, 2.0, theme::PRIMARY);
    y -= 36.0;

    for (title, names) in [("INDIVIDUALS", &view.individuals), ("COMPANIES", &view.companies)] {
        if names.is_empty() {
            continue;
        }
        canvas.set_fill(theme::PRIMARY);
        canvas.text(theme::MARGIN, y, Font::Bold, 11.0, title);
        y -= 20.0;
        for name in names.iter() {
            canvas.set_fill(theme::TERTIARY);
            canvas.circle(theme::MARGIN + 10.0, y + 3.5, 2.5, Paint::Fill);
            canvas.text(theme::MARGIN + 22.0, y, Font::Regular, 11.0, name);
            y -= 17.0;
        }
        y -= 12.0;
    }

    let summary_y = y.max(90.0);
    canvas.set_fill(theme::BG_LIGHT);
    canvas.round_rect(theme::MARGIN, summary_y - 12.0, theme::CONTENT_WIDTH, 32.0, 4.0, Paint::Fill);
    canvas.set_fill(theme::PRIMARY);
    canvas.text(theme::MARGIN + 16.0, summary_y, Font::Bold, 16.0, &view.partner_count().to_string());
    canvas.set_fill(theme::TERTIARY);
    canvas.text(
        theme::MARGIN + 44.0,
        summary_y,
        Font::Regular,
        11.0,
        &format!(
            "partners in total  ({} individuals, {} companies)",
            view.individuals.len(),
            view.companies.len()
        ),
    );
}
