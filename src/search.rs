//! Extraction of series metadata from the SGS public search page.
//!
//! The page renders results as an HTML table with id `tabelaSeries`:
//! a header row, then one row per series whose cells 1..=8 hold
//! code, name, unit, frequency, start, end, source and the "special" flag.

use crate::error::{Error, Result};
use crate::models::{Language, SearchQuery, SeriesMetadata};
use scraper::{ElementRef, Html, Selector};
use std::sync::LazyLock;

static ROW_SEL: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("table#tabelaSeries tr").expect("valid row selector"));
static CELL_SEL: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("td").expect("valid cell selector"));

/// Path of the landing page that hands out the session cookie.
pub(crate) fn landing_path(language: Language) -> &'static str {
    match language {
        Language::Pt => "index.jsp?idIdioma=P",
        Language::En => "",
    }
}

pub(crate) const SEARCH_PATH: &str = "localizarseries/localizarSeries.do";

/// Form fields for the search POST. Fields the page leaves blank are not sent.
pub(crate) fn form_params(query: &SearchQuery) -> Vec<(&'static str, String)> {
    let (method, key, value, kind) = match query {
        SearchQuery::Code(c) => ("localizarSeriesPorCodigo", "codigo", c.to_string(), "4"),
        SearchQuery::Text(t) => ("localizarSeriesPorTexto", "texto", t.clone(), "6"),
    };
    vec![
        ("method", method.to_string()),
        ("periodicidade", "0".to_string()),
        (key, value),
        ("fonte", "341".to_string()),
        ("hdTipoPesquisa", kind.to_string()),
        ("hdTipoOrdenacao", "0".to_string()),
        ("hdPeriodicidade", "Todas".to_string()),
        (
            "linkRetorno",
            "/sgspub/consultarvalores/telaCvsSelecionarSeries.paint".to_string(),
        ),
        (
            "linkCriarFiltros",
            "/sgspub/manterfiltros/telaMfsCriarFiltro.paint".to_string(),
        ),
    ]
}

/// Parse the result table. A page without the table yields an empty list.
pub fn parse_search_html(html: &str) -> Result<Vec<SeriesMetadata>> {
    let doc = Html::parse_document(html);

    let mut out = Vec::new();
    for row in doc.select(&ROW_SEL).skip(1) {
        let cells: Vec<String> = row.select(&CELL_SEL).map(cell_text).collect();
        if cells.is_empty() {
            continue;
        }
        if cells.len() < 9 {
            return Err(Error::format(format!(
                "search result row has {} cells, expected at least 9",
                cells.len()
            )));
        }
        let mut it = cells.into_iter().skip(1);
        let mut next = || it.next().unwrap_or_default();
        out.push(SeriesMetadata {
            code: next(),
            name: next(),
            unit: next(),
            frequency: next(),
            start_date: next(),
            end_date: next(),
            source_name: next(),
            special: next(),
        });
    }
    Ok(out)
}

/// Decoded text of a cell with whitespace (including `&nbsp;`) collapsed.
fn cell_text(cell: ElementRef<'_>) -> String {
    cell.text()
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}
