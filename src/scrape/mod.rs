//! Listing-page plumbing: fetch the page, flatten it to text lines,
//! cut out the window for the target state and parse the vacancy records.
//!
//! The page lists one field per line; a line carrying the state tag
//! anchors a record, with the institution name two lines above, the
//! locality on the two anchor lines, and vacancies/deadline on the two
//! lines below.

use crate::domain::model::InstitutionRecord;
use crate::utils::error::{GeoError, Result};
use reqwest::Client;

pub async fn fetch_page(client: &Client, url: &str) -> Result<String> {
    tracing::debug!("Fetching listing page: {}", url);
    let response = client.get(url).send().await?;
    if !response.status().is_success() {
        return Err(GeoError::Scrape {
            message: format!("listing page returned status {}", response.status()),
        });
    }
    Ok(response.text().await?)
}

/// Flattens HTML into trimmed, non-empty text lines. Block-level closing
/// tags become line breaks; script and style bodies are dropped.
pub fn html_to_text(html: &str) -> String {
    let mut text = String::with_capacity(html.len() / 2);
    let mut rest = html;

    while let Some(open) = rest.find('<') {
        text.push_str(&rest[..open]);
        rest = &rest[open..];
        let Some(close) = rest.find('>') else {
            break;
        };
        let tag = rest[1..close].trim_start_matches('/');
        let name: String = tag
            .chars()
            .take_while(|c| c.is_ascii_alphanumeric())
            .collect::<String>()
            .to_ascii_lowercase();

        // Skip over script/style bodies entirely.
        if (name == "script" || name == "style") && !rest[1..close].starts_with('/') {
            let closing = format!("</{}", name);
            match rest[close..].to_ascii_lowercase().find(&closing) {
                Some(end) => {
                    let after = close + end;
                    rest = &rest[after..];
                    if let Some(gt) = rest.find('>') {
                        rest = &rest[gt + 1..];
                    } else {
                        rest = "";
                    }
                    continue;
                }
                None => break,
            }
        }

        if is_line_break(&name) {
            text.push('\n');
        }
        rest = &rest[close + 1..];
    }
    text.push_str(rest);

    decode_entities(&text)
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

fn is_line_break(tag: &str) -> bool {
    matches!(
        tag,
        "br" | "p" | "div" | "li" | "tr" | "td" | "table" | "ul" | "h1" | "h2" | "h3" | "h4"
    )
}

fn decode_entities(text: &str) -> String {
    text.replace("&nbsp;", " ")
        .replace("&amp;", "&")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
}

/// Cuts the inclusive window between the first occurrence of `start` and
/// the following occurrence of `end`. `None` when either marker is absent.
pub fn extract_window(text: &str, start: &str, end: &str) -> Option<String> {
    let start_index = text.find(start)?;
    let end_index = text[start_index..].find(end)? + start_index;
    Some(text[start_index..end_index + end.len()].to_string())
}

/// Parses institution records out of a text window. Lines containing the
/// state tag anchor a record; ids are assigned in document order.
pub fn parse_records(window: &str, state_tag: &str) -> Vec<InstitutionRecord> {
    let lines: Vec<&str> = window.lines().map(str::trim).collect();
    let mut records = Vec::new();

    for (i, line) in lines.iter().enumerate() {
        if !line.contains(state_tag) || i < 2 || i + 2 >= lines.len() {
            continue;
        }
        records.push(InstitutionRecord {
            id: records.len(),
            name: lines[i - 2].to_string(),
            location: format!("{}\n{}", lines[i - 1], lines[i]),
            vacancies: lines[i + 1].to_string(),
            deadline: lines[i + 2].to_string(),
        });
    }

    records
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;

    const WINDOW: &str = "\
SÃO PAULO
Escola Estadual Alfa
Campinas
Prefeitura de Campinas - SP
3 vagas
Inscrições até 10/09/2026
Colégio Beta
São Carlos
Prefeitura de São Carlos - SP
1 vaga
Inscrições até 20/09/2026
MINAS GERAIS";

    #[test]
    fn extract_window_is_inclusive_of_both_markers() {
        let text = "before SÃO PAULO middle MINAS GERAIS after";
        let window = extract_window(text, "SÃO PAULO", "MINAS GERAIS").unwrap();
        assert_eq!(window, "SÃO PAULO middle MINAS GERAIS");
    }

    #[test]
    fn extract_window_requires_both_markers() {
        assert!(extract_window("no markers here", "SÃO PAULO", "MINAS GERAIS").is_none());
        assert!(extract_window("only SÃO PAULO", "SÃO PAULO", "MINAS GERAIS").is_none());
        // End marker before the start marker does not count.
        assert!(extract_window("MINAS GERAIS then SÃO PAULO", "SÃO PAULO", "MINAS GERAIS").is_none());
    }

    #[test]
    fn parses_records_anchored_on_the_state_tag() {
        let records = parse_records(WINDOW, "- SP");
        assert_eq!(records.len(), 2);

        assert_eq!(records[0].id, 0);
        assert_eq!(records[0].name, "Escola Estadual Alfa");
        assert_eq!(records[0].location, "Campinas\nPrefeitura de Campinas - SP");
        assert_eq!(records[0].vacancies, "3 vagas");
        assert_eq!(records[0].deadline, "Inscrições até 10/09/2026");

        assert_eq!(records[1].id, 1);
        assert_eq!(records[1].name, "Colégio Beta");
    }

    #[test]
    fn tag_lines_near_the_window_edges_are_skipped() {
        let window = "Prefeitura - SP\nEscola\nCidade\nPrefeitura - SP";
        // First tag line has no two lines above, second none below.
        assert!(parse_records(window, "- SP").is_empty());
    }

    #[test]
    fn html_flattens_to_clean_lines() {
        let html = "<html><head><style>.x{color:red}</style>\
<script>var a = '<div>';</script></head>\
<body><div> Escola &amp; Col&#39;gio </div><p>3 vagas</p><br>fim</body></html>";
        let text = html_to_text(html);
        assert_eq!(text, "Escola & Col'gio\n3 vagas\nfim");
    }

    #[tokio::test]
    async fn fetch_page_propagates_non_success_status() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/professores/");
            then.status(404);
        });

        let client = Client::new();
        let result = fetch_page(&client, &server.url("/professores/")).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn fetch_page_returns_body_on_success() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/professores/");
            then.status(200).body("<html>ok</html>");
        });

        let client = Client::new();
        let body = fetch_page(&client, &server.url("/professores/")).await.unwrap();
        assert_eq!(body, "<html>ok</html>");
    }
}
