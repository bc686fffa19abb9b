//! Listing page parsing
//!
//! Turns the clip listing HTML into [`Item`]s in document order.

use scraper::{Html, Selector};
use url::Url;

use crate::app::models::Item;
use crate::app::scraper::year::extract_year;
use crate::constants::site;
use crate::errors::{ScrapeError, ScrapeResult};

/// Parse the listing page
///
/// Selects clip anchors inside headings, resolves each href against
/// `page_url` and uses the trimmed anchor text as title. Anchors with an
/// empty title or no href are skipped.
///
/// # Errors
///
/// Returns `ScrapeError` if the selector is invalid or an href cannot be
/// resolved to an absolute URL
pub fn parse_listing(html: &str, page_url: &Url) -> ScrapeResult<Vec<Item>> {
    let document = Html::parse_document(html);
    let selector =
        Selector::parse(site::CLIP_LINK_SELECTOR).map_err(|_| ScrapeError::InvalidSelector {
            selector: site::CLIP_LINK_SELECTOR.to_string(),
        })?;

    let mut items = Vec::new();

    for element in document.select(&selector) {
        let Some(href) = element.value().attr("href") else {
            continue;
        };

        let title = element.text().collect::<String>().trim().to_string();
        if title.is_empty() {
            continue;
        }

        let url = page_url
            .join(href.trim())
            .map_err(|_| ScrapeError::InvalidUrl {
                url: href.to_string(),
            })?;

        let year = extract_year(&title);
        items.push(Item::new(item_id(&url), title, url.as_str(), year));
    }

    Ok(items)
}

/// Last non-empty path segment of `url`
pub fn item_id(url: &Url) -> String {
    url.path_segments()
        .and_then(|segments| segments.filter(|s| !s.is_empty()).last())
        .unwrap_or_default()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    const LISTING: &str = r#"
        <html><body>
          <div class="synopsis">
            <h2><a href="/pt/biblioteca/musica-canticos/clipes-musicais/cancao-a/"> Canção A 2023 </a></h2>
          </div>
          <div class="synopsis">
            <h2><a href="https://www.jw.org/pt/biblioteca/musica-canticos/clipes-musicais/cancao-b">Canção B</a></h2>
          </div>
          <h2><a href="/pt/biblioteca/musica-canticos/clipes-musicais/vazio/">   </a></h2>
          <h3><a href="/pt/biblioteca/musica-canticos/clipes-musicais/fora/">Fora do título</a></h3>
          <h2><a href="/pt/biblioteca/outra-coisa/">Outra seção</a></h2>
        </body></html>
    "#;

    fn page_url() -> Url {
        Url::parse(site::LISTING_URL).unwrap()
    }

    #[test]
    fn test_parse_listing_in_document_order() {
        let items = parse_listing(LISTING, &page_url()).unwrap();

        let titles: Vec<_> = items.iter().map(|i| i.title.as_str()).collect();
        assert_eq!(titles, vec!["Canção A 2023", "Canção B"]);
    }

    #[test]
    fn test_parse_listing_resolves_relative_links() {
        let items = parse_listing(LISTING, &page_url()).unwrap();

        assert_eq!(
            items[0].url,
            "https://www.jw.org/pt/biblioteca/musica-canticos/clipes-musicais/cancao-a/"
        );
        assert_eq!(items[0].id, "cancao-a");
        assert_eq!(items[0].year, Some(2023));

        assert_eq!(items[1].id, "cancao-b");
        assert_eq!(items[1].year, None);
        assert!(items[1].download_url.is_empty());
    }

    #[test]
    fn test_parse_listing_without_matches_is_empty() {
        let items = parse_listing("<html><body><p>nada</p></body></html>", &page_url()).unwrap();
        assert!(items.is_empty());
    }

    #[test]
    fn test_item_id_ignores_trailing_slash() {
        let url = Url::parse("https://example.com/a/b/clip-1/").unwrap();
        assert_eq!(item_id(&url), "clip-1");

        let root = Url::parse("https://example.com/").unwrap();
        assert_eq!(item_id(&root), "");
    }
}
