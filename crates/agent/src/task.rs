//! Natural-language task construction for the browsing agent. The wording is
//! tuned for the Hungarian Google results page (consent banner text, forint
//! price markers) and doubles as the output-schema contract the parser
//! expects the agent to honor.

use pricecompare_core::config::SearchConfig;

/// Regional search URL for a product query. The query is suffixed with the
/// local price markers so shopping listings rank first, then form-encoded
/// (spaces as `+`).
pub fn search_url(query: &str, search: &SearchConfig) -> String {
    let regional_query = format!("{query} ár Ft");
    let encoded = urlencoding::encode(&regional_query).replace("%20", "+");
    format!(
        "{engine}?q={encoded}&gl={country}&hl={language}",
        engine = search.engine_url,
        country = search.country,
        language = search.language,
    )
}

/// Full browsing instructions for one comparison run.
pub fn build_task(query: &str, search: &SearchConfig) -> String {
    let url = search_url(query, search);
    format!(
        "Go to '{url}'. \
        **Then, use your specific JavaScript execution capability, similar to Playwright's \
        page.evaluate(), to run the code: document.body.style.zoom = '0.75';**. \
        After attempting the zoom, wait for 2 seconds to allow rendering. \
        Next, look for the cookie consent banner (it might be inside an iframe). \
        **If** a button with the exact text 'Összes elfogadása' is visible within the banner \
        or its potential iframe, click that specific button. \
        Then, scroll down slightly (e.g., 200-300 pixels) to ensure results are loaded. \
        Finally, analyze the search results (including shopping results if present) and \
        extract the single cheapest item's price, store name, and the direct URL to the product. \
        Format the final output strictly as a JSON object string containing a key 'cheapest_item', \
        whose value is another JSON object with keys 'price_huf' (the price as a number or string), \
        'store_name' (string), and 'product_url' (string)."
    )
}

#[cfg(test)]
mod tests {
    use pricecompare_core::config::SearchConfig;

    use super::{build_task, search_url};

    fn search_fixture() -> SearchConfig {
        SearchConfig {
            engine_url: "https://www.google.hu/search".to_string(),
            country: "hu".to_string(),
            language: "hu".to_string(),
        }
    }

    #[test]
    fn search_url_form_encodes_the_regional_query() {
        let url = search_url("samsung s21", &search_fixture());
        assert_eq!(
            url,
            "https://www.google.hu/search?q=samsung+s21+%C3%A1r+Ft&gl=hu&hl=hu"
        );
    }

    #[test]
    fn search_url_percent_encodes_reserved_characters() {
        let url = search_url("kávéfőző & daráló", &search_fixture());
        assert!(url.contains("q=k%C3%A1v%C3%A9f%C5%91z%C5%91+%26+dar%C3%A1l%C3%B3+%C3%A1r+Ft"));
        assert!(!url.contains(' '));
    }

    #[test]
    fn task_embeds_url_consent_text_and_output_schema() {
        let task = build_task("samsung s21", &search_fixture());

        assert!(task.contains("https://www.google.hu/search?q=samsung+s21+%C3%A1r+Ft&gl=hu&hl=hu"));
        assert!(task.contains("Összes elfogadása"));
        assert!(task.contains("document.body.style.zoom = '0.75'"));
        assert!(task.contains("'cheapest_item'"));
        assert!(task.contains("'price_huf'"));
        assert!(task.contains("'store_name'"));
        assert!(task.contains("'product_url'"));
    }
}
