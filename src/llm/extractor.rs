use chrono::NaiveDate;
use tracing::{debug, info, warn};

use super::client::CompletionClient;
use super::error::ExtractionError;
use super::prompt::build_request;
use super::response::parse_quotes_response;
use crate::config::ModelOptions;
use crate::images::ExtractedImage;
use crate::quote::{QuoteRecord, retain_known_images};
use crate::sheet::{RawSheet, render_sheets};

/// Model-assisted quote extraction for workbooks without the fixed layout.
#[derive(Debug, Clone)]
pub struct ModelExtractor<C> {
    client: C,
    options: ModelOptions,
}

impl<C: CompletionClient> ModelExtractor<C> {
    pub fn new(client: C, options: ModelOptions) -> Self {
        Self { client, options }
    }

    /// Issue one completion over every non-empty sheet and validate the answer.
    ///
    /// Sheets are sent whole; a sheet over the configured row limit fails the
    /// call before the model is asked. The call is bounded by the configured
    /// timeout and is not retried.
    /// Image indices the model invents are dropped.
    pub async fn extract(
        &self,
        sheets: &[RawSheet],
        images: &[ExtractedImage],
        ingested_on: NaiveDate,
    ) -> Result<Vec<QuoteRecord>, ExtractionError> {
        if let Some(limit) = self.options.max_sheet_rows {
            check_row_limit(sheets, limit)?;
        }
        let rendered = render_sheets(sheets);
        if rendered.is_empty() {
            info!("workbook has no non-empty sheets, skipping model extraction");
            return Ok(Vec::new());
        }

        let request = build_request(&rendered, images.len());
        debug!(
            prompt_bytes = request.system.len() + request.user.len(),
            images = images.len(),
            "requesting model completion"
        );

        let timeout = self.options.timeout();
        let completion = tokio::time::timeout(timeout, self.client.complete(request))
            .await
            .map_err(|_| ExtractionError::Timeout(timeout))??;
        debug!(response_bytes = completion.len(), "received model completion");

        let mut quotes = parse_quotes_response(&completion, ingested_on)
            .inspect_err(|e| warn!(error = %e, "model response rejected"))?;
        retain_known_images(&mut quotes, images);

        info!(quotes = quotes.len(), "extracted quotes via model");
        Ok(quotes)
    }
}

fn check_row_limit(sheets: &[RawSheet], limit: usize) -> Result<(), ExtractionError> {
    for sheet in sheets {
        let rows = sheet.filled_rows().count();
        if rows > limit {
            warn!(sheet = %sheet.name, rows, limit, "sheet over the model row limit");
            return Err(ExtractionError::SheetTooLarge {
                sheet: sheet.name.clone(),
                rows,
                limit,
            });
        }
    }
    Ok(())
}


#[cfg(test)]
mod tests {
    use std::future::{Future, pending};

    use bytes::Bytes;

    use super::test_support::ScriptedClient;
    use super::*;
    use crate::llm::client::CompletionRequest;
    use crate::llm::error::CompletionError;
    use crate::sheet::RawCell;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 14).unwrap()
    }

    fn sheets() -> Vec<RawSheet> {
        vec![
            RawSheet::new(
                "견적",
                vec![
                    vec![RawCell::from("품명"), RawCell::from("수량")],
                    vec![RawCell::from("Widget"), RawCell::Number(10.0)],
                ],
            ),
            RawSheet::new("빈 시트", vec![]),
        ]
    }

    fn image(index: usize) -> ExtractedImage {
        ExtractedImage {
            bytes: Bytes::from_static(&[0xFF, 0xD8, 0xFF, 0xD9]),
            source_index: index,
        }
    }

    struct Hanging;

    impl CompletionClient for Hanging {
        fn complete(
            &self,
            _request: CompletionRequest,
        ) -> impl Future<Output = Result<String, CompletionError>> + Send {
            pending()
        }
    }

    const REPLY: &str = "```json\n{\"quotes\":[{\"recipientName\":\"ACME\",\"items\":[\
        {\"name\":\"Widget\",\"quantity\":10,\"unitPrice\":100,\"imageIndex\":0},\
        {\"name\":\"Bolt\",\"quantity\":1,\"unitPrice\":5,\"imageIndex\":7}]}]}\n```";

    #[tokio::test]
    async fn test_extract_with_scripted_client() {
        let client = ScriptedClient::replying(REPLY);
        let extractor = ModelExtractor::new(&client, ModelOptions::default());
        let quotes = extractor.extract(&sheets(), &[image(0)], today()).await.unwrap();

        assert_eq!(quotes.len(), 1);
        assert_eq!(quotes[0].items[0].image_index, Some(0));
        // Index 7 names no extracted image
        assert_eq!(quotes[0].items[1].image_index, None);
        assert_eq!(quotes[0].totals.subtotal, 1005.0);

        let request = client.calls().unwrap();
        assert!(request.user.contains("=== SHEET: 견적 ==="));
        assert!(request.user.contains("Widget\t10"));
        assert!(!request.user.contains("빈 시트"));
        assert!(request.system.contains("embeds 1 images"));
    }

    #[tokio::test]
    async fn test_client_failure_propagates() {
        let client = ScriptedClient::failing(CompletionError::Status {
            status: 503,
            message: "overloaded".to_string(),
        });
        let extractor = ModelExtractor::new(client, ModelOptions::default());
        let err = extractor.extract(&sheets(), &[], today()).await.unwrap_err();
        assert!(matches!(
            err,
            ExtractionError::Client(CompletionError::Status { status: 503, .. })
        ));
    }

    #[tokio::test]
    async fn test_unparsable_reply_is_an_error() {
        let extractor =
            ModelExtractor::new(ScriptedClient::replying("Sorry, no idea."), ModelOptions::default());
        let err = extractor.extract(&sheets(), &[], today()).await.unwrap_err();
        assert_eq!(err, ExtractionError::NoDocument);
    }

    #[tokio::test]
    async fn test_empty_workbook_skips_the_model() {
        let client = ScriptedClient::replying("unused");
        let extractor = ModelExtractor::new(&client, ModelOptions::default());
        let quotes = extractor
            .extract(&[RawSheet::new("Sheet1", vec![])], &[], today())
            .await
            .unwrap();
        assert!(quotes.is_empty());
        assert!(client.calls().is_none());
    }

    fn long_sheet(rows: usize) -> RawSheet {
        RawSheet::new(
            "긴 시트",
            (0..rows)
                .map(|i| vec![RawCell::from(format!("Item{i}").as_str()), RawCell::Number(1.0)])
                .collect(),
        )
    }

    #[tokio::test]
    async fn test_long_sheet_is_sent_whole_by_default() {
        let client = ScriptedClient::replying(r#"{"quotes": []}"#);
        let extractor = ModelExtractor::new(&client, ModelOptions::default());
        extractor.extract(&[long_sheet(600)], &[], today()).await.unwrap();

        let request = client.calls().unwrap();
        assert!(request.user.contains("Item498\t1"));
        assert!(request.user.contains("Item599\t1"));
    }

    #[tokio::test]
    async fn test_row_limit_fails_instead_of_truncating() {
        let client = ScriptedClient::replying(r#"{"quotes": []}"#);
        let options = ModelOptions {
            max_sheet_rows: Some(500),
            ..ModelOptions::default()
        };
        let extractor = ModelExtractor::new(&client, options);
        let err = extractor.extract(&[long_sheet(600)], &[], today()).await.unwrap_err();

        assert_eq!(
            err,
            ExtractionError::SheetTooLarge {
                sheet: "긴 시트".to_string(),
                rows: 600,
                limit: 500,
            }
        );
        assert!(client.calls().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout() {
        let options = ModelOptions {
            timeout_secs: 5,
            ..ModelOptions::default()
        };
        let extractor = ModelExtractor::new(Hanging, options);
        let err = extractor.extract(&sheets(), &[], today()).await.unwrap_err();
        assert_eq!(err, ExtractionError::Timeout(std::time::Duration::from_secs(5)));
    }
}
