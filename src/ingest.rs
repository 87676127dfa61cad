//! Ingestion pipelines from uploaded bytes to persisted records.
//!
//! An [`Ingestor`] holds deployment options and runs one upload to
//! completion per call. Nothing is shared between calls, so one ingestor can
//! serve concurrent requests.
//!
//! # Examples
//!
//! ```rust,no_run
//! use quotesheet::persist::{DirectoryAssetSink, MemorySink};
//! use quotesheet::{IngestOptions, Ingestor, persist_quotes};
//!
//! let ingestor = Ingestor::new(IngestOptions::new().with_password("8715"));
//! let bytes = std::fs::read("quotes.xlsx")?;
//! let mut ingestion = ingestor.ingest_quotes(bytes, Some("uploads/quotes.xlsx"))?;
//!
//! let records = MemorySink::new();
//! let assets = DirectoryAssetSink::new("assets")?;
//! persist_quotes(&mut ingestion, &records, &assets)?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use bytes::Bytes;
use chrono::{DateTime, Local, NaiveDate};
use tracing::{info, warn};

use crate::common::error::Result;
use crate::config::IngestOptions;
use crate::images::{ExtractedImage, extract_images};
use crate::llm::{CompletionClient, ModelExtractor};
use crate::persist::{AssetSink, RecordSink};
use crate::production::{ProductionPlan, parse_production_plan};
use crate::quote::{QuoteRecord, attach_images, reconcile};
use crate::sheet::{DecodeOutcome, Workbook};

/// Quotes parsed from one upload, with the images found in it.
#[derive(Debug, Clone)]
pub struct QuoteIngestion {
    pub quotes: Vec<QuoteRecord>,
    /// Images in discovery order; items reference them by `source_index`
    pub images: Vec<ExtractedImage>,
    pub outcome: DecodeOutcome,
}

/// Runs the ingestion modes with shared options.
#[derive(Debug, Clone, Default)]
pub struct Ingestor {
    options: IngestOptions,
}

impl Ingestor {
    pub fn new(options: IngestOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &IngestOptions {
        &self.options
    }

    /// Decode with the configured password, falling back to the plain buffer.
    pub fn decode(&self, bytes: &[u8]) -> Result<Workbook> {
        let workbook = Workbook::decode(bytes, self.options.password.as_deref())?;
        if let DecodeOutcome::PlainFallback { reason } = workbook.outcome() {
            warn!(reason = %reason, "password decryption failed, read the file as plain");
        }
        Ok(workbook)
    }

    /// Ingest a three-sheet quote workbook.
    pub fn ingest_quotes(
        &self,
        bytes: impl Into<Bytes>,
        source_file_path: Option<&str>,
    ) -> Result<QuoteIngestion> {
        self.ingest_quotes_on(bytes, source_file_path, Local::now().date_naive())
    }

    /// Like [`Ingestor::ingest_quotes`] with an explicit ingestion date,
    /// used for registration dates that are not serials.
    pub fn ingest_quotes_on(
        &self,
        bytes: impl Into<Bytes>,
        source_file_path: Option<&str>,
        ingested_on: NaiveDate,
    ) -> Result<QuoteIngestion> {
        let bytes = bytes.into();
        let workbook = self.decode(&bytes)?;
        let mut quotes = reconcile(&workbook, &self.options.quote_sheets, ingested_on)?;

        for quote in &mut quotes {
            quote.source_file_path = source_file_path.map(str::to_string);
            if quote.supplier.is_none() {
                quote.supplier = self.options.default_supplier.clone();
            }
        }

        let images = extract_images(&bytes);
        attach_images(&mut quotes, &images);
        info!(
            quotes = quotes.len(),
            images = images.len(),
            "ingested quote workbook"
        );

        Ok(QuoteIngestion {
            quotes,
            images,
            outcome: workbook.outcome().clone(),
        })
    }

    /// Ingest a free-form quote workbook through a completion model.
    pub async fn ingest_quotes_via_model<C: CompletionClient>(
        &self,
        client: C,
        bytes: impl Into<Bytes>,
        source_file_path: Option<&str>,
    ) -> Result<QuoteIngestion> {
        self.ingest_quotes_via_model_on(client, bytes, source_file_path, Local::now().date_naive())
            .await
    }

    /// Like [`Ingestor::ingest_quotes_via_model`] with an explicit ingestion
    /// date, used for quotes the model reports without a date.
    pub async fn ingest_quotes_via_model_on<C: CompletionClient>(
        &self,
        client: C,
        bytes: impl Into<Bytes>,
        source_file_path: Option<&str>,
        ingested_on: NaiveDate,
    ) -> Result<QuoteIngestion> {
        let bytes = bytes.into();
        let workbook = self.decode(&bytes)?;
        let images = extract_images(&bytes);

        let extractor = ModelExtractor::new(client, self.options.model.clone());
        let mut quotes = extractor
            .extract(workbook.sheets(), &images, ingested_on)
            .await?;
        for quote in &mut quotes {
            quote.source_file_path = source_file_path.map(str::to_string);
        }

        Ok(QuoteIngestion {
            quotes,
            images,
            outcome: workbook.outcome().clone(),
        })
    }

    /// Ingest a production-plan workbook, stamped with the current time.
    pub fn ingest_production_plan(&self, bytes: &[u8], file_name: &str) -> Result<ProductionPlan> {
        self.ingest_production_plan_at(bytes, file_name, Local::now())
    }

    pub fn ingest_production_plan_at(
        &self,
        bytes: &[u8],
        file_name: &str,
        imported_at: DateTime<Local>,
    ) -> Result<ProductionPlan> {
        let workbook = self.decode(bytes)?;
        let plan = parse_production_plan(&workbook, &self.options.production, file_name, imported_at)?;
        info!(
            snapshot = %plan.snapshot.id,
            orders = plan.orders.len(),
            "ingested production plan"
        );
        Ok(plan)
    }
}

/// Store the images, name them on their items, then save the quotes.
///
/// Quotes are saved in one batch after every image is stored. When a store
/// or the batch fails, the images stored so far are removed again and the
/// items keep no asset names.
pub fn persist_quotes<R, A>(ingestion: &mut QuoteIngestion, records: &R, assets: &A) -> Result<()>
where
    R: RecordSink + ?Sized,
    A: AssetSink + ?Sized,
{
    let mut names = Vec::with_capacity(ingestion.images.len());
    for image in &ingestion.images {
        match assets.store(image) {
            Ok(name) => names.push((image.source_index, name)),
            Err(err) => {
                discard_assets(assets, &names);
                return Err(err.into());
            },
        }
    }

    for item in ingestion.quotes.iter_mut().flat_map(|quote| quote.items.iter_mut()) {
        item.image_name = item.image_index.and_then(|index| {
            names
                .iter()
                .find(|(source_index, _)| *source_index == index)
                .map(|(_, name)| name.clone())
        });
    }

    if let Err(err) = records.save_quotes(&ingestion.quotes) {
        discard_assets(assets, &names);
        for item in ingestion.quotes.iter_mut().flat_map(|quote| quote.items.iter_mut()) {
            item.image_name = None;
        }
        return Err(err.into());
    }
    Ok(())
}

fn discard_assets<A: AssetSink + ?Sized>(assets: &A, names: &[(usize, String)]) {
    for (_, name) in names {
        if let Err(err) = assets.remove(name) {
            warn!(name = %name, error = %err, "could not remove orphaned image asset");
        }
    }
}

/// Save a snapshot and its orders in one batch.
pub fn persist_production_plan<R>(plan: &ProductionPlan, records: &R) -> Result<()>
where
    R: RecordSink + ?Sized,
{
    records.save_snapshot(&plan.snapshot, &plan.orders)?;
    Ok(())
}
