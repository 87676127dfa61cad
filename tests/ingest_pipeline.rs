use chrono::{Local, NaiveDate, TimeZone};
use quotesheet::persist::{DirectoryAssetSink, MemorySink};
use quotesheet::{
    DecodeOutcome, Error, IngestOptions, Ingestor, RowType, persist_production_plan,
    persist_quotes,
};
use rust_xlsxwriter::{Image, Workbook as XlsxWriter};

fn quote_workbook() -> Vec<u8> {
    let mut book = XlsxWriter::new();

    let quotes = book.add_worksheet();
    quotes.set_name("견적서").unwrap();
    for (col, header) in ["견적번호", "등록일", "고객사", "할인"].iter().enumerate() {
        quotes.write_string(0, col as u16, *header).unwrap();
    }
    quotes.write_string(1, 0, "Q1").unwrap();
    quotes.write_number(1, 1, 44000).unwrap();
    quotes.write_string(1, 2, "ACME").unwrap();
    quotes.write_string(2, 0, "Q2").unwrap();
    quotes.write_string(2, 1, "미정").unwrap();
    quotes.write_string(2, 2, "Beta").unwrap();
    quotes.write_number(2, 3, 100).unwrap();

    let items = book.add_worksheet();
    items.set_name("견적품목").unwrap();
    for (col, header) in ["견적번호", "품목ID", "품명", "수량", "단가", "금액"].iter().enumerate() {
        items.write_string(0, col as u16, *header).unwrap();
    }
    items.write_string(1, 0, "Q1").unwrap();
    items.write_string(1, 1, "I1").unwrap();
    items.write_string(1, 2, "Widget").unwrap();
    items.write_string(2, 0, "Q2").unwrap();
    items.write_string(2, 1, "I2").unwrap();
    items.write_string(2, 2, "Bracket").unwrap();
    items.write_number(2, 3, 3).unwrap();
    items.write_string(2, 4, "별도").unwrap();
    items.write_number(2, 5, 900).unwrap();

    let processes = book.add_worksheet();
    processes.set_name("견적공정").unwrap();
    for (col, header) in ["품목ID", "공정", "수량", "단가", "금액"].iter().enumerate() {
        processes.write_string(0, col as u16, *header).unwrap();
    }
    for (row, (process, price, amount)) in [("Cut", 100, 1000), ("Paint", 50, 500)].iter().enumerate() {
        let row = row as u32 + 1;
        processes.write_string(row, 0, "I1").unwrap();
        processes.write_string(row, 1, *process).unwrap();
        processes.write_number(row, 2, 10).unwrap();
        processes.write_number(row, 3, *price).unwrap();
        processes.write_number(row, 4, *amount).unwrap();
    }

    book.save_to_buffer().unwrap()
}

fn production_workbook() -> Vec<u8> {
    let mut book = XlsxWriter::new();
    let sheet = book.add_worksheet();
    sheet.set_name("생산 계획").unwrap();
    sheet.write_string(6, 0, "2026.10.12 작성").unwrap();
    sheet.write_string(7, 1, "고객사").unwrap();
    sheet.write_string(7, 2, "모델").unwrap();

    sheet.write_string(8, 0, "42").unwrap();
    sheet.write_string(8, 1, "ACME").unwrap();
    sheet.write_string(8, 2, "M-100").unwrap();
    sheet.write_string(8, 3, "1,200").unwrap();
    sheet.write_string(9, 1, "차주 대기모델").unwrap();
    sheet.write_string(10, 2, "M-200").unwrap();
    sheet.write_number(10, 4, 45292).unwrap();
    sheet.write_string(12, 1, "관리모델 B").unwrap();
    book.save_to_buffer().unwrap()
}

#[test]
fn quote_workbook_reconciles_and_persists() {
    let ingestor = Ingestor::new(IngestOptions::new());
    let ingested_on = NaiveDate::from_ymd_opt(2026, 10, 14).unwrap();
    let mut ingestion = ingestor
        .ingest_quotes_on(quote_workbook(), Some("uploads/quotes.xlsx"), ingested_on)
        .unwrap();
    assert_eq!(ingestion.outcome, DecodeOutcome::Plain);
    assert_eq!(ingestion.quotes.len(), 2);

    let q1 = &ingestion.quotes[0];
    assert_eq!(q1.quote_number, "Q1");
    assert_eq!(q1.date, NaiveDate::from_ymd_opt(2020, 6, 18).unwrap());
    assert_eq!(q1.recipient_name, "ACME");
    let lines: Vec<_> = q1
        .items
        .iter()
        .map(|item| (item.name.as_str(), item.process.as_str(), item.amount))
        .collect();
    assert_eq!(lines, [("Widget", "Cut", 1000.0), ("Widget", "Paint", 500.0)]);
    assert_eq!(q1.totals.subtotal, 1500.0);
    assert_eq!(q1.totals.vat, 150.0);
    assert_eq!(q1.totals.total, 1650.0);

    let q2 = &ingestion.quotes[1];
    assert_eq!(q2.date, ingested_on);
    assert_eq!(q2.items.len(), 1);
    assert_eq!(q2.items[0].process, "");
    assert_eq!(q2.items[0].unit_price, None);
    assert_eq!(q2.items[0].amount, 900.0);
    assert_eq!(q2.totals.supply_price, 800.0);
    assert_eq!(q2.totals.vat, 80.0);
    assert_eq!(q2.totals.total, 880.0);

    let records = MemorySink::new();
    let dir = tempfile::tempdir().unwrap();
    let assets = DirectoryAssetSink::new(dir.path()).unwrap();
    persist_quotes(&mut ingestion, &records, &assets).unwrap();
    let saved = records.quotes().unwrap();
    assert_eq!(saved.len(), 2);
    assert_eq!(saved[0].source_file_path.as_deref(), Some("uploads/quotes.xlsx"));
}

// Baseline 1x1 JPEG: SOI, SOF0, SOS with one scan byte, EOI
const TINY_JPEG: &[u8] = &[
    0xFF, 0xD8, 0xFF, 0xC0, 0x00, 0x0B, 0x08, 0x00, 0x01, 0x00, 0x01, 0x01, 0x01, 0x11, 0x00,
    0xFF, 0xDA, 0x00, 0x08, 0x01, 0x01, 0x00, 0x00, 0x3F, 0x00, 0x2A, 0xFF, 0xD9,
];

#[test]
fn embedded_jpeg_is_attached_and_stored() {
    let mut book = XlsxWriter::new();
    let quotes = book.add_worksheet();
    quotes.set_name("견적서").unwrap();
    quotes.write_string(0, 0, "견적번호").unwrap();
    quotes.write_string(0, 1, "고객사").unwrap();
    quotes.write_string(1, 0, "Q1").unwrap();
    quotes.write_string(1, 1, "ACME").unwrap();
    quotes.insert_image(1, 4, &Image::new_from_buffer(TINY_JPEG).unwrap()).unwrap();

    let items = book.add_worksheet();
    items.set_name("견적품목").unwrap();
    for (col, header) in ["견적번호", "품목ID", "품명", "수량", "단가"].iter().enumerate() {
        items.write_string(0, col as u16, *header).unwrap();
    }
    for (row, name) in ["Widget", "Bolt"].iter().enumerate() {
        let row = row as u32 + 1;
        items.write_string(row, 0, "Q1").unwrap();
        items.write_string(row, 1, format!("I{row}")).unwrap();
        items.write_string(row, 2, *name).unwrap();
        items.write_number(row, 3, 1).unwrap();
        items.write_number(row, 4, 10).unwrap();
    }
    let bytes = book.save_to_buffer().unwrap();

    let ingestor = Ingestor::default();
    let ingested_on = NaiveDate::from_ymd_opt(2026, 10, 14).unwrap();
    let mut ingestion = ingestor.ingest_quotes_on(bytes, None, ingested_on).unwrap();

    assert_eq!(ingestion.images.len(), 1);
    assert_eq!(ingestion.images[0].bytes.as_ref(), TINY_JPEG);
    let quote = &ingestion.quotes[0];
    assert_eq!(quote.items[0].image_index, Some(0));
    assert_eq!(quote.items[1].image_index, None);

    let records = MemorySink::new();
    let dir = tempfile::tempdir().unwrap();
    let assets = DirectoryAssetSink::new(dir.path()).unwrap();
    persist_quotes(&mut ingestion, &records, &assets).unwrap();

    let saved = records.quotes().unwrap();
    let name = saved[0].items[0].image_name.clone().unwrap();
    assert_eq!(std::fs::read(dir.path().join(name)).unwrap(), TINY_JPEG);
    assert_eq!(saved[0].items[1].image_name, None);
}

#[test]
fn production_plan_is_classified_under_one_snapshot() {
    let ingestor = Ingestor::default();
    let imported_at = Local.with_ymd_and_hms(2026, 10, 14, 9, 30, 0).single().unwrap();
    let plan = ingestor
        .ingest_production_plan_at(&production_workbook(), "plan.xlsx", imported_at)
        .unwrap();

    assert_eq!(plan.snapshot.written_at_raw.as_deref(), Some("2026.10.12 작성"));
    assert_eq!(plan.snapshot.current_week_label, "ww42");
    assert_eq!(plan.snapshot.row_count, 5);

    let kinds: Vec<_> = plan.orders.iter().map(|o| (o.row_number, o.row_type)).collect();
    assert_eq!(
        kinds,
        [
            (9, RowType::Data),
            (10, RowType::DividerNextWeek),
            (11, RowType::Data),
            (13, RowType::DividerManaged),
        ]
    );

    let first = plan.orders[0].normalized(2026);
    assert_eq!(first.quantity, Some(1200.0));
    let third = plan.orders[2].normalized(2026);
    assert_eq!(third.order_date, NaiveDate::from_ymd_opt(2024, 1, 1));

    let records = MemorySink::new();
    persist_production_plan(&plan, &records).unwrap();
    let saved = records.snapshots().unwrap();
    assert_eq!(saved[0].0.id, plan.snapshot.id);
    assert_eq!(saved[0].1.len(), 4);
}

#[test]
fn wrong_mode_reports_the_missing_sheet() {
    let err = Ingestor::default()
        .ingest_production_plan(&quote_workbook(), "quotes.xlsx")
        .unwrap_err();
    assert!(matches!(err, Error::SheetNotFound { ref sheet } if sheet == "생산 계획"));
    assert_eq!(err.to_string(), "expected sheet '생산 계획' not found");
}

#[test]
fn options_load_from_yaml() {
    let options = IngestOptions::from_yaml_str(
        "password: '8715'\nproduction:\n  sheet_name: Plan\n  data_start_row: 2\n",
    )
    .unwrap();
    let mut book = XlsxWriter::new();
    let sheet = book.add_worksheet();
    sheet.set_name("Plan").unwrap();
    sheet.write_string(1, 1, "ACME").unwrap();
    let bytes = book.save_to_buffer().unwrap();

    let plan = Ingestor::new(options)
        .ingest_production_plan(&bytes, "plan.xlsx")
        .unwrap();
    assert_eq!(plan.orders.len(), 1);
    assert_eq!(plan.orders[0].row_number, 2);
}

#[cfg(feature = "ooxml_encryption")]
mod encrypted {
    use std::io::{Cursor, Write as _};

    use ms_offcrypto_writer::Ecma376AgileWriter;
    use rand::SeedableRng as _;
    use rand::rngs::StdRng;

    use super::*;

    fn encrypt(plain: &[u8], password: &str) -> Vec<u8> {
        let mut cursor = Cursor::new(Vec::new());
        let mut rng = StdRng::from_seed([7u8; 32]);
        let mut writer = Ecma376AgileWriter::create(&mut rng, password, &mut cursor).unwrap();
        writer.write_all(plain).unwrap();
        writer.finalize().unwrap();
        cursor.into_inner()
    }

    #[test]
    fn encrypted_quote_workbook_with_configured_password() {
        let bytes = encrypt(&quote_workbook(), "8715");
        let ingestor = Ingestor::new(IngestOptions::new().with_password("8715"));
        let ingestion = ingestor.ingest_quotes(bytes, None).unwrap();
        assert_eq!(ingestion.outcome, DecodeOutcome::Decrypted);
        assert_eq!(ingestion.quotes[0].totals.total, 1650.0);
    }

    #[test]
    fn encrypted_workbook_without_password_is_a_decode_error() {
        let bytes = encrypt(&quote_workbook(), "8715");
        let err = Ingestor::default().ingest_quotes(bytes, None).unwrap_err();
        assert!(matches!(err, Error::Decode(_)));
    }
}
