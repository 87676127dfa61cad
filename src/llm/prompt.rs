//! Prompt template and response shape for free-form quote workbooks.

use std::fmt::Write as _;

use super::client::CompletionRequest;

/// JSON shape the model must answer with. `null` marks omitted values.
pub const RESPONSE_SHAPE: &str = r#"{
  "quotes": [
    {
      "quoteNumber": "string or null",
      "date": "YYYY-MM-DD or null",
      "recipientName": "string",
      "recipientContact": "string or null",
      "supplier": {
        "name": "string or null",
        "representative": "string or null",
        "address": "string or null",
        "businessNumber": "string or null",
        "contact": "string or null"
      },
      "discount": "number or null",
      "notes": "string or null",
      "items": [
        {
          "name": "string",
          "process": "string or null",
          "quantity": "number or null",
          "unitPrice": "number or null",
          "amount": "number or null",
          "note": "string or null",
          "imageIndex": "integer or null"
        }
      ]
    }
  ]
}"#;

const INSTRUCTION: &str = "\
You extract price quotes from spreadsheet contents. The sheets below were \
exported from a workbook whose layout is not fixed; labels are usually Korean \
(견적번호 = quote number, 품명 = item name, 공정 = process, 수량 = quantity, \
단가 = unit price, 금액 = amount, 비고 = note, 할인 = discount).

Rules:
- Answer with a single JSON document and nothing else.
- Use exactly the keys of the shape below. Use null for anything the sheets do not state.
- Numbers must be JSON numbers without currency symbols or thousands separators.
- A unit price written as text such as \"별도\" means the price is withheld: use null.
- Keep items in the order they appear.
- If the workbook contains no quote, answer {\"quotes\": []}.";

/// Build the completion request for serialized sheets.
///
/// `image_count` tells the model how many embedded images exist so it can
/// reference them by 0-based `imageIndex`.
pub fn build_request(rendered_sheets: &str, image_count: usize) -> CompletionRequest {
    let mut system = String::with_capacity(INSTRUCTION.len() + RESPONSE_SHAPE.len() + 128);
    system.push_str(INSTRUCTION);
    if image_count > 0 {
        let _ = write!(
            system,
            "\n- The workbook embeds {image_count} images in item order; set imageIndex \
             (0 to {}) only when an item clearly has one.",
            image_count - 1
        );
    } else {
        system.push_str("\n- The workbook has no images: imageIndex is always null.");
    }
    system.push_str("\n\nResponse shape:\n");
    system.push_str(RESPONSE_SHAPE);

    CompletionRequest {
        system,
        user: rendered_sheets.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_carries_sheets_and_shape() {
        let request = build_request("=== SHEET: 견적 ===\n품명\t수량\n=== END SHEET ===\n", 0);
        assert!(request.user.contains("=== SHEET: 견적 ==="));
        assert!(request.system.contains("\"unitPrice\": \"number or null\""));
        assert!(request.system.contains("imageIndex is always null"));
    }

    #[test]
    fn test_image_range_is_announced() {
        let request = build_request("", 3);
        assert!(request.system.contains("embeds 3 images"));
        assert!(request.system.contains("(0 to 2)"));
    }

    #[test]
    fn test_shape_is_valid_json() {
        let shape: serde_json::Value = serde_json::from_str(RESPONSE_SHAPE).unwrap();
        assert!(shape["quotes"][0]["items"].is_array());
    }
}
