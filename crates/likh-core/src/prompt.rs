//! Fixed instructions sent alongside the image.

use serde::{Deserialize, Serialize};

/// Verbatim transcription.
pub const VERBATIM_PROMPT: &str = "Extract all text content from this image exactly as it appears.";

/// Freeform CSV.
pub const CSV_PROMPT: &str = "Extract all text content from this image and format it strictly as CSV. \
Treat it as unstructured text unless an obvious table is present. \
Structure lists/paragraphs reasonably within CSV rows.";

/// Fixed 16-column invoice schema.
pub const STRUCTURED_INVOICE_PROMPT: &str = "Extract the following fields from the attached invoice image into a structured CSV format with these columns: \
Date,Invoice No.,Particulars,Location,GSTIN,Party Name,Party GSTIN,Item,MRP,Qty,Rate,Amount,Total Amount,Disc Amt.,IGST Payable,Grand Total. \
Particulars is the name of the originator and Location is the location of the originator. \
Each product entry in the invoice must be a separate row. \
For each row, fill in the shared invoice information (Date, Invoice No., Particulars, Location, GSTIN, Party Name, Party GSTIN) \
along with the corresponding product details (Item, MRP, Qty, Rate, Amount). \
Take 'Total Amount', 'Disc Amt.', 'IGST Payable' and 'Grand Total' from the summary section of the invoice and repeat them on every row. \
Use the attached image to extract the data. \
Strictly return raw CSV only: no prose, no code fences, no other characters.";

/// Which of the three instructions applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PromptKind {
    Verbatim,
    Csv,
    StructuredInvoice,
}

impl PromptKind {
    /// `want_structured_invoice` is ignored when `want_csv` is false.
    pub fn from_flags(want_csv: bool, want_structured_invoice: bool) -> Self {
        match (want_csv, want_structured_invoice) {
            (false, _) => PromptKind::Verbatim,
            (true, false) => PromptKind::Csv,
            (true, true) => PromptKind::StructuredInvoice,
        }
    }

    pub fn text(&self) -> &'static str {
        match self {
            PromptKind::Verbatim => VERBATIM_PROMPT,
            PromptKind::Csv => CSV_PROMPT,
            PromptKind::StructuredInvoice => STRUCTURED_INVOICE_PROMPT,
        }
    }
}

/// Select the instruction for a pair of output flags.
pub fn select_prompt(want_csv: bool, want_structured_invoice: bool) -> &'static str {
    PromptKind::from_flags(want_csv, want_structured_invoice).text()
}
