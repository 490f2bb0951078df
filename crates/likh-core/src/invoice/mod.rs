//! Structured invoice schema.

mod check;

pub use check::check_invoice_csv;

/// Columns requested in structured invoice mode, in order.
pub const INVOICE_COLUMNS: [&str; 16] = [
    "Date",
    "Invoice No.",
    "Particulars",
    "Location",
    "GSTIN",
    "Party Name",
    "Party GSTIN",
    "Item",
    "MRP",
    "Qty",
    "Rate",
    "Amount",
    "Total Amount",
    "Disc Amt.",
    "IGST Payable",
    "Grand Total",
];
