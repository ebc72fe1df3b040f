//! Sales Data

use jiff::civil::DateTime;

/// Sales report parameters as received from a caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SalesReportRequest {
    pub from: DateTime,
    pub to: DateTime,
    pub granularity: String,
}
