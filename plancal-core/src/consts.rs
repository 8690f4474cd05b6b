/// Environment variable holding the directory of the pdfium dynamic library.
pub const PDFIUM_LIB_PATH_ENV_NAME: &str = "PDFIUM_DYNAMIC_LIB_PATH";

/// Environment variable holding the path of the PaddleOCR text detection model.
pub const DET_MODEL_PATH_ENV_NAME: &str = "PLANCAL_DET_MODEL";

/// Environment variable holding the path of the PaddleOCR text recognition model.
pub const REC_MODEL_PATH_ENV_NAME: &str = "PLANCAL_REC_MODEL";

/// Month the planning documents describe when nothing else is configured.
///
/// Planning sheets only print the weekday and the day number, so the month
/// and year can not be recovered from the document itself.
pub const DEFAULT_MONTH: &str = "juillet";

/// Year the planning documents describe when nothing else is configured.
pub const DEFAULT_YEAR: i32 = 2025;

/// Number of decimals the vertical position of a fragment is rounded to.
///
/// Fragments whose rounded `y` are equal end up on the same reconstructed
/// line, so this is the line clustering tolerance.
pub const LINE_DECIMALS: u32 = 1;

/// Duration given to an entry which only states its start time, in minutes.
pub const DEFAULT_DURATION_MINUTES: i64 = 180;

/// Scale applied to a pdf page (72 dpi) before running OCR on it.
pub const RENDER_SCALE: f32 = 2.0;

/// Prefix of the generated spreadsheet and calendar files.
pub const OUTPUT_FILE_PREFIX: &str = "planning";

pub const XLSX_MIME: &str = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

pub const ICS_MIME: &str = "text/calendar";

/// Column titles of the exported spreadsheet.
pub const XLSX_HEADERS: [&str; 5] = ["Date", "Start", "End", "Title", "Description"];
