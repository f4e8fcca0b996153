//! CSV-backed defect source and test case storage.

pub mod defect_file;
pub mod test_case_file;

pub use defect_file::load_defects;
pub use test_case_file::CsvTestCaseStorage;
