pub mod history;
pub mod patient;

pub use history::HistoryLedger;
pub use patient::PatientService;
