pub mod providers;
pub mod study;

pub use study::StudyService;
