pub mod landscape;
pub mod peaks;
pub mod run;
