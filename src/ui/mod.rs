pub mod dashboard;
pub mod panels;
pub mod plot;
pub mod range;
pub mod table;
