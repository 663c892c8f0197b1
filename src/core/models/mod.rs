//! Data models for `exchange-planner`

pub mod abroad_course;
pub mod plan;
pub mod subject;
pub mod term;

pub use abroad_course::AbroadCourse;
pub use plan::ExchangePlan;
pub use subject::Subject;
pub use term::Term;
