pub mod comparison;
pub mod month;
pub mod monthly;
pub mod observation;
pub mod source;
pub mod station;
