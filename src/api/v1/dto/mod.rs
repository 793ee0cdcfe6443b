pub mod hal;
pub mod lectures;
