pub mod commerce;
pub mod media;
pub mod postgres;
