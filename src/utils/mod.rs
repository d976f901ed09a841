pub mod cleaning;
pub mod data;
pub mod inspect;
pub mod metrics;
pub mod normalize;
pub mod summary;
