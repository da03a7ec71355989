pub mod couple;

pub use couple::CoupleService;
