pub mod couple;

pub use couple::CoupleRepository;
