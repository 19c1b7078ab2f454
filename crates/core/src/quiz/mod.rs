pub mod marker;
pub mod normalize;
pub mod panel;
pub mod score;
pub mod session;
