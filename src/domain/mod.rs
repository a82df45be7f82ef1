pub mod cart;
pub mod invoice;
pub mod order;

pub use cart::*;
pub use invoice::*;
pub use order::*;
