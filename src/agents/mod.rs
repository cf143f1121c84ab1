pub mod household;
pub mod region;

pub use household::Household;
pub use region::Region;
