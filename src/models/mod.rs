pub mod component;
pub mod person;
pub mod speech;
pub mod unified;

pub use component::*;
pub use person::*;
pub use speech::*;
pub use unified::*;
