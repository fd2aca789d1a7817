pub mod stage0_assemble;
pub mod stage1_resolve;
pub mod stage2_unify;
pub mod stage3_render;

pub use stage0_assemble::*;
pub use stage1_resolve::*;
pub use stage2_unify::*;
pub use stage3_render::*;
