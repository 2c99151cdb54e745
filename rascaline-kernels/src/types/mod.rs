//! Small containers shared by the other modules.
mod stack_vec;
pub use self::stack_vec::{StackVec, Array};
