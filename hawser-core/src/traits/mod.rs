pub use authorizer::*;
pub use backend::*;

mod authorizer;
mod backend;
