// export modules
pub mod fanout;
pub mod gateway;
pub mod leverage;
pub mod symbols;

pub use fanout::*;
pub use gateway::*;
pub use leverage::*;
pub use symbols::*;
