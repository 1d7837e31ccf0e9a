mod outcome;
mod request;
mod token;

pub use outcome::*;
pub use request::*;
pub use token::*;
